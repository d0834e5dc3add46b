//! POM parsing for bills of materials: coordinates, parent reference,
//! properties and `dependencyManagement`.

use std::collections::BTreeMap;

use quick_xml::events::Event;
use quick_xml::Reader;

use trellis_core::coordinate::Coordinate;
use trellis_util::errors::TrellisError;

/// Property substitution passes before giving up on nested references.
const MAX_INTERPOLATION_PASSES: usize = 16;

/// The parts of a POM that matter for dependency management.
#[derive(Debug, Clone, Default)]
pub struct Pom {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub parent: Option<ParentRef>,
    pub properties: BTreeMap<String, String>,
    pub managed_entries: Vec<ManagedDependency>,
}

/// The `<parent>` block of a POM.
#[derive(Debug, Clone, Default)]
pub struct ParentRef {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl ParentRef {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(&self.group_id, &self.artifact_id, &self.version)
    }
}

/// One `<dependency>` inside `<dependencyManagement>`.
#[derive(Debug, Clone, Default)]
pub struct ManagedDependency {
    pub group_id: String,
    pub artifact_id: String,
    pub version: Option<String>,
    pub scope: Option<String>,
    pub kind: Option<String>,
}

impl ManagedDependency {
    /// An import of another BOM: `<scope>import</scope>` with `<type>pom</type>`.
    pub fn is_import(&self) -> bool {
        matches!(
            (self.scope.as_deref(), self.kind.as_deref()),
            (Some("import"), Some("pom"))
        )
    }

    pub fn key(&self) -> String {
        trellis_core::coordinate::artifact_key(&self.group_id, &self.artifact_id)
    }

    fn set(&mut self, field: &str, value: String) {
        match field {
            "groupId" => self.group_id = value,
            "artifactId" => self.artifact_id = value,
            "version" => self.version = Some(value),
            "scope" => self.scope = Some(value),
            "type" => self.kind = Some(value),
            _ => {}
        }
    }
}

impl Pom {
    /// Group of this POM, inherited from `<parent>` when not declared.
    pub fn inherited_group(&self) -> Option<&str> {
        match (&self.group_id, &self.parent) {
            (Some(group), _) => Some(group),
            (None, Some(parent)) => Some(&parent.group_id),
            (None, None) => None,
        }
    }

    /// Version of this POM, inherited from `<parent>` when not declared.
    pub fn inherited_version(&self) -> Option<&str> {
        match (&self.version, &self.parent) {
            (Some(version), _) => Some(version),
            (None, Some(parent)) => Some(&parent.version),
            (None, None) => None,
        }
    }

    /// Expand `${name}` placeholders from the POM properties and the
    /// `project.*` model values. Unknown placeholders stay as written.
    pub fn interpolate(&self, input: &str) -> String {
        let mut current = input.to_string();
        for _ in 0..MAX_INTERPOLATION_PASSES {
            let next = self.substitute_once(&current);
            if next == current {
                break;
            }
            current = next;
        }
        current
    }

    fn substitute_once(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        let mut rest = input;
        while let Some(open) = rest.find("${") {
            let Some(close) = rest[open..].find('}').map(|i| open + i) else {
                break;
            };
            out.push_str(&rest[..open]);
            let name = &rest[open + 2..close];
            match self.lookup(name) {
                Some(value) => out.push_str(&value),
                None => out.push_str(&rest[open..=close]),
            }
            rest = &rest[close + 1..];
        }
        out.push_str(rest);
        out
    }

    fn lookup(&self, name: &str) -> Option<String> {
        let model = name
            .strip_prefix("project.")
            .or_else(|| name.strip_prefix("pom."));
        let Some(field) = model else {
            return self.properties.get(name).cloned();
        };
        let value = match field {
            "groupId" => self.inherited_group(),
            "artifactId" => self.artifact_id.as_deref(),
            "version" => self.inherited_version(),
            "parent.groupId" => self.parent.as_ref().map(|p| p.group_id.as_str()),
            "parent.version" => self.parent.as_ref().map(|p| p.version.as_str()),
            _ => return self.properties.get(name).cloned(),
        };
        value.map(str::to_string)
    }

    /// Interpolate every managed coordinate in place.
    pub fn resolve_properties(&mut self) {
        let mut entries = std::mem::take(&mut self.managed_entries);
        for entry in &mut entries {
            entry.group_id = self.interpolate(&entry.group_id);
            entry.artifact_id = self.interpolate(&entry.artifact_id);
            entry.version = entry.version.as_deref().map(|v| self.interpolate(v));
        }
        self.managed_entries = entries;
    }

    /// Fold an already merged parent POM into this one. The child keeps its
    /// own properties and managed entries; imports are always inherited.
    pub fn apply_parent(&mut self, parent: &Pom) {
        for (name, value) in &parent.properties {
            if !self.properties.contains_key(name) {
                self.properties.insert(name.clone(), value.clone());
            }
        }
        if self.group_id.is_none() {
            self.group_id = parent.inherited_group().map(str::to_string);
        }
        if self.version.is_none() {
            self.version = parent.inherited_version().map(str::to_string);
        }
        let inherited: Vec<ManagedDependency> = parent
            .managed_entries
            .iter()
            .filter(|entry| entry.is_import() || self.declared_version(&entry.key()).is_none())
            .cloned()
            .collect();
        self.managed_entries.extend(inherited);
    }

    fn declared_version(&self, key: &str) -> Option<&ManagedDependency> {
        self.managed_entries
            .iter()
            .find(|entry| !entry.is_import() && entry.key() == key)
    }

    /// Version this POM itself manages for `group:artifact`.
    pub fn managed_version(&self, group_id: &str, artifact_id: &str) -> Option<&str> {
        let key = trellis_core::coordinate::artifact_key(group_id, artifact_id);
        self.declared_version(&key)
            .and_then(|entry| entry.version.as_deref())
    }

    /// BOM imports, in declaration order.
    pub fn bom_imports(&self) -> impl Iterator<Item = &ManagedDependency> {
        self.managed_entries.iter().filter(|d| d.is_import())
    }
}

/// Where the reader currently is inside `<project>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Project,
    Parent,
    Properties,
    ManagedDependency,
    Other,
}

/// Parse a POM XML string.
pub fn parse_pom(xml: &str) -> Result<Pom, TrellisError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut pom = Pom::default();
    let mut elements: Vec<String> = Vec::new();
    let mut text = String::new();
    let mut entry = ManagedDependency::default();
    let mut parent = ParentRef::default();

    loop {
        let event = reader.read_event().map_err(|e| TrellisError::Bom {
            message: format!("Failed to parse POM XML: {e}"),
        })?;
        match event {
            Event::Start(start) => {
                elements.push(String::from_utf8_lossy(start.local_name().as_ref()).into_owned());
                text.clear();
            }
            Event::Text(t) => {
                text = t.unescape().map(|s| s.into_owned()).unwrap_or_default();
            }
            Event::End(_) => {
                let Some(element) = elements.pop() else {
                    continue;
                };
                let value = std::mem::take(&mut text);
                match section(&elements) {
                    Section::Project => match element.as_str() {
                        "groupId" => pom.group_id = Some(value),
                        "artifactId" => pom.artifact_id = Some(value),
                        "version" => pom.version = Some(value),
                        "parent" => pom.parent = Some(std::mem::take(&mut parent)),
                        _ => {}
                    },
                    Section::Parent => match element.as_str() {
                        "groupId" => parent.group_id = value,
                        "artifactId" => parent.artifact_id = value,
                        "version" => parent.version = value,
                        _ => {}
                    },
                    Section::Properties => {
                        pom.properties.insert(element, value);
                    }
                    Section::ManagedDependency => entry.set(&element, value),
                    Section::Other => {
                        if element == "dependency" && in_dependency_management(&elements) {
                            pom.managed_entries.push(std::mem::take(&mut entry));
                        }
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(pom)
}

fn section(open: &[String]) -> Section {
    let open: Vec<&str> = open.iter().map(String::as_str).collect();
    match open.as_slice() {
        ["project"] => Section::Project,
        ["project", "parent"] => Section::Parent,
        ["project", "properties"] => Section::Properties,
        ["project", "dependencyManagement", "dependencies", "dependency"] => {
            Section::ManagedDependency
        }
        _ => Section::Other,
    }
}

fn in_dependency_management(open: &[String]) -> bool {
    open.len() == 3 && open[1] == "dependencyManagement" && open[2] == "dependencies"
}
