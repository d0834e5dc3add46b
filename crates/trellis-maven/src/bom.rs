//! Bill-of-materials version tables and the sources they come from.
//!
//! A [`BomResolver`] asks each registered [`BomSource`] in turn and caches
//! the first table found. A BOM that no source knows is a resolution error.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use trellis_core::coordinate::{Coordinate, PartialCoordinate};
use trellis_util::errors::TrellisError;

use crate::pom::Pom;
use crate::repository::LocalRepository;

/// The managed versions published by one BOM: `group:artifact` → version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BomTable {
    pub coordinate: Coordinate,
    pub versions: BTreeMap<String, String>,
}

impl BomTable {
    pub fn version_of(&self, group: &str, artifact: &str) -> Option<&str> {
        self.versions
            .get(&trellis_core::coordinate::artifact_key(group, artifact))
            .map(String::as_str)
    }
}

/// Somewhere BOM tables can be loaded from.
pub trait BomSource: Send + Sync {
    /// Load the table for `bom`, or `Ok(None)` if this source does not have it.
    fn load(&self, bom: &Coordinate) -> Result<Option<BomTable>, TrellisError>;

    /// Short human-readable description used in error messages.
    fn describe(&self) -> String;
}

/// BOM tables written inline in the root manifest under `[boms."g:a:v"]`.
#[derive(Debug, Clone, Default)]
pub struct InlineBoms {
    tables: BTreeMap<Coordinate, BomTable>,
}

impl InlineBoms {
    /// Validate and index the `[boms]` tables of a root manifest.
    pub fn new(raw: &BTreeMap<String, BTreeMap<String, String>>) -> Result<Self, TrellisError> {
        let mut tables = BTreeMap::new();
        for (coord, entries) in raw {
            let coordinate = Coordinate::parse(coord).ok_or_else(|| {
                TrellisError::manifest(format!(
                    "Inline BOM '{coord}' is not a group:artifact:version coordinate"
                ))
            })?;
            let mut versions = BTreeMap::new();
            for (key, version) in entries {
                let managed = PartialCoordinate::parse(key)
                    .filter(|p| p.version.is_none())
                    .ok_or_else(|| {
                        TrellisError::manifest(format!(
                            "Inline BOM '{coord}' entry '{key}' must be group:artifact"
                        ))
                    })?;
                versions.insert(managed.key(), version.clone());
            }
            tables.insert(
                coordinate.clone(),
                BomTable {
                    coordinate,
                    versions,
                },
            );
        }
        Ok(Self { tables })
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl BomSource for InlineBoms {
    fn load(&self, bom: &Coordinate) -> Result<Option<BomTable>, TrellisError> {
        Ok(self.tables.get(bom).cloned())
    }

    fn describe(&self) -> String {
        "inline [boms] tables".to_string()
    }
}

impl BomSource for LocalRepository {
    fn load(&self, bom: &Coordinate) -> Result<Option<BomTable>, TrellisError> {
        if !self.pom_path(bom).is_file() {
            return Ok(None);
        }
        let mut visiting = Vec::new();
        let versions = self.effective_versions(bom, &mut visiting)?;
        Ok(Some(BomTable {
            coordinate: bom.clone(),
            versions,
        }))
    }

    fn describe(&self) -> String {
        format!("local repository {}", self.root().display())
    }
}

impl LocalRepository {
    /// Parent chain merged into one POM, not yet interpolated.
    fn merged_pom(&self, coord: &Coordinate, visiting: &mut Vec<Coordinate>) -> Result<Pom, TrellisError> {
        enter(coord, visiting)?;
        let mut pom = self.read_pom(coord)?.ok_or_else(|| TrellisError::Bom {
            message: format!("POM {coord} not found in {}", self.root().display()),
        })?;
        if let Some(parent) = pom.parent.clone() {
            let parent_pom = self.merged_pom(&parent.coordinate(), visiting)?;
            pom.apply_parent(&parent_pom);
        }
        visiting.pop();
        Ok(pom)
    }

    /// The managed versions of a BOM with parents merged and imports followed.
    ///
    /// Entries declared in the POM (or inherited from its parents) win over
    /// imported ones; among imports the first declaration wins.
    fn effective_versions(
        &self,
        coord: &Coordinate,
        visiting: &mut Vec<Coordinate>,
    ) -> Result<BTreeMap<String, String>, TrellisError> {
        let mut pom = self.merged_pom(coord, visiting)?;
        pom.resolve_properties();

        let mut versions = BTreeMap::new();
        for dep in pom.managed_entries.iter().filter(|d| !d.is_import()) {
            let Some(version) = &dep.version else {
                tracing::debug!("{coord}: managed entry {} has no version", dep.key());
                continue;
            };
            check_resolved(coord, &dep.key(), version)?;
            versions.entry(dep.key()).or_insert_with(|| version.clone());
        }

        enter(coord, visiting)?;
        for import in pom.bom_imports() {
            let version = import.version.as_deref().ok_or_else(|| TrellisError::Bom {
                message: format!("{coord}: imported BOM {} has no version", import.key()),
            })?;
            check_resolved(coord, &import.key(), version)?;
            let nested = Coordinate::new(&import.group_id, &import.artifact_id, version);
            tracing::debug!("{coord}: importing {nested}");
            for (key, v) in self.effective_versions(&nested, visiting)? {
                versions.entry(key).or_insert(v);
            }
        }
        visiting.pop();
        Ok(versions)
    }
}

fn enter(coord: &Coordinate, visiting: &mut Vec<Coordinate>) -> Result<(), TrellisError> {
    if visiting.contains(coord) {
        let chain: Vec<String> = visiting
            .iter()
            .chain(std::iter::once(coord))
            .map(ToString::to_string)
            .collect();
        return Err(TrellisError::Bom {
            message: format!("cycle between POMs: {}", chain.join(" -> ")),
        });
    }
    visiting.push(coord.clone());
    Ok(())
}

fn check_resolved(bom: &Coordinate, key: &str, version: &str) -> Result<(), TrellisError> {
    if version.contains("${") {
        return Err(TrellisError::Bom {
            message: format!("{bom}: unresolved property in version of {key}: {version}"),
        });
    }
    Ok(())
}

/// Looks BOMs up across sources, caching every table it loads.
#[derive(Default)]
pub struct BomResolver {
    sources: Vec<Box<dyn BomSource>>,
    cache: Mutex<BTreeMap<Coordinate, Arc<BomTable>>>,
}

impl std::fmt::Debug for BomResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BomResolver")
            .field("sources", &self.sources.iter().map(|s| s.describe()).collect::<Vec<_>>())
            .finish()
    }
}

impl BomResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a source. Sources are consulted in the order they were added.
    pub fn with_source(mut self, source: impl BomSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// The version table of `bom`.
    pub fn resolve(&self, bom: &Coordinate) -> Result<Arc<BomTable>, TrellisError> {
        if let Some(table) = self.lock_cache().get(bom) {
            return Ok(Arc::clone(table));
        }
        for source in &self.sources {
            if let Some(table) = source.load(bom)? {
                tracing::debug!(
                    "Loaded BOM {bom} from {} ({} entries)",
                    source.describe(),
                    table.versions.len()
                );
                let table = Arc::new(table);
                self.lock_cache().insert(bom.clone(), Arc::clone(&table));
                return Ok(table);
            }
        }
        let searched: Vec<String> = self.sources.iter().map(|s| s.describe()).collect();
        Err(TrellisError::resolution(format!(
            "BOM {bom} not found (searched: {})",
            if searched.is_empty() {
                "no sources".to_string()
            } else {
                searched.join(", ")
            }
        )))
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, BTreeMap<Coordinate, Arc<BomTable>>> {
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
