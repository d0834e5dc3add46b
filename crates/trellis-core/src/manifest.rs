use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use trellis_util::errors::TrellisError;

use crate::dependency::DependencyScope;
use crate::settings::{
    ArtifactSettings, CleanRule, CompilerSettings, CoverageSettings, DocsSettings, LintSettings,
    TestSettings, ToolSettings,
};

/// The parsed root `Trellis.toml` of a workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootManifest {
    pub project: ProjectMetadata,

    #[serde(default)]
    pub workspace: WorkspaceConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Inline bills of materials: coordinate → (`group:artifact` → version).
    #[serde(default)]
    pub boms: BTreeMap<String, BTreeMap<String, String>>,
}

/// Project identity shared by every module, from `[project]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    pub group: String,
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub repositories: Vec<String>,
}

/// Workspace members from `[workspace]`, as directories relative to the root.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    #[serde(default)]
    pub members: Vec<String>,
}

/// Version catalog tables from `[catalog]`, or from an included catalog file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub versions: BTreeMap<String, String>,
    #[serde(default)]
    pub libraries: BTreeMap<String, LibrarySpec>,
    #[serde(default)]
    pub bundles: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub plugins: BTreeMap<String, PluginSpec>,
}

/// A library entry: `"group:artifact:version"` or a detailed table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LibrarySpec {
    Short(String),
    Detailed {
        group: String,
        artifact: String,
        #[serde(default)]
        version: Option<VersionSpec>,
    },
}

/// A version: a literal string or `version.ref = "key"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VersionSpec {
    Literal(String),
    Ref {
        #[serde(rename = "ref")]
        reference: String,
    },
}

/// A plugin entry: a bare id or `{ id, version | version.ref }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PluginSpec {
    Short(String),
    Detailed {
        id: String,
        #[serde(default)]
        version: Option<VersionSpec>,
    },
}

/// The fragment applied to every module, from `[defaults]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Catalog plugin names applied to every module.
    #[serde(default)]
    pub plugins: Vec<String>,
    #[serde(default)]
    pub compiler: CompilerSettings,
    #[serde(default)]
    pub test: TestSettings,
    #[serde(default)]
    pub docs: DocsSettings,
    #[serde(default)]
    pub artifacts: ArtifactSettings,
    #[serde(default)]
    pub lint: LintSettings,
    #[serde(default)]
    pub coverage: CoverageSettings,
    #[serde(default)]
    pub clean: CleanRule,
    #[serde(default)]
    pub managed: ManagedConfig,
    #[serde(default)]
    pub dependencies: DependenciesConfig,
}

impl DefaultsConfig {
    /// The tool blocks of this fragment.
    pub fn settings(&self) -> ToolSettings {
        ToolSettings {
            compiler: self.compiler.clone(),
            test: self.test.clone(),
            docs: self.docs.clone(),
            artifacts: self.artifacts.clone(),
            lint: self.lint.clone(),
            coverage: self.coverage.clone(),
            clean: self.clean.clone(),
        }
    }
}

/// Dependency management: imported BOMs and enforced library versions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManagedConfig {
    /// Catalog library names or `group:artifact:version` coordinates of BOMs.
    #[serde(default)]
    pub boms: Vec<String>,
    /// Catalog library names (or bundles) whose versions are enforced.
    #[serde(default)]
    pub libraries: Vec<String>,
}

/// Dependency references grouped by scope, from `[dependencies]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct DependenciesConfig {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub api: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub implementation: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub compile_only: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub runtime_only: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub test_implementation: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub test_runtime_only: Vec<String>,
}

impl DependenciesConfig {
    /// The references declared under one scope.
    pub fn scope(&self, scope: DependencyScope) -> &[String] {
        match scope {
            DependencyScope::Api => &self.api,
            DependencyScope::Implementation => &self.implementation,
            DependencyScope::CompileOnly => &self.compile_only,
            DependencyScope::RuntimeOnly => &self.runtime_only,
            DependencyScope::TestImplementation => &self.test_implementation,
            DependencyScope::TestRuntimeOnly => &self.test_runtime_only,
        }
    }

    /// Every `(scope, reference)` pair, scopes in declaration order.
    pub fn entries(&self) -> Vec<(DependencyScope, &str)> {
        DependencyScope::ALL
            .into_iter()
            .flat_map(|scope| {
                self.scope(scope)
                    .iter()
                    .map(move |reference| (scope, reference.as_str()))
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        DependencyScope::ALL
            .into_iter()
            .all(|scope| self.scope(scope).is_empty())
    }
}

/// The parsed `Trellis.toml` of a workspace member.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemberManifest {
    #[serde(default)]
    pub module: ModuleSection,
    #[serde(default)]
    pub managed: ManagedConfig,
    #[serde(default)]
    pub dependencies: DependenciesConfig,
}

/// Module identity and additions to the defaults, from `[module]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ModuleSection {
    /// Defaults to the member directory name.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Catalog plugin names applied on top of the default set.
    #[serde(default)]
    pub plugins: Vec<String>,
    /// Compiler flags appended to the default flags.
    #[serde(default)]
    pub compiler_args: Vec<String>,
}

impl RootManifest {
    /// Load and parse a root `Trellis.toml`.
    ///
    /// `${prop:NAME}` and `${env:NAME}` references are resolved first, using
    /// `trellis.properties` next to the manifest and the process environment.
    pub fn from_path(path: &Path) -> Result<Self, TrellisError> {
        let content = read_interpolated(path)?;
        Self::parse_toml(&content)
    }

    /// Parse a root manifest from a string (no interpolation).
    pub fn parse_toml(content: &str) -> Result<Self, TrellisError> {
        toml::from_str(content)
            .map_err(|e| TrellisError::manifest(format!("Failed to parse Trellis.toml: {e}")))
    }
}

impl MemberManifest {
    /// Load and parse a member `Trellis.toml`, interpolating with the
    /// workspace root's properties.
    pub fn from_path(path: &Path, root_dir: &Path) -> Result<Self, TrellisError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            TrellisError::manifest(format!("Failed to read {}: {e}", path.display()))
        })?;
        let props =
            crate::properties::load_properties(&root_dir.join(crate::PROPERTIES_FILE))?;
        let content = crate::properties::interpolate(&raw, &props)?;
        Self::parse_toml(&content).map_err(|e| match e {
            TrellisError::Manifest { message } => {
                TrellisError::manifest(format!("{}: {message}", path.display()))
            }
            other => other,
        })
    }

    /// Parse a member manifest from a string (no interpolation).
    pub fn parse_toml(content: &str) -> Result<Self, TrellisError> {
        toml::from_str(content)
            .map_err(|e| TrellisError::manifest(format!("Failed to parse Trellis.toml: {e}")))
    }
}

fn read_interpolated(path: &Path) -> Result<String, TrellisError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| TrellisError::manifest(format!("Failed to read {}: {e}", path.display())))?;
    let dir = path.parent().unwrap_or(Path::new("."));
    let props = crate::properties::load_properties(&dir.join(crate::PROPERTIES_FILE))?;
    crate::properties::interpolate(&content, &props)
}
