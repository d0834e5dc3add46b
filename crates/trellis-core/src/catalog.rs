//! The version catalog: symbolic names for versions, libraries, bundles and plugins.
//!
//! A [`Catalog`] is assembled once through a [`CatalogBuilder`], validated, and
//! then only read. Registering the same name twice fails instead of
//! shadowing the earlier entry. Names are compared with `-`, `_` and `.`
//! treated as the same separator, so `slf4j-api` and `slf4j_api` are one key.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use trellis_util::errors::TrellisError;

use crate::coordinate::Coordinate;
use crate::manifest::{CatalogConfig, LibrarySpec, PluginSpec, VersionSpec};
use crate::plugin::AppliedPlugin;

const BUILTIN_CATALOG: &str = include_str!("../templates/catalog.toml");

/// How a library or plugin names its version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionRef {
    /// A version string written inline.
    Literal(String),
    /// A key into the catalog's version table.
    Key(String),
}

impl From<&VersionSpec> for VersionRef {
    fn from(spec: &VersionSpec) -> Self {
        match spec {
            VersionSpec::Literal(v) => Self::Literal(v.clone()),
            VersionSpec::Ref { reference } => Self::Key(reference.clone()),
        }
    }
}

impl fmt::Display for VersionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(v) => f.write_str(v),
            Self::Key(k) => write!(f, "ref:{k}"),
        }
    }
}

/// A named version string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionEntry {
    pub name: String,
    pub version: String,
}

/// A named library coordinate whose version may be symbolic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryEntry {
    pub name: String,
    pub group: String,
    pub artifact: String,
    pub version: VersionRef,
}

/// A named build plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginEntry {
    pub name: String,
    pub id: String,
    pub version: Option<VersionRef>,
}

/// A named group of libraries declared together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleEntry {
    pub name: String,
    pub libraries: Vec<String>,
}

/// Normalize a catalog key so that `-`, `_` and `.` compare equal.
pub fn normalize_key(name: &str) -> String {
    name.chars()
        .map(|c| if c == '-' || c == '.' { '_' } else { c })
        .collect()
}

/// A validated, read-only version catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    versions: BTreeMap<String, VersionEntry>,
    libraries: BTreeMap<String, LibraryEntry>,
    bundles: BTreeMap<String, BundleEntry>,
    plugins: BTreeMap<String, PluginEntry>,
}

impl Catalog {
    /// Start building a catalog.
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// The catalog shipped with Trellis and written by `trellis init`.
    pub fn builtin() -> Result<Self, TrellisError> {
        let config: CatalogConfig = toml::from_str(BUILTIN_CATALOG).map_err(|e| {
            TrellisError::manifest(format!("Failed to parse built-in catalog: {e}"))
        })?;
        let mut builder = Self::builder();
        builder.add_config(&config)?;
        builder.build()
    }

    /// Raw TOML of the built-in catalog.
    pub fn builtin_source() -> &'static str {
        BUILTIN_CATALOG
    }

    /// Build a catalog from a `[catalog]` manifest section.
    ///
    /// Files listed in `include` are resolved relative to `base_dir` and merged
    /// with the inline tables. Included files may not include further files.
    pub fn from_config(config: &CatalogConfig, base_dir: &Path) -> Result<Self, TrellisError> {
        let mut builder = Self::builder();
        builder.add_config(config)?;
        for include in &config.include {
            let path = base_dir.join(include);
            let content = std::fs::read_to_string(&path).map_err(|e| {
                TrellisError::manifest(format!(
                    "Failed to read catalog file {}: {e}",
                    path.display()
                ))
            })?;
            let included: CatalogConfig = toml::from_str(&content).map_err(|e| {
                TrellisError::manifest(format!(
                    "Failed to parse catalog file {}: {e}",
                    path.display()
                ))
            })?;
            if !included.include.is_empty() {
                return Err(TrellisError::manifest(format!(
                    "Catalog file {} may not include other catalog files",
                    path.display()
                )));
            }
            tracing::debug!("Merging catalog file {}", path.display());
            builder.add_config(&included)?;
        }
        builder.build()
    }

    /// Look up a symbolic version name.
    pub fn resolve_version(&self, name: &str) -> Result<&str, TrellisError> {
        self.versions
            .get(&normalize_key(name))
            .map(|entry| entry.version.as_str())
            .ok_or_else(|| TrellisError::UnknownVersionKey {
                key: name.to_string(),
            })
    }

    /// Look up a library and return its fully resolved coordinate.
    pub fn resolve_coordinate(&self, name: &str) -> Result<Coordinate, TrellisError> {
        let entry = self.library(name).ok_or_else(|| TrellisError::UnknownLibraryKey {
            key: name.to_string(),
        })?;
        let version = match &entry.version {
            VersionRef::Literal(v) => v.clone(),
            VersionRef::Key(key) => self.resolve_version(key)?.to_string(),
        };
        Ok(Coordinate::new(&entry.group, &entry.artifact, version))
    }

    /// Look up a plugin and resolve its version.
    pub fn resolve_plugin(&self, name: &str) -> Result<AppliedPlugin, TrellisError> {
        let entry = self
            .plugins
            .get(&normalize_key(name))
            .ok_or_else(|| TrellisError::UnknownPluginKey {
                key: name.to_string(),
            })?;
        let version = match &entry.version {
            None => None,
            Some(VersionRef::Literal(v)) => Some(v.clone()),
            Some(VersionRef::Key(key)) => Some(self.resolve_version(key)?.to_string()),
        };
        Ok(AppliedPlugin::new(&entry.id, version))
    }

    /// The library names of a bundle, as written in the catalog.
    pub fn bundle(&self, name: &str) -> Result<&[String], TrellisError> {
        self.bundles
            .get(&normalize_key(name))
            .map(|b| b.libraries.as_slice())
            .ok_or_else(|| TrellisError::UnknownBundleKey {
                key: name.to_string(),
            })
    }

    /// Raw library entry, with its version reference unresolved.
    pub fn library(&self, name: &str) -> Option<&LibraryEntry> {
        self.libraries.get(&normalize_key(name))
    }

    pub fn versions(&self) -> impl Iterator<Item = &VersionEntry> {
        self.versions.values()
    }

    pub fn libraries(&self) -> impl Iterator<Item = &LibraryEntry> {
        self.libraries.values()
    }

    pub fn bundles(&self) -> impl Iterator<Item = &BundleEntry> {
        self.bundles.values()
    }

    pub fn plugins(&self) -> impl Iterator<Item = &PluginEntry> {
        self.plugins.values()
    }

    /// Total number of registered entries across all tables.
    pub fn len(&self) -> usize {
        self.versions.len() + self.libraries.len() + self.bundles.len() + self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Accumulates catalog entries and validates them into a [`Catalog`].
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    catalog: Catalog,
}

impl CatalogBuilder {
    /// Register a symbolic version.
    pub fn version(
        &mut self,
        name: &str,
        version: impl Into<String>,
    ) -> Result<&mut Self, TrellisError> {
        insert_unique(
            &mut self.catalog.versions,
            "version",
            name,
            VersionEntry {
                name: name.to_string(),
                version: version.into(),
            },
        )?;
        Ok(self)
    }

    /// Register a library coordinate.
    pub fn library(
        &mut self,
        name: &str,
        group: impl Into<String>,
        artifact: impl Into<String>,
        version: VersionRef,
    ) -> Result<&mut Self, TrellisError> {
        insert_unique(
            &mut self.catalog.libraries,
            "library",
            name,
            LibraryEntry {
                name: name.to_string(),
                group: group.into(),
                artifact: artifact.into(),
                version,
            },
        )?;
        Ok(self)
    }

    /// Register a bundle of library names.
    pub fn bundle(&mut self, name: &str, libraries: Vec<String>) -> Result<&mut Self, TrellisError> {
        insert_unique(
            &mut self.catalog.bundles,
            "bundle",
            name,
            BundleEntry {
                name: name.to_string(),
                libraries,
            },
        )?;
        Ok(self)
    }

    /// Register a plugin.
    pub fn plugin(
        &mut self,
        name: &str,
        id: impl Into<String>,
        version: Option<VersionRef>,
    ) -> Result<&mut Self, TrellisError> {
        insert_unique(
            &mut self.catalog.plugins,
            "plugin",
            name,
            PluginEntry {
                name: name.to_string(),
                id: id.into(),
                version,
            },
        )?;
        Ok(self)
    }

    /// Register every table of a `[catalog]` section or catalog file.
    pub fn add_config(&mut self, config: &CatalogConfig) -> Result<&mut Self, TrellisError> {
        for (name, version) in &config.versions {
            self.version(name, version.clone())?;
        }
        for (name, spec) in &config.libraries {
            match spec {
                LibrarySpec::Short(s) => {
                    let coord = Coordinate::parse(s).ok_or_else(|| {
                        TrellisError::manifest(format!(
                            "Library '{name}' has invalid coordinate '{s}'. Expected group:artifact:version"
                        ))
                    })?;
                    self.library(
                        name,
                        coord.group,
                        coord.artifact,
                        VersionRef::Literal(coord.version),
                    )?;
                }
                LibrarySpec::Detailed {
                    group,
                    artifact,
                    version,
                } => {
                    let version = version.as_ref().ok_or_else(|| {
                        TrellisError::manifest(format!("Library '{name}' must declare a version"))
                    })?;
                    self.library(name, group, artifact, VersionRef::from(version))?;
                }
            }
        }
        for (name, libraries) in &config.bundles {
            self.bundle(name, libraries.clone())?;
        }
        for (name, spec) in &config.plugins {
            match spec {
                PluginSpec::Short(id) => {
                    self.plugin(name, id.clone(), None)?;
                }
                PluginSpec::Detailed { id, version } => {
                    self.plugin(name, id.clone(), version.as_ref().map(VersionRef::from))?;
                }
            }
        }
        Ok(self)
    }

    /// Check every reference and freeze the catalog.
    pub fn build(self) -> Result<Catalog, TrellisError> {
        let catalog = self.catalog;

        for lib in catalog.libraries.values() {
            if let VersionRef::Key(key) = &lib.version {
                catalog.resolve_version(key)?;
            }
        }
        for plugin in catalog.plugins.values() {
            if let Some(VersionRef::Key(key)) = &plugin.version {
                catalog.resolve_version(key)?;
            }
        }
        for bundle in catalog.bundles.values() {
            for lib in &bundle.libraries {
                if catalog.library(lib).is_none() {
                    return Err(TrellisError::UnknownLibraryKey { key: lib.clone() });
                }
            }
        }

        tracing::debug!(
            "Catalog built: {} versions, {} libraries, {} bundles, {} plugins",
            catalog.versions.len(),
            catalog.libraries.len(),
            catalog.bundles.len(),
            catalog.plugins.len()
        );
        Ok(catalog)
    }
}

fn insert_unique<T>(
    table: &mut BTreeMap<String, T>,
    kind: &str,
    name: &str,
    value: T,
) -> Result<(), TrellisError> {
    if name.trim().is_empty() {
        return Err(TrellisError::manifest(format!("Empty {kind} name in catalog")));
    }
    let key = normalize_key(name);
    if table.contains_key(&key) {
        return Err(TrellisError::DuplicateKey {
            kind: kind.to_string(),
            key: name.to_string(),
        });
    }
    table.insert(key, value);
    Ok(())
}
