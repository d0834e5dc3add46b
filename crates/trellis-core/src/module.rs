//! The finalized, immutable configuration of one module.
//!
//! A [`ModuleConfig`] is what downstream tools consume: the plugin set, the
//! tool blocks, the managed version table and the scoped dependency list.
//! It is produced once per module by the propagation engine and never
//! mutated afterwards.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use trellis_util::errors::TrellisError;

use crate::coordinate::Coordinate;
use crate::dependency::DependencyScope;
use crate::plugin::AppliedPlugin;
use crate::settings::{ArtifactSettings, ToolSettings};

/// Where a managed version came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ManagedSource {
    /// Imported from a bill of materials (its coordinate).
    Bom(String),
    /// Declared as an explicit constraint (the catalog key or coordinate).
    Constraint(String),
}

/// The effective version of one `group:artifact` under dependency management.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagedVersion {
    pub version: String,
    pub source: ManagedSource,
}

/// A dependency declared on a module.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeclaredDependency {
    pub scope: DependencyScope,
    pub coordinate: Coordinate,
    /// The manifest reference it was declared through (`guava`, `:core`, ...).
    pub reference: String,
}

/// An archive produced for a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,
    pub file_name: String,
}

impl ArtifactDescriptor {
    /// The main, sources and docs archives of a module.
    pub fn for_module(name: &str, version: &str, settings: &ArtifactSettings) -> Vec<Self> {
        let archive = |classifier: Option<&str>| Self {
            classifier: classifier.map(str::to_string),
            file_name: match classifier {
                Some(c) => format!("{name}-{version}-{c}.jar"),
                None => format!("{name}-{version}.jar"),
            },
        };
        vec![
            archive(None),
            archive(Some(&settings.sources_classifier)),
            archive(Some(&settings.docs_classifier)),
        ]
    }
}

/// One `(group, artifact, version, scope)` row handed to a dependency resolver.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResolutionTuple {
    pub group: String,
    pub artifact: String,
    pub version: String,
    pub scope: DependencyScope,
}

/// The finalized configuration of a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleConfig {
    pub name: String,
    /// Member directory relative to the workspace root.
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub coordinate: Coordinate,
    #[serde(default)]
    pub repositories: Vec<String>,
    pub plugins: BTreeSet<AppliedPlugin>,
    pub settings: ToolSettings,
    pub artifacts: Vec<ArtifactDescriptor>,
    /// Imported BOMs, in import order.
    #[serde(default)]
    pub boms: Vec<Coordinate>,
    /// `group:artifact` → effective managed version.
    #[serde(default)]
    pub managed: BTreeMap<String, ManagedVersion>,
    /// Declared dependencies, ordered by scope then coordinate.
    #[serde(default)]
    pub dependencies: Vec<DeclaredDependency>,
}

impl ModuleConfig {
    /// The rows handed to the dependency resolver.
    pub fn resolution_tuples(&self) -> Vec<ResolutionTuple> {
        self.dependencies
            .iter()
            .map(|d| ResolutionTuple {
                group: d.coordinate.group.clone(),
                artifact: d.coordinate.artifact.clone(),
                version: d.coordinate.version.clone(),
                scope: d.scope,
            })
            .collect()
    }

    /// Dependencies declared under one scope.
    pub fn dependencies_in(&self, scope: DependencyScope) -> impl Iterator<Item = &DeclaredDependency> {
        self.dependencies.iter().filter(move |d| d.scope == scope)
    }

    /// File names of every archive this module produces.
    pub fn archive_names(&self) -> Vec<&str> {
        self.artifacts.iter().map(|a| a.file_name.as_str()).collect()
    }

    /// SHA-256 of the canonical JSON form. Equal configs have equal fingerprints.
    pub fn fingerprint(&self) -> Result<String, TrellisError> {
        let bytes = serde_json::to_vec(self).map_err(|e| TrellisError::Generic {
            message: format!("Failed to serialize module '{}': {e}", self.name),
        })?;
        Ok(trellis_util::hash::sha256_hex(&bytes))
    }

    pub fn to_json_pretty(&self) -> Result<String, TrellisError> {
        serde_json::to_string_pretty(self).map_err(|e| TrellisError::Generic {
            message: format!("Failed to serialize module '{}': {e}", self.name),
        })
    }

    pub fn to_toml_pretty(&self) -> Result<String, TrellisError> {
        toml::to_string_pretty(self).map_err(|e| TrellisError::Generic {
            message: format!("Failed to serialize module '{}': {e}", self.name),
        })
    }
}
