use serde::{Deserialize, Serialize};
use std::path::Path;

use trellis_util::errors::TrellisError;

use crate::module::{ModuleConfig, ResolutionTuple};

/// Deterministic record of every module's resolver hand-off.
///
/// Written by `trellis configure`. A module whose fingerprint is unchanged
/// has the same configuration as when the lockfile was written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lockfile {
    #[serde(default)]
    pub module: Vec<LockedModule>,
}

/// A single module with its fingerprint and resolution tuples.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockedModule {
    pub name: String,
    pub group: String,
    pub version: String,
    pub fingerprint: String,
    #[serde(default)]
    pub dependency: Vec<ResolutionTuple>,
}

impl Lockfile {
    /// Build a lockfile from finalized modules, in the order given.
    pub fn from_modules(modules: &[ModuleConfig]) -> Result<Self, TrellisError> {
        let module = modules
            .iter()
            .map(|m| {
                Ok(LockedModule {
                    name: m.name.clone(),
                    group: m.coordinate.group.clone(),
                    version: m.coordinate.version.clone(),
                    fingerprint: m.fingerprint()?,
                    dependency: m.resolution_tuples(),
                })
            })
            .collect::<Result<Vec<_>, TrellisError>>()?;
        Ok(Self { module })
    }

    /// Load and parse a `Trellis.lock` file from the given path.
    pub fn from_path(path: &Path) -> Result<Self, TrellisError> {
        let content = std::fs::read_to_string(path).map_err(|e| TrellisError::Generic {
            message: format!("Failed to read lockfile: {e}"),
        })?;
        toml::from_str(&content).map_err(|e| TrellisError::Generic {
            message: format!("Failed to parse lockfile: {e}"),
        })
    }

    /// Serialize the lockfile to a pretty-printed TOML string.
    pub fn to_string_pretty(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn find(&self, name: &str) -> Option<&LockedModule> {
        self.module.iter().find(|m| m.name == name)
    }
}
