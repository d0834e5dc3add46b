use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use trellis_util::errors::TrellisError;

/// Global user configuration loaded from `~/.trellis/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub configure: ConfigureConfig,

    #[serde(default)]
    pub boms: BomConfig,
}

/// Settings for `trellis configure` from `[configure]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigureConfig {
    /// Maximum number of modules configured concurrently.
    #[serde(default = "default_jobs")]
    pub jobs: u32,
}

impl Default for ConfigureConfig {
    fn default() -> Self {
        Self {
            jobs: default_jobs(),
        }
    }
}

fn default_jobs() -> u32 {
    std::thread::available_parallelism()
        .map(|n| n.get() as u32)
        .unwrap_or(4)
}

/// Where BOM POMs are read from, `[boms]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BomConfig {
    #[serde(default = "default_local_repository", rename = "local-repository")]
    pub local_repository: String,
}

impl Default for BomConfig {
    fn default() -> Self {
        Self {
            local_repository: default_local_repository(),
        }
    }
}

fn default_local_repository() -> String {
    "~/.m2/repository".to_string()
}

impl BomConfig {
    /// The local repository path with `~` expanded.
    pub fn local_repository_path(&self) -> PathBuf {
        trellis_util::fs::expand_home(&self.local_repository)
    }
}

impl GlobalConfig {
    /// Load the global configuration from `~/.trellis/config.toml`, or return
    /// defaults if the file doesn't exist.
    pub fn load() -> Result<Self, TrellisError> {
        let path = Self::default_path();
        if !path.is_file() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path).map_err(|e| TrellisError::Generic {
            message: format!("Failed to read global config: {e}"),
        })?;
        Self::parse_toml(&content)
    }

    pub fn parse_toml(content: &str) -> Result<Self, TrellisError> {
        toml::from_str(content).map_err(|e| TrellisError::Generic {
            message: format!("Failed to parse global config: {e}"),
        })
    }

    /// Returns the default path to the global config file.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }
}

/// Returns the path to the Trellis data directory (`~/.trellis/`).
pub fn dirs_path() -> PathBuf {
    trellis_util::fs::home_dir().join(".trellis")
}
