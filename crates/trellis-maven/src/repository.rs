//! Read-only access to a local Maven repository (`~/.m2/repository` layout).

use std::path::{Path, PathBuf};

use trellis_core::coordinate::Coordinate;
use trellis_util::errors::TrellisError;

use crate::pom::{self, Pom};

/// A Maven repository laid out on disk as
/// `<root>/<group path>/<artifact>/<version>/<artifact>-<version>.pom`.
#[derive(Debug, Clone)]
pub struct LocalRepository {
    root: PathBuf,
}

impl LocalRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of one artifact version.
    pub fn artifact_dir(&self, coord: &Coordinate) -> PathBuf {
        self.root
            .join(coord.group.replace('.', "/"))
            .join(&coord.artifact)
            .join(&coord.version)
    }

    /// Path of the POM for a coordinate.
    pub fn pom_path(&self, coord: &Coordinate) -> PathBuf {
        self.artifact_dir(coord)
            .join(format!("{}-{}.pom", coord.artifact, coord.version))
    }

    /// Read and parse the POM for a coordinate. `Ok(None)` when it is not present.
    pub fn read_pom(&self, coord: &Coordinate) -> Result<Option<Pom>, TrellisError> {
        let path = self.pom_path(coord);
        if !path.is_file() {
            return Ok(None);
        }
        tracing::debug!("Reading POM {}", path.display());
        let content = std::fs::read_to_string(&path)?;
        pom::parse_pom(&content)
            .map(Some)
            .map_err(|e| TrellisError::Bom {
                message: format!("{}: {e}", path.display()),
            })
    }
}
