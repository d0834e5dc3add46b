use serde::{Deserialize, Serialize};
use std::fmt;

/// A fully qualified Maven coordinate: `group:artifact:version`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub group: String,
    pub artifact: String,
    pub version: String,
}

impl Coordinate {
    pub fn new(
        group: impl Into<String>,
        artifact: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
            version: version.into(),
        }
    }

    /// Parse `"group:artifact:version"` into a coordinate.
    pub fn parse(s: &str) -> Option<Self> {
        match PartialCoordinate::parse(s)? {
            PartialCoordinate {
                group,
                artifact,
                version: Some(version),
            } => Some(Self {
                group,
                artifact,
                version,
            }),
            _ => None,
        }
    }

    /// `group:artifact` identifier (without version).
    pub fn key(&self) -> String {
        artifact_key(&self.group, &self.artifact)
    }

    /// Returns the coordinate as a `(group, artifact, version)` tuple of borrowed strings.
    pub fn as_tuple(&self) -> (&str, &str, &str) {
        (&self.group, &self.artifact, &self.version)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.artifact, self.version)
    }
}

/// A coordinate whose version may be left to dependency management.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PartialCoordinate {
    pub group: String,
    pub artifact: String,
    pub version: Option<String>,
}

impl PartialCoordinate {
    /// Parse `"group:artifact"` or `"group:artifact:version"`.
    ///
    /// Empty segments are rejected.
    pub fn parse(s: &str) -> Option<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.iter().any(|p| p.trim().is_empty()) {
            return None;
        }
        match parts.as_slice() {
            [group, artifact] => Some(Self {
                group: group.to_string(),
                artifact: artifact.to_string(),
                version: None,
            }),
            [group, artifact, version] => Some(Self {
                group: group.to_string(),
                artifact: artifact.to_string(),
                version: Some(version.to_string()),
            }),
            _ => None,
        }
    }

    /// `group:artifact` identifier (without version).
    pub fn key(&self) -> String {
        artifact_key(&self.group, &self.artifact)
    }
}

impl fmt::Display for PartialCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(v) => write!(f, "{}:{}:{v}", self.group, self.artifact),
            None => write!(f, "{}:{}", self.group, self.artifact),
        }
    }
}

impl From<Coordinate> for PartialCoordinate {
    fn from(c: Coordinate) -> Self {
        Self {
            group: c.group,
            artifact: c.artifact,
            version: Some(c.version),
        }
    }
}

/// Build the `group:artifact` key used by managed version tables.
pub fn artifact_key(group: &str, artifact: &str) -> String {
    format!("{group}:{artifact}")
}
