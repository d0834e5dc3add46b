use serde::{Deserialize, Serialize};
use std::fmt;

/// A build plugin applied to a module: an id plus the version it was pinned at.
///
/// Core plugins such as `java-library` or `jacoco` carry no version.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AppliedPlugin {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl AppliedPlugin {
    pub fn new(id: impl Into<String>, version: Option<String>) -> Self {
        Self {
            id: id.into(),
            version,
        }
    }
}

impl fmt::Display for AppliedPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(v) => write!(f, "{} {v}", self.id),
            None => f.write_str(&self.id),
        }
    }
}
