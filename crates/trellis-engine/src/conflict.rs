//! Managed-version overrides recorded while a module is configured.
//!
//! Overrides are not errors: a later BOM may replace an earlier BOM's
//! version, and an explicit constraint replaces any BOM version. They are
//! reported so users can see why a version differs from the BOM they imported.

use std::fmt;

/// Every override recorded for one module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConflictReport {
    pub overrides: Vec<VersionOverride>,
}

/// A managed version that replaced an earlier one for the same artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionOverride {
    /// `group:artifact`.
    pub key: String,
    pub previous: String,
    pub replacement: String,
    pub reason: String,
}

impl ConflictReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entry: VersionOverride) {
        self.overrides.push(entry);
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }

    pub fn len(&self) -> usize {
        self.overrides.len()
    }
}

impl fmt::Display for ConflictReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.overrides.is_empty() {
            return write!(f, "No managed version overrides.");
        }
        writeln!(f, "Managed version overrides ({}):", self.overrides.len())?;
        for o in &self.overrides {
            writeln!(f, "  {o}")?;
        }
        Ok(())
    }
}

impl fmt::Display for VersionOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} -> {} ({})",
            self.key, self.previous, self.replacement, self.reason
        )
    }
}
