//! The managed-version table of one module.
//!
//! Precedence, lowest to highest: earlier BOM, later BOM, explicit
//! constraint. Two explicit constraints for one artifact must agree.

use std::collections::BTreeMap;

use trellis_core::coordinate::Coordinate;
use trellis_core::module::{ManagedSource, ManagedVersion};
use trellis_maven::bom::BomTable;
use trellis_util::errors::TrellisError;

use crate::conflict::{ConflictReport, VersionOverride};

#[derive(Debug, Clone, Default)]
pub struct ManagedTable {
    entries: BTreeMap<String, ManagedVersion>,
}

impl ManagedTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install every entry of a BOM. BOM entries replace earlier BOM entries
    /// but never an explicit constraint.
    pub fn import_bom(&mut self, bom: &BomTable, report: &mut ConflictReport) {
        let source = ManagedSource::Bom(bom.coordinate.to_string());
        for (key, version) in &bom.versions {
            match self.entries.get(key) {
                Some(ManagedVersion {
                    source: ManagedSource::Constraint(_),
                    ..
                }) => continue,
                Some(existing) if existing.version != *version => {
                    report.add(VersionOverride {
                        key: key.clone(),
                        previous: existing.version.clone(),
                        replacement: version.clone(),
                        reason: format!("later BOM {}", bom.coordinate),
                    });
                }
                _ => {}
            }
            self.entries.insert(
                key.clone(),
                ManagedVersion {
                    version: version.clone(),
                    source: source.clone(),
                },
            );
        }
    }

    /// Enforce `coord.version` for `coord.group:coord.artifact`.
    pub fn constrain(
        &mut self,
        coord: &Coordinate,
        reference: &str,
        report: &mut ConflictReport,
    ) -> Result<(), TrellisError> {
        let key = coord.key();
        if let Some(existing) = self.entries.get(&key) {
            match &existing.source {
                ManagedSource::Constraint(other) if existing.version != coord.version => {
                    return Err(TrellisError::resolution(format!(
                        "conflicting constraints for {key}: {} (from {other}) and {} (from {reference})",
                        existing.version, coord.version
                    )));
                }
                ManagedSource::Constraint(_) => return Ok(()),
                ManagedSource::Bom(bom) if existing.version != coord.version => {
                    report.add(VersionOverride {
                        key: key.clone(),
                        previous: existing.version.clone(),
                        replacement: coord.version.clone(),
                        reason: format!("constraint {reference} over BOM {bom}"),
                    });
                }
                ManagedSource::Bom(_) => {}
            }
        }
        self.entries.insert(
            key,
            ManagedVersion {
                version: coord.version.clone(),
                source: ManagedSource::Constraint(reference.to_string()),
            },
        );
        Ok(())
    }

    /// The effective managed version of `group:artifact`.
    pub fn version_of(&self, group: &str, artifact: &str) -> Option<&str> {
        self.entries
            .get(&trellis_core::coordinate::artifact_key(group, artifact))
            .map(|m| m.version.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> BTreeMap<String, ManagedVersion> {
        self.entries
    }

    pub fn entries(&self) -> &BTreeMap<String, ManagedVersion> {
        &self.entries
    }
}
