//! Operation: remove generated files from every module.

use std::path::{Path, PathBuf};

use trellis_core::workspace::Workspace;
use trellis_util::errors::TrellisError;
use trellis_util::progress;

/// Result of a clean operation.
#[derive(Debug, Default)]
pub struct CleanResult {
    pub removed: Vec<PathBuf>,
    /// Paths that existed but could not be removed.
    pub failed: Vec<PathBuf>,
}

impl CleanResult {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.failed.is_empty()
    }
}

/// Delete each module's clean paths plus its `build/` directory, and the
/// workspace `build/` directory. A path that cannot be removed is reported
/// and skipped.
pub fn clean(start: &Path) -> miette::Result<CleanResult> {
    let ws = Workspace::discover(start)?;
    let mut entries = ws.manifest.defaults.clean.paths.clone();
    if !entries.iter().any(|e| e == "build") {
        entries.push("build".to_string());
    }

    let mut result = CleanResult::default();
    for member in &ws.members {
        let dir = ws.member_dir(member);
        let paths = trellis_util::fs::expand_entries(&dir, &entries).map_err(|e| {
            TrellisError::manifest(format!("Invalid clean path for '{}': {e}", member.name))
        })?;
        remove_all(paths, &mut result);
    }
    remove_all(vec![ws.root_dir.join("build")], &mut result);
    Ok(result)
}

fn remove_all(paths: Vec<PathBuf>, result: &mut CleanResult) {
    for path in paths {
        match trellis_util::fs::remove_path(&path) {
            Ok(true) => result.removed.push(path),
            Ok(false) => {}
            Err(e) => {
                tracing::warn!("Failed to remove {}: {e}", path.display());
                progress::status_warn("Skipped", &format!("{}: {e}", path.display()));
                result.failed.push(path);
            }
        }
    }
}
