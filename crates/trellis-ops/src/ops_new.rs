//! Operation: add a member module to the workspace.

use std::path::{Component, Path};

use trellis_core::template::render_member;
use trellis_core::workspace::{default_module_name, Workspace};
use trellis_core::MANIFEST_FILE;
use trellis_util::errors::TrellisError;

use crate::{ensure_table, push_unique, read_document};

/// Result of `trellis new`.
#[derive(Debug)]
pub struct NewModule {
    pub name: String,
    pub dir: String,
    /// Files written under the module directory.
    pub written: Vec<String>,
}

/// Create the module directory `dir` (relative to the workspace root),
/// render its manifest and register it in `[workspace] members` with a
/// format-preserving edit of the root manifest.
pub fn new_module(ws_root: &Path, dir: &str) -> miette::Result<NewModule> {
    let dir = dir.trim_end_matches('/');
    let relative = Path::new(dir);
    if dir.is_empty()
        || !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
    {
        return Err(TrellisError::Generic {
            message: format!("Module directory '{dir}' must be a relative path inside the workspace"),
        }
        .into());
    }

    let ws = Workspace::load(ws_root)?;
    let name = default_module_name(dir);
    if ws.manifest.workspace.members.iter().any(|m| m.trim_end_matches('/') == dir) {
        return Err(TrellisError::Generic {
            message: format!("'{dir}' is already a workspace member"),
        }
        .into());
    }
    if ws.member(&name).is_some() {
        return Err(TrellisError::DuplicateKey {
            kind: "module".to_string(),
            key: name,
        }
        .into());
    }

    let manifest_path = ws_root.join(MANIFEST_FILE);
    let mut doc = read_document(&manifest_path)?;
    push_unique(ensure_table(&mut doc, &["workspace"])?, "members", dir)?;

    let written = render_member(&ws_root.join(relative), &name)?;
    std::fs::write(&manifest_path, doc.to_string()).map_err(TrellisError::Io)?;
    tracing::debug!("Registered module '{name}' at {dir}");

    Ok(NewModule {
        name,
        dir: dir.to_string(),
        written,
    })
}
