//! Operation: add a dependency reference to a member manifest.

use std::path::Path;

use trellis_core::catalog::Catalog;
use trellis_core::dependency::{DependencyRef, DependencyScope};
use trellis_core::workspace::Workspace;
use trellis_core::MANIFEST_FILE;
use trellis_util::errors::TrellisError;

use crate::{ensure_table, push_unique, read_document};

/// Options for `trellis add`.
pub struct AddOptions {
    /// The member module to edit.
    pub module: String,
    /// The reference: a catalog key, `bundle:name`, `:module` or a coordinate.
    pub reference: String,
    /// Scope for a declared dependency. Ignored with `managed`.
    pub scope: DependencyScope,
    /// Add to `[managed] libraries` instead of `[dependencies]`.
    pub managed: bool,
}

/// Add a dependency reference to a member's `Trellis.toml` using
/// format-preserving edits.
///
/// The reference is checked against the catalog and the workspace before the
/// manifest is touched. Returns `false` if it was already listed.
pub fn add_dependency(ws_root: &Path, opts: &AddOptions) -> miette::Result<bool> {
    let ws = Workspace::load(ws_root)?;
    let member = ws.member(&opts.module).ok_or_else(|| TrellisError::Generic {
        message: format!("No module named '{}' in this workspace", opts.module),
    })?;
    let catalog = Catalog::from_config(&ws.manifest.catalog, &ws.root_dir)?;

    let reference = DependencyRef::parse(&opts.reference).ok_or_else(|| {
        TrellisError::manifest(format!(
            "'{}' is not a valid dependency reference",
            opts.reference
        ))
    })?;
    match &reference {
        DependencyRef::Library(name) => {
            catalog.resolve_coordinate(name)?;
        }
        DependencyRef::Bundle(name) => {
            catalog.bundle(name)?;
        }
        DependencyRef::Module(name) if opts.managed => {
            return Err(TrellisError::manifest(format!(
                "workspace module ':{name}' cannot be a managed dependency"
            ))
            .into());
        }
        DependencyRef::Module(name) => {
            if name == &member.name {
                return Err(
                    TrellisError::resolution(format!("module '{name}' depends on itself")).into(),
                );
            }
            if ws.member(name).is_none() {
                return Err(TrellisError::resolution(format!(
                    "module '{}' depends on unknown module '{name}'",
                    member.name
                ))
                .into());
            }
        }
        DependencyRef::Coordinate(c) if opts.managed && c.version.is_none() => {
            return Err(TrellisError::manifest(format!(
                "managed dependency '{}' needs a version",
                opts.reference
            ))
            .into());
        }
        DependencyRef::Coordinate(_) => {}
    }

    let manifest_path = ws.member_dir(member).join(MANIFEST_FILE);
    let mut doc = read_document(&manifest_path)?;
    let reference = opts.reference.trim();
    let added = if opts.managed {
        push_unique(ensure_table(&mut doc, &["managed"])?, "libraries", reference)?
    } else {
        push_unique(
            ensure_table(&mut doc, &["dependencies"])?,
            opts.scope.as_str(),
            reference,
        )?
    };
    if added {
        std::fs::write(&manifest_path, doc.to_string()).map_err(TrellisError::Io)?;
    }
    Ok(added)
}
