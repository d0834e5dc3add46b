//! Operation: catalog lookups.

use std::path::Path;

use trellis_core::catalog::{Catalog, VersionRef};
use trellis_core::coordinate::Coordinate;
use trellis_core::workspace::Workspace;

/// Which catalog to query.
#[derive(Debug, Clone, Copy)]
pub enum CatalogSource<'a> {
    /// The catalog of the workspace containing this directory.
    Workspace(&'a Path),
    /// The catalog shipped with Trellis.
    Builtin,
}

pub fn load(source: CatalogSource<'_>) -> miette::Result<Catalog> {
    let catalog = match source {
        CatalogSource::Workspace(start) => {
            let ws = Workspace::discover(start)?;
            Catalog::from_config(&ws.manifest.catalog, &ws.root_dir)?
        }
        CatalogSource::Builtin => Catalog::builtin()?,
    };
    Ok(catalog)
}

/// The version string behind a symbolic version name.
pub fn version(source: CatalogSource<'_>, name: &str) -> miette::Result<String> {
    Ok(load(source)?.resolve_version(name)?.to_string())
}

/// The resolved coordinate of a library.
pub fn library(source: CatalogSource<'_>, name: &str) -> miette::Result<Coordinate> {
    Ok(load(source)?.resolve_coordinate(name)?)
}

/// One line per catalog entry, grouped by table.
pub fn list(source: CatalogSource<'_>) -> miette::Result<Vec<String>> {
    let catalog = load(source)?;
    let mut lines = Vec::with_capacity(catalog.len());
    for v in catalog.versions() {
        lines.push(format!("version  {} = {}", v.name, v.version));
    }
    for lib in catalog.libraries() {
        let version = match &lib.version {
            VersionRef::Literal(v) => v.clone(),
            VersionRef::Key(key) => format!("{} (ref {key})", catalog.resolve_version(key)?),
        };
        lines.push(format!(
            "library  {} = {}:{}:{version}",
            lib.name, lib.group, lib.artifact
        ));
    }
    for bundle in catalog.bundles() {
        lines.push(format!(
            "bundle   {} = [{}]",
            bundle.name,
            bundle.libraries.join(", ")
        ));
    }
    for plugin in catalog.plugins() {
        let applied = catalog.resolve_plugin(&plugin.name)?;
        lines.push(format!("plugin   {} = {applied}", plugin.name));
    }
    Ok(lines)
}
