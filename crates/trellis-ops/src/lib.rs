pub mod ops_add;
pub mod ops_catalog;
pub mod ops_check;
pub mod ops_clean;
pub mod ops_configure;
pub mod ops_init;
pub mod ops_new;
pub mod ops_show;

use std::path::Path;

use toml_edit::{DocumentMut, Item, Table};
use trellis_core::config::GlobalConfig;
use trellis_core::workspace::Workspace;
use trellis_engine::pipeline::Propagation;
use trellis_util::errors::TrellisError;

/// Find the workspace containing `start` and build its catalog, defaults and
/// module graph, reading BOMs from the configured local repository.
pub fn load_workspace(
    start: &Path,
    config: &GlobalConfig,
) -> miette::Result<(Workspace, Propagation)> {
    let ws = Workspace::discover(start)?;
    let propagation = Propagation::for_workspace(&ws, &config.boms.local_repository_path())?;
    Ok((ws, propagation))
}

pub(crate) fn read_document(path: &Path) -> Result<DocumentMut, TrellisError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        TrellisError::manifest(format!("Failed to read {}: {e}", path.display()))
    })?;
    content
        .parse()
        .map_err(|e| TrellisError::manifest(format!("Failed to parse {}: {e}", path.display())))
}

/// Ensure a nested table path exists in the document and return it.
pub(crate) fn ensure_table<'a>(
    doc: &'a mut DocumentMut,
    keys: &[&str],
) -> Result<&'a mut Table, TrellisError> {
    let mut current = doc.as_table_mut();
    for &key in keys {
        if !current.contains_key(key) {
            current.insert(key, Item::Table(Table::new()));
        }
        current = match current.get_mut(key) {
            Some(Item::Table(t)) => t,
            _ => {
                return Err(TrellisError::manifest(format!(
                    "`{key}` must be a table to be edited"
                )))
            }
        };
    }
    Ok(current)
}

/// Append `value` to the string array `key` of `table`, creating it if
/// needed. Returns `false` when the value was already present.
pub(crate) fn push_unique(table: &mut Table, key: &str, value: &str) -> Result<bool, TrellisError> {
    let item = table
        .entry(key)
        .or_insert(Item::Value(toml_edit::Value::Array(toml_edit::Array::new())));
    let Some(array) = item.as_array_mut() else {
        return Err(TrellisError::manifest(format!("`{key}` must be an array")));
    };
    if array.iter().any(|v| v.as_str() == Some(value)) {
        return Ok(false);
    }
    array.push(value);
    Ok(true)
}
