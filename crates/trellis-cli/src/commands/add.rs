//! Handler for `trellis add`.

use miette::Result;

use trellis_core::dependency::DependencyScope;
use trellis_core::workspace::Workspace;
use trellis_ops::ops_add::{self, AddOptions};
use trellis_util::errors::TrellisError;

pub fn exec(module: &str, dep: &str, scope: &str, managed: bool) -> Result<()> {
    let scope: DependencyScope = scope
        .parse()
        .map_err(|message| TrellisError::Generic { message })?;
    let cwd = super::current_dir()?;
    let ws = Workspace::discover(&cwd)?;

    let added = ops_add::add_dependency(
        &ws.root_dir,
        &AddOptions {
            module: module.to_string(),
            reference: dep.to_string(),
            scope,
            managed,
        },
    )?;

    let section = if managed {
        "[managed] libraries".to_string()
    } else {
        format!("[dependencies] {scope}")
    };
    if added {
        eprintln!("Added {dep} to {section} of '{module}'");
    } else {
        eprintln!("{dep} is already listed in {section} of '{module}'");
    }
    Ok(())
}
