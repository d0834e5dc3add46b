//! Operation: configure every module without writing anything.
//!
//! Builds the catalog, resolves the defaults and BOMs and runs each module
//! through the state machine, so manifest mistakes surface before
//! `trellis configure` touches the lockfile.

use std::path::Path;

use trellis_core::config::GlobalConfig;
use trellis_engine::pipeline::ConfiguredModule;
use trellis_util::progress;

use crate::load_workspace;

/// Check the workspace containing `start`. Returns the configured modules in
/// dependency order.
pub fn check(
    start: &Path,
    config: &GlobalConfig,
    verbose: bool,
) -> miette::Result<Vec<ConfiguredModule>> {
    let (ws, propagation) = load_workspace(start, config)?;
    progress::status(
        "Checking",
        &format!(
            "{} v{} ({} modules)",
            ws.manifest.project.group,
            ws.manifest.project.version,
            ws.members.len()
        ),
    );

    let modules = propagation.configure_all(&ws.members)?;
    if verbose {
        for module in &modules {
            progress::status_info(
                "Checked",
                &format!(
                    "{} ({} dependencies, {} managed)",
                    module.config.name,
                    module.config.dependencies.len(),
                    module.config.managed.len()
                ),
            );
            for entry in &module.report.overrides {
                progress::status_info("Override", &format!("{}: {entry}", module.config.name));
            }
        }
    }
    Ok(modules)
}
