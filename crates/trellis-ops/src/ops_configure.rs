//! Operation: configure every module and write the outputs.
//!
//! Writes `Trellis.lock` at the workspace root and one
//! `build/trellis/<module>.json` per module, then reports the aggregate list
//! of archives the workspace publishes.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use trellis_core::config::GlobalConfig;
use trellis_core::lockfile::Lockfile;
use trellis_core::module::ModuleConfig;
use trellis_core::LOCKFILE;
use trellis_engine::pipeline::{configure_parallel, ConfiguredModule};
use trellis_util::errors::TrellisError;
use trellis_util::hash::short;
use trellis_util::progress;

use crate::load_workspace;

/// Options for `trellis configure`.
#[derive(Debug, Default)]
pub struct ConfigureOptions {
    /// Concurrent modules; falls back to `[configure] jobs` in the global config.
    pub jobs: Option<usize>,
    pub verbose: bool,
}

/// What `trellis configure` produced.
#[derive(Debug)]
pub struct ConfigureOutcome {
    pub modules: Vec<ConfiguredModule>,
    pub lockfile: PathBuf,
    /// Whether `Trellis.lock` changed.
    pub lockfile_updated: bool,
    /// Every module's archive file names, in dependency order.
    pub archives: Vec<String>,
}

/// Configure the workspace containing `start`.
pub async fn configure(
    start: &Path,
    config: &GlobalConfig,
    opts: &ConfigureOptions,
) -> miette::Result<ConfigureOutcome> {
    let (ws, propagation) = load_workspace(start, config)?;
    let jobs = opts.jobs.unwrap_or(config.configure.jobs as usize).max(1);
    progress::status(
        "Configuring",
        &format!(
            "{} v{} ({} modules, {} jobs)",
            ws.manifest.project.group,
            ws.manifest.project.version,
            ws.members.len(),
            jobs
        ),
    );

    let modules = if jobs == 1 {
        propagation.configure_all(&ws.members)?
    } else {
        configure_parallel(Arc::new(propagation), ws.members.clone(), jobs).await?
    };

    let configs: Vec<ModuleConfig> = modules.iter().map(|m| m.config.clone()).collect();
    let export_dir = ws.root_dir.join("build").join("trellis");
    trellis_util::fs::ensure_dir(&export_dir).map_err(TrellisError::Io)?;
    for module in &configs {
        let path = export_dir.join(format!("{}.json", module.name));
        std::fs::write(&path, module.to_json_pretty()?).map_err(TrellisError::Io)?;
        if opts.verbose {
            let fingerprint = module.fingerprint()?;
            progress::status_info(
                "Exported",
                &format!("{} ({})", path.display(), short(&fingerprint)),
            );
        }
    }

    let lockfile = ws.root_dir.join(LOCKFILE);
    let lockfile_updated = write_lockfile(&lockfile, &configs)?;
    if lockfile_updated {
        progress::status("Locking", &format!("{} modules into {LOCKFILE}", configs.len()));
    }

    let archives: Vec<String> = configs
        .iter()
        .flat_map(|m| m.archive_names())
        .map(str::to_string)
        .collect();
    progress::status(
        "Finished",
        &format!("{} modules, {} archives", configs.len(), archives.len()),
    );

    Ok(ConfigureOutcome {
        modules,
        lockfile,
        lockfile_updated,
        archives,
    })
}

/// Write `Trellis.lock` unless it already holds exactly these modules.
fn write_lockfile(path: &Path, modules: &[ModuleConfig]) -> miette::Result<bool> {
    let lockfile = Lockfile::from_modules(modules)?;
    if path.is_file() {
        match Lockfile::from_path(path) {
            Ok(existing) if existing == lockfile => return Ok(false),
            Ok(_) => {}
            Err(e) => tracing::debug!("Replacing unreadable {}: {e}", path.display()),
        }
    }
    let content = lockfile.to_string_pretty().map_err(|e| TrellisError::Generic {
        message: format!("Failed to serialize lockfile: {e}"),
    })?;
    std::fs::write(path, content).map_err(TrellisError::Io)?;
    Ok(true)
}
