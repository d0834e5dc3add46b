use miette::Result;

use trellis_core::config::GlobalConfig;
use trellis_ops::ops_configure::{self, ConfigureOptions};

pub async fn exec(jobs: Option<usize>, verbose: bool) -> Result<()> {
    let cwd = super::current_dir()?;
    let config = GlobalConfig::load()?;
    let outcome = ops_configure::configure(&cwd, &config, &ConfigureOptions { jobs, verbose }).await?;

    if verbose {
        for module in &outcome.modules {
            if !module.report.is_empty() {
                eprintln!("{}: {}", module.config.name, module.report);
            }
        }
    }
    for archive in &outcome.archives {
        println!("{archive}");
    }
    Ok(())
}
