//! Check command implementation.

use miette::Result;

use trellis_core::config::GlobalConfig;

pub fn exec(verbose: bool) -> Result<()> {
    let cwd = super::current_dir()?;
    let config = GlobalConfig::load()?;
    let modules = trellis_ops::ops_check::check(&cwd, &config, verbose)?;
    println!("{} modules configured successfully", modules.len());
    Ok(())
}
