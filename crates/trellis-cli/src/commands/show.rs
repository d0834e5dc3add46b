use miette::Result;

use trellis_core::config::GlobalConfig;
use trellis_ops::ops_show::{self, ShowFormat};

use crate::cli::Format;

pub fn exec(module: &str, format: Format) -> Result<()> {
    let cwd = super::current_dir()?;
    let config = GlobalConfig::load()?;
    let format = match format {
        Format::Json => ShowFormat::Json,
        Format::Toml => ShowFormat::Toml,
    };
    println!("{}", ops_show::show(&cwd, &config, module, format)?);
    Ok(())
}
