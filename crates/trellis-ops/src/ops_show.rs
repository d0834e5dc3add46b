//! Operation: print one module's finalized configuration.

use std::path::Path;
use std::str::FromStr;

use trellis_core::config::GlobalConfig;
use trellis_util::errors::TrellisError;

use crate::load_workspace;

/// Output format of `trellis show`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShowFormat {
    #[default]
    Json,
    Toml,
}

impl FromStr for ShowFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(Self::Json),
            "toml" => Ok(Self::Toml),
            other => Err(format!("unknown format '{other}' (expected json or toml)")),
        }
    }
}

/// Configure `module` and render its ModuleConfig.
pub fn show(
    start: &Path,
    config: &GlobalConfig,
    module: &str,
    format: ShowFormat,
) -> miette::Result<String> {
    let (ws, propagation) = load_workspace(start, config)?;
    let member = ws.member(module).ok_or_else(|| TrellisError::Generic {
        message: format!(
            "No module named '{module}'. Modules: {}",
            ws.members
                .iter()
                .map(|m| m.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ),
    })?;
    let configured = propagation.configure(member)?;
    let rendered = match format {
        ShowFormat::Json => configured.config.to_json_pretty()?,
        ShowFormat::Toml => configured.config.to_toml_pretty()?,
    };
    Ok(rendered)
}
