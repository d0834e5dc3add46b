use std::collections::BTreeSet;

use trellis_util::errors::TrellisError;

use crate::catalog::Catalog;
use crate::manifest::{DefaultsConfig, DependenciesConfig};
use crate::plugin::AppliedPlugin;
use crate::settings::ToolSettings;

/// The fragment applied identically to every module before its own additions.
///
/// Plugin names are resolved against the catalog up front, so an unknown
/// plugin fails the build before any module is touched. Managed and
/// dependency references stay symbolic; they are resolved per module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformDefaults {
    pub plugins: BTreeSet<AppliedPlugin>,
    pub settings: ToolSettings,
    pub boms: Vec<String>,
    pub managed: Vec<String>,
    pub dependencies: DependenciesConfig,
}

impl PlatformDefaults {
    /// Resolve a `[defaults]` section against the catalog.
    pub fn resolve(config: &DefaultsConfig, catalog: &Catalog) -> Result<Self, TrellisError> {
        let plugins = config
            .plugins
            .iter()
            .map(|name| catalog.resolve_plugin(name))
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(Self {
            plugins,
            settings: config.settings(),
            boms: config.managed.boms.clone(),
            managed: config.managed.libraries.clone(),
            dependencies: config.dependencies.clone(),
        })
    }
}
