//! The per-module configuration state machine.
//!
//! `Unconfigured → DefaultsApplied → VersionsImported → DependenciesDeclared → Finalized`
//!
//! Every mutator checks the current stage first and fails with
//! `OutOfOrderConfiguration` instead of silently reordering work.

use std::collections::BTreeSet;

use trellis_core::catalog::Catalog;
use trellis_core::coordinate::{Coordinate, PartialCoordinate};
use trellis_core::defaults::PlatformDefaults;
use trellis_core::dependency::DependencyScope;
use trellis_core::module::{ArtifactDescriptor, DeclaredDependency, ModuleConfig};
use trellis_core::plugin::AppliedPlugin;
use trellis_core::settings::ToolSettings;
use trellis_maven::bom::BomTable;
use trellis_util::errors::TrellisError;

use crate::conflict::ConflictReport;
use crate::managed::ManagedTable;
use crate::stage::ModuleStage;

/// A module being configured.
#[derive(Debug, Clone)]
pub struct ModuleState {
    name: String,
    path: String,
    description: Option<String>,
    coordinate: Coordinate,
    repositories: Vec<String>,
    stage: ModuleStage,
    plugins: BTreeSet<AppliedPlugin>,
    settings: ToolSettings,
    extra_compiler_args: Vec<String>,
    boms: Vec<Coordinate>,
    managed: ManagedTable,
    dependencies: BTreeSet<DeclaredDependency>,
    report: ConflictReport,
}

impl ModuleState {
    /// A fresh, unconfigured module published as `coordinate`.
    pub fn new(name: impl Into<String>, path: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            description: None,
            coordinate,
            repositories: Vec::new(),
            stage: ModuleStage::Unconfigured,
            plugins: BTreeSet::new(),
            settings: ToolSettings::default(),
            extra_compiler_args: Vec::new(),
            boms: Vec::new(),
            managed: ManagedTable::new(),
            dependencies: BTreeSet::new(),
            report: ConflictReport::new(),
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn with_repositories(mut self, repositories: Vec<String>) -> Self {
        self.repositories = repositories;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stage(&self) -> ModuleStage {
        self.stage
    }

    pub fn coordinate(&self) -> &Coordinate {
        &self.coordinate
    }

    pub fn managed(&self) -> &ManagedTable {
        &self.managed
    }

    /// Managed-version overrides recorded so far.
    pub fn report(&self) -> &ConflictReport {
        &self.report
    }

    /// Install the shared plugin set and tool blocks.
    ///
    /// Idempotent: plugins are a set and the tool blocks are replaced by the
    /// same values. Never moves the stage backwards.
    pub fn apply_defaults(&mut self, defaults: &PlatformDefaults) -> Result<(), TrellisError> {
        self.require(self.stage != ModuleStage::Finalized, "apply defaults")?;
        for plugin in &defaults.plugins {
            self.insert_plugin(plugin.clone())?;
        }
        self.settings = defaults.settings.clone();
        if self.stage == ModuleStage::Unconfigured {
            self.advance(ModuleStage::DefaultsApplied);
        }
        Ok(())
    }

    /// Add a module-specific plugin on top of the defaults.
    ///
    /// A plugin already applied at another version is rejected: modules add
    /// to the shared set, they never override it.
    pub fn add_plugin(&mut self, plugin: AppliedPlugin) -> Result<(), TrellisError> {
        self.require(self.stage.accepts_dependencies(), "add a plugin")?;
        self.insert_plugin(plugin)
    }

    /// Append module-specific compiler flags after the default flags.
    pub fn add_compiler_args(&mut self, args: &[String]) -> Result<(), TrellisError> {
        self.require(self.stage.accepts_dependencies(), "add compiler arguments")?;
        for arg in args {
            if !self.extra_compiler_args.contains(arg) {
                self.extra_compiler_args.push(arg.clone());
            }
        }
        Ok(())
    }

    /// Install BOM version tables. Only allowed before any dependency is declared.
    pub fn import_managed_versions(&mut self, boms: &[&BomTable]) -> Result<(), TrellisError> {
        self.require(
            self.stage.accepts_managed_versions(),
            "import managed versions",
        )?;
        for bom in boms {
            if self.boms.contains(&bom.coordinate) {
                continue;
            }
            tracing::debug!("{}: importing BOM {}", self.name, bom.coordinate);
            self.managed.import_bom(bom, &mut self.report);
            self.boms.push(bom.coordinate.clone());
        }
        self.advance(ModuleStage::VersionsImported);
        Ok(())
    }

    /// Look `library` up in the catalog and enforce its version.
    pub fn declare_managed_dependency(
        &mut self,
        catalog: &Catalog,
        library: &str,
    ) -> Result<(), TrellisError> {
        self.require(
            self.stage.accepts_managed_versions(),
            "declare a managed dependency",
        )?;
        let coord = catalog.resolve_coordinate(library)?;
        self.declare_managed_version(&coord, library)
    }

    /// Enforce an explicit coordinate's version.
    pub fn declare_managed_version(
        &mut self,
        coord: &Coordinate,
        reference: &str,
    ) -> Result<(), TrellisError> {
        self.require(
            self.stage.accepts_managed_versions(),
            "declare a managed dependency",
        )?;
        self.managed.constrain(coord, reference, &mut self.report)?;
        self.advance(ModuleStage::VersionsImported);
        Ok(())
    }

    /// Declare a catalog library under `scope`.
    pub fn declare_dependency(
        &mut self,
        catalog: &Catalog,
        library: &str,
        scope: DependencyScope,
    ) -> Result<(), TrellisError> {
        self.require(self.stage.accepts_dependencies(), "declare a dependency")?;
        let coord = catalog.resolve_coordinate(library)?;
        self.declare_coordinate(&coord.into(), scope, library)
    }

    /// Declare a coordinate under `scope`. A missing version is taken from
    /// the managed table.
    ///
    /// An explicit version must agree with the managed version, and one
    /// artifact may only appear at one version per module. Declaring the same
    /// coordinate in the same scope again is a no-op.
    pub fn declare_coordinate(
        &mut self,
        coord: &PartialCoordinate,
        scope: DependencyScope,
        reference: &str,
    ) -> Result<(), TrellisError> {
        self.require(self.stage.accepts_dependencies(), "declare a dependency")?;
        let managed = self.managed.version_of(&coord.group, &coord.artifact);
        let version = match (&coord.version, managed) {
            (Some(explicit), Some(managed)) if explicit != managed => {
                return Err(TrellisError::resolution(format!(
                    "{}: {reference} requests {}:{}:{explicit} but the managed version is {managed}",
                    self.name, coord.group, coord.artifact
                )));
            }
            (Some(explicit), _) => explicit.clone(),
            (None, Some(managed)) => managed.to_string(),
            (None, None) => {
                return Err(TrellisError::resolution(format!(
                    "{}: no version for {} and no managed version to supply one",
                    self.name,
                    coord.key()
                )));
            }
        };
        let resolved = Coordinate::new(&coord.group, &coord.artifact, version);

        if let Some(clash) = self
            .dependencies
            .iter()
            .find(|d| d.coordinate.key() == resolved.key() && d.coordinate.version != resolved.version)
        {
            return Err(TrellisError::resolution(format!(
                "{}: {} declared at {} (via {}) and {} (via {reference})",
                self.name,
                resolved.key(),
                clash.coordinate.version,
                clash.reference,
                resolved.version
            )));
        }
        let already = self
            .dependencies
            .iter()
            .any(|d| d.scope == scope && d.coordinate == resolved);
        if !already {
            self.dependencies.insert(DeclaredDependency {
                scope,
                coordinate: resolved,
                reference: reference.to_string(),
            });
        }
        self.advance(ModuleStage::DependenciesDeclared);
        Ok(())
    }

    /// Freeze the module into its final configuration.
    ///
    /// The state is marked finalized; every later call fails.
    pub fn finalize(&mut self) -> Result<ModuleConfig, TrellisError> {
        self.require(self.stage.accepts_dependencies(), "finalize")?;
        self.advance(ModuleStage::Finalized);
        if !self.report.is_empty() {
            tracing::debug!("{}: {}", self.name, self.report);
        }

        let mut settings = self.settings.clone();
        for arg in &self.extra_compiler_args {
            if !settings.compiler.args.contains(arg) {
                settings.compiler.args.push(arg.clone());
            }
        }
        let artifacts = ArtifactDescriptor::for_module(
            &self.name,
            &self.coordinate.version,
            &settings.artifacts,
        );
        Ok(ModuleConfig {
            name: self.name.clone(),
            path: self.path.clone(),
            description: self.description.clone(),
            coordinate: self.coordinate.clone(),
            repositories: self.repositories.clone(),
            plugins: self.plugins.clone(),
            settings,
            artifacts,
            boms: self.boms.clone(),
            managed: self.managed.entries().clone(),
            dependencies: self.dependencies.iter().cloned().collect(),
        })
    }

    fn insert_plugin(&mut self, plugin: AppliedPlugin) -> Result<(), TrellisError> {
        if let Some(existing) = self.plugins.iter().find(|p| p.id == plugin.id) {
            if existing.version != plugin.version {
                return Err(TrellisError::resolution(format!(
                    "{}: plugin {} is already applied as '{existing}', cannot apply '{plugin}'",
                    self.name, plugin.id
                )));
            }
            return Ok(());
        }
        self.plugins.insert(plugin);
        Ok(())
    }

    fn require(&self, allowed: bool, operation: &str) -> Result<(), TrellisError> {
        if allowed {
            return Ok(());
        }
        Err(TrellisError::OutOfOrderConfiguration {
            module: self.name.clone(),
            operation: operation.to_string(),
            stage: self.stage.to_string(),
        })
    }

    fn advance(&mut self, to: ModuleStage) {
        if to > self.stage {
            tracing::debug!("{}: {} -> {}", self.name, self.stage, to);
            self.stage = to;
        }
    }
}
