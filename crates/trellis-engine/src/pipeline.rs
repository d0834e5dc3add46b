//! Configures workspace modules: defaults, BOMs, managed versions, then
//! dependencies, each module through its own [`ModuleState`].
//!
//! The catalog and defaults are built once and shared read-only, so modules
//! can be configured on parallel tasks.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use trellis_core::catalog::Catalog;
use trellis_core::coordinate::Coordinate;
use trellis_core::defaults::PlatformDefaults;
use trellis_core::dependency::{DependencyRef, DependencyScope};
use trellis_core::manifest::{DependenciesConfig, ProjectMetadata};
use trellis_core::module::ModuleConfig;
use trellis_core::workspace::{Member, Workspace};
use trellis_maven::bom::{BomResolver, BomTable, InlineBoms};
use trellis_maven::repository::LocalRepository;
use trellis_util::errors::TrellisError;

use crate::conflict::ConflictReport;
use crate::graph::ModuleGraph;
use crate::state::ModuleState;

/// A finalized module and the managed-version overrides seen while building it.
#[derive(Debug, Clone)]
pub struct ConfiguredModule {
    pub config: ModuleConfig,
    pub report: ConflictReport,
}

/// Everything shared by the configuration of every module in a workspace.
#[derive(Debug)]
pub struct Propagation {
    catalog: Arc<Catalog>,
    defaults: PlatformDefaults,
    boms: BomResolver,
    project: ProjectMetadata,
    graph: ModuleGraph,
}

impl Propagation {
    pub fn new(
        catalog: Arc<Catalog>,
        defaults: PlatformDefaults,
        boms: BomResolver,
        project: ProjectMetadata,
        graph: ModuleGraph,
    ) -> Self {
        Self {
            catalog,
            defaults,
            boms,
            project,
            graph,
        }
    }

    /// Build the catalog, defaults and module graph of a loaded workspace.
    ///
    /// BOMs are looked up in the manifest's inline tables first, then in the
    /// local Maven repository at `local_repository`.
    pub fn for_workspace(ws: &Workspace, local_repository: &Path) -> Result<Self, TrellisError> {
        let catalog = Arc::new(Catalog::from_config(&ws.manifest.catalog, &ws.root_dir)?);
        let defaults = PlatformDefaults::resolve(&ws.manifest.defaults, &catalog)?;
        let boms = BomResolver::new()
            .with_source(InlineBoms::new(&ws.manifest.boms)?)
            .with_source(LocalRepository::new(local_repository));
        let graph = ModuleGraph::build(ws.members.iter().map(|m| {
            let entries: Vec<(DependencyScope, &str)> = defaults
                .dependencies
                .entries()
                .into_iter()
                .chain(m.manifest.dependencies.entries())
                .collect();
            (m.name.as_str(), entries)
        }))?;
        Ok(Self::new(
            catalog,
            defaults,
            boms,
            ws.manifest.project.clone(),
            graph,
        ))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn defaults(&self) -> &PlatformDefaults {
        &self.defaults
    }

    pub fn graph(&self) -> &ModuleGraph {
        &self.graph
    }

    /// The coordinate a workspace module is published under.
    pub fn module_coordinate(&self, name: &str) -> Coordinate {
        Coordinate::new(&self.project.group, name, &self.project.version)
    }

    /// Run one module through every stage and finalize it.
    pub fn configure(&self, member: &Member) -> Result<ConfiguredModule, TrellisError> {
        let manifest = &member.manifest;
        let mut state = ModuleState::new(
            &member.name,
            &member.dir,
            self.module_coordinate(&member.name),
        )
        .with_description(manifest.module.description.clone())
        .with_repositories(self.project.repositories.clone());

        state.apply_defaults(&self.defaults)?;
        for name in &manifest.module.plugins {
            state.add_plugin(self.catalog.resolve_plugin(name)?)?;
        }
        state.add_compiler_args(&manifest.module.compiler_args)?;

        let tables = self
            .defaults
            .boms
            .iter()
            .chain(&manifest.managed.boms)
            .map(|reference| self.bom_table(reference))
            .collect::<Result<Vec<_>, _>>()?;
        let tables: Vec<&BomTable> = tables.iter().map(Arc::as_ref).collect();
        state.import_managed_versions(&tables)?;

        for reference in self.defaults.managed.iter().chain(&manifest.managed.libraries) {
            self.declare_managed(&mut state, reference)?;
        }

        for deps in [&self.defaults.dependencies, &manifest.dependencies] {
            self.declare_all(&mut state, deps)?;
        }

        let report = state.report().clone();
        let config = state.finalize()?;
        Ok(ConfiguredModule { config, report })
    }

    /// Configure `members` in dependency order on the current thread.
    pub fn configure_all(&self, members: &[Member]) -> Result<Vec<ConfiguredModule>, TrellisError> {
        let order = self.graph.topological_order()?;
        let mut out = Vec::with_capacity(members.len());
        for name in &order {
            if let Some(member) = members.iter().find(|m| &m.name == name) {
                out.push(self.configure(member)?);
            }
        }
        Ok(out)
    }

    fn bom_table(&self, reference: &str) -> Result<Arc<BomTable>, TrellisError> {
        let coord = match DependencyRef::parse(reference) {
            Some(DependencyRef::Library(name)) => self.catalog.resolve_coordinate(&name)?,
            Some(DependencyRef::Coordinate(c)) => match c.version {
                Some(version) => Coordinate::new(c.group, c.artifact, version),
                None => {
                    return Err(TrellisError::manifest(format!(
                        "BOM '{reference}' needs a version"
                    )))
                }
            },
            _ => {
                return Err(TrellisError::manifest(format!(
                    "'{reference}' is not a BOM reference (expected a catalog library or group:artifact:version)"
                )))
            }
        };
        self.boms.resolve(&coord)
    }

    fn declare_managed(&self, state: &mut ModuleState, reference: &str) -> Result<(), TrellisError> {
        match parse_ref(reference)? {
            DependencyRef::Library(name) => state.declare_managed_dependency(&self.catalog, &name),
            DependencyRef::Bundle(bundle) => {
                for name in self.catalog.bundle(&bundle)? {
                    state.declare_managed_dependency(&self.catalog, name)?;
                }
                Ok(())
            }
            DependencyRef::Coordinate(c) => match c.version {
                Some(version) => state.declare_managed_version(
                    &Coordinate::new(c.group, c.artifact, version),
                    reference,
                ),
                None => Err(TrellisError::manifest(format!(
                    "managed dependency '{reference}' needs a version"
                ))),
            },
            DependencyRef::Module(_) => Err(TrellisError::manifest(format!(
                "workspace module '{reference}' cannot be a managed dependency"
            ))),
        }
    }

    fn declare_all(
        &self,
        state: &mut ModuleState,
        deps: &DependenciesConfig,
    ) -> Result<(), TrellisError> {
        for (scope, reference) in deps.entries() {
            match parse_ref(reference)? {
                DependencyRef::Library(name) => {
                    state.declare_dependency(&self.catalog, &name, scope)?
                }
                DependencyRef::Bundle(bundle) => {
                    for name in self.catalog.bundle(&bundle)? {
                        state.declare_dependency(&self.catalog, name, scope)?;
                    }
                }
                DependencyRef::Module(name) => {
                    if name == state.name() {
                        return Err(TrellisError::resolution(format!(
                            "module '{name}' depends on itself"
                        )));
                    }
                    if !self.graph.contains(&name) {
                        return Err(TrellisError::resolution(format!(
                            "module '{}' depends on unknown module '{name}'",
                            state.name()
                        )));
                    }
                    let coord = self.module_coordinate(&name);
                    state.declare_coordinate(&coord.into(), scope, reference)?;
                }
                DependencyRef::Coordinate(c) => state.declare_coordinate(&c, scope, reference)?,
            }
        }
        Ok(())
    }
}

fn parse_ref(reference: &str) -> Result<DependencyRef, TrellisError> {
    DependencyRef::parse(reference).ok_or_else(|| {
        TrellisError::manifest(format!("'{reference}' is not a valid dependency reference"))
    })
}

/// Configure `members` on up to `jobs` concurrent tasks.
///
/// Each module is configured by exactly one task. Results come back in
/// dependency order regardless of completion order, and the first error
/// aborts the whole run.
pub async fn configure_parallel(
    propagation: Arc<Propagation>,
    members: Vec<Member>,
    jobs: usize,
) -> Result<Vec<ConfiguredModule>, TrellisError> {
    let order = propagation.graph.topological_order()?;
    let semaphore = Arc::new(Semaphore::new(jobs.max(1)));
    let mut join_set = JoinSet::new();

    for member in members {
        let propagation = Arc::clone(&propagation);
        let sem = Arc::clone(&semaphore);
        join_set.spawn(async move {
            let _permit = sem.acquire().await;
            let name = member.name.clone();
            let result = tokio::task::spawn_blocking(move || propagation.configure(&member))
                .await
                .map_err(|e| TrellisError::Generic {
                    message: format!("Configuration task for '{name}' failed: {e}"),
                })
                .and_then(|r| r);
            (name, result)
        });
    }

    let mut done = Vec::new();
    while let Some(joined) = join_set.join_next().await {
        let (name, result) = joined.map_err(|e| TrellisError::Generic {
            message: format!("Configuration task failed: {e}"),
        })?;
        match result {
            Ok(module) => done.push(module),
            Err(e) => {
                join_set.abort_all();
                tracing::debug!("Configuration of '{name}' failed; aborting remaining modules");
                return Err(e);
            }
        }
    }

    done.sort_by_key(|m| {
        order
            .iter()
            .position(|n| *n == m.config.name)
            .unwrap_or(usize::MAX)
    });
    Ok(done)
}
