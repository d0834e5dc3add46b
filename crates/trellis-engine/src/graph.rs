//! The graph of workspace modules and their `:module` dependencies.

use std::collections::HashMap;

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use trellis_core::dependency::{DependencyRef, DependencyScope};
use trellis_util::errors::TrellisError;

/// Module dependency graph backed by petgraph. Edges point from a module to
/// the modules it depends on.
#[derive(Debug, Default)]
pub struct ModuleGraph {
    graph: DiGraph<String, DependencyScope>,
    index: HashMap<String, NodeIndex>,
}

impl ModuleGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph from each module's `(scope, reference)` declarations.
    ///
    /// References to unknown modules are rejected.
    pub fn build<'a, I, D>(modules: I) -> Result<Self, TrellisError>
    where
        I: IntoIterator<Item = (&'a str, D)>,
        D: IntoIterator<Item = (DependencyScope, &'a str)>,
    {
        let modules: Vec<(&str, Vec<(DependencyScope, &str)>)> = modules
            .into_iter()
            .map(|(name, deps)| (name, deps.into_iter().collect()))
            .collect();
        let mut graph = Self::new();
        for (name, _) in &modules {
            graph.add_module(name);
        }
        for (name, deps) in &modules {
            for (scope, reference) in deps {
                if let Some(DependencyRef::Module(target)) = DependencyRef::parse(reference) {
                    graph.add_dependency(name, &target, *scope)?;
                }
            }
        }
        Ok(graph)
    }

    /// Add a module node. Adding the same name twice returns the existing node.
    pub fn add_module(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(name.to_string());
        self.index.insert(name.to_string(), idx);
        idx
    }

    /// Record that `from` depends on `to`.
    pub fn add_dependency(
        &mut self,
        from: &str,
        to: &str,
        scope: DependencyScope,
    ) -> Result<(), TrellisError> {
        let Some(&from_idx) = self.index.get(from) else {
            return Err(unknown_module(from, from));
        };
        let Some(&to_idx) = self.index.get(to) else {
            return Err(unknown_module(from, to));
        };
        if !self.graph.edges(from_idx).any(|e| e.target() == to_idx) {
            self.graph.add_edge(from_idx, to_idx, scope);
        }
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Names of the modules `name` depends on directly.
    pub fn dependencies_of(&self, name: &str) -> Vec<&str> {
        self.neighbors(name, Direction::Outgoing)
    }

    /// Names of the modules that depend on `name` directly.
    pub fn dependents_of(&self, name: &str) -> Vec<&str> {
        self.neighbors(name, Direction::Incoming)
    }

    fn neighbors(&self, name: &str, dir: Direction) -> Vec<&str> {
        let Some(&idx) = self.index.get(name) else {
            return Vec::new();
        };
        let mut names: Vec<&str> = self
            .graph
            .neighbors_directed(idx, dir)
            .map(|n| self.graph[n].as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// Module names with every dependency before its dependents.
    ///
    /// Fails on a dependency cycle, naming a module on it.
    pub fn topological_order(&self) -> Result<Vec<String>, TrellisError> {
        let sorted = toposort(&self.graph, None).map_err(|cycle| {
            TrellisError::resolution(format!(
                "module dependency cycle involving '{}'",
                self.graph[cycle.node_id()]
            ))
        })?;
        // toposort yields dependents first since edges point at dependencies.
        Ok(sorted
            .into_iter()
            .rev()
            .map(|idx| self.graph[idx].clone())
            .collect())
    }
}

fn unknown_module(from: &str, name: &str) -> TrellisError {
    TrellisError::resolution(format!(
        "module '{from}' depends on unknown module '{name}'"
    ))
}
