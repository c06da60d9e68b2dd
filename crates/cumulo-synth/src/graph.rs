//! Dependency graph management using `petgraph`.
//!
//! Builds a directed acyclic graph from resource references and resolves
//! the order in which resources must be provisioned.

use std::collections::BTreeMap;

use cumulo_common::error::{CumuloError, Result};
use cumulo_common::types::LogicalId;

use crate::stack::Stack;

/// A dependency graph of stack resources.
#[derive(Debug)]
pub struct DependencyGraph {
    /// Internal petgraph representation.
    graph: petgraph::Graph<LogicalId, ()>,
}

impl DependencyGraph {
    /// Creates an empty dependency graph.
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph: petgraph::Graph::new(),
        }
    }

    /// Builds the graph for a stack: one node per resource, one edge per
    /// reference between registered resources.
    #[must_use]
    pub fn from_stack(stack: &Stack) -> Self {
        let mut graph = Self::new();
        let mut nodes: BTreeMap<&LogicalId, petgraph::graph::NodeIndex> = BTreeMap::new();
        for resource in stack.resources() {
            let index = graph.add_resource(resource.logical_id().clone());
            let _ = nodes.insert(resource.logical_id(), index);
        }
        for resource in stack.resources() {
            let dependent = nodes[resource.logical_id()];
            for id in resource.referenced_ids() {
                if let Some(&dependency) = nodes.get(id) {
                    graph.add_dependency(dependent, dependency);
                }
            }
        }
        graph
    }

    /// Adds a resource node to the graph.
    pub fn add_resource(&mut self, id: LogicalId) -> petgraph::graph::NodeIndex {
        self.graph.add_node(id)
    }

    /// Adds a dependency edge: `dependent` depends on `dependency`.
    ///
    /// The graph edge points from `dependency` to `dependent`
    /// so that topological sort yields dependencies first.
    pub fn add_dependency(
        &mut self,
        dependent: petgraph::graph::NodeIndex,
        dependency: petgraph::graph::NodeIndex,
    ) {
        let _ = self.graph.add_edge(dependency, dependent, ());
    }

    /// Returns a topological ordering of resources for provisioning.
    ///
    /// Dependencies appear before the resources that depend on them.
    ///
    /// # Errors
    ///
    /// Returns an error if the graph contains cycles.
    pub fn resolve_order(&self) -> Result<Vec<LogicalId>> {
        match petgraph::algo::toposort(&self.graph, None) {
            Ok(indices) => {
                let ids: Vec<LogicalId> = indices
                    .iter()
                    .filter_map(|&idx| self.graph.node_weight(idx).cloned())
                    .collect();
                Ok(ids)
            }
            Err(cycle) => {
                let involved = self
                    .graph
                    .node_weight(cycle.node_id())
                    .map_or_else(|| "unknown".to_string(), ToString::to_string);
                Err(CumuloError::Invariant {
                    message: format!("cyclic dependency detected involving {involved}"),
                })
            }
        }
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}
