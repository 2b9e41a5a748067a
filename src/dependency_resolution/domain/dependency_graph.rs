//! Immutable dependency graph of targets and terminal artifacts.
//!
//! Nodes and edges live in a `petgraph` arena addressed by [`NodeIndex`], so
//! the graph holds no self-references and can be shared read-only across
//! threads once built.

use super::graph_node::{GraphNode, NodeId, NodeKind};
use super::platform_filter::PlatformFilters;
use crate::dependency_resolution::services::CycleChecker;
use crate::shared::GraphError;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::BTreeMap;
use std::sync::OnceLock;
use tracing::debug;

/// A directed edge: `from` depends on `to` on the platforms in `platform_filters`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphEdge {
    pub from: NodeId,
    pub to: NodeId,
    pub platform_filters: PlatformFilters,
}

impl GraphEdge {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: NodeId::new(from),
            to: NodeId::new(to),
            platform_filters: PlatformFilters::All,
        }
    }

    pub fn with_filters(mut self, platform_filters: PlatformFilters) -> Self {
        self.platform_filters = platform_filters;
        self
    }
}

/// DependencyGraph aggregate: the read-only input of every traversal
#[derive(Debug)]
pub struct DependencyGraph {
    graph: DiGraph<GraphNode, PlatformFilters>,
    /// Ordered id lookup; iteration order is the id order.
    node_map: BTreeMap<NodeId, NodeIndex>,
    /// Result of the first `validate()` call, reused afterwards.
    validation: OnceLock<Result<(), GraphError>>,
}

impl DependencyGraph {
    /// Builds the graph from fully materialized node and edge records.
    ///
    /// # Errors
    /// Returns `GraphError::InvalidInput` when:
    /// - a node id is empty or appears twice
    /// - a node has an empty name or artifact path
    /// - an edge names a node id that is not in `nodes`
    /// - an artifact node has outgoing edges
    pub fn build(
        nodes: impl IntoIterator<Item = GraphNode>,
        edges: impl IntoIterator<Item = GraphEdge>,
    ) -> Result<Self, GraphError> {
        let mut graph = DiGraph::new();
        let mut node_map = BTreeMap::new();

        for node in nodes {
            node.validate()?;
            if node_map.contains_key(node.id()) {
                return Err(GraphError::invalid_input(format!(
                    "duplicate node id '{}'",
                    node.id()
                )));
            }
            let id = node.id().clone();
            let index = graph.add_node(node);
            node_map.insert(id, index);
        }

        for edge in edges {
            let lookup = |id: &NodeId| {
                node_map.get(id).copied().ok_or_else(|| {
                    GraphError::invalid_input(format!(
                        "edge {} → {} references unknown node '{}'",
                        edge.from, edge.to, id
                    ))
                })
            };
            let from = lookup(&edge.from)?;
            let to = lookup(&edge.to)?;

            if let NodeKind::Artifact(_) = graph[from].kind() {
                return Err(GraphError::invalid_input(format!(
                    "artifact node '{}' cannot have dependencies (edge to '{}')",
                    edge.from, edge.to
                )));
            }

            graph.add_edge(from, to, edge.platform_filters);
        }

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Built dependency graph"
        );

        Ok(Self {
            graph,
            node_map,
            validation: OnceLock::new(),
        })
    }

    /// Checks that the graph is acyclic.
    ///
    /// The first call runs the cycle checker; later calls return the cached
    /// outcome, so every traversal can call this without re-walking the graph.
    pub fn validate(&self) -> Result<(), GraphError> {
        self.validation
            .get_or_init(|| CycleChecker::check(self))
            .clone()
    }

    /// True once `validate()` has run at least once.
    pub fn is_validated(&self) -> bool {
        self.validation.get().is_some()
    }

    pub fn index_of(&self, id: &NodeId) -> Option<NodeIndex> {
        self.node_map.get(id).copied()
    }

    pub fn node(&self, index: NodeIndex) -> &GraphNode {
        &self.graph[index]
    }

    pub fn node_by_id(&self, id: &NodeId) -> Option<&GraphNode> {
        self.index_of(id).map(|index| &self.graph[index])
    }

    /// Node indices in insertion order.
    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// Outgoing edges of `index` in insertion order, with their filters.
    pub fn dependencies(&self, index: NodeIndex) -> Vec<(NodeIndex, &PlatformFilters)> {
        let mut edges: Vec<_> = self.graph.edges(index).collect();
        edges.sort_by_key(|edge| edge.id());
        edges
            .into_iter()
            .map(|edge| (edge.target(), edge.weight()))
            .collect()
    }

    /// Ids of all target nodes, in id order.
    pub fn target_ids(&self) -> Vec<NodeId> {
        self.node_map
            .iter()
            .filter(|(_, index)| self.graph[**index].is_target())
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.node_map.contains_key(id)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }
}
