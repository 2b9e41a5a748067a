use crate::dependency_resolution::domain::{DependencyReference, NodeId};
use serde::Serialize;
use std::collections::BTreeMap;

/// Size of the graph a response was computed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GraphSummary {
    pub nodes: usize,
    pub edges: usize,
}

/// ResolveResponse - Internal response DTO from the resolution use case
///
/// Targets are keyed by id in a `BTreeMap`, so iteration order never
/// depends on which worker finished first. Each list keeps the order the
/// traverser produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolveResponse {
    pub graph: GraphSummary,
    pub targets: BTreeMap<NodeId, Vec<DependencyReference>>,
}

impl ResolveResponse {
    pub fn new(graph: GraphSummary, targets: BTreeMap<NodeId, Vec<DependencyReference>>) -> Self {
        Self { graph, targets }
    }

    pub fn target_count(&self) -> usize {
        self.targets.len()
    }

    pub fn reference_count(&self) -> usize {
        self.targets.values().map(Vec::len).sum()
    }

    pub fn references_of(&self, target: &NodeId) -> Option<&[DependencyReference]> {
        self.targets.get(target).map(Vec::as_slice)
    }
}
