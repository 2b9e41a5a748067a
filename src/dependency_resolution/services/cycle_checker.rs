use crate::dependency_resolution::domain::{DependencyGraph, NodeId};
use crate::shared::GraphError;
use petgraph::graph::NodeIndex;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Color states for cycle detection using DFS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    /// Node has not been visited.
    White,
    /// Node is on the current DFS path.
    Gray,
    /// Node and everything below it has been visited.
    Black,
}

/// CycleChecker service: proves the graph is a DAG, or reports one cycle.
///
/// Walks nodes in insertion order and edges in insertion order, so the same
/// graph always reports the same cycle. Uses an explicit stack instead of
/// recursion so long dependency chains cannot exhaust the thread stack.
pub struct CycleChecker;

impl CycleChecker {
    /// Returns `GraphError::Cycle` for the first back-edge found.
    ///
    /// The reported path runs from the re-entered node along the DFS path
    /// and back to it, e.g. `A → B → A`.
    pub fn check(graph: &DependencyGraph) -> Result<(), GraphError> {
        let mut colors: HashMap<NodeIndex, Color> =
            graph.node_indices().map(|n| (n, Color::White)).collect();

        for root in graph.node_indices() {
            if colors[&root] != Color::White {
                continue;
            }
            if let Some(cycle) = Self::visit(graph, root, &mut colors) {
                debug!(cycle = ?cycle, "Dependency cycle detected");
                return Err(GraphError::Cycle { path: cycle });
            }
        }

        trace!(nodes = graph.node_count(), "Dependency graph is acyclic");
        Ok(())
    }

    fn visit(
        graph: &DependencyGraph,
        root: NodeIndex,
        colors: &mut HashMap<NodeIndex, Color>,
    ) -> Option<Vec<NodeId>> {
        // Each frame: node plus its dependency list and the next one to look at.
        let mut stack: Vec<(NodeIndex, Vec<NodeIndex>, usize)> = Vec::new();
        colors.insert(root, Color::Gray);
        stack.push((root, Self::neighbors(graph, root), 0));

        while let Some((node, neighbors, next)) = stack.last_mut() {
            let Some(&neighbor) = neighbors.get(*next) else {
                colors.insert(*node, Color::Black);
                stack.pop();
                continue;
            };
            *next += 1;

            match colors[&neighbor] {
                Color::Gray => {
                    let start = stack
                        .iter()
                        .position(|(n, _, _)| *n == neighbor)
                        .unwrap_or(0);
                    let mut cycle: Vec<NodeId> = stack[start..]
                        .iter()
                        .map(|(n, _, _)| graph.node(*n).id().clone())
                        .collect();
                    cycle.push(graph.node(neighbor).id().clone());
                    return Some(cycle);
                }
                Color::White => {
                    colors.insert(neighbor, Color::Gray);
                    let deps = Self::neighbors(graph, neighbor);
                    stack.push((neighbor, deps, 0));
                }
                Color::Black => {}
            }
        }

        None
    }

    fn neighbors(graph: &DependencyGraph, node: NodeIndex) -> Vec<NodeIndex> {
        graph
            .dependencies(node)
            .into_iter()
            .map(|(target, _)| target)
            .collect()
    }
}
