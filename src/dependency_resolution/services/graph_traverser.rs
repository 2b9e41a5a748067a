use super::resolution_cache::{
    CacheKey, Contributions, LocalResolutionCache, ResolutionCache, SharedResolutionCache,
};
use crate::dependency_resolution::domain::{
    Artifact, DependencyGraph, DependencyReference, NodeId, NodeKind, PlatformFilters,
};
use crate::shared::GraphError;
use petgraph::graph::NodeIndex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

/// Knobs for a traversal.
#[derive(Debug, Clone, Default)]
pub struct TraversalOptions {
    /// Optional cap on the dependency chain (in target hops) below a root.
    /// `None` walks chains of any length.
    pub max_depth: Option<usize>,
    /// Raised by the caller to abandon the walk at the next node visit.
    pub cancellation: Option<Arc<AtomicBool>>,
}

/// GraphTraverser service: computes the dependency references of a target.
///
/// Pure business logic over a read-only [`DependencyGraph`]; one traverser
/// can serve many calls, each call keeps its own walk state.
pub struct GraphTraverser<'g> {
    graph: &'g DependencyGraph,
    options: TraversalOptions,
    shared_cache: Option<SharedResolutionCache>,
}

/// Per-call state: the current DFS path and the memo table.
struct Walk<'c, C: ResolutionCache> {
    path: Vec<NodeIndex>,
    visiting: HashSet<NodeIndex>,
    cache: &'c mut C,
}

/// One node being resolved: its entry filters, the next dependency to
/// look at and what has been collected below it so far.
struct Frame<'g> {
    node: NodeIndex,
    key: CacheKey,
    filters: PlatformFilters,
    depth: usize,
    dependencies: Vec<(NodeIndex, &'g PlatformFilters)>,
    next: usize,
    contributions: Contributions,
}

/// Outcome of entering a node: already resolved, or a new frame to walk.
enum Step<'g> {
    Resolved(Arc<Contributions>),
    Descend(Frame<'g>),
}

impl<'g> GraphTraverser<'g> {
    pub fn new(graph: &'g DependencyGraph) -> Self {
        Self {
            graph,
            options: TraversalOptions::default(),
            shared_cache: None,
        }
    }

    pub fn with_options(mut self, options: TraversalOptions) -> Self {
        self.options = options;
        self
    }

    /// Reuses resolved nodes across calls. The cache must only ever be used
    /// with this graph.
    pub fn with_shared_cache(mut self, cache: SharedResolutionCache) -> Self {
        self.shared_cache = Some(cache);
        self
    }

    /// Returns the ordered, deduplicated references `target_id` needs.
    ///
    /// # Errors
    /// - `GraphError::Cycle` if the graph is not acyclic
    /// - `GraphError::MissingNode` if `target_id` is not in the graph
    /// - `GraphError::InvalidInput` if `target_id` is an artifact node, or a
    ///   dependency chain is longer than an explicit `max_depth`
    /// - `GraphError::Cancelled` if the cancellation flag was raised
    pub fn dependency_references(
        &self,
        target_id: &NodeId,
    ) -> Result<Vec<DependencyReference>, GraphError> {
        match &self.shared_cache {
            Some(shared) => self.dependency_references_with_cache(target_id, &mut shared.clone()),
            None => {
                self.dependency_references_with_cache(target_id, &mut LocalResolutionCache::new())
            }
        }
    }

    /// Same as [`dependency_references`](Self::dependency_references) with a
    /// caller-provided memo table.
    pub fn dependency_references_with_cache<C: ResolutionCache>(
        &self,
        target_id: &NodeId,
        cache: &mut C,
    ) -> Result<Vec<DependencyReference>, GraphError> {
        self.graph.validate()?;

        let root = self
            .graph
            .index_of(target_id)
            .ok_or_else(|| GraphError::MissingNode {
                id: target_id.clone(),
            })?;
        if let NodeKind::Artifact(_) = self.graph.node(root).kind() {
            return Err(GraphError::invalid_input(format!(
                "'{}' is an artifact node, not a target",
                target_id
            )));
        }

        let mut walk = Walk {
            path: Vec::new(),
            visiting: HashSet::new(),
            cache,
        };
        let contributions = self.resolve(root, &mut walk)?;

        let references = DependencyReference::sorted_unique(
            contributions
                .iter()
                .map(|(artifact, filters)| artifact.clone().into_reference(filters.clone())),
        );

        debug!(
            target = %target_id,
            references = references.len(),
            "Resolved dependency references"
        );
        Ok(references)
    }

    /// Collects everything reachable below `root`.
    ///
    /// Depth-first with an explicit frame stack, so chain length is bounded
    /// by memory rather than by the thread stack. A node is memoized per
    /// accumulated path filter once all of its dependencies are resolved.
    fn resolve<C: ResolutionCache>(
        &self,
        root: NodeIndex,
        walk: &mut Walk<'_, C>,
    ) -> Result<Arc<Contributions>, GraphError> {
        let mut stack = match self.enter(root, PlatformFilters::All, 0, walk)? {
            Step::Resolved(resolved) => return Ok(resolved),
            Step::Descend(frame) => vec![frame],
        };
        let mut resolved_root = Arc::default();

        while let Some(mut frame) = stack.pop() {
            if let Some(&(dependency, edge_filters)) = frame.dependencies.get(frame.next) {
                frame.next += 1;

                let reachable = frame.filters.intersection(edge_filters);
                if reachable.is_empty() {
                    trace!(
                        from = %self.graph.node(frame.node).id(),
                        to = %self.graph.node(dependency).id(),
                        "Pruned edge with no remaining platform"
                    );
                    stack.push(frame);
                    continue;
                }

                let dependency_node = self.graph.node(dependency);
                if let Some(artifact) = dependency_node.linked_artifact() {
                    merge(&mut frame.contributions, artifact, &reachable);
                }
                if dependency_node.is_target() {
                    match self.enter(dependency, reachable, frame.depth + 1, walk)? {
                        Step::Resolved(below) => absorb(&mut frame.contributions, &below),
                        Step::Descend(child) => {
                            stack.push(frame);
                            stack.push(child);
                            continue;
                        }
                    }
                }
                stack.push(frame);
                continue;
            }

            walk.path.pop();
            walk.visiting.remove(&frame.node);
            let resolved = walk.cache.insert(frame.key, Arc::new(frame.contributions));

            match stack.last_mut() {
                Some(parent) => absorb(&mut parent.contributions, &resolved),
                None => resolved_root = resolved,
            }
        }

        Ok(resolved_root)
    }

    /// Enters `node` under `filters`: a memo hit, a cycle, or a new frame.
    fn enter<C: ResolutionCache>(
        &self,
        node: NodeIndex,
        filters: PlatformFilters,
        depth: usize,
        walk: &mut Walk<'_, C>,
    ) -> Result<Step<'g>, GraphError> {
        self.check_cancelled()?;

        let key = CacheKey::new(node, &filters);
        if let Some(resolved) = walk.cache.get(&key) {
            return Ok(Step::Resolved(resolved));
        }

        if walk.visiting.contains(&node) {
            return Err(self.cycle_through(node, &walk.path));
        }

        if let Some(max_depth) = self.options.max_depth {
            if depth > max_depth {
                return Err(GraphError::invalid_input(format!(
                    "dependency chain below '{}' exceeds the maximum depth of {}",
                    self.graph.node(node).id(),
                    max_depth
                )));
            }
        }

        walk.visiting.insert(node);
        walk.path.push(node);

        Ok(Step::Descend(Frame {
            node,
            key,
            filters,
            depth,
            dependencies: self.graph.dependencies(node),
            next: 0,
            contributions: Contributions::new(),
        }))
    }

    fn check_cancelled(&self) -> Result<(), GraphError> {
        match &self.options.cancellation {
            Some(flag) if flag.load(Ordering::Relaxed) => Err(GraphError::Cancelled),
            _ => Ok(()),
        }
    }

    fn cycle_through(&self, node: NodeIndex, path: &[NodeIndex]) -> GraphError {
        let start = path.iter().position(|n| *n == node).unwrap_or(0);
        let mut cycle: Vec<NodeId> = path[start..]
            .iter()
            .map(|n| self.graph.node(*n).id().clone())
            .collect();
        cycle.push(self.graph.node(node).id().clone());
        GraphError::Cycle { path: cycle }
    }
}

/// Folds everything resolved below a dependency into its dependent.
fn absorb(contributions: &mut Contributions, below: &Contributions) {
    for (artifact, filters) in below.iter() {
        merge(contributions, artifact.clone(), filters);
    }
}

/// Diamond merge: one entry per artifact, filters of all paths unioned.
fn merge(contributions: &mut Contributions, artifact: Artifact, filters: &PlatformFilters) {
    contributions
        .entry(artifact)
        .and_modify(|existing| *existing = existing.union(filters))
        .or_insert_with(|| filters.clone());
}
