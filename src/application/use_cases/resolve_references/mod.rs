use crate::application::dto::{GraphSummary, ResolveRequest, ResolveResponse};
use crate::dependency_resolution::domain::{
    DependencyGraph, DependencyReference, NodeId, NodeKind,
};
use crate::dependency_resolution::services::{
    GraphTraverser, SharedResolutionCache, TraversalOptions,
};
use crate::ports::inbound::ReferenceResolutionPort;
use crate::ports::outbound::{GraphReader, ProgressReporter};
use crate::shared::{GraphError, Result};
use anyhow::Context;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// ResolveReferencesUseCase - Core use case for dependency reference resolution
///
/// Loads the graph through the injected reader, validates it once, then
/// resolves every requested target on the blocking pool.
///
/// # Type Parameters
/// * `GR` - GraphReader implementation
/// * `PR` - ProgressReporter implementation
pub struct ResolveReferencesUseCase<GR, PR> {
    graph_reader: GR,
    progress_reporter: PR,
}

impl<GR, PR> ResolveReferencesUseCase<GR, PR>
where
    GR: GraphReader,
    PR: ProgressReporter,
{
    /// Creates a new ResolveReferencesUseCase with injected dependencies
    pub fn new(graph_reader: GR, progress_reporter: PR) -> Self {
        Self {
            graph_reader,
            progress_reporter,
        }
    }

    /// Executes the resolution use case
    ///
    /// # Returns
    /// One ordered reference list per target, keyed by target id. In
    /// check-only mode the map is empty.
    pub async fn execute(&self, request: ResolveRequest) -> Result<ResolveResponse> {
        // Step 1: Load the graph description
        let graph = self.load_graph(&request)?;
        let summary = GraphSummary {
            nodes: graph.node_count(),
            edges: graph.edge_count(),
        };

        // Step 2: Validate once; every traversal reuses the cached outcome
        graph
            .validate()
            .context("Dependency graph validation failed")?;
        self.progress_reporter.report("✅ Dependency graph is acyclic");

        if request.check_only {
            self.progress_reporter
                .report_completion("✅ Graph check completed");
            return Ok(ResolveResponse::new(summary, BTreeMap::new()));
        }

        // Step 3: Resolve the requested targets
        let targets = Self::select_targets(&graph, &request.targets)?;
        self.progress_reporter.report(&format!(
            "🔍 Resolving references for {} target(s)...",
            targets.len()
        ));

        let resolved = self.resolve_all(Arc::new(graph), targets, &request).await?;

        let response = ResolveResponse::new(summary, resolved);
        self.progress_reporter.report_completion(&format!(
            "✅ Resolved {} reference(s) across {} target(s)",
            response.reference_count(),
            response.target_count()
        ));
        Ok(response)
    }

    fn load_graph(&self, request: &ResolveRequest) -> Result<DependencyGraph> {
        self.progress_reporter.report(&format!(
            "📖 Loading dependency graph from: {}",
            request.graph_path.display()
        ));

        let description = self.graph_reader.read_graph(&request.graph_path)?;
        let graph = description.into_graph().with_context(|| {
            format!(
                "Invalid graph description in {}",
                request.graph_path.display()
            )
        })?;

        self.progress_reporter.report(&format!(
            "✅ Loaded {} node(s) and {} edge(s)",
            graph.node_count(),
            graph.edge_count()
        ));
        Ok(graph)
    }

    /// Requested targets in id order, or every target when none were named.
    ///
    /// Unknown ids and artifact ids are rejected here, before any worker
    /// starts, so the reported error does not depend on scheduling.
    fn select_targets(graph: &DependencyGraph, requested: &[NodeId]) -> Result<Vec<NodeId>> {
        if requested.is_empty() {
            return Ok(graph.target_ids());
        }

        let unique: BTreeSet<&NodeId> = requested.iter().collect();
        for id in &unique {
            let node = graph
                .node_by_id(id)
                .ok_or_else(|| GraphError::MissingNode { id: (*id).clone() })?;
            if let NodeKind::Artifact(_) = node.kind() {
                return Err(GraphError::invalid_input(format!(
                    "'{}' is an artifact node, not a target",
                    id
                ))
                .into());
            }
        }
        Ok(unique.into_iter().cloned().collect())
    }

    /// Runs one traversal per target with at most `request.jobs` in flight.
    ///
    /// The first failure raises the shared cancellation flag so the
    /// remaining workers stop at their next node visit.
    async fn resolve_all(
        &self,
        graph: Arc<DependencyGraph>,
        targets: Vec<NodeId>,
        request: &ResolveRequest,
    ) -> Result<BTreeMap<NodeId, Vec<DependencyReference>>> {
        let total = targets.len();
        let jobs = request.jobs.max(1);
        let cancellation = Arc::new(AtomicBool::new(false));
        let options = TraversalOptions {
            max_depth: request.max_depth,
            cancellation: Some(Arc::clone(&cancellation)),
        };
        let shared_cache = request.share_cache.then(SharedResolutionCache::new);

        debug!(
            targets = total,
            jobs,
            share_cache = request.share_cache,
            "Starting parallel resolution"
        );

        let mut pending = stream::iter(targets)
            .map(|target| {
                let graph = Arc::clone(&graph);
                let options = options.clone();
                let shared_cache = shared_cache.clone();
                tokio::task::spawn_blocking(move || {
                    let mut traverser = GraphTraverser::new(&graph).with_options(options);
                    if let Some(cache) = shared_cache {
                        traverser = traverser.with_shared_cache(cache);
                    }
                    let outcome = traverser.dependency_references(&target);
                    (target, outcome)
                })
            })
            .buffer_unordered(jobs);

        let mut resolved = BTreeMap::new();
        while let Some(joined) = pending.next().await {
            let (target, outcome) = joined.context("Resolution worker terminated unexpectedly")?;
            match outcome {
                Ok(references) => {
                    self.progress_reporter.report_progress(
                        resolved.len() + 1,
                        total,
                        Some(target.as_str()),
                    );
                    resolved.insert(target, references);
                }
                Err(error) => {
                    cancellation.store(true, Ordering::Relaxed);
                    return Err(anyhow::Error::new(error)
                        .context(format!("Failed to resolve target '{}'", target)));
                }
            }
        }

        info!(targets = resolved.len(), "Resolved all targets");
        Ok(resolved)
    }
}

#[async_trait(?Send)]
impl<GR, PR> ReferenceResolutionPort for ResolveReferencesUseCase<GR, PR>
where
    GR: GraphReader,
    PR: ProgressReporter,
{
    async fn resolve_references(&self, request: ResolveRequest) -> Result<ResolveResponse> {
        self.execute(request).await
    }
}

#[cfg(test)]
mod tests;
