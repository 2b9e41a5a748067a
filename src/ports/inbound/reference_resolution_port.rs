use crate::application::dto::{ResolveRequest, ResolveResponse};
use crate::shared::Result;
use async_trait::async_trait;

/// ReferenceResolutionPort - Inbound port for dependency reference resolution
///
/// This port defines the interface that external adapters (CLI, tests, etc.)
/// use to resolve the dependency references of a graph's targets.
#[async_trait(?Send)]
pub trait ReferenceResolutionPort {
    /// Resolves references for the targets named in the request
    ///
    /// # Errors
    /// Returns an error if:
    /// - The graph description cannot be read or parsed
    /// - The graph is not a valid DAG (wraps a `GraphError`)
    /// - A requested target does not exist or is not a target node
    async fn resolve_references(&self, request: ResolveRequest) -> Result<ResolveResponse>;
}
