use crate::dependency_resolution::domain::{Artifact, PlatformFilters};
use dashmap::DashMap;
use petgraph::graph::NodeIndex;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Artifacts reachable below a node, each with the union of the platform
/// filters of every path that reaches it.
pub type Contributions = BTreeMap<Artifact, PlatformFilters>;

/// Cache key for a resolved node: the node plus the filter it was entered with
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct CacheKey {
    node: NodeIndex,
    filters: PlatformFilters,
}

impl CacheKey {
    pub fn new(node: NodeIndex, filters: &PlatformFilters) -> Self {
        Self {
            node,
            filters: filters.clone(),
        }
    }
}

/// Memo table used by the traverser.
///
/// A resolved value only depends on the graph and the key, never on the
/// root target, so implementations may hand the same value to several
/// traversals. Keys are only meaningful for the graph they were built from.
pub trait ResolutionCache {
    fn get(&mut self, key: &CacheKey) -> Option<Arc<Contributions>>;

    /// Stores `value` unless the key is already resolved, and returns the
    /// stored value either way.
    fn insert(&mut self, key: CacheKey, value: Arc<Contributions>) -> Arc<Contributions>;
}

/// Per-traversal cache. Dropped with the traversal, so nothing leaks
/// between root targets.
#[derive(Debug, Default)]
pub struct LocalResolutionCache {
    entries: HashMap<CacheKey, Arc<Contributions>>,
}

impl LocalResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ResolutionCache for LocalResolutionCache {
    fn get(&mut self, key: &CacheKey) -> Option<Arc<Contributions>> {
        self.entries.get(key).cloned()
    }

    fn insert(&mut self, key: CacheKey, value: Arc<Contributions>) -> Arc<Contributions> {
        self.entries.entry(key).or_insert(value).clone()
    }
}

/// Cache shared by the traversals of one batch, one handle per worker.
///
/// Backed by a `DashMap`; two workers racing on the same key compute the
/// same value, the first insert wins and both observe it.
#[derive(Debug, Clone, Default)]
pub struct SharedResolutionCache {
    entries: Arc<DashMap<CacheKey, Arc<Contributions>>>,
}

impl SharedResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ResolutionCache for SharedResolutionCache {
    fn get(&mut self, key: &CacheKey) -> Option<Arc<Contributions>> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    fn insert(&mut self, key: CacheKey, value: Arc<Contributions>) -> Arc<Contributions> {
        self.entries.entry(key).or_insert(value).value().clone()
    }
}
