mod cycle_checker;
mod graph_traverser;
mod resolution_cache;

pub use cycle_checker::CycleChecker;
pub use graph_traverser::{GraphTraverser, TraversalOptions};
pub use resolution_cache::{
    CacheKey, Contributions, LocalResolutionCache, ResolutionCache, SharedResolutionCache,
};
