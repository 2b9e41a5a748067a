use crate::dependency_resolution::domain::NodeId;
use std::path::PathBuf;

/// Default number of targets resolved at the same time
pub const DEFAULT_JOBS: usize = 4;

/// ResolveRequest - Internal request DTO for the reference resolution use case
#[derive(Debug, Clone)]
pub struct ResolveRequest {
    /// Path to the graph description file
    pub graph_path: PathBuf,
    /// Targets to resolve; empty means every target in the graph
    pub targets: Vec<NodeId>,
    /// Maximum number of targets resolved concurrently
    pub jobs: usize,
    /// Share resolved nodes between the targets of this request
    pub share_cache: bool,
    /// Only validate the graph, resolve nothing
    pub check_only: bool,
    /// Optional cap on the dependency chain below a target
    pub max_depth: Option<usize>,
}

impl ResolveRequest {
    pub fn new(graph_path: PathBuf) -> Self {
        Self {
            graph_path,
            targets: Vec::new(),
            jobs: DEFAULT_JOBS,
            share_cache: false,
            check_only: false,
            max_depth: None,
        }
    }

    pub fn with_targets(mut self, targets: Vec<NodeId>) -> Self {
        self.targets = targets;
        self
    }

    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs;
        self
    }

    pub fn with_share_cache(mut self, share_cache: bool) -> Self {
        self.share_cache = share_cache;
        self
    }

    pub fn with_check_only(mut self, check_only: bool) -> Self {
        self.check_only = check_only;
        self
    }

    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }
}
