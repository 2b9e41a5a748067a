pub mod dependency_graph;
pub mod dependency_reference;
pub mod graph_node;
pub mod platform_filter;

pub use dependency_graph::{DependencyGraph, GraphEdge};
pub use dependency_reference::{DependencyReference, ReferenceKind, SdkSource, SdkStatus};
pub use graph_node::{Artifact, GraphNode, NodeId, NodeKind};
pub use platform_filter::{PlatformFilter, PlatformFilters};
