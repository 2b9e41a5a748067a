//! graph-refs - dependency references for the targets of a build graph
//!
//! For every buildable target this library computes the ordered,
//! deduplicated, platform-filtered list of artifacts (SDKs, products,
//! libraries, frameworks, xcframeworks, bundles) it must link or embed,
//! following hexagonal architecture and Domain-Driven Design principles.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`dependency_resolution`): graph model, reference
//!   ordering, cycle checking and traversal
//! - **Application Layer** (`application`): Use cases and DTOs
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Error types, logging and security helpers
//!
//! # Example
//!
//! ```
//! use graph_refs::prelude::*;
//! use std::path::PathBuf;
//!
//! # fn main() -> std::result::Result<(), GraphError> {
//! let graph = DependencyGraph::build(
//!     vec![
//!         GraphNode::target("App", "App"),
//!         GraphNode::target_with_product("Core", "Core", "Core.framework"),
//!         GraphNode::artifact(
//!             "libZ",
//!             Artifact::Library { path: PathBuf::from("/libs/libZ.a") },
//!         ),
//!     ],
//!     vec![
//!         GraphEdge::new("App", "Core")
//!             .with_filters(PlatformFilters::only([PlatformFilter::Ios])),
//!         GraphEdge::new("Core", "libZ"),
//!     ],
//! )?;
//!
//! let references = GraphTraverser::new(&graph).dependency_references(&NodeId::new("App"))?;
//! assert_eq!(references.len(), 2);
//! assert_eq!(references[0].to_string(), "product(Core/Core.framework, [ios])");
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod dependency_resolution;
pub mod ports;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::filesystem::{
        FileSystemReader, FileSystemWriter, StdoutPresenter,
    };
    pub use crate::adapters::outbound::formatters::{JsonFormatter, MarkdownFormatter};
    pub use crate::application::dto::{
        GraphDescription, OutputFormat, ResolveRequest, ResolveResponse,
    };
    pub use crate::application::use_cases::ResolveReferencesUseCase;
    pub use crate::dependency_resolution::domain::{
        Artifact, DependencyGraph, DependencyReference, GraphEdge, GraphNode, NodeId, NodeKind,
        PlatformFilter, PlatformFilters, ReferenceKind, SdkSource, SdkStatus,
    };
    pub use crate::dependency_resolution::services::{
        CycleChecker, GraphTraverser, SharedResolutionCache, TraversalOptions,
    };
    pub use crate::ports::inbound::ReferenceResolutionPort;
    pub use crate::ports::outbound::{
        GraphReader, OutputPresenter, ProgressReporter, ReferenceFormatter,
    };
    pub use crate::shared::{GraphError, Result};
}
