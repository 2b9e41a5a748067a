use crate::dependency_resolution::domain::{
    Artifact, DependencyGraph, GraphEdge, GraphNode, NodeId, NodeKind, PlatformFilter,
    PlatformFilters, SdkSource, SdkStatus,
};
use crate::shared::GraphError;
use serde::Deserialize;
use std::path::PathBuf;

/// Materialized graph as handed over by the project loader.
///
/// This is the on-disk shape (JSON or TOML); [`into_graph`](Self::into_graph)
/// turns it into the domain aggregate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GraphDescription {
    #[serde(default)]
    pub nodes: Vec<NodeDescription>,
    #[serde(default)]
    pub edges: Vec<EdgeDescription>,
}

/// One node record, tagged by `kind`. Fields the kind does not define are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum NodeDescription {
    Target {
        id: String,
        name: String,
        #[serde(default)]
        product: Option<String>,
    },
    Library {
        id: String,
        path: PathBuf,
    },
    Framework {
        id: String,
        path: PathBuf,
    },
    #[serde(rename = "xcframework")]
    XcFramework {
        id: String,
        path: PathBuf,
    },
    Bundle {
        id: String,
        path: PathBuf,
    },
    Sdk {
        id: String,
        path: PathBuf,
        #[serde(default = "default_sdk_status")]
        status: SdkStatus,
        #[serde(default = "default_sdk_source")]
        source: SdkSource,
    },
    PackageProduct {
        id: String,
        target: String,
        product: String,
    },
}

fn default_sdk_status() -> SdkStatus {
    SdkStatus::Required
}

fn default_sdk_source() -> SdkSource {
    SdkSource::System
}

/// One edge record. A missing `platforms` list means every platform.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EdgeDescription {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub platforms: Option<Vec<PlatformFilter>>,
}

impl NodeDescription {
    pub fn id(&self) -> &str {
        match self {
            NodeDescription::Target { id, .. }
            | NodeDescription::Library { id, .. }
            | NodeDescription::Framework { id, .. }
            | NodeDescription::XcFramework { id, .. }
            | NodeDescription::Bundle { id, .. }
            | NodeDescription::Sdk { id, .. }
            | NodeDescription::PackageProduct { id, .. } => id,
        }
    }

    fn into_node(self) -> Result<GraphNode, GraphError> {
        let id = NodeId::parse(self.id())?;
        let kind = match self {
            NodeDescription::Target { name, product, .. } => NodeKind::Target { name, product },
            NodeDescription::Library { path, .. } => NodeKind::Artifact(Artifact::Library { path }),
            NodeDescription::Framework { path, .. } => {
                NodeKind::Artifact(Artifact::Framework { path })
            }
            NodeDescription::XcFramework { path, .. } => {
                NodeKind::Artifact(Artifact::XcFramework { path })
            }
            NodeDescription::Bundle { path, .. } => NodeKind::Artifact(Artifact::Bundle { path }),
            NodeDescription::Sdk {
                path,
                status,
                source,
                ..
            } => NodeKind::Artifact(Artifact::Sdk {
                path,
                status,
                source,
            }),
            NodeDescription::PackageProduct {
                target, product, ..
            } => NodeKind::Artifact(Artifact::Product {
                target,
                product_name: product,
            }),
        };
        Ok(GraphNode::new(id, kind))
    }
}

impl EdgeDescription {
    fn into_edge(self) -> GraphEdge {
        let filters = match self.platforms {
            Some(platforms) => PlatformFilters::only(platforms),
            None => PlatformFilters::All,
        };
        GraphEdge::new(self.from, self.to).with_filters(filters)
    }
}

impl GraphDescription {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Builds the domain graph. Does not check for cycles.
    ///
    /// # Errors
    /// Returns `GraphError::InvalidInput` for malformed ids, duplicate
    /// nodes, unknown edge endpoints or edges leaving an artifact.
    pub fn into_graph(self) -> Result<DependencyGraph, GraphError> {
        let nodes = self
            .nodes
            .into_iter()
            .map(NodeDescription::into_node)
            .collect::<Result<Vec<_>, _>>()?;
        let edges = self.edges.into_iter().map(EdgeDescription::into_edge);
        DependencyGraph::build(nodes, edges)
    }
}
