use super::dependency_reference::{DependencyReference, SdkSource, SdkStatus};
use super::platform_filter::PlatformFilters;
use crate::shared::GraphError;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::path::PathBuf;

/// Maximum length for node ids (security limit)
const MAX_NODE_ID_LENGTH: usize = 1024;

/// NewType wrapper for graph node identifiers
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Creates a node id, rejecting empty or oversized values.
    pub fn parse(id: impl Into<String>) -> Result<Self, GraphError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(GraphError::invalid_input("node id cannot be empty"));
        }
        if id.len() > MAX_NODE_ID_LENGTH {
            return Err(GraphError::invalid_input(format!(
                "node id is too long ({} bytes). Maximum allowed: {} bytes",
                id.len(),
                MAX_NODE_ID_LENGTH
            )));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A build-consumable artifact a terminal node stands for.
///
/// This is a [`DependencyReference`] without platform filters: the filters
/// are only known once a path from a root target has been walked.
///
/// Ordered like the reference it becomes: paths compare as whole strings.
#[derive(Debug, Clone)]
pub enum Artifact {
    Library {
        path: PathBuf,
    },
    Framework {
        path: PathBuf,
    },
    XcFramework {
        path: PathBuf,
    },
    Bundle {
        path: PathBuf,
    },
    Sdk {
        path: PathBuf,
        status: SdkStatus,
        source: SdkSource,
    },
    Product {
        target: String,
        product_name: String,
    },
}

impl Artifact {
    /// Turns the artifact into its reference for the given path filters.
    ///
    /// Libraries, frameworks and xcframeworks are identified by path alone,
    /// so the filters are dropped for them.
    pub fn into_reference(self, platform_filters: PlatformFilters) -> DependencyReference {
        match self {
            Artifact::Library { path } => DependencyReference::Library { path },
            Artifact::Framework { path } => DependencyReference::Framework { path },
            Artifact::XcFramework { path } => DependencyReference::XcFramework { path },
            Artifact::Bundle { path } => DependencyReference::Bundle {
                path,
                platform_filters,
            },
            Artifact::Sdk {
                path,
                status,
                source,
            } => DependencyReference::Sdk {
                path,
                status,
                source,
                platform_filters,
            },
            Artifact::Product {
                target,
                product_name,
            } => DependencyReference::Product {
                target,
                product_name,
                platform_filters,
            },
        }
    }

    fn validate(&self) -> Result<(), GraphError> {
        let empty = match self {
            Artifact::Library { path }
            | Artifact::Framework { path }
            | Artifact::XcFramework { path }
            | Artifact::Bundle { path }
            | Artifact::Sdk { path, .. } => path.as_os_str().is_empty(),
            Artifact::Product {
                target,
                product_name,
            } => target.trim().is_empty() || product_name.trim().is_empty(),
        };
        if empty {
            return Err(GraphError::invalid_input(format!(
                "artifact {:?} is missing its path or name",
                self
            )));
        }
        Ok(())
    }
}

impl Artifact {
    fn rank(&self) -> u8 {
        match self {
            Artifact::XcFramework { .. } => 0,
            Artifact::Framework { .. } => 1,
            Artifact::Library { .. } => 2,
            Artifact::Bundle { .. } => 3,
            Artifact::Sdk { .. } => 4,
            Artifact::Product { .. } => 5,
        }
    }
}

impl Ord for Artifact {
    fn cmp(&self, other: &Self) -> Ordering {
        use Artifact::*;

        match (self, other) {
            (XcFramework { path: a }, XcFramework { path: b })
            | (Framework { path: a }, Framework { path: b })
            | (Library { path: a }, Library { path: b })
            | (Bundle { path: a }, Bundle { path: b }) => a.as_os_str().cmp(b.as_os_str()),
            (
                Sdk {
                    path: a,
                    status: sa,
                    source: ra,
                },
                Sdk {
                    path: b,
                    status: sb,
                    source: rb,
                },
            ) => a
                .as_os_str()
                .cmp(b.as_os_str())
                .then_with(|| sa.cmp(sb))
                .then_with(|| ra.cmp(rb)),
            (
                Product {
                    target: ta,
                    product_name: pa,
                },
                Product {
                    target: tb,
                    product_name: pb,
                },
            ) => ta.cmp(tb).then_with(|| pa.cmp(pb)),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Artifact {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Artifact {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Artifact {}

/// What a graph node is. Immutable once the graph is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// A buildable unit with its own dependencies. When `product` is set,
    /// targets that depend on it link that product.
    Target {
        name: String,
        product: Option<String>,
    },
    /// A terminal artifact; it never has outgoing edges.
    Artifact(Artifact),
}

/// A node of the dependency graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    id: NodeId,
    kind: NodeKind,
}

impl GraphNode {
    pub fn new(id: NodeId, kind: NodeKind) -> Self {
        Self { id, kind }
    }

    pub fn target(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(
            NodeId::new(id),
            NodeKind::Target {
                name: name.into(),
                product: None,
            },
        )
    }

    pub fn target_with_product(
        id: impl Into<String>,
        name: impl Into<String>,
        product: impl Into<String>,
    ) -> Self {
        Self::new(
            NodeId::new(id),
            NodeKind::Target {
                name: name.into(),
                product: Some(product.into()),
            },
        )
    }

    pub fn artifact(id: impl Into<String>, artifact: Artifact) -> Self {
        Self::new(NodeId::new(id), NodeKind::Artifact(artifact))
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn is_target(&self) -> bool {
        matches!(self.kind, NodeKind::Target { .. })
    }

    /// The artifact a dependent picks up when it reaches this node, if any.
    pub fn linked_artifact(&self) -> Option<Artifact> {
        match &self.kind {
            NodeKind::Artifact(artifact) => Some(artifact.clone()),
            NodeKind::Target {
                name,
                product: Some(product),
            } => Some(Artifact::Product {
                target: name.clone(),
                product_name: product.clone(),
            }),
            NodeKind::Target { product: None, .. } => None,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), GraphError> {
        NodeId::parse(self.id.as_str())?;
        match &self.kind {
            NodeKind::Target { name, product } => {
                if name.trim().is_empty() {
                    return Err(GraphError::invalid_input(format!(
                        "target '{}' has an empty name",
                        self.id
                    )));
                }
                if product.as_deref().is_some_and(|p| p.trim().is_empty()) {
                    return Err(GraphError::invalid_input(format!(
                        "target '{}' has an empty product name",
                        self.id
                    )));
                }
                Ok(())
            }
            NodeKind::Artifact(artifact) => artifact.validate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dependency_resolution::domain::PlatformFilter;

    #[test]
    fn test_node_id_parse_rejects_empty() {
        assert!(NodeId::parse("  ").is_err());
        assert!(NodeId::parse("x".repeat(MAX_NODE_ID_LENGTH + 1)).is_err());
        assert_eq!(NodeId::parse("App").unwrap().as_str(), "App");
    }

    #[test]
    fn test_artifact_paths_compare_as_whole_strings() {
        let nested = Artifact::Framework {
            path: PathBuf::from("/Frameworks/Core/UI.framework"),
        };
        let dashed = Artifact::Framework {
            path: PathBuf::from("/Frameworks/Core-UI.framework"),
        };
        assert!(dashed < nested);

        let trailing = Artifact::Library {
            path: PathBuf::from("/libs/libZ.a/"),
        };
        let plain = Artifact::Library {
            path: PathBuf::from("/libs/libZ.a"),
        };
        assert_ne!(plain, trailing);
        assert!(plain < trailing);
    }

    #[test]
    fn test_library_reference_drops_filters() {
        let artifact = Artifact::Library {
            path: PathBuf::from("/libs/libZ.a"),
        };
        let reference =
            artifact.into_reference(PlatformFilters::only([PlatformFilter::Ios]));
        assert_eq!(
            reference,
            DependencyReference::Library {
                path: PathBuf::from("/libs/libZ.a")
            }
        );
    }

    #[test]
    fn test_sdk_reference_keeps_filters() {
        let artifact = Artifact::Sdk {
            path: PathBuf::from("/System/UIKit.framework"),
            status: SdkStatus::Optional,
            source: SdkSource::System,
        };
        let filters = PlatformFilters::only([PlatformFilter::Catalyst]);
        match artifact.into_reference(filters.clone()) {
            DependencyReference::Sdk {
                status,
                platform_filters,
                ..
            } => {
                assert_eq!(status, SdkStatus::Optional);
                assert_eq!(platform_filters, filters);
            }
            other => panic!("expected sdk reference, got {:?}", other),
        }
    }

    #[test]
    fn test_linked_artifact_of_target() {
        let plain = GraphNode::target("App", "App");
        assert!(plain.linked_artifact().is_none());

        let core = GraphNode::target_with_product("Core", "Core", "Core.framework");
        assert_eq!(
            core.linked_artifact(),
            Some(Artifact::Product {
                target: "Core".to_string(),
                product_name: "Core.framework".to_string(),
            })
        );
    }

    #[test]
    fn test_validate_rejects_empty_artifact_path() {
        let node = GraphNode::artifact(
            "broken",
            Artifact::Bundle {
                path: PathBuf::new(),
            },
        );
        assert!(matches!(
            node.validate(),
            Err(GraphError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_empty_product_name() {
        let node = GraphNode::target_with_product("Core", "Core", " ");
        assert!(node.validate().is_err());
    }
}
