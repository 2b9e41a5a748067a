use crate::application::dto::{GraphSummary, ResolveResponse};
use crate::dependency_resolution::domain::{DependencyReference, NodeId};
use crate::ports::outbound::ReferenceFormatter;
use crate::shared::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

const TOOL_NAME: &str = env!("CARGO_PKG_NAME");
const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReferenceListing<'a> {
    generator: Generator,
    #[serde(skip_serializing_if = "Option::is_none")]
    generated_at: Option<String>,
    graph: &'a GraphSummary,
    targets: &'a BTreeMap<NodeId, Vec<DependencyReference>>,
}

#[derive(Debug, Serialize)]
struct Generator {
    name: &'static str,
    version: &'static str,
}

/// JsonFormatter adapter for machine-readable reference listings
///
/// Targets appear in id order and each reference list in resolution
/// order; the serialized form of a reference is tagged by `kind`.
pub struct JsonFormatter {
    timestamp: Option<DateTime<Utc>>,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self {
            timestamp: Some(Utc::now()),
        }
    }

    /// Omits `generatedAt`, making the output byte-for-byte reproducible.
    pub fn without_timestamp() -> Self {
        Self { timestamp: None }
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReferenceFormatter for JsonFormatter {
    fn format(&self, response: &ResolveResponse) -> Result<String> {
        let listing = ReferenceListing {
            generator: Generator {
                name: TOOL_NAME,
                version: TOOL_VERSION,
            },
            generated_at: self.timestamp.map(|t| t.to_rfc3339()),
            graph: &response.graph,
            targets: &response.targets,
        };

        let mut output = serde_json::to_string_pretty(&listing)?;
        output.push('\n');
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dependency_resolution::domain::{PlatformFilter, PlatformFilters, SdkSource, SdkStatus};
    use serde_json::Value;
    use std::path::PathBuf;

    fn response() -> ResolveResponse {
        let mut targets = BTreeMap::new();
        targets.insert(
            NodeId::new("App"),
            vec![
                DependencyReference::Sdk {
                    path: PathBuf::from("/System/UIKit.framework"),
                    status: SdkStatus::Required,
                    source: SdkSource::System,
                    platform_filters: PlatformFilters::only([
                        PlatformFilter::Ios,
                        PlatformFilter::Catalyst,
                    ]),
                },
                DependencyReference::Product {
                    target: "Core".to_string(),
                    product_name: "Core.framework".to_string(),
                    platform_filters: PlatformFilters::All,
                },
                DependencyReference::Library {
                    path: PathBuf::from("/libs/libZ.a"),
                },
            ],
        );
        targets.insert(NodeId::new("Core"), vec![]);
        ResolveResponse::new(GraphSummary { nodes: 4, edges: 3 }, targets)
    }

    #[test]
    fn test_json_structure() {
        let output = JsonFormatter::new().format(&response()).unwrap();
        let json: Value = serde_json::from_str(&output).unwrap();

        assert_eq!(json["generator"]["name"], "graph-refs");
        assert!(json["generatedAt"].is_string());
        assert_eq!(json["graph"]["nodes"], 4);
        assert_eq!(json["graph"]["edges"], 3);

        let app = json["targets"]["App"].as_array().unwrap();
        assert_eq!(app.len(), 3);
        assert_eq!(app[0]["kind"], "sdk");
        assert_eq!(app[0]["status"], "required");
        assert_eq!(app[0]["platform_filters"], serde_json::json!(["ios", "catalyst"]));
        assert_eq!(app[1]["kind"], "product");
        assert_eq!(app[1]["platform_filters"], "all");
        assert_eq!(app[2]["kind"], "library");
        assert!(app[2].get("platform_filters").is_none());

        assert_eq!(json["targets"]["Core"], serde_json::json!([]));
    }

    #[test]
    fn test_without_timestamp_is_reproducible() {
        let formatter = JsonFormatter::without_timestamp();
        let first = formatter.format(&response()).unwrap();
        let second = formatter.format(&response()).unwrap();

        assert_eq!(first, second);
        assert!(!first.contains("generatedAt"));
    }

    #[test]
    fn test_targets_in_id_order() {
        let output = JsonFormatter::without_timestamp()
            .format(&response())
            .unwrap();
        let app = output.find("\"App\"").unwrap();
        let core = output.find("\"Core\"").unwrap();
        assert!(app < core);
    }
}
