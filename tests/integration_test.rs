/// Integration tests for the application layer
mod test_utilities;

use graph_refs::prelude::*;
use graph_refs::shared::ExitCode;
use std::path::PathBuf;
use test_utilities::mocks::*;

const SAMPLE_GRAPH: &str = include_str!("fixtures/sample-graph.json");
const CYCLIC_GRAPH: &str = include_str!("fixtures/cyclic-graph.json");

fn request() -> ResolveRequest {
    ResolveRequest::new(PathBuf::from("fixtures/sample-graph.json"))
}

fn rendered(response: &ResolveResponse, target: &str) -> Vec<String> {
    response
        .references_of(&NodeId::new(target))
        .unwrap()
        .iter()
        .map(|r| r.to_string())
        .collect()
}

#[tokio::test]
async fn test_resolve_happy_path() {
    let progress_reporter = MockProgressReporter::new();
    let use_case =
        ResolveReferencesUseCase::new(MockGraphReader::new(SAMPLE_GRAPH), progress_reporter.clone());

    let result = use_case.execute(request()).await;

    assert!(result.is_ok());
    let response = result.unwrap();
    assert_eq!(response.target_count(), 4);
    assert_eq!(response.reference_count(), 13);
    assert_eq!(
        rendered(&response, "App"),
        vec![
            "sdk(/System/UIKit.framework, Required, System, [ios,catalyst])",
            "product(Core/Core.framework, [all])",
            "product(Net/libNet.a, [all])",
            "library(/libs/libZ.a)",
            "xcframework(/Vendor/Crypto.xcframework)",
            "bundle(/Bundles/Assets.bundle, [ios])",
        ]
    );
}

#[tokio::test]
async fn test_filters_intersect_along_the_path() {
    let use_case =
        ResolveReferencesUseCase::new(MockGraphReader::new(SAMPLE_GRAPH), MockProgressReporter::new());

    let response = use_case
        .execute(request().with_targets(vec![NodeId::new("Widget")]))
        .await
        .unwrap();

    assert_eq!(
        rendered(&response, "Widget"),
        vec![
            "sdk(/System/UIKit.framework, Required, System, [ios])",
            "product(Core/Core.framework, [ios,watchos])",
            "library(/libs/libZ.a)",
        ]
    );
}

#[tokio::test]
async fn test_progress_and_completion_are_reported() {
    let progress_reporter = MockProgressReporter::new();
    let use_case =
        ResolveReferencesUseCase::new(MockGraphReader::new(SAMPLE_GRAPH), progress_reporter.clone());

    use_case.execute(request().with_jobs(1)).await.unwrap();

    let progress = progress_reporter.progress_messages();
    assert_eq!(
        progress,
        vec![
            "Progress: 1/4 - App",
            "Progress: 2/4 - Core",
            "Progress: 3/4 - Net",
            "Progress: 4/4 - Widget",
        ]
    );

    let messages = progress_reporter.get_messages();
    assert!(messages.iter().any(|m| m.contains("Loading dependency graph")));
    assert!(messages
        .iter()
        .any(|m| m.starts_with("Completed:") && m.contains("13 reference(s)")));
}

#[tokio::test]
async fn test_parallel_and_shared_cache_match_sequential() {
    let sequential =
        ResolveReferencesUseCase::new(MockGraphReader::new(SAMPLE_GRAPH), MockProgressReporter::new())
            .execute(request().with_jobs(1))
            .await
            .unwrap();

    let parallel =
        ResolveReferencesUseCase::new(MockGraphReader::new(SAMPLE_GRAPH), MockProgressReporter::new())
            .execute(request().with_jobs(8).with_share_cache(true))
            .await
            .unwrap();

    assert_eq!(sequential, parallel);
}

#[tokio::test]
async fn test_cycle_fails_with_graph_exit_code() {
    let use_case =
        ResolveReferencesUseCase::new(MockGraphReader::new(CYCLIC_GRAPH), MockProgressReporter::new());

    let error = use_case.execute(request()).await.unwrap_err();

    assert_eq!(ExitCode::for_error(&error), ExitCode::GraphError);
    let message = format!("{:#}", error);
    assert!(message.contains("A → B → C → A"), "got: {}", message);
}

#[tokio::test]
async fn test_check_only_reports_no_targets() {
    let use_case =
        ResolveReferencesUseCase::new(MockGraphReader::new(SAMPLE_GRAPH), MockProgressReporter::new());

    let response = use_case
        .execute(request().with_check_only(true))
        .await
        .unwrap();

    assert_eq!(response.target_count(), 0);
    assert_eq!(response.graph.nodes, 8);
    assert_eq!(response.graph.edges, 8);
}

#[tokio::test]
async fn test_reader_failure_is_application_error() {
    let use_case =
        ResolveReferencesUseCase::new(MockGraphReader::with_failure(), MockProgressReporter::new());

    let error = use_case.execute(request()).await.unwrap_err();

    assert_eq!(ExitCode::for_error(&error), ExitCode::ApplicationError);
    assert!(error.to_string().contains("Mock failure"));
}

#[tokio::test]
async fn test_dangling_edge_is_invalid_input() {
    let graph = r#"{
        "nodes": [{ "id": "App", "kind": "target", "name": "App" }],
        "edges": [{ "from": "App", "to": "Ghost" }]
    }"#;
    let use_case =
        ResolveReferencesUseCase::new(MockGraphReader::new(graph), MockProgressReporter::new());

    let error = use_case.execute(request()).await.unwrap_err();

    assert!(matches!(
        error.downcast_ref::<GraphError>(),
        Some(GraphError::InvalidInput { .. })
    ));
}

#[tokio::test]
async fn test_formatters_render_the_response() {
    let use_case =
        ResolveReferencesUseCase::new(MockGraphReader::new(SAMPLE_GRAPH), MockProgressReporter::new());
    let response = use_case.execute(request()).await.unwrap();

    let json = JsonFormatter::without_timestamp().format(&response).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["targets"]["App"].as_array().unwrap().len(), 6);
    assert_eq!(parsed["targets"]["Widget"][1]["platform_filters"], serde_json::json!(["ios", "watchos"]));

    let markdown = MarkdownFormatter::new().format(&response).unwrap();
    assert!(markdown.starts_with("# Dependency References"));
    assert!(markdown.contains("## App"));
    assert!(markdown.contains("/Vendor/Crypto.xcframework"));
}
