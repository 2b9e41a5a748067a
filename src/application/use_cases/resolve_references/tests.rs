use super::*;
use crate::application::dto::GraphDescription;
use crate::shared::ExitCode;
use std::cell::RefCell;
use std::path::{Path, PathBuf};

// Mock implementations for testing
struct MockGraphReader {
    content: String,
}

impl MockGraphReader {
    fn new(content: &str) -> Self {
        Self {
            content: content.to_string(),
        }
    }
}

impl GraphReader for MockGraphReader {
    fn read_graph(&self, _path: &Path) -> Result<GraphDescription> {
        Ok(serde_json::from_str(&self.content)?)
    }
}

#[derive(Default)]
struct RecordingProgressReporter {
    progress: RefCell<Vec<(usize, usize)>>,
    completions: RefCell<Vec<String>>,
}

impl ProgressReporter for &RecordingProgressReporter {
    fn report(&self, _message: &str) {}

    fn report_progress(&self, current: usize, total: usize, _message: Option<&str>) {
        self.progress.borrow_mut().push((current, total));
    }

    fn report_error(&self, _message: &str) {}

    fn report_completion(&self, message: &str) {
        self.completions.borrow_mut().push(message.to_string());
    }
}

struct MockProgressReporter;

impl ProgressReporter for MockProgressReporter {
    fn report(&self, _message: &str) {}
    fn report_progress(&self, _current: usize, _total: usize, _message: Option<&str>) {}
    fn report_error(&self, _message: &str) {}
    fn report_completion(&self, _message: &str) {}
}

const APP_GRAPH: &str = r#"{
    "nodes": [
        { "id": "App", "kind": "target", "name": "App" },
        { "id": "Widget", "kind": "target", "name": "Widget" },
        { "id": "Core", "kind": "target", "name": "Core", "product": "Core.framework" },
        { "id": "Net", "kind": "target", "name": "Net", "product": "libNet.a" },
        { "id": "libZ", "kind": "library", "path": "/libs/libZ.a" },
        { "id": "UIKit", "kind": "sdk", "path": "/System/UIKit.framework" },
        { "id": "Assets", "kind": "bundle", "path": "/Bundles/Assets.bundle" }
    ],
    "edges": [
        { "from": "App", "to": "Core" },
        { "from": "App", "to": "Net" },
        { "from": "App", "to": "Assets", "platforms": ["ios"] },
        { "from": "Widget", "to": "Core", "platforms": ["ios", "watchos"] },
        { "from": "Core", "to": "libZ" },
        { "from": "Net", "to": "libZ" },
        { "from": "Core", "to": "UIKit", "platforms": ["ios", "catalyst"] }
    ]
}"#;

const CYCLIC_GRAPH: &str = r#"{
    "nodes": [
        { "id": "A", "kind": "target", "name": "A" },
        { "id": "B", "kind": "target", "name": "B" }
    ],
    "edges": [
        { "from": "A", "to": "B" },
        { "from": "B", "to": "A" }
    ]
}"#;

fn request() -> ResolveRequest {
    ResolveRequest::new(PathBuf::from("/test/graph.json"))
}

fn use_case(content: &str) -> ResolveReferencesUseCase<MockGraphReader, MockProgressReporter> {
    ResolveReferencesUseCase::new(MockGraphReader::new(content), MockProgressReporter)
}

#[tokio::test]
async fn test_execute_resolves_every_target_by_default() {
    let response = use_case(APP_GRAPH).execute(request()).await.unwrap();

    let ids: Vec<&str> = response.targets.keys().map(|id| id.as_str()).collect();
    assert_eq!(ids, vec!["App", "Core", "Net", "Widget"]);
    assert_eq!(response.graph, GraphSummary { nodes: 7, edges: 7 });

    let app: Vec<String> = response
        .references_of(&NodeId::new("App"))
        .unwrap()
        .iter()
        .map(|r| r.to_string())
        .collect();
    assert_eq!(
        app,
        vec![
            "sdk(/System/UIKit.framework, Required, System, [ios,catalyst])",
            "product(Core/Core.framework, [all])",
            "product(Net/libNet.a, [all])",
            "library(/libs/libZ.a)",
            "bundle(/Bundles/Assets.bundle, [ios])",
        ]
    );
}

#[tokio::test]
async fn test_execute_with_selected_targets() {
    let response = use_case(APP_GRAPH)
        .execute(request().with_targets(vec![NodeId::new("Widget"), NodeId::new("Widget")]))
        .await
        .unwrap();

    assert_eq!(response.target_count(), 1);
    let widget = response.references_of(&NodeId::new("Widget")).unwrap();
    // Only ios survives the ios/watchos ∩ ios/catalyst path to UIKit.
    assert_eq!(widget[0].to_string(), "sdk(/System/UIKit.framework, Required, System, [ios])");
    assert_eq!(widget.len(), 3);
}

#[tokio::test]
async fn test_results_do_not_depend_on_jobs_or_cache() {
    let baseline = use_case(APP_GRAPH)
        .execute(request().with_jobs(1))
        .await
        .unwrap();

    for jobs in [2, 4, 16] {
        for share_cache in [false, true] {
            let response = use_case(APP_GRAPH)
                .execute(request().with_jobs(jobs).with_share_cache(share_cache))
                .await
                .unwrap();
            assert_eq!(response, baseline);
        }
    }
}

#[tokio::test]
async fn test_check_only_skips_resolution() {
    let reporter = RecordingProgressReporter::default();
    let use_case = ResolveReferencesUseCase::new(MockGraphReader::new(APP_GRAPH), &reporter);

    let response = use_case
        .execute(request().with_check_only(true))
        .await
        .unwrap();

    assert!(response.targets.is_empty());
    assert!(reporter.progress.borrow().is_empty());
    assert_eq!(reporter.completions.borrow().len(), 1);
}

#[tokio::test]
async fn test_progress_reported_per_target() {
    let reporter = RecordingProgressReporter::default();
    let use_case = ResolveReferencesUseCase::new(MockGraphReader::new(APP_GRAPH), &reporter);

    use_case.execute(request().with_jobs(2)).await.unwrap();

    let progress = reporter.progress.borrow();
    assert_eq!(*progress, vec![(1, 4), (2, 4), (3, 4), (4, 4)]);
}

#[tokio::test]
async fn test_cycle_is_a_graph_error() {
    let error = use_case(CYCLIC_GRAPH).execute(request()).await.unwrap_err();

    assert_eq!(ExitCode::for_error(&error), ExitCode::GraphError);
    let graph_error = error.downcast_ref::<GraphError>().unwrap();
    match graph_error {
        GraphError::Cycle { path } => {
            let ids: Vec<&str> = path.iter().map(|id| id.as_str()).collect();
            assert_eq!(ids, vec!["A", "B", "A"]);
        }
        other => panic!("expected cycle, got {:?}", other),
    }
}

#[tokio::test]
async fn test_check_only_still_reports_cycles() {
    let result = use_case(CYCLIC_GRAPH)
        .execute(request().with_check_only(true))
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_unknown_target_is_missing_node() {
    let error = use_case(APP_GRAPH)
        .execute(request().with_targets(vec![NodeId::new("Ghost")]))
        .await
        .unwrap_err();

    assert_eq!(
        error.downcast_ref::<GraphError>(),
        Some(&GraphError::MissingNode {
            id: NodeId::new("Ghost")
        })
    );
}

#[tokio::test]
async fn test_artifact_target_is_invalid_input() {
    let error = use_case(APP_GRAPH)
        .execute(request().with_targets(vec![NodeId::new("libZ")]))
        .await
        .unwrap_err();

    assert!(matches!(
        error.downcast_ref::<GraphError>(),
        Some(GraphError::InvalidInput { .. })
    ));
}

#[tokio::test]
async fn test_depth_limit_fails_the_batch() {
    let error = use_case(APP_GRAPH)
        .execute(request().with_max_depth(Some(0)))
        .await
        .unwrap_err();

    assert_eq!(ExitCode::for_error(&error), ExitCode::GraphError);
    assert!(error.to_string().contains("Failed to resolve target"));
}

#[tokio::test]
async fn test_deep_chain_resolves_by_default() {
    let mut nodes = Vec::new();
    let mut edges = Vec::new();
    for i in 0..600 {
        nodes.push(format!(r#"{{ "id": "T{i}", "kind": "target", "name": "T{i}" }}"#));
        if i > 0 {
            edges.push(format!(r#"{{ "from": "T{}", "to": "T{i}" }}"#, i - 1));
        }
    }
    nodes.push(r#"{ "id": "libZ", "kind": "library", "path": "/libs/libZ.a" }"#.to_string());
    edges.push(r#"{ "from": "T599", "to": "libZ" }"#.to_string());
    let graph = format!(
        r#"{{ "nodes": [{}], "edges": [{}] }}"#,
        nodes.join(","),
        edges.join(",")
    );

    let response = use_case(&graph)
        .execute(request().with_targets(vec![NodeId::new("T0")]))
        .await
        .unwrap();

    assert_eq!(
        response.references_of(&NodeId::new("T0")).unwrap()[0].to_string(),
        "library(/libs/libZ.a)"
    );
}

#[tokio::test]
async fn test_reader_error_is_propagated() {
    let error = use_case("{ not json").execute(request()).await.unwrap_err();
    assert_eq!(ExitCode::for_error(&error), ExitCode::ApplicationError);
}

#[tokio::test]
async fn test_port_delegates_to_execute() {
    let port: &dyn ReferenceResolutionPort = &use_case(APP_GRAPH);
    let response = port.resolve_references(request()).await.unwrap();
    assert_eq!(response.target_count(), 4);
}
