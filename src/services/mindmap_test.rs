use std::sync::Arc;
use std::time::Duration;

use super::*;
use crate::sources::GraphSource;
use crate::sources::mock::MockGraphSource;
use crate::state::test_helpers;

fn node(id: &str, x: f64, y: f64) -> Node {
    Node { id: id.into(), question: format!("{id}?"), answer: String::new(), is_root: id == "root", position: Position { x, y } }
}

fn edge(source: &str, target: &str) -> Edge {
    Edge { id: format!("e-{source}-{target}"), source: source.into(), target: target.into() }
}

/// root -> a, root -> b
fn small_graph() -> Graph {
    Graph {
        nodes: vec![node("root", 250.0, 50.0), node("a", 100.0, 200.0), node("b", 400.0, 200.0)],
        edges: vec![edge("root", "a"), edge("root", "b")],
    }
}

fn created(parent: &str, id: &str) -> NodeCreated {
    NodeCreated { node: node(id, 0.0, 0.0), edge: edge(parent, id) }
}

struct FailingGraphSource;

#[async_trait::async_trait]
impl GraphSource for FailingGraphSource {
    async fn fetch_graph(&self) -> Result<Graph, SourceError> {
        Err(SourceError::Request("connection refused".into()))
    }

    async fn add_node(&self, _parent: &str, _q: &str, _a: &str) -> Result<NodeCreated, SourceError> {
        Err(SourceError::Status { status: 500, body: "boom".into() })
    }
}

// =============================================================================
// LAYOUT
// =============================================================================

#[test]
fn first_child_sits_directly_below_parent() {
    let p = layout_child(Position { x: 50.0, y: 350.0 }, 0);
    assert_eq!(p, Position { x: 50.0, y: 530.0 });
}

#[test]
fn later_children_fan_out_to_the_right() {
    let parent = Position { x: 250.0, y: 50.0 };
    assert_eq!(layout_child(parent, 1), Position { x: 325.0, y: 230.0 });
    assert_eq!(layout_child(parent, 2), Position { x: 475.0, y: 230.0 });
}

// =============================================================================
// EDITOR
// =============================================================================

#[test]
fn editor_starts_loading_and_rejects_edits() {
    let mut editor = GraphEditor::new();
    assert_eq!(editor.status(), LoadStatus::Loading);
    assert!(matches!(editor.graph(), Err(GraphError::NotReady)));
    assert!(matches!(editor.add_child("root", created("root", "x")), Err(GraphError::NotReady)));
    assert!(editor.expanded_ids().is_empty());
    assert!(GraphError::NotReady.retryable());
}

#[test]
fn failed_load_is_reported() {
    let mut editor = GraphEditor::new();
    editor.finish_load(Err(SourceError::Request("refused".into())));
    assert_eq!(editor.status(), LoadStatus::Failed);
    let err = editor.graph().unwrap_err();
    assert!(matches!(err, GraphError::LoadFailed(_)));
    assert_eq!(err.error_code(), "E_LOAD_FAILED");
}

#[test]
fn add_child_grows_graph_by_one_node_and_one_edge() {
    let mut editor = GraphEditor::ready(small_graph());
    let (n, e) = editor.add_child("root", created("root", "c")).unwrap();

    let graph = editor.graph().unwrap();
    assert_eq!(graph.nodes.len(), 4);
    assert_eq!(graph.edges.len(), 3);
    assert_eq!(e.source, "root");
    assert_eq!(e.target, n.id);
    assert!(!n.is_root);
    assert_eq!(n.position, Position { x: 475.0, y: 230.0 });
    assert_eq!(graph.node("c"), Some(&n));
}

#[test]
fn add_child_under_missing_parent_changes_nothing() {
    let mut editor = GraphEditor::ready(small_graph());
    let err = editor.add_child("ghost", created("ghost", "c")).unwrap_err();
    assert!(matches!(err, GraphError::ParentNotFound(ref id) if id == "ghost"));
    assert_eq!(editor.graph().unwrap(), &small_graph());
}

#[test]
fn add_child_rejects_duplicate_ids_and_mismatched_edges() {
    let mut editor = GraphEditor::ready(small_graph());
    assert!(matches!(editor.add_child("root", created("root", "a")), Err(GraphError::DuplicateNode(_))));
    assert!(matches!(editor.add_child("root", created("b", "c")), Err(GraphError::MismatchedEdge { .. })));
    assert_eq!(editor.graph().unwrap(), &small_graph());
}

#[test]
fn check_child_validates_question_and_parent() {
    let editor = GraphEditor::ready(small_graph());
    assert!(editor.check_child("a", "Why?").is_ok());
    assert!(matches!(editor.check_child("a", "  "), Err(GraphError::EmptyQuestion)));
    assert!(matches!(editor.check_child("zzz", "Why?"), Err(GraphError::ParentNotFound(_))));
}

#[test]
fn connect_links_existing_nodes_and_allows_cycles() {
    let mut editor = GraphEditor::ready(small_graph());
    let e1 = editor.connect("a", "b").unwrap();
    let e2 = editor.connect("b", "root").unwrap();
    assert!(e1.id.starts_with("edge-"));
    assert_ne!(e1.id, e2.id);
    assert_eq!(editor.graph().unwrap().edges.len(), 4);

    assert!(matches!(editor.connect("a", "nope"), Err(GraphError::NodeNotFound(ref id)) if id == "nope"));
    assert_eq!(editor.graph().unwrap().edges.len(), 4);
}

#[test]
fn toggle_expand_flips_view_state_only() {
    let mut editor = GraphEditor::ready(small_graph());
    assert!(!editor.is_expanded("a"));
    assert!(editor.toggle_expand("a").unwrap());
    assert!(editor.is_expanded("a"));
    assert!(!editor.toggle_expand("a").unwrap());
    assert!(!editor.is_expanded("a"));

    assert!(matches!(editor.toggle_expand("nope"), Err(GraphError::NodeNotFound(_))));
    assert_eq!(editor.graph().unwrap(), &small_graph());
}

#[test]
fn reload_keeps_expanded_flags_of_surviving_nodes() {
    let mut editor = GraphEditor::ready(small_graph());
    editor.toggle_expand("a").unwrap();
    editor.toggle_expand("b").unwrap();

    let mut next = small_graph();
    next.nodes.retain(|n| n.id != "b");
    next.edges.retain(|e| e.target != "b");
    editor.finish_load(Ok(next));

    assert_eq!(editor.expanded_ids(), vec!["a".to_owned()]);
    assert!(!editor.is_expanded("b"));
}

// =============================================================================
// SERVICE
// =============================================================================

#[tokio::test]
async fn load_graph_installs_fixture() {
    let state = test_helpers::test_app_state();
    assert_eq!(state.mindmap.read().await.status(), LoadStatus::Loading);

    assert_eq!(load_graph(&state).await, LoadStatus::Ready);
    let editor = state.mindmap.read().await;
    assert_eq!(editor.graph().unwrap().nodes.len(), 8);
}

#[tokio::test]
async fn spawned_load_finishes() {
    let state = test_helpers::test_app_state();
    spawn_graph_load(state.clone()).await.unwrap();
    assert_eq!(state.mindmap.read().await.status(), LoadStatus::Ready);
}

#[tokio::test]
async fn add_child_node_appends_under_parent() {
    let state = test_helpers::ready_app_state().await;
    let (n, e) = add_child_node(&state, "node-3", "  What are default props? ", "Fallbacks.").await.unwrap();

    assert_eq!(n.question, "What are default props?");
    assert_eq!(e.source, "node-3");
    assert_eq!(n.position, Position { x: 50.0, y: 530.0 });

    let editor = state.mindmap.read().await;
    let graph = editor.graph().unwrap();
    assert_eq!(graph.nodes.len(), 9);
    assert_eq!(graph.edges.len(), 8);
}

#[tokio::test]
async fn add_child_node_before_load_is_not_ready() {
    let state = test_helpers::test_app_state();
    let err = add_child_node(&state, "root", "Q", "A").await.unwrap_err();
    assert!(matches!(err, GraphError::NotReady));
}

#[tokio::test]
async fn add_child_node_source_failure_leaves_graph_untouched() {
    let state = test_helpers::test_app_state_with_graph_source(Arc::new(FailingGraphSource));
    state.mindmap.write().await.finish_load(Ok(small_graph()));

    let err = add_child_node(&state, "root", "Q", "A").await.unwrap_err();
    assert_eq!(err.error_code(), "E_UPSTREAM_STATUS");
    assert!(err.retryable());
    assert_eq!(state.mindmap.read().await.graph().unwrap(), &small_graph());
}

#[tokio::test]
async fn failed_startup_load_is_surfaced() {
    let state = test_helpers::test_app_state_with_graph_source(Arc::new(FailingGraphSource));
    assert_eq!(load_graph(&state).await, LoadStatus::Failed);
}

#[tokio::test]
async fn slow_source_leaves_editor_loading_until_done() {
    let source = Arc::new(MockGraphSource::new(Duration::from_millis(50), Duration::ZERO));
    let state = test_helpers::test_app_state_with_graph_source(source);
    let handle = spawn_graph_load(state.clone());
    assert_eq!(state.mindmap.read().await.status(), LoadStatus::Loading);
    handle.await.unwrap();
    assert_eq!(state.mindmap.read().await.status(), LoadStatus::Ready);
}
