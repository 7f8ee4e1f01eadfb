use super::*;
use crate::sources::SourceError;
use crate::state::test_helpers;

#[test]
fn graph_error_to_status_maps_each_class() {
    assert_eq!(graph_error_to_status(&GraphError::NotReady), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(graph_error_to_status(&GraphError::ParentNotFound("x".into())), StatusCode::NOT_FOUND);
    assert_eq!(graph_error_to_status(&GraphError::EmptyQuestion), StatusCode::BAD_REQUEST);
    assert_eq!(
        graph_error_to_status(&GraphError::Source(SourceError::Request("down".into()))),
        StatusCode::BAD_GATEWAY
    );
}

#[tokio::test]
async fn get_mindmap_is_unavailable_while_loading() {
    let state = test_helpers::test_app_state();
    let err = get_mindmap(State(state)).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(err.code(), "E_NOT_READY");
}

#[tokio::test]
async fn get_mindmap_returns_flat_graph_shape() {
    let state = test_helpers::ready_app_state().await;
    let Json(body) = get_mindmap(State(state)).await.unwrap();
    let json = serde_json::to_value(&body).unwrap();
    assert_eq!(json["status"], "ready");
    assert_eq!(json["nodes"].as_array().unwrap().len(), 8);
    assert_eq!(json["edges"].as_array().unwrap().len(), 7);
    assert_eq!(json["expanded"], serde_json::json!([]));
}

#[tokio::test]
async fn add_node_creates_child() {
    let state = test_helpers::ready_app_state().await;
    let body = AddNodeBody { parent_id: "root".into(), question: "What is Redux?".into(), answer: String::new() };
    let (status, Json(created)) = add_node(State(state.clone()), Json(body)).await.unwrap();

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created.edge.source, "root");
    assert_eq!(created.edge.target, created.node.id);
    assert_eq!(state.mindmap.read().await.graph().unwrap().nodes.len(), 9);
}

#[tokio::test]
async fn add_node_rejects_blank_question_and_unknown_parent() {
    let state = test_helpers::ready_app_state().await;

    let blank = AddNodeBody { parent_id: "root".into(), question: " ".into(), answer: String::new() };
    let err = add_node(State(state.clone()), Json(blank)).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);

    let orphan = AddNodeBody { parent_id: "ghost".into(), question: "Q".into(), answer: String::new() };
    let err = add_node(State(state.clone()), Json(orphan)).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
    assert_eq!(state.mindmap.read().await.graph().unwrap().nodes.len(), 8);
}

#[tokio::test]
async fn connect_and_toggle_round_trip() {
    let state = test_helpers::ready_app_state().await;
    let body = ConnectBody { source: "node-7".into(), target: "root".into() };
    let (status, Json(edge)) = connect(State(state.clone()), Json(body)).await.unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(edge.source, "node-7");

    let Json(toggled) = toggle_expand(State(state.clone()), Path("node-2".into())).await.unwrap();
    assert!(toggled.expanded);
    let Json(view) = get_mindmap(State(state.clone())).await.unwrap();
    assert_eq!(view.expanded, vec!["node-2".to_owned()]);

    let err = toggle_expand(State(state), Path("nope".into())).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
}
