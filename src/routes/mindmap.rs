//! Mind-map routes — graph read, node creation, manual edges, view state.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::services::mindmap::{self, Edge, Graph, GraphError, LoadStatus, Node, NodeId};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct MindMapResponse {
    pub status: LoadStatus,
    #[serde(flatten)]
    pub graph: Graph,
    /// Ids of expanded nodes, in graph order.
    pub expanded: Vec<NodeId>,
}

#[derive(Debug, Deserialize)]
pub struct AddNodeBody {
    pub parent_id: NodeId,
    pub question: String,
    #[serde(default)]
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct AddNodeResponse {
    pub node: Node,
    pub edge: Edge,
}

#[derive(Debug, Deserialize)]
pub struct ConnectBody {
    pub source: NodeId,
    pub target: NodeId,
}

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub id: NodeId,
    pub expanded: bool,
}

pub(crate) fn graph_error_to_status(err: &GraphError) -> StatusCode {
    match err {
        GraphError::NotReady => StatusCode::SERVICE_UNAVAILABLE,
        GraphError::ParentNotFound(_) | GraphError::NodeNotFound(_) => StatusCode::NOT_FOUND,
        GraphError::EmptyQuestion => StatusCode::BAD_REQUEST,
        GraphError::LoadFailed(_)
        | GraphError::DuplicateNode(_)
        | GraphError::MismatchedEdge { .. }
        | GraphError::Source(_) => StatusCode::BAD_GATEWAY,
    }
}

fn api_error(err: &GraphError) -> ApiError {
    ApiError::new(graph_error_to_status(err), err)
}

/// `GET /api/mindmap` — the whole graph plus expanded flags.
pub async fn get_mindmap(State(state): State<AppState>) -> Result<Json<MindMapResponse>, ApiError> {
    let editor = state.mindmap.read().await;
    let graph = editor.graph().map_err(|e| api_error(&e))?.clone();
    Ok(Json(MindMapResponse { status: editor.status(), graph, expanded: editor.expanded_ids() }))
}

/// `POST /api/mindmap/nodes` — ask a question under an existing node.
pub async fn add_node(
    State(state): State<AppState>,
    Json(body): Json<AddNodeBody>,
) -> Result<(StatusCode, Json<AddNodeResponse>), ApiError> {
    let (node, edge) = mindmap::add_child_node(&state, &body.parent_id, &body.question, &body.answer)
        .await
        .map_err(|e| api_error(&e))?;
    Ok((StatusCode::CREATED, Json(AddNodeResponse { node, edge })))
}

/// `POST /api/mindmap/edges` — connect two existing nodes.
pub async fn connect(
    State(state): State<AppState>,
    Json(body): Json<ConnectBody>,
) -> Result<(StatusCode, Json<Edge>), ApiError> {
    let mut editor = state.mindmap.write().await;
    let edge = editor
        .connect(&body.source, &body.target)
        .map_err(|e| api_error(&e))?;
    Ok((StatusCode::CREATED, Json(edge)))
}

/// `POST /api/mindmap/nodes/:id/toggle` — flip a node's expanded flag.
pub async fn toggle_expand(
    State(state): State<AppState>,
    Path(id): Path<NodeId>,
) -> Result<Json<ToggleResponse>, ApiError> {
    let mut editor = state.mindmap.write().await;
    let expanded = editor.toggle_expand(&id).map_err(|e| api_error(&e))?;
    Ok(Json(ToggleResponse { id, expanded }))
}

#[cfg(test)]
#[path = "mindmap_test.rs"]
mod tests;
