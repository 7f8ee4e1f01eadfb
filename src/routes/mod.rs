//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the JSON API for the mind map, the kanban board, the
//! calculators, and flight search under a single Axum router. The SPA is
//! served separately and talks to these routes cross-origin, so CORS is
//! permissive.

pub mod flights;
pub mod kanban;
pub mod mindmap;
pub mod tools;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{delete, get, patch, post};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// All API routes with shared state and middleware attached.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/mindmap", get(mindmap::get_mindmap))
        .route("/api/mindmap/nodes", post(mindmap::add_node))
        .route("/api/mindmap/edges", post(mindmap::connect))
        .route("/api/mindmap/nodes/{id}/toggle", post(mindmap::toggle_expand))
        .route("/api/kanban", get(kanban::get_board))
        .route("/api/kanban/columns/{id}/cards", post(kanban::add_card))
        .route("/api/kanban/columns/{id}/cards/{card_id}", delete(kanban::delete_card))
        .route("/api/kanban/cards/{id}/move", post(kanban::move_card))
        .route("/api/kanban/cards/{id}/drop", post(kanban::drop_card))
        .route(
            "/api/kanban/editor",
            get(kanban::get_editor)
                .post(kanban::open_editor)
                .delete(kanban::discard_editor),
        )
        .route("/api/kanban/editor/columns", post(kanban::add_column))
        .route(
            "/api/kanban/editor/columns/{id}",
            patch(kanban::rename_column).delete(kanban::delete_column),
        )
        .route("/api/kanban/editor/commit", post(kanban::commit_editor))
        .route("/api/tools/bmi", post(tools::bmi))
        .route("/api/tools/heart-rate", post(tools::heart_rate))
        .route("/api/tools/coin", get(tools::get_coin).delete(tools::reset_coin))
        .route("/api/tools/coin/flip", post(tools::flip_coin))
        .route("/api/flights", get(flights::list_flights))
        .route("/api/flights/search", get(flights::search_flights))
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
