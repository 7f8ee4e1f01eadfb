//! Calculator and coin-flip routes.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::services::tools::{self, BmiInput, BmiReport, CoinSession, FlipBatch, HeartRateInput, HeartRateReport, ToolError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FlipBody {
    pub count: u32,
}

#[derive(Debug, Serialize)]
pub struct FlipResponse {
    pub batch: FlipBatch,
    pub session: CoinSummary,
}

/// Totals without the full series.
#[derive(Debug, Serialize)]
pub struct CoinSummary {
    pub heads: u64,
    pub tails: u64,
    pub total: u64,
    pub heads_ratio: Option<f64>,
}

impl From<&CoinSession> for CoinSummary {
    fn from(session: &CoinSession) -> Self {
        Self { heads: session.heads, tails: session.tails, total: session.total(), heads_ratio: session.heads_ratio() }
    }
}

fn tool_error(err: &ToolError) -> ApiError {
    ApiError::new(StatusCode::BAD_REQUEST, err)
}

/// `POST /api/tools/bmi`
pub async fn bmi(Json(input): Json<BmiInput>) -> Result<Json<BmiReport>, ApiError> {
    tools::bmi(&input).map(Json).map_err(|e| tool_error(&e))
}

/// `POST /api/tools/heart-rate`
pub async fn heart_rate(Json(input): Json<HeartRateInput>) -> Result<Json<HeartRateReport>, ApiError> {
    tools::heart_rate_zones(&input).map(Json).map_err(|e| tool_error(&e))
}

/// `GET /api/tools/coin` — the running session, series included.
pub async fn get_coin(State(state): State<AppState>) -> Json<CoinSession> {
    Json(state.coin.read().await.clone())
}

/// `POST /api/tools/coin/flip`
pub async fn flip_coin(
    State(state): State<AppState>,
    Json(body): Json<FlipBody>,
) -> Result<Json<FlipResponse>, ApiError> {
    let mut session = state.coin.write().await;
    let batch = session
        .flip(body.count, &mut rand::rng())
        .map_err(|e| tool_error(&e))?;
    Ok(Json(FlipResponse { batch, session: CoinSummary::from(&*session) }))
}

/// `DELETE /api/tools/coin`
pub async fn reset_coin(State(state): State<AppState>) -> StatusCode {
    state.coin.write().await.reset();
    StatusCode::NO_CONTENT
}

#[cfg(test)]
#[path = "tools_test.rs"]
mod tests;
