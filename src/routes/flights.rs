//! Flight routes.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use serde::Deserialize;

use crate::error::ApiError;
use crate::services::flights::{self, Flight, FlightError};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

pub(crate) fn flight_error_to_status(err: &FlightError) -> StatusCode {
    match err {
        FlightError::EmptyQuery => StatusCode::BAD_REQUEST,
        FlightError::Source(_) => StatusCode::BAD_GATEWAY,
    }
}

fn api_error(err: &FlightError) -> ApiError {
    ApiError::new(flight_error_to_status(err), err)
}

/// `GET /api/flights`
pub async fn list_flights(State(state): State<AppState>) -> Result<Json<Vec<Flight>>, ApiError> {
    flights::list_all(state.flight_source.as_ref())
        .await
        .map(Json)
        .map_err(|e| api_error(&e))
}

/// `GET /api/flights/search?q=`
pub async fn search_flights(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Flight>>, ApiError> {
    flights::search(state.flight_source.as_ref(), &query.q)
        .await
        .map(Json)
        .map_err(|e| api_error(&e))
}

#[cfg(test)]
#[path = "flights_test.rs"]
mod tests;
