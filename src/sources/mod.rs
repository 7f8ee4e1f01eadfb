//! Data sources — the external collaborators the editors are seeded from.
//!
//! DESIGN
//! ======
//! The mind map and flight search read from services that do not exist yet.
//! Each collaborator is an `async_trait` trait with two implementations: a
//! mock backed by bundled JSON fixtures with simulated latency, and an HTTP
//! client for a real backend. `AppConfig` picks one per collaborator: a
//! configured base URL selects HTTP, otherwise the mock is used.

pub mod http;
pub mod mock;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::ErrorCode;
use crate::services::flights::Flight;
use crate::services::mindmap::{Graph, NodeCreated};

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("upstream request failed: {0}")]
    Request(String),
    #[error("upstream returned status {status}")]
    Status { status: u16, body: String },
    #[error("upstream payload invalid: {0}")]
    Parse(String),
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ErrorCode for SourceError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Request(_) => "E_UPSTREAM_REQUEST",
            Self::Status { .. } => "E_UPSTREAM_STATUS",
            Self::Parse(_) => "E_UPSTREAM_PARSE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Request(_) | Self::Status { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// TRAITS
// =============================================================================

/// Where the mind map comes from.
#[async_trait::async_trait]
pub trait GraphSource: Send + Sync {
    /// Fetch the whole graph.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] if the upstream is unreachable or returns
    /// something that is not a graph.
    async fn fetch_graph(&self) -> Result<Graph, SourceError>;

    /// Create a question node under `parent_id`. The returned node has no
    /// meaningful position.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] if the upstream call fails.
    async fn add_node(&self, parent_id: &str, question: &str, answer: &str) -> Result<NodeCreated, SourceError>;
}

/// Where flight records come from.
#[async_trait::async_trait]
pub trait FlightSource: Send + Sync {
    /// Every known flight.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] if the upstream call fails.
    async fn all_flights(&self) -> Result<Vec<Flight>, SourceError>;

    /// Flights whose number contains `needle`, which is already trimmed and
    /// lowercased.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] if the upstream call fails.
    async fn search(&self, needle: &str) -> Result<Vec<Flight>, SourceError>;
}

// =============================================================================
// SELECTION
// =============================================================================

/// Build the graph source described by `config`.
///
/// # Errors
///
/// Returns [`SourceError::HttpClientBuild`] if the HTTP client cannot be built.
pub fn graph_source(config: &AppConfig) -> Result<Arc<dyn GraphSource>, SourceError> {
    Ok(match &config.mindmap_api_url {
        Some(url) => {
            tracing::info!(%url, "mind map source: http");
            Arc::new(http::HttpGraphSource::new(url.clone(), config.upstream_timeout)?)
        }
        None => {
            tracing::info!("mind map source: mock");
            Arc::new(mock::MockGraphSource::new(config.mock_delays.graph_fetch, config.mock_delays.add_node))
        }
    })
}

/// Build the flight source described by `config`.
///
/// # Errors
///
/// Returns [`SourceError::HttpClientBuild`] if the HTTP client cannot be built.
pub fn flight_source(config: &AppConfig) -> Result<Arc<dyn FlightSource>, SourceError> {
    Ok(match &config.flight_api_url {
        Some(url) => {
            tracing::info!(%url, "flight source: http");
            let source = http::HttpFlightSource::new(url.clone(), config.upstream_timeout)?
                .with_token(config.flight_api_token.clone());
            Arc::new(source)
        }
        None => {
            tracing::info!("flight source: mock");
            Arc::new(mock::MockFlightSource::new(config.mock_delays.flight_search))
        }
    })
}
