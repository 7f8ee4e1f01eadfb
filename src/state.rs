//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! Each editor sits behind its own `RwLock`; a request holds the write lock
//! for the whole mutation, so mutations on one editor are serialized. The
//! kanban board and its column-editor session share one lock because commit
//! must see both at once.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::AppConfig;
use crate::services::column_editor::EditorSession;
use crate::services::kanban::Board;
use crate::services::mindmap::GraphEditor;
use crate::services::tools::CoinSession;
use crate::sources::{self, FlightSource, GraphSource, SourceError};

// =============================================================================
// KANBAN STATE
// =============================================================================

/// The canonical board plus the (at most one) open column-editor session.
#[derive(Debug, Default)]
pub struct KanbanState {
    pub board: Board,
    pub editor: EditorSession,
}

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; every field is Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub mindmap: Arc<RwLock<GraphEditor>>,
    pub graph_source: Arc<dyn GraphSource>,
    pub kanban: Arc<RwLock<KanbanState>>,
    pub coin: Arc<RwLock<CoinSession>>,
    pub flight_source: Arc<dyn FlightSource>,
}

impl AppState {
    #[must_use]
    pub fn new(graph_source: Arc<dyn GraphSource>, flight_source: Arc<dyn FlightSource>) -> Self {
        Self {
            mindmap: Arc::new(RwLock::new(GraphEditor::new())),
            graph_source,
            kanban: Arc::new(RwLock::new(KanbanState::default())),
            coin: Arc::new(RwLock::new(CoinSession::default())),
            flight_source,
        }
    }

    /// Build state with the sources `config` selects.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::HttpClientBuild`] if an HTTP source cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, SourceError> {
        Ok(Self::new(sources::graph_source(config)?, sources::flight_source(config)?))
    }
}


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
