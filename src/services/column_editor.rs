//! Column editor — scratch-buffer transaction over the board's columns.
//!
//! DESIGN
//! ======
//! Opening a session clones the board's `Arc<Vec<Column>>`. Nothing is
//! copied until the first scratch edit, when `Arc::make_mut` detaches the
//! buffer from the canonical columns. Commit is a single swap back into the
//! board. The board generation recorded at open time guards that swap: if
//! any card or column mutation landed in between, the session is stale and
//! commit refuses to overwrite it.
//!
//! `EditorSession` is the `closed -> editing -> closed` state machine that
//! `AppState` holds next to the board.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::ErrorCode;
use crate::services::kanban::{Board, Column, ColumnId};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ColumnEditorError {
    #[error("column editor is already open")]
    EditorAlreadyOpen,
    #[error("column editor is not open")]
    EditorClosed,
    #[error("column not found: {0}")]
    ColumnNotFound(ColumnId),
    #[error("column title must not be empty")]
    EmptyTitle,
    #[error("cannot delete the last column")]
    LastColumn,
    #[error("board changed since the editor opened (generation {opened_at} -> {current})")]
    StaleSnapshot { opened_at: u64, current: u64 },
}

impl ErrorCode for ColumnEditorError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::EditorAlreadyOpen => "E_EDITOR_ALREADY_OPEN",
            Self::EditorClosed => "E_EDITOR_CLOSED",
            Self::ColumnNotFound(_) => "E_COLUMN_NOT_FOUND",
            Self::EmptyTitle => "E_EMPTY_TITLE",
            Self::LastColumn => "E_LAST_COLUMN",
            Self::StaleSnapshot { .. } => "E_STALE_SNAPSHOT",
        }
    }
}

/// Outcome of a successful commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitSummary {
    pub columns: usize,
    /// Cards that lived in columns deleted during the session.
    pub dropped_cards: usize,
}

// =============================================================================
// EDITOR
// =============================================================================

#[derive(Debug, Clone)]
pub struct ColumnEditor {
    base_generation: u64,
    scratch: Arc<Vec<Column>>,
}

impl ColumnEditor {
    #[must_use]
    pub fn open(board: &Board) -> Self {
        Self { base_generation: board.generation(), scratch: board.snapshot() }
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.scratch
    }

    /// Board generation this session was opened against.
    #[must_use]
    pub fn base_generation(&self) -> u64 {
        self.base_generation
    }

    fn column_mut(&mut self, id: &str) -> Result<&mut Column, ColumnEditorError> {
        Arc::make_mut(&mut self.scratch)
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| ColumnEditorError::ColumnNotFound(id.to_owned()))
    }

    /// # Errors
    ///
    /// Returns [`ColumnEditorError::EmptyTitle`] or
    /// [`ColumnEditorError::ColumnNotFound`].
    pub fn rename_column(&mut self, id: &str, title: &str) -> Result<(), ColumnEditorError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ColumnEditorError::EmptyTitle);
        }
        if !self.scratch.iter().any(|c| c.id == id) {
            return Err(ColumnEditorError::ColumnNotFound(id.to_owned()));
        }
        self.column_mut(id)?.title = title.to_owned();
        Ok(())
    }

    /// Append an empty column and return it.
    ///
    /// # Errors
    ///
    /// Returns [`ColumnEditorError::EmptyTitle`] for a blank title.
    pub fn add_column(&mut self, title: &str) -> Result<Column, ColumnEditorError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ColumnEditorError::EmptyTitle);
        }
        let column = Column::new(format!("column-{}", Uuid::new_v4()), title);
        Arc::make_mut(&mut self.scratch).push(column.clone());
        Ok(column)
    }

    /// # Errors
    ///
    /// Returns [`ColumnEditorError::LastColumn`] when only one column is
    /// left, or [`ColumnEditorError::ColumnNotFound`].
    pub fn delete_column(&mut self, id: &str) -> Result<Column, ColumnEditorError> {
        let Some(idx) = self.scratch.iter().position(|c| c.id == id) else {
            return Err(ColumnEditorError::ColumnNotFound(id.to_owned()));
        };
        if self.scratch.len() == 1 {
            return Err(ColumnEditorError::LastColumn);
        }
        Ok(Arc::make_mut(&mut self.scratch).remove(idx))
    }

    /// Swap the scratch columns into `board`.
    ///
    /// # Errors
    ///
    /// Returns [`ColumnEditorError::StaleSnapshot`] if `board` was mutated
    /// after this session opened. The board is untouched in that case.
    pub fn commit(self, board: &mut Board) -> Result<CommitSummary, ColumnEditorError> {
        let current = board.generation();
        if current != self.base_generation {
            return Err(ColumnEditorError::StaleSnapshot { opened_at: self.base_generation, current });
        }

        let kept: usize = self.scratch.iter().map(|c| c.cards.len()).sum();
        let summary = CommitSummary { columns: self.scratch.len(), dropped_cards: board.card_count() - kept };
        board.replace_columns(self.scratch);
        Ok(summary)
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// At most one open `ColumnEditor`.
#[derive(Debug, Default)]
pub struct EditorSession {
    editor: Option<ColumnEditor>,
}

impl EditorSession {
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.editor.is_some()
    }

    /// # Errors
    ///
    /// Returns [`ColumnEditorError::EditorAlreadyOpen`] if a session exists.
    pub fn open(&mut self, board: &Board) -> Result<&ColumnEditor, ColumnEditorError> {
        if self.editor.is_some() {
            return Err(ColumnEditorError::EditorAlreadyOpen);
        }
        debug!(generation = board.generation(), "column editor opened");
        Ok(self.editor.insert(ColumnEditor::open(board)))
    }

    /// # Errors
    ///
    /// Returns [`ColumnEditorError::EditorClosed`] when no session is open.
    pub fn editor(&self) -> Result<&ColumnEditor, ColumnEditorError> {
        self.editor.as_ref().ok_or(ColumnEditorError::EditorClosed)
    }

    /// # Errors
    ///
    /// Returns [`ColumnEditorError::EditorClosed`] when no session is open.
    pub fn editor_mut(&mut self) -> Result<&mut ColumnEditor, ColumnEditorError> {
        self.editor.as_mut().ok_or(ColumnEditorError::EditorClosed)
    }

    /// Commit and close. The session is closed whether or not the commit
    /// succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`ColumnEditorError::EditorClosed`] or
    /// [`ColumnEditorError::StaleSnapshot`].
    pub fn commit(&mut self, board: &mut Board) -> Result<CommitSummary, ColumnEditorError> {
        let editor = self.editor.take().ok_or(ColumnEditorError::EditorClosed)?;
        match editor.commit(board) {
            Ok(summary) => {
                info!(columns = summary.columns, dropped_cards = summary.dropped_cards, "columns committed");
                Ok(summary)
            }
            Err(e) => {
                warn!(error = %e, "column editor commit rejected");
                Err(e)
            }
        }
    }

    /// Drop the scratch buffer.
    ///
    /// # Errors
    ///
    /// Returns [`ColumnEditorError::EditorClosed`] when no session is open.
    pub fn discard(&mut self) -> Result<(), ColumnEditorError> {
        self.editor.take().ok_or(ColumnEditorError::EditorClosed)?;
        debug!("column editor discarded");
        Ok(())
    }
}

#[cfg(test)]
#[path = "column_editor_test.rs"]
mod tests;
