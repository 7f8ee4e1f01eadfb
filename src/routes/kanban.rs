//! Kanban routes — board reads, card edits, and the column-editor session.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::services::column_editor::{ColumnEditor, ColumnEditorError, CommitSummary};
use crate::services::kanban::{BoardError, Card, CardDraft, CardFilter, CardMove, Column, ColumnId};
use crate::state::AppState;

// =============================================================================
// BODIES
// =============================================================================

/// `?tags=a,b&colors=red,blue`
#[derive(Debug, Default, Deserialize)]
pub struct BoardQuery {
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub colors: String,
}

#[derive(Debug, Serialize)]
pub struct ColumnView {
    pub id: ColumnId,
    pub title: String,
    /// Cards passing the filter, in board order.
    pub cards: Vec<Card>,
    /// Cards in the column before filtering.
    pub total_cards: usize,
}

#[derive(Debug, Serialize)]
pub struct BoardView {
    pub columns: Vec<ColumnView>,
    pub all_tags: Vec<String>,
    pub generation: u64,
    pub editor_open: bool,
}

#[derive(Debug, Deserialize)]
pub struct MoveBody {
    pub to_column: ColumnId,
    #[serde(default)]
    pub index: Option<usize>,
}

/// `over` is a column id or a card id; absent when released outside the board.
#[derive(Debug, Deserialize)]
pub struct DropBody {
    #[serde(default)]
    pub over: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ColumnTitleBody {
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct EditorView {
    pub base_generation: u64,
    pub columns: Vec<Column>,
}

impl From<&ColumnEditor> for EditorView {
    fn from(editor: &ColumnEditor) -> Self {
        Self { base_generation: editor.base_generation(), columns: editor.columns().to_vec() }
    }
}

// =============================================================================
// ERRORS
// =============================================================================

pub(crate) fn board_error_to_status(err: &BoardError) -> StatusCode {
    match err {
        BoardError::EmptyTitle | BoardError::DueDateInPast(_) | BoardError::UnknownColor(_) => {
            StatusCode::BAD_REQUEST
        }
        BoardError::ColumnNotFound(_)
        | BoardError::CardNotFound(_)
        | BoardError::DropTargetNotFound(_)
        | BoardError::NoDropTarget => StatusCode::NOT_FOUND,
    }
}

pub(crate) fn editor_error_to_status(err: &ColumnEditorError) -> StatusCode {
    match err {
        ColumnEditorError::EmptyTitle => StatusCode::BAD_REQUEST,
        ColumnEditorError::ColumnNotFound(_) => StatusCode::NOT_FOUND,
        ColumnEditorError::EditorAlreadyOpen
        | ColumnEditorError::EditorClosed
        | ColumnEditorError::LastColumn
        | ColumnEditorError::StaleSnapshot { .. } => StatusCode::CONFLICT,
    }
}

fn board_error(err: &BoardError) -> ApiError {
    ApiError::new(board_error_to_status(err), err)
}

fn editor_error(err: &ColumnEditorError) -> ApiError {
    ApiError::new(editor_error_to_status(err), err)
}

// =============================================================================
// BOARD
// =============================================================================

/// `GET /api/kanban` — board filtered by tags and colors.
pub async fn get_board(
    State(state): State<AppState>,
    Query(query): Query<BoardQuery>,
) -> Result<Json<BoardView>, ApiError> {
    let filter = CardFilter::parse(&query.tags, &query.colors).map_err(|e| board_error(&e))?;
    let kanban = state.kanban.read().await;
    let board = &kanban.board;

    let columns = board
        .columns()
        .iter()
        .map(|col| ColumnView {
            id: col.id.clone(),
            title: col.title.clone(),
            cards: filter.apply(&col.cards).into_iter().cloned().collect(),
            total_cards: col.cards.len(),
        })
        .collect();

    Ok(Json(BoardView {
        columns,
        all_tags: board.all_tags(),
        generation: board.generation(),
        editor_open: kanban.editor.is_open(),
    }))
}

/// `POST /api/kanban/columns/:id/cards` — append a card.
pub async fn add_card(
    State(state): State<AppState>,
    Path(column_id): Path<ColumnId>,
    Json(draft): Json<CardDraft>,
) -> Result<(StatusCode, Json<Card>), ApiError> {
    let today = time::OffsetDateTime::now_utc().date();
    let mut kanban = state.kanban.write().await;
    let card = kanban
        .board
        .add_card(&column_id, draft, today)
        .map_err(|e| board_error(&e))?;
    Ok((StatusCode::CREATED, Json(card)))
}

/// `DELETE /api/kanban/columns/:id/cards/:card_id`
pub async fn delete_card(
    State(state): State<AppState>,
    Path((column_id, card_id)): Path<(ColumnId, String)>,
) -> Result<Json<Card>, ApiError> {
    let mut kanban = state.kanban.write().await;
    kanban
        .board
        .delete_card(&column_id, &card_id)
        .map(Json)
        .ok_or_else(|| board_error(&BoardError::CardNotFound(card_id)))
}

/// `POST /api/kanban/cards/:id/move`
pub async fn move_card(
    State(state): State<AppState>,
    Path(card_id): Path<String>,
    Json(body): Json<MoveBody>,
) -> Result<Json<CardMove>, ApiError> {
    let mut kanban = state.kanban.write().await;
    let moved = kanban
        .board
        .move_card(&card_id, &body.to_column, body.index)
        .map_err(|e| board_error(&e))?;
    Ok(Json(moved))
}

/// `POST /api/kanban/cards/:id/drop` — finish a drag gesture.
pub async fn drop_card(
    State(state): State<AppState>,
    Path(card_id): Path<String>,
    Json(body): Json<DropBody>,
) -> Result<Json<CardMove>, ApiError> {
    let mut kanban = state.kanban.write().await;
    let moved = kanban
        .board
        .drop_card(&card_id, body.over.as_deref())
        .map_err(|e| board_error(&e))?;
    Ok(Json(moved))
}

// =============================================================================
// COLUMN EDITOR
// =============================================================================

/// `POST /api/kanban/editor` — open a session on a snapshot of the columns.
pub async fn open_editor(State(state): State<AppState>) -> Result<(StatusCode, Json<EditorView>), ApiError> {
    let mut guard = state.kanban.write().await;
    let kanban = &mut *guard;
    let editor = kanban.editor.open(&kanban.board).map_err(|e| editor_error(&e))?;
    Ok((StatusCode::CREATED, Json(EditorView::from(editor))))
}

/// `GET /api/kanban/editor` — the scratch columns.
pub async fn get_editor(State(state): State<AppState>) -> Result<Json<EditorView>, ApiError> {
    let kanban = state.kanban.read().await;
    let editor = kanban.editor.editor().map_err(|e| editor_error(&e))?;
    Ok(Json(EditorView::from(editor)))
}

/// `POST /api/kanban/editor/columns`
pub async fn add_column(
    State(state): State<AppState>,
    Json(body): Json<ColumnTitleBody>,
) -> Result<(StatusCode, Json<Column>), ApiError> {
    let mut kanban = state.kanban.write().await;
    let column = kanban
        .editor
        .editor_mut()
        .and_then(|editor| editor.add_column(&body.title))
        .map_err(|e| editor_error(&e))?;
    Ok((StatusCode::CREATED, Json(column)))
}

/// `PATCH /api/kanban/editor/columns/:id`
pub async fn rename_column(
    State(state): State<AppState>,
    Path(column_id): Path<ColumnId>,
    Json(body): Json<ColumnTitleBody>,
) -> Result<Json<EditorView>, ApiError> {
    let mut kanban = state.kanban.write().await;
    let editor = kanban.editor.editor_mut().map_err(|e| editor_error(&e))?;
    editor
        .rename_column(&column_id, &body.title)
        .map_err(|e| editor_error(&e))?;
    Ok(Json(EditorView::from(&*editor)))
}

/// `DELETE /api/kanban/editor/columns/:id`
pub async fn delete_column(
    State(state): State<AppState>,
    Path(column_id): Path<ColumnId>,
) -> Result<Json<Column>, ApiError> {
    let mut kanban = state.kanban.write().await;
    let column = kanban
        .editor
        .editor_mut()
        .and_then(|editor| editor.delete_column(&column_id))
        .map_err(|e| editor_error(&e))?;
    Ok(Json(column))
}

/// `POST /api/kanban/editor/commit` — apply the scratch columns and close.
pub async fn commit_editor(State(state): State<AppState>) -> Result<Json<CommitSummary>, ApiError> {
    let mut guard = state.kanban.write().await;
    let kanban = &mut *guard;
    let summary = kanban.editor.commit(&mut kanban.board).map_err(|e| editor_error(&e))?;
    Ok(Json(summary))
}

/// `DELETE /api/kanban/editor` — throw the scratch columns away.
pub async fn discard_editor(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    let mut kanban = state.kanban.write().await;
    kanban.editor.discard().map_err(|e| editor_error(&e))?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[path = "kanban_test.rs"]
mod tests;
