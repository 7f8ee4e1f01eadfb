//! Kanban board — columns of ordered cards, drag-and-drop moves, filtering.
//!
//! DESIGN
//! ======
//! The board's columns sit behind an `Arc<Vec<Column>>` so a column-editor
//! session can hold a snapshot without copying anything up front (see
//! `column_editor`). Every committed mutation goes through `columns_mut`,
//! which copies on write when a snapshot is alive and bumps `generation`.
//! A session compares generations at commit time to detect that the board
//! moved underneath it.
//!
//! Card ids are unique across the whole board, not just within a column, so
//! moves and drops address cards by id alone.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::Date;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::ErrorCode;

pub type ColumnId = String;
pub type CardId = String;

// =============================================================================
// TYPES
// =============================================================================

/// Fixed card palette.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardColor {
    #[default]
    Blue,
    Green,
    Yellow,
    Red,
    Purple,
}

impl CardColor {
    pub const ALL: [Self; 5] = [Self::Blue, Self::Green, Self::Yellow, Self::Red, Self::Purple];

    #[must_use]
    pub fn hex(self) -> &'static str {
        match self {
            Self::Blue => "#0d6efd",
            Self::Green => "#198754",
            Self::Yellow => "#ffc107",
            Self::Red => "#dc3545",
            Self::Purple => "#6f42c1",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Blue => "Blue",
            Self::Green => "Green",
            Self::Yellow => "Yellow",
            Self::Red => "Red",
            Self::Purple => "Purple",
        }
    }

    /// Parse a palette name (`"red"`) or hex value (`"#dc3545"`).
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(raw) || c.hex().eq_ignore_ascii_case(raw))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub title: String,
    pub content: String,
    /// Order kept, duplicates kept.
    pub tags: Vec<String>,
    pub color: CardColor,
    pub due_date: Option<Date>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub title: String,
    pub cards: Vec<Card>,
}

impl Column {
    #[must_use]
    pub fn new(id: impl Into<ColumnId>, title: impl Into<String>) -> Self {
        Self { id: id.into(), title: title.into(), cards: Vec::new() }
    }
}

/// User input for a new card. `tags` is the raw comma-separated string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CardDraft {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub color: CardColor,
    #[serde(default)]
    pub due_date: Option<Date>,
}

/// Where a card ended up after a move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardMove {
    pub card_id: CardId,
    pub from_column: ColumnId,
    pub to_column: ColumnId,
    pub index: usize,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("card title must not be empty")]
    EmptyTitle,
    #[error("due date {0} is in the past")]
    DueDateInPast(Date),
    #[error("column not found: {0}")]
    ColumnNotFound(ColumnId),
    #[error("card not found: {0}")]
    CardNotFound(CardId),
    #[error("drop target not found: {0}")]
    DropTargetNotFound(String),
    #[error("drag ended outside any column")]
    NoDropTarget,
    #[error("unknown card color: {0}")]
    UnknownColor(String),
}

impl ErrorCode for BoardError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyTitle => "E_EMPTY_TITLE",
            Self::DueDateInPast(_) => "E_DUE_DATE_IN_PAST",
            Self::ColumnNotFound(_) => "E_COLUMN_NOT_FOUND",
            Self::CardNotFound(_) => "E_CARD_NOT_FOUND",
            Self::DropTargetNotFound(_) | Self::NoDropTarget => "E_DROP_TARGET_NOT_FOUND",
            Self::UnknownColor(_) => "E_UNKNOWN_COLOR",
        }
    }
}

/// Split a comma-separated tag string: trim each piece, drop empties,
/// keep order and duplicates.
#[must_use]
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .collect()
}

// =============================================================================
// FILTER
// =============================================================================

/// Tag and color filter. An empty set places no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardFilter {
    pub tags: HashSet<String>,
    pub colors: HashSet<CardColor>,
}

impl CardFilter {
    /// Build a filter from comma-separated tag and color lists.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::UnknownColor`] for a color outside the palette.
    pub fn parse(tags: &str, colors: &str) -> Result<Self, BoardError> {
        let colors = parse_tags(colors)
            .into_iter()
            .map(|raw| CardColor::parse(&raw).ok_or(BoardError::UnknownColor(raw)))
            .collect::<Result<_, _>>()?;
        Ok(Self { tags: parse_tags(tags).into_iter().collect(), colors })
    }

    #[must_use]
    pub fn matches(&self, card: &Card) -> bool {
        let tag_match = self.tags.is_empty() || card.tags.iter().any(|t| self.tags.contains(t));
        let color_match = self.colors.is_empty() || self.colors.contains(&card.color);
        tag_match && color_match
    }

    #[must_use]
    pub fn apply<'a>(&self, cards: &'a [Card]) -> Vec<&'a Card> {
        cards.iter().filter(|c| self.matches(c)).collect()
    }
}

// =============================================================================
// BOARD
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    columns: Arc<Vec<Column>>,
    generation: u64,
}

impl Board {
    /// The starting board: three empty columns.
    #[must_use]
    pub fn new() -> Self {
        Self::with_columns(vec![
            Column::new("todo", "To Do"),
            Column::new("inprogress", "In Progress"),
            Column::new("complete", "Complete"),
        ])
    }

    #[must_use]
    pub fn with_columns(columns: Vec<Column>) -> Self {
        Self { columns: Arc::new(columns), generation: 0 }
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    #[must_use]
    pub fn column(&self, id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    /// Counter bumped by every committed mutation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn card_count(&self) -> usize {
        self.columns.iter().map(|c| c.cards.len()).sum()
    }

    /// `(column index, card index)` of a card.
    #[must_use]
    pub fn locate_card(&self, card_id: &str) -> Option<(usize, usize)> {
        self.columns.iter().enumerate().find_map(|(ci, col)| {
            col.cards
                .iter()
                .position(|card| card.id == card_id)
                .map(|idx| (ci, idx))
        })
    }

    /// Cheap handle on the current columns for a snapshot.
    pub(crate) fn snapshot(&self) -> Arc<Vec<Column>> {
        Arc::clone(&self.columns)
    }

    /// Swap in a whole new column list.
    pub(crate) fn replace_columns(&mut self, columns: Arc<Vec<Column>>) {
        self.columns = columns;
        self.generation += 1;
    }

    fn column_index(&self, id: &str) -> Result<usize, BoardError> {
        self.columns
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| BoardError::ColumnNotFound(id.to_owned()))
    }

    fn columns_mut(&mut self) -> &mut Vec<Column> {
        self.generation += 1;
        Arc::make_mut(&mut self.columns)
    }

    /// Append a new card to a column.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::EmptyTitle`] for a blank title,
    /// [`BoardError::DueDateInPast`] for a due date before `today`, or
    /// [`BoardError::ColumnNotFound`]. The board is unchanged on error.
    pub fn add_card(&mut self, column_id: &str, draft: CardDraft, today: Date) -> Result<Card, BoardError> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(BoardError::EmptyTitle);
        }
        if let Some(due) = draft.due_date {
            if due < today {
                return Err(BoardError::DueDateInPast(due));
            }
        }
        let ci = self.column_index(column_id)?;

        let card = Card {
            id: format!("card-{}", Uuid::new_v4()),
            title: title.to_owned(),
            content: draft.content,
            tags: parse_tags(&draft.tags),
            color: draft.color,
            due_date: draft.due_date,
        };
        self.columns_mut()[ci].cards.push(card.clone());
        info!(column = column_id, card = %card.id, "card added");
        Ok(card)
    }

    /// Remove a card from a column. `None` when the card is not in that
    /// column, in which case nothing changes.
    pub fn delete_card(&mut self, column_id: &str, card_id: &str) -> Option<Card> {
        let ci = self.column_index(column_id).ok()?;
        let idx = self.columns[ci].cards.iter().position(|c| c.id == card_id)?;
        let card = self.columns_mut()[ci].cards.remove(idx);
        info!(column = column_id, card = card_id, "card deleted");
        Some(card)
    }

    /// Move a card to `to_column_id`, either at `to_index` or appended.
    ///
    /// Covers both reorder within a column and transfer between columns. The
    /// index is the card's final position and is clamped to the destination
    /// length.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::CardNotFound`] or [`BoardError::ColumnNotFound`];
    /// the board is unchanged on error.
    pub fn move_card(
        &mut self,
        card_id: &str,
        to_column_id: &str,
        to_index: Option<usize>,
    ) -> Result<CardMove, BoardError> {
        let (from_ci, from_idx) = self
            .locate_card(card_id)
            .ok_or_else(|| BoardError::CardNotFound(card_id.to_owned()))?;
        let to_ci = self.column_index(to_column_id)?;
        let from_column = self.columns[from_ci].id.clone();

        let columns = self.columns_mut();
        let card = columns[from_ci].cards.remove(from_idx);
        let dest = &mut columns[to_ci].cards;
        let index = to_index.map_or(dest.len(), |i| i.min(dest.len()));
        dest.insert(index, card);

        info!(card = card_id, from = %from_column, to = to_column_id, index, "card moved");
        Ok(CardMove { card_id: card_id.to_owned(), from_column, to_column: to_column_id.to_owned(), index })
    }

    /// Resolve a drag-end target id. A column id means "append to that
    /// column"; a card id means "take that card's slot".
    #[must_use]
    pub fn resolve_drop(&self, over_id: &str) -> Option<(ColumnId, Option<usize>)> {
        if let Some(col) = self.column(over_id) {
            return Some((col.id.clone(), None));
        }
        let (ci, idx) = self.locate_card(over_id)?;
        Some((self.columns[ci].id.clone(), Some(idx)))
    }

    /// Finish a drag gesture for `card_id` released over `over_id`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NoDropTarget`] when the drag ended outside the
    /// board, [`BoardError::DropTargetNotFound`] when the target id is
    /// unknown, or any [`Board::move_card`] error. The board is unchanged on
    /// error.
    pub fn drop_card(&mut self, card_id: &str, over_id: Option<&str>) -> Result<CardMove, BoardError> {
        let Some(over_id) = over_id else {
            debug!(card = card_id, "drag cancelled");
            return Err(BoardError::NoDropTarget);
        };
        let (column_id, index) = self
            .resolve_drop(over_id)
            .ok_or_else(|| BoardError::DropTargetNotFound(over_id.to_owned()))?;
        self.move_card(card_id, &column_id, index)
    }

    /// Distinct tags on the board in first-seen order.
    #[must_use]
    pub fn all_tags(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.columns
            .iter()
            .flat_map(|c| c.cards.iter())
            .flat_map(|card| card.tags.iter())
            .filter(|t| seen.insert(*t))
            .cloned()
            .collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "kanban_test.rs"]
mod tests;
