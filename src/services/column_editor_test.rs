use time::macros::date;

use super::*;
use crate::services::kanban::CardDraft;

fn board_with_cards() -> Board {
    let mut board = Board::new();
    let today = date!(2025 - 11 - 19);
    for (col, title) in [("todo", "a"), ("todo", "b"), ("complete", "c")] {
        board
            .add_card(col, CardDraft { title: title.into(), ..CardDraft::default() }, today)
            .unwrap();
    }
    board
}

fn titles(columns: &[Column]) -> Vec<&str> {
    columns.iter().map(|c| c.title.as_str()).collect()
}

// =============================================================================
// EDITOR
// =============================================================================

#[test]
fn scratch_edits_do_not_touch_the_board() {
    let board = board_with_cards();
    let before = board.clone();
    let mut editor = ColumnEditor::open(&board);

    editor.rename_column("todo", "Backlog").unwrap();
    editor.add_column("Review").unwrap();
    editor.delete_column("complete").unwrap();

    assert_eq!(titles(editor.columns()), vec!["Backlog", "In Progress", "Review"]);
    assert_eq!(board, before);
}

#[test]
fn rename_and_add_reject_blank_titles() {
    let board = Board::new();
    let mut editor = ColumnEditor::open(&board);
    assert_eq!(editor.rename_column("todo", "  "), Err(ColumnEditorError::EmptyTitle));
    assert_eq!(editor.add_column("").unwrap_err(), ColumnEditorError::EmptyTitle);
    assert_eq!(
        editor.rename_column("nope", "X"),
        Err(ColumnEditorError::ColumnNotFound("nope".into()))
    );
    assert_eq!(editor.columns(), board.columns());
}

#[test]
fn added_columns_get_fresh_ids() {
    let board = Board::new();
    let mut editor = ColumnEditor::open(&board);
    let a = editor.add_column("A").unwrap();
    let b = editor.add_column(" A ").unwrap();
    assert_ne!(a.id, b.id);
    assert!(a.id.starts_with("column-"));
    assert_eq!(b.title, "A");
    assert!(b.cards.is_empty());
}

#[test]
fn last_column_cannot_be_deleted() {
    let board = Board::new();
    let mut editor = ColumnEditor::open(&board);
    editor.delete_column("todo").unwrap();
    editor.delete_column("inprogress").unwrap();
    assert_eq!(editor.delete_column("complete").unwrap_err(), ColumnEditorError::LastColumn);
    assert_eq!(editor.columns().len(), 1);
}

#[test]
fn commit_swaps_columns_and_drops_orphaned_cards() {
    let mut board = board_with_cards();
    let generation = board.generation();
    let mut editor = ColumnEditor::open(&board);
    editor.delete_column("todo").unwrap();
    editor.rename_column("complete", "Done").unwrap();

    let summary = editor.commit(&mut board).unwrap();
    assert_eq!(summary, CommitSummary { columns: 2, dropped_cards: 2 });
    assert_eq!(titles(board.columns()), vec!["In Progress", "Done"]);
    assert_eq!(board.card_count(), 1);
    assert_eq!(board.generation(), generation + 1);
}

#[test]
fn commit_after_board_mutation_is_stale() {
    let mut board = board_with_cards();
    let mut editor = ColumnEditor::open(&board);
    editor.add_column("Later").unwrap();

    let card = board.column("todo").unwrap().cards[0].id.clone();
    board.move_card(&card, "inprogress", None).unwrap();
    let after_move = board.clone();

    let err = editor.commit(&mut board).unwrap_err();
    assert!(matches!(err, ColumnEditorError::StaleSnapshot { .. }));
    assert_eq!(err.error_code(), "E_STALE_SNAPSHOT");
    assert_eq!(board, after_move);
}

// =============================================================================
// SESSION
// =============================================================================

#[test]
fn session_walks_closed_editing_closed() {
    let mut board = board_with_cards();
    let mut session = EditorSession::default();
    assert!(!session.is_open());
    assert_eq!(session.editor().unwrap_err(), ColumnEditorError::EditorClosed);

    session.open(&board).unwrap();
    assert!(session.is_open());
    assert_eq!(session.open(&board).unwrap_err(), ColumnEditorError::EditorAlreadyOpen);

    session.editor_mut().unwrap().add_column("Review").unwrap();
    session.commit(&mut board).unwrap();
    assert!(!session.is_open());
    assert_eq!(board.columns().len(), 4);

    assert_eq!(session.commit(&mut board).unwrap_err(), ColumnEditorError::EditorClosed);
    assert_eq!(session.discard().unwrap_err(), ColumnEditorError::EditorClosed);
}

#[test]
fn discard_leaves_board_equal_to_pre_open_state() {
    let board = board_with_cards();
    let before = board.clone();
    let mut session = EditorSession::default();
    session.open(&board).unwrap();

    let editor = session.editor_mut().unwrap();
    editor.rename_column("todo", "Renamed").unwrap();
    editor.add_column("Extra").unwrap();
    editor.delete_column("inprogress").unwrap();

    session.discard().unwrap();
    assert!(!session.is_open());
    assert_eq!(board, before);
}

#[test]
fn stale_commit_closes_the_session() {
    let mut board = board_with_cards();
    let mut session = EditorSession::default();
    session.open(&board).unwrap();
    let card = board.column("complete").unwrap().cards[0].id.clone();
    board.delete_card("complete", &card).unwrap();

    assert!(matches!(session.commit(&mut board), Err(ColumnEditorError::StaleSnapshot { .. })));
    assert!(!session.is_open());
    assert!(session.open(&board).is_ok());
}
