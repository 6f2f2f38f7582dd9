use spreadsheet_engine::{CellPosition, History, Spreadsheet};

fn sheet_with_a1(value: &str) -> Spreadsheet {
    let mut sheet = Spreadsheet::new();
    sheet.set_input(CellPosition::new(0, 0), value);
    sheet
}

fn a1(sheet: &Spreadsheet) -> String {
    sheet.value(0, 0).to_string()
}

#[test]
fn undo_at_baseline_is_noop() {
    let mut history = History::new(Spreadsheet::new());
    assert!(history.undo().is_none());
    assert!(history.redo().is_none());
    assert_eq!(history.cursor(), 0);
    assert_eq!(history.len(), 1);
    assert!(!history.can_undo());
}

#[test]
fn undo_then_redo_walks_entries() {
    let mut history = History::new(Spreadsheet::new());
    for i in 1..=3 {
        history.push(sheet_with_a1(&i.to_string()));
    }
    assert_eq!(history.cursor(), 3);

    assert_eq!(history.undo().map(a1), Some("2".to_string()));
    assert_eq!(history.undo().map(a1), Some("1".to_string()));
    assert_eq!(history.undo().map(a1), Some(String::new()));
    assert!(history.undo().is_none());

    for expected in ["1", "2", "3"] {
        assert_eq!(history.redo().map(a1), Some(expected.to_string()));
    }
    assert!(history.redo().is_none());
    assert_eq!(a1(history.current()), "3");
}

#[test]
fn push_after_undo_discards_redo_tail() {
    let mut history = History::new(Spreadsheet::new());
    history.push(sheet_with_a1("1"));
    history.push(sheet_with_a1("2"));
    history.push(sheet_with_a1("3"));
    history.undo();
    history.undo();
    assert!(history.can_redo());

    history.push(sheet_with_a1("x"));
    assert!(!history.can_redo());
    assert!(history.redo().is_none());
    assert_eq!(history.len(), 3);
    assert_eq!(history.undo().map(a1), Some("1".to_string()));
}

#[test]
fn limit_drops_oldest_entries() {
    let mut history = History::with_limit(Spreadsheet::new(), 3);
    for i in 1..=5 {
        history.push(sheet_with_a1(&i.to_string()));
    }
    assert_eq!(history.len(), 3);
    assert_eq!(history.cursor(), 2);
    history.undo();
    history.undo();
    assert_eq!(a1(history.current()), "3");
    assert!(history.undo().is_none());
}
