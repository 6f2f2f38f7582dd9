use spreadsheet_engine::{CellPosition, Direction, Selection, SelectionModel};

#[test]
fn reversed_selection_is_normalized() {
    let selection = Selection::new(CellPosition::new(2, 2), CellPosition::new(0, 0));
    assert!(selection.contains(1, 1));
    for (row, col) in [(0, 0), (0, 2), (2, 0), (2, 2), (1, 0), (0, 1)] {
        assert!(selection.contains(row, col), "({row}, {col})");
    }
    for (row, col) in [(3, 0), (0, 3), (3, 3), (1, 3)] {
        assert!(!selection.contains(row, col), "({row}, {col})");
    }
    let bounds = selection.bounds();
    assert_eq!(bounds.start(), CellPosition::new(0, 0));
    assert_eq!(bounds.end(), CellPosition::new(2, 2));
}

#[test]
fn selection_reversed_on_one_axis() {
    let selection = Selection::new(CellPosition::new(4, 1), CellPosition::new(1, 3));
    assert!(selection.contains(4, 3));
    assert!(selection.contains(1, 1));
    assert!(!selection.contains(0, 2));
    assert!(!selection.contains(2, 0));
    assert!(!selection.contains(5, 2));
}

#[test]
fn model_extends_from_the_anchor() {
    let mut model = SelectionModel::new();
    model.select_cell(3, 3);
    model.extend_selection(CellPosition::new(1, 1));
    assert_eq!(model.active(), CellPosition::new(3, 3));
    assert!(model.contains(2, 2));
    assert!(model.contains(1, 3));
    assert!(!model.contains(0, 2));

    model.select_cell(0, 0);
    assert_eq!(model.move_active(Direction::Up), CellPosition::new(0, 0));
    assert!(model.selection().is_single());
}
