use spreadsheet_engine::address::parse_reference;
use spreadsheet_engine::recalc::{self, RecalcMode, evaluation_order};
use spreadsheet_engine::{CellContent, CellStyle, FontWeight, RangeMode, Spreadsheet};

fn key(name: &str) -> spreadsheet_engine::CellKey {
    parse_reference(name).unwrap()
}

fn assert_cell_value(sheet: &Spreadsheet, name: &str, expected: &str) {
    let pos = key(name);
    assert_eq!(sheet.value(pos.row, pos.col), expected, "value of {}", name);
}

fn sheet_with(inputs: &[(&str, &str)]) -> Spreadsheet {
    let mut sheet = Spreadsheet::new();
    for (name, input) in inputs {
        sheet.set_input(key(name), input);
    }
    sheet
}

#[test]
fn absent_cells_read_as_empty() {
    let sheet = Spreadsheet::new();
    assert_eq!(sheet.value(4, 4), "");
    assert_eq!(sheet.content(key("E5")), CellContent::default());
    assert!(sheet.get(key("E5")).is_none());
    assert!(sheet.is_empty());
}

#[test]
fn iteration_follows_first_insertion() {
    let mut sheet = sheet_with(&[("C3", "1"), ("A1", "2"), ("B2", "3")]);
    sheet.set_input(key("C3"), "4");
    let order: Vec<String> = sheet.iter().map(|(k, _)| k.to_string()).collect();
    assert_eq!(order, vec!["C3", "A1", "B2"]);
    assert_eq!(sheet.len(), 3);
}

#[test]
fn input_keeps_style_and_switches_formula() {
    let mut sheet = Spreadsheet::new();
    let bold = CellStyle {
        font_weight: Some(FontWeight::Bold),
        ..CellStyle::default()
    };
    sheet.merge_style(key("A1"), &bold);
    sheet.set_input(key("A1"), "=1+1");
    let cell = sheet.get(key("A1")).unwrap();
    assert_eq!(cell.formula.as_deref(), Some("=1+1"));
    assert_eq!(cell.style.as_ref().unwrap().font_weight, Some(FontWeight::Bold));

    sheet.set_input(key("A1"), "plain");
    let cell = sheet.get(key("A1")).unwrap();
    assert!(cell.formula.is_none());
    assert_eq!(cell.value, "plain");
    assert!(cell.style.is_some());
}

#[test]
fn clear_resets_to_empty_value() {
    let mut sheet = sheet_with(&[("A1", "=2*3")]);
    sheet.clear(key("A1"));
    assert_eq!(sheet.get(key("A1")), Some(&CellContent::default()));
    sheet.clear(key("Z9"));
    assert!(sheet.get(key("Z9")).is_none());
}

#[test]
fn snapshot_is_independent_of_live_store() {
    let mut sheet = sheet_with(&[("A1", "1")]);
    let snapshot = sheet.clone();
    sheet.set_input(key("A1"), "2");
    assert_cell_value(&snapshot, "A1", "1");
    assert_eq!(sheet.diff_keys(&snapshot), vec![key("A1")]);
}

#[test]
fn recalc_evaluates_formula_cells() {
    let mut sheet = sheet_with(&[("A1", "10"), ("A2", "abc"), ("A3", "5"), ("B1", "=SUM(A1:A3)")]);
    let changed = recalc::recalculate(&mut sheet, RecalcMode::Dependency, RangeMode::Lenient);
    assert_eq!(changed, vec![key("B1")]);
    assert_cell_value(&sheet, "B1", "15");
    assert_eq!(sheet.get(key("B1")).unwrap().formula.as_deref(), Some("=SUM(A1:A3)"));

    let changed = recalc::recalculate(&mut sheet, RecalcMode::Dependency, RangeMode::Lenient);
    assert!(changed.is_empty());
}

#[test]
fn dependency_order_beats_insertion_order() {
    // A1 reads B1, which is inserted after it.
    let inputs = [("A1", "=B1+1"), ("B1", "=C1*2"), ("C1", "5")];

    let mut ordered = sheet_with(&inputs);
    recalc::recalculate(&mut ordered, RecalcMode::Dependency, RangeMode::Lenient);
    assert_cell_value(&ordered, "B1", "10");
    assert_cell_value(&ordered, "A1", "11");

    let mut compat = sheet_with(&inputs);
    recalc::recalculate(&mut compat, RecalcMode::InsertionOrder, RangeMode::Lenient);
    assert_cell_value(&compat, "B1", "10");
    assert_cell_value(&compat, "A1", "1");

    // A second pass catches up.
    recalc::recalculate(&mut compat, RecalcMode::InsertionOrder, RangeMode::Lenient);
    assert_cell_value(&compat, "A1", "11");
}

#[test]
fn cycles_become_ref_errors() {
    let mut sheet = sheet_with(&[
        ("A1", "=B1"),
        ("B1", "=A1+1"),
        ("C1", "=A1*2"),
        ("D1", "=SUM(E1:E2)"),
        ("E1", "4"),
    ]);
    recalc::recalculate(&mut sheet, RecalcMode::Dependency, RangeMode::Lenient);
    assert_cell_value(&sheet, "A1", "#REF!");
    assert_cell_value(&sheet, "B1", "#REF!");
    assert_cell_value(&sheet, "C1", "#REF!");
    assert_cell_value(&sheet, "D1", "4");
}

#[test]
fn self_reference_is_a_cycle() {
    let mut sheet = sheet_with(&[("A1", "=SUM(A1:A3)"), ("A2", "1")]);
    let (order, blocked) = evaluation_order(&sheet, &sheet.formula_cells(), RangeMode::Lenient);
    assert!(order.is_empty());
    assert_eq!(blocked, vec![key("A1")]);
    recalc::recalculate(&mut sheet, RecalcMode::Dependency, RangeMode::Lenient);
    assert_cell_value(&sheet, "A1", "#REF!");
}

#[test]
fn range_contents_include_gaps() {
    let sheet = sheet_with(&[("A1", "1"), ("B2", "2")]);
    let range = spreadsheet_engine::CellRange::from_corners(key("A1"), key("B2"));
    let contents = sheet.range_contents(&range);
    assert_eq!(contents.len(), 4);
    assert_eq!(contents[1], (key("B1"), CellContent::default()));
    assert_eq!(contents[3].1.value, "2");
}

#[test]
fn whole_sheet_ranges_only_walk_stored_cells() {
    let mut sheet = sheet_with(&[
        ("A1", "=SUM(B1:ZZZZ999999)"),
        ("B1", "2"),
        ("C3", "5"),
        ("A2", "=COUNT(B1:ZZZZ999999)"),
    ]);
    assert_eq!(sheet.extent(), (3, 3));
    recalc::recalculate(&mut sheet, RecalcMode::Dependency, RangeMode::Lenient);
    assert_cell_value(&sheet, "A1", "7");
    assert_cell_value(&sheet, "A2", "2");
    assert_eq!(Spreadsheet::new().extent(), (0, 0));
}
