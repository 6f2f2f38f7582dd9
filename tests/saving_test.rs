use spreadsheet_engine::saving::{load_document, save_document};
use spreadsheet_engine::{
    CellContent, CellPosition, CellStyle, ColumnSize, FileStore, GridConfig, GridController,
    GridDocument, Persistence, RowSize, TextDecoration,
};
use std::fs;
use tempfile::tempdir;

#[test]
fn document_round_trips_through_gzip_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("doc.bin.gz");

    let mut doc = GridDocument::new("Quarterly");
    doc.upsert_cell(CellPosition::new(0, 0), &CellContent::text("12"));
    doc.upsert_cell(
        CellPosition::new(0, 1),
        &CellContent {
            value: "24".to_string(),
            formula: Some("=a1*2".to_string()),
            style: Some(CellStyle {
                text_decoration: Some(TextDecoration::Underline),
                font_size: Some(14.0),
                ..CellStyle::default()
            }),
        },
    );
    doc.row_sizes.push(RowSize { index: 3, height: 48.0 });

    save_document(&doc, &path).unwrap();
    let loaded = load_document(&path).unwrap();
    assert_eq!(loaded, doc);
    assert_eq!(loaded.cells[1].1.formula.as_deref(), Some("=a1*2"));
}

#[test]
fn file_store_accumulates_cell_saves() {
    let dir = tempdir().unwrap();
    let mut store = FileStore::new(dir.path().join("grids")).unwrap();
    assert!(store.load("missing").unwrap().is_none());

    store
        .save_cell("g1", CellPosition::new(2, 3), &CellContent::text("a"))
        .unwrap();
    store
        .save_cell("g1", CellPosition::new(0, 0), &CellContent::text("b"))
        .unwrap();
    store
        .save_cell("g1", CellPosition::new(2, 3), &CellContent::text("c"))
        .unwrap();
    store
        .save_layout("g1", &[ColumnSize { index: 1, width: 75.0 }], &[])
        .unwrap();
    store.rename("g1", "Inventory").unwrap();

    let doc = store.load("g1").unwrap().unwrap();
    assert_eq!(doc.title, "Inventory");
    assert_eq!(
        doc.cells,
        vec![
            (CellPosition::new(2, 3), CellContent::text("c")),
            (CellPosition::new(0, 0), CellContent::text("b")),
        ]
    );
    assert_eq!(doc.column_sizes, vec![ColumnSize { index: 1, width: 75.0 }]);
    assert!(store.path_for("g1").exists());
}

#[test]
fn controller_state_survives_reload() {
    let dir = tempdir().unwrap();
    let store = FileStore::new(dir.path()).unwrap();

    {
        let mut grid = GridController::new(GridConfig::default(), "book", store.clone()).unwrap();
        grid.set_cell_input(0, 0, "4");
        grid.set_cell_input(1, 0, "=A1*A1");
        grid.begin_column_resize(0, 100.0);
        grid.drag_resize(160.0);
        grid.end_resize();
        grid.rename("Squares");
    }

    let grid = GridController::new(GridConfig::default(), "book", store).unwrap();
    assert_eq!(grid.title(), "Squares");
    assert_eq!(grid.value(1, 0), "16");
    assert_eq!(grid.cell(1, 0).formula.as_deref(), Some("=A1*A1"));
    assert_eq!(grid.layout().column_width(0), 160.0);
    assert_eq!(grid.history().len(), 1);
}

#[test]
fn corrupt_file_is_an_error() {
    let dir = tempdir().unwrap();
    let mut store = FileStore::new(dir.path()).unwrap();
    fs::write(store.path_for("bad"), b"not gzip at all").unwrap();
    assert!(store.load("bad").is_err());
    assert!(GridController::new(GridConfig::default(), "bad", store).is_err());
}

#[test]
fn config_from_partial_json() {
    let config = GridConfig::from_json_str(
        r#"{ "rows": 500, "recalc_mode": "insertion_order", "range_mode": "strict" }"#,
    )
    .unwrap();
    assert_eq!(config.rows, 500);
    assert_eq!(config.cols, 26);
    assert_eq!(config.min_column_width, 50.0);
    assert_eq!(config.recalc_mode, spreadsheet_engine::RecalcMode::InsertionOrder);
    assert_eq!(config.range_mode, spreadsheet_engine::RangeMode::Strict);

    let dir = tempdir().unwrap();
    let path = dir.path().join("grid.json");
    fs::write(&path, "{}").unwrap();
    assert_eq!(GridConfig::from_file(&path).unwrap(), GridConfig::default());
    assert!(GridConfig::from_json_str("{ rows: }").is_err());
}
