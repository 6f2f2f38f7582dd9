use crate::address::CellPosition;
use crate::cell::{CellContent, CellKey, CellStyle};
use crate::selection::Selection;
use crate::spreadsheet::Spreadsheet;
use std::collections::HashMap;

/// Cells captured by a copy or cut, keyed by their absolute source position.
#[derive(Clone, Debug, PartialEq)]
pub struct ClipboardSnapshot {
    pub start: CellPosition,
    pub end: CellPosition,
    pub cells: HashMap<CellKey, CellContent>,
}

impl ClipboardSnapshot {
    pub fn height(&self) -> u32 {
        self.end.row - self.start.row + 1
    }

    pub fn width(&self) -> u32 {
        self.end.col - self.start.col + 1
    }
}

/// Result of a paste: the cells written and the rectangle to select.
#[derive(Clone, Debug, PartialEq)]
pub struct PasteOutcome {
    pub written: Vec<CellKey>,
    pub selection: Selection,
}

/// Single clipboard slot; each copy or cut replaces the previous content.
#[derive(Clone, Debug, Default)]
pub struct Clipboard {
    slot: Option<ClipboardSnapshot>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Option<&ClipboardSnapshot> {
        self.slot.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }

    /// Captures the cells of the normalized selection. Only cells present in
    /// the store are captured, so a later paste leaves the destination of a
    /// gap untouched.
    pub fn copy(&mut self, sheet: &Spreadsheet, selection: Selection) -> &ClipboardSnapshot {
        let bounds = selection.bounds();
        let cells = bounds
            .cells()
            .filter_map(|key| sheet.get(key).map(|c| (key, c.clone())))
            .collect();
        self.slot.insert(ClipboardSnapshot {
            start: bounds.start(),
            end: bounds.end(),
            cells,
        })
    }

    /// Copies, then clears every captured cell to `{ value: "", style: {} }`.
    /// Returns the cleared keys.
    pub fn cut(&mut self, sheet: &mut Spreadsheet, selection: Selection) -> Vec<CellKey> {
        let mut cleared: Vec<CellKey> = self.copy(sheet, selection).cells.keys().copied().collect();
        cleared.sort();
        for &key in &cleared {
            sheet.set(
                key,
                CellContent {
                    value: String::new(),
                    formula: None,
                    style: Some(CellStyle::default()),
                },
            );
        }
        cleared
    }

    /// Writes the captured cells at the same offsets from `anchor`,
    /// replacing value, formula and style wholesale. Destinations with no
    /// captured source are left alone; with `limit = Some((rows, cols))`,
    /// cells landing outside the grid are skipped.
    pub fn paste(
        &self,
        sheet: &mut Spreadsheet,
        anchor: CellPosition,
        limit: Option<(u32, u32)>,
    ) -> Option<PasteOutcome> {
        let snapshot = self.slot.as_ref()?;
        let inside = |row: u32, col: u32| limit.is_none_or(|(rows, cols)| row < rows && col < cols);

        let mut written = Vec::new();
        for dr in 0..snapshot.height() {
            for dc in 0..snapshot.width() {
                let source = CellPosition::new(snapshot.start.row + dr, snapshot.start.col + dc);
                let Some(content) = snapshot.cells.get(&source) else {
                    continue;
                };
                let (Some(row), Some(col)) =
                    (anchor.row.checked_add(dr), anchor.col.checked_add(dc))
                else {
                    continue;
                };
                if !inside(row, col) {
                    continue;
                }
                let target = CellPosition::new(row, col);
                sheet.update(target, |cell| {
                    cell.value = content.value.clone();
                    cell.formula = content.formula.clone();
                    cell.style = content.style.clone();
                });
                written.push(target);
            }
        }

        let mut end = CellPosition::new(
            anchor.row.saturating_add(snapshot.height() - 1),
            anchor.col.saturating_add(snapshot.width() - 1),
        );
        if let Some((rows, cols)) = limit {
            end.row = end.row.min(rows.saturating_sub(1)).max(anchor.row);
            end.col = end.col.min(cols.saturating_sub(1)).max(anchor.col);
        }
        Some(PasteOutcome {
            written,
            selection: Selection::new(anchor, end),
        })
    }
}

/// "A1" for a single cell, "A1:B3" for a rectangle.
pub fn range_label(selection: &Selection) -> String {
    selection.bounds().label()
}
