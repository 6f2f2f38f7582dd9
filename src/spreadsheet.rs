use crate::address::{CellPosition, CellRange};
use crate::cell::{CellContent, CellKey, CellStyle};
use std::collections::HashMap;

/// The cell store: every cell that has ever been edited, keyed by
/// position. Iteration follows first-insertion order.
///
/// Cloning produces an independent copy, which is what history
/// snapshots rely on.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Spreadsheet {
    cells: HashMap<CellKey, CellContent>,
    order: Vec<CellKey>,
}

impl Spreadsheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (CellKey, CellContent)>,
    {
        let mut sheet = Spreadsheet::new();
        for (key, content) in entries {
            sheet.set(key, content);
        }
        sheet
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, key: CellKey) -> Option<&CellContent> {
        self.cells.get(&key)
    }

    /// Content of a cell, with absent cells reported as empty.
    pub fn content(&self, key: CellKey) -> CellContent {
        self.cells.get(&key).cloned().unwrap_or_default()
    }

    /// Displayed value; `""` for absent cells.
    pub fn value(&self, row: u32, col: u32) -> &str {
        self.cells
            .get(&CellPosition::new(row, col))
            .map_or("", |c| c.value.as_str())
    }

    /// Replaces a cell's content wholesale.
    pub fn set(&mut self, key: CellKey, content: CellContent) {
        if self.cells.insert(key, content).is_none() {
            self.order.push(key);
        }
    }

    /// Mutates a cell in place, creating it empty first if needed.
    pub fn update<F>(&mut self, key: CellKey, f: F)
    where
        F: FnOnce(&mut CellContent),
    {
        if !self.cells.contains_key(&key) {
            self.order.push(key);
        }
        f(self.cells.entry(key).or_default());
    }

    /// Applies user input to a cell, keeping its style. Input starting
    /// with `=` becomes the formula; anything else drops the formula.
    pub fn set_input(&mut self, key: CellKey, input: &str) {
        let fresh = CellContent::from_input(input);
        self.update(key, |cell| {
            cell.value = fresh.value;
            cell.formula = fresh.formula;
        });
    }

    /// Writes an evaluated result without touching formula or style.
    pub fn set_value(&mut self, key: CellKey, value: String) {
        self.update(key, |cell| cell.value = value);
    }

    /// Shallow-merges a style patch into the cell's existing style.
    pub fn merge_style(&mut self, key: CellKey, patch: &CellStyle) {
        self.update(key, |cell| cell.style.get_or_insert_with(CellStyle::default).merge(patch));
    }

    /// Resets a cell to `{ value: "" }`.
    pub fn clear(&mut self, key: CellKey) {
        if self.cells.contains_key(&key) {
            self.set(key, CellContent::default());
        }
    }

    /// Iterates cells in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (CellKey, &CellContent)> + '_ {
        self.order
            .iter()
            .filter_map(move |key| self.cells.get(key).map(|c| (*key, c)))
    }

    /// Rows and columns spanned by stored cells, counted from A1. Every
    /// position outside it is blank.
    pub fn extent(&self) -> (u32, u32) {
        self.cells.keys().fold((0, 0), |(rows, cols), key| {
            (rows.max(key.row.saturating_add(1)), cols.max(key.col.saturating_add(1)))
        })
    }

    /// Keys of formula cells, in first-insertion order.
    pub fn formula_cells(&self) -> Vec<CellKey> {
        self.iter()
            .filter(|(_, c)| c.has_formula())
            .map(|(key, _)| key)
            .collect()
    }

    /// Cloned entries inside a rectangle, absent cells included as empty.
    pub fn range_contents(&self, range: &CellRange) -> Vec<(CellKey, CellContent)> {
        range.cells().map(|key| (key, self.content(key))).collect()
    }

    /// Keys whose content differs between two stores.
    pub fn diff_keys(&self, other: &Spreadsheet) -> Vec<CellKey> {
        let mut keys: Vec<CellKey> = self
            .order
            .iter()
            .chain(other.order.iter())
            .copied()
            .filter(|key| self.content(*key) != other.content(*key))
            .collect();
        keys.sort();
        keys.dedup();
        keys
    }
}
