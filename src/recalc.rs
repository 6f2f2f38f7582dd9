//! Global recalculation of formula cells.
//!
//! Every edit re-evaluates every formula cell. In [`RecalcMode::Dependency`]
//! the formula cells are ordered so that each one is evaluated after the
//! formula cells it reads; cells on or behind a reference cycle are set to
//! `#REF!`. [`RecalcMode::InsertionOrder`] is a single pass in store order
//! which can read values that are about to change later in the same pass.

use crate::address::RangeMode;
use crate::cell::CellKey;
use crate::formula::{self, ErrorSentinel};
use crate::spreadsheet::Spreadsheet;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecalcMode {
    #[default]
    Dependency,
    InsertionOrder,
}

/// Re-evaluates all formula cells and returns the keys whose displayed
/// value changed.
pub fn recalculate(sheet: &mut Spreadsheet, mode: RecalcMode, range_mode: RangeMode) -> Vec<CellKey> {
    let formula_cells = sheet.formula_cells();
    let changed = match mode {
        RecalcMode::Dependency => recalc_in_dependency_order(sheet, &formula_cells, range_mode),
        RecalcMode::InsertionOrder => recalc_in_insertion_order(sheet, &formula_cells, range_mode),
    };
    debug!(
        "recalculated {} formula cells ({:?}), {} changed",
        formula_cells.len(),
        mode,
        changed.len()
    );
    changed
}

fn evaluate_cell(sheet: &Spreadsheet, key: CellKey, range_mode: RangeMode) -> Option<String> {
    let formula = sheet.get(key)?.formula.as_deref()?;
    let result = formula::evaluate_within(formula, range_mode, Some(sheet.extent()), |row, col| {
        sheet.value(row, col).to_string()
    });
    Some(result.to_display())
}

fn store_value(sheet: &mut Spreadsheet, key: CellKey, value: String, changed: &mut Vec<CellKey>) {
    if sheet.value(key.row, key.col) != value {
        sheet.set_value(key, value);
        changed.push(key);
    }
}

fn recalc_in_insertion_order(
    sheet: &mut Spreadsheet,
    formula_cells: &[CellKey],
    range_mode: RangeMode,
) -> Vec<CellKey> {
    let mut changed = Vec::new();
    for &key in formula_cells {
        if let Some(value) = evaluate_cell(sheet, key, range_mode) {
            store_value(sheet, key, value, &mut changed);
        }
    }
    changed
}

/// Topological order of formula cells (Kahn). Returns the ordered cells and
/// the ones left over because they sit on or behind a cycle.
pub fn evaluation_order(
    sheet: &Spreadsheet,
    formula_cells: &[CellKey],
    range_mode: RangeMode,
) -> (Vec<CellKey>, Vec<CellKey>) {
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); formula_cells.len()];
    let mut indegree = vec![0usize; formula_cells.len()];

    for (i, key) in formula_cells.iter().enumerate() {
        let Some(formula) = sheet.get(*key).and_then(|c| c.formula.as_deref()) else {
            continue;
        };
        let ranges = formula::referenced_ranges(formula, range_mode);
        for (j, other) in formula_cells.iter().enumerate() {
            if ranges.iter().any(|r| r.contains(other.row, other.col)) {
                dependents[j].push(i);
                indegree[i] += 1;
            }
        }
    }

    let mut queue: VecDeque<usize> = (0..formula_cells.len()).filter(|&i| indegree[i] == 0).collect();
    let mut order = Vec::with_capacity(formula_cells.len());
    while let Some(i) = queue.pop_front() {
        order.push(formula_cells[i]);
        for &d in &dependents[i] {
            indegree[d] -= 1;
            if indegree[d] == 0 {
                queue.push_back(d);
            }
        }
    }

    let blocked = formula_cells
        .iter()
        .enumerate()
        .filter(|(i, _)| indegree[*i] > 0)
        .map(|(_, key)| *key)
        .collect();
    (order, blocked)
}

fn recalc_in_dependency_order(
    sheet: &mut Spreadsheet,
    formula_cells: &[CellKey],
    range_mode: RangeMode,
) -> Vec<CellKey> {
    let (order, blocked) = evaluation_order(sheet, formula_cells, range_mode);
    let mut changed = Vec::new();
    for key in order {
        if let Some(value) = evaluate_cell(sheet, key, range_mode) {
            store_value(sheet, key, value, &mut changed);
        }
    }
    if !blocked.is_empty() {
        debug!("{} formula cells are part of a reference cycle", blocked.len());
    }
    for key in blocked {
        store_value(sheet, key, ErrorSentinel::Ref.to_string(), &mut changed);
    }
    changed
}
