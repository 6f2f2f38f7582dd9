use crate::config::GridConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct ColumnSize {
    pub index: u32,
    pub width: f64,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct RowSize {
    pub index: u32,
    pub height: f64,
}

/// Column widths and row heights: fixed defaults plus sparse overrides.
#[derive(Clone, Debug, PartialEq)]
pub struct GridLayout {
    default_width: f64,
    default_height: f64,
    min_width: f64,
    min_height: f64,
    columns: BTreeMap<u32, f64>,
    rows: BTreeMap<u32, f64>,
}

impl GridLayout {
    pub fn new(config: &GridConfig) -> Self {
        GridLayout {
            default_width: config.default_column_width,
            default_height: config.default_row_height,
            min_width: config.min_column_width,
            min_height: config.min_row_height,
            columns: BTreeMap::new(),
            rows: BTreeMap::new(),
        }
    }

    /// Restores overrides loaded from storage. Stored sizes below the
    /// minimum are raised to it.
    pub fn with_overrides(mut self, columns: &[ColumnSize], rows: &[RowSize]) -> Self {
        for c in columns {
            self.set_column_width(c.index, c.width);
        }
        for r in rows {
            self.set_row_height(r.index, r.height);
        }
        self
    }

    pub fn column_width(&self, index: u32) -> f64 {
        self.columns.get(&index).copied().unwrap_or(self.default_width)
    }

    pub fn row_height(&self, index: u32) -> f64 {
        self.rows.get(&index).copied().unwrap_or(self.default_height)
    }

    pub fn set_column_width(&mut self, index: u32, width: f64) -> f64 {
        let width = width.max(self.min_width);
        self.columns.insert(index, width);
        width
    }

    pub fn set_row_height(&mut self, index: u32, height: f64) -> f64 {
        let height = height.max(self.min_height);
        self.rows.insert(index, height);
        height
    }

    /// Drag resize: `max(minimum, initial + delta)`.
    pub fn resize_column(&mut self, index: u32, initial: f64, delta: f64) -> f64 {
        self.set_column_width(index, initial + delta)
    }

    pub fn resize_row(&mut self, index: u32, initial: f64, delta: f64) -> f64 {
        self.set_row_height(index, initial + delta)
    }

    /// Column under a pointer offset measured from the grid origin,
    /// clamped into `0..count`.
    pub fn column_at(&self, x: f64, count: u32) -> u32 {
        hit_test(x, count, |i| self.column_width(i))
    }

    pub fn row_at(&self, y: f64, count: u32) -> u32 {
        hit_test(y, count, |i| self.row_height(i))
    }

    pub fn column_sizes(&self) -> Vec<ColumnSize> {
        self.columns
            .iter()
            .map(|(&index, &width)| ColumnSize { index, width })
            .collect()
    }

    pub fn row_sizes(&self) -> Vec<RowSize> {
        self.rows
            .iter()
            .map(|(&index, &height)| RowSize { index, height })
            .collect()
    }
}

fn hit_test<F>(offset: f64, count: u32, size_of: F) -> u32
where
    F: Fn(u32) -> f64,
{
    if count == 0 || offset <= 0.0 {
        return 0;
    }
    let mut extent = 0.0;
    for i in 0..count {
        extent += size_of(i);
        if extent > offset {
            return i;
        }
    }
    count - 1
}
