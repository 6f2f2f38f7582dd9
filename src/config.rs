use crate::address::RangeMode;
use crate::error::Result;
use crate::recalc::RecalcMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Grid engine settings. Every field has a default so a partial JSON
/// document (or `{}`) is a valid configuration.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct GridConfig {
    pub rows: u32,
    pub cols: u32,
    pub default_column_width: f64,
    pub default_row_height: f64,
    pub min_column_width: f64,
    pub min_row_height: f64,
    pub recalc_mode: RecalcMode,
    pub range_mode: RangeMode,
    /// Maximum retained history entries; 0 keeps everything.
    pub history_limit: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            rows: 100,
            cols: 26,
            default_column_width: 100.0,
            default_row_height: 32.0,
            min_column_width: 50.0,
            min_row_height: 20.0,
            recalc_mode: RecalcMode::default(),
            range_mode: RangeMode::default(),
            history_limit: 0,
        }
    }
}

impl GridConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
