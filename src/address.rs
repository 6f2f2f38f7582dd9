use crate::error::{EngineError, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

lazy_static! {
    static ref REFERENCE_REGEX: Regex = Regex::new(r"^([A-Za-z]+)(\d+)$").unwrap();
}

/// Zero-based cell coordinate. Ordering is row-major.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellPosition {
    pub row: u32,
    pub col: u32,
}

impl CellPosition {
    pub fn new(row: u32, col: u32) -> Self {
        CellPosition { row, col }
    }
}

impl fmt::Display for CellPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_reference(self.row, self.col))
    }
}

impl FromStr for CellPosition {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        parse_reference(s.trim()).ok_or_else(|| EngineError::InvalidReference(s.to_string()))
    }
}

/// How malformed tokens in a range argument are treated.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RangeMode {
    /// Malformed tokens are skipped.
    #[default]
    Lenient,
    /// The first malformed token is an error.
    Strict,
}

/// Inclusive rectangle with `start <= end` on both axes.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub struct CellRange {
    pub start_row: u32,
    pub start_col: u32,
    pub end_row: u32,
    pub end_col: u32,
}

impl CellRange {
    /// Builds a range from two corners given in any order.
    pub fn from_corners(a: CellPosition, b: CellPosition) -> Self {
        CellRange {
            start_row: a.row.min(b.row),
            start_col: a.col.min(b.col),
            end_row: a.row.max(b.row),
            end_col: a.col.max(b.col),
        }
    }

    pub fn single(pos: CellPosition) -> Self {
        Self::from_corners(pos, pos)
    }

    pub fn start(&self) -> CellPosition {
        CellPosition::new(self.start_row, self.start_col)
    }

    pub fn end(&self) -> CellPosition {
        CellPosition::new(self.end_row, self.end_col)
    }

    pub fn height(&self) -> u32 {
        self.end_row - self.start_row + 1
    }

    pub fn width(&self) -> u32 {
        self.end_col - self.start_col + 1
    }

    pub fn contains(&self, row: u32, col: u32) -> bool {
        row >= self.start_row && row <= self.end_row && col >= self.start_col && col <= self.end_col
    }

    /// Every position in the range, row by row.
    pub fn cells(&self) -> impl Iterator<Item = CellPosition> + use<> {
        let range = *self;
        (range.start_row..=range.end_row)
            .flat_map(move |r| (range.start_col..=range.end_col).map(move |c| CellPosition::new(r, c)))
    }

    /// The part of the range inside the first `rows` x `cols` cells, or
    /// `None` when they do not overlap.
    pub fn clip(&self, rows: u32, cols: u32) -> Option<CellRange> {
        if self.start_row >= rows || self.start_col >= cols {
            return None;
        }
        Some(CellRange {
            end_row: self.end_row.min(rows - 1),
            end_col: self.end_col.min(cols - 1),
            ..*self
        })
    }

    /// "A1" for a single cell, "A1:B3" otherwise.
    pub fn label(&self) -> String {
        if self.start() == self.end() {
            self.start().to_string()
        } else {
            format!("{}:{}", self.start(), self.end())
        }
    }
}

/// Converts a zero-based column index to letters (0 -> A, 25 -> Z, 26 -> AA).
pub fn col_to_letters(col: u32) -> String {
    let mut n = col as u64 + 1;
    let mut result = Vec::new();
    while n > 0 {
        n -= 1;
        result.push((b'A' + (n % 26) as u8) as char);
        n /= 26;
    }
    result.iter().rev().collect()
}

/// Decodes column letters, case-insensitive. `None` on empty input,
/// non-letters or overflow.
pub fn letters_to_col(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }
    let mut acc: u64 = 0;
    for b in letters.bytes() {
        if !b.is_ascii_alphabetic() {
            return None;
        }
        let digit = (b.to_ascii_uppercase() - b'A') as u64 + 1;
        acc = acc.checked_mul(26)?.checked_add(digit)?;
    }
    u32::try_from(acc - 1).ok()
}

/// Parses an A1-style reference. No partial parses: "A1x" and "A0" are `None`.
pub fn parse_reference(reference: &str) -> Option<CellPosition> {
    let caps = REFERENCE_REGEX.captures(reference)?;
    let col = letters_to_col(caps.get(1)?.as_str())?;
    let row = caps.get(2)?.as_str().parse::<u64>().ok()?.checked_sub(1)?;
    let row = u32::try_from(row).ok()?;
    Some(CellPosition::new(row, col))
}

pub fn format_reference(row: u32, col: u32) -> String {
    format!("{}{}", col_to_letters(col), row as u64 + 1)
}

/// Lenient range-list parsing; tokens that do not parse are skipped.
pub fn parse_range_list(list: &str) -> Vec<CellRange> {
    list.split(',').filter_map(|token| parse_range_token(token.trim())).collect()
}

/// Range-list parsing with an explicit mode.
pub fn parse_range_list_with(list: &str, mode: RangeMode) -> Result<Vec<CellRange>> {
    match mode {
        RangeMode::Lenient => Ok(parse_range_list(list)),
        RangeMode::Strict => list
            .split(',')
            .map(|token| {
                let token = token.trim();
                parse_range_token(token).ok_or_else(|| EngineError::InvalidRange(token.to_string()))
            })
            .collect(),
    }
}

fn parse_range_token(token: &str) -> Option<CellRange> {
    match token.split_once(':') {
        Some((from, to)) => {
            let from = parse_reference(from.trim())?;
            let to = parse_reference(to.trim())?;
            Some(CellRange::from_corners(from, to))
        }
        None => parse_reference(token).map(CellRange::single),
    }
}
