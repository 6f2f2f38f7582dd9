//! Formula evaluation.
//!
//! A formula is either a single function call over a range list
//! (`=SUM(A1:A3, C1)`) or an arithmetic expression whose cell references
//! are replaced by their numeric values before parsing (`=A1*(B2+3)`).
//! Evaluation never fails: every problem is reported as an
//! [`ErrorSentinel`] value.

use crate::address::{self, CellRange, RangeMode};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

lazy_static! {
    static ref FUNC_REGEX: Regex = Regex::new(r"^([A-Z]+)\((.*)\)$").unwrap();
    static ref CELL_REF_REGEX: Regex = Regex::new(r"[A-Za-z]+\d+").unwrap();
}

/// Error values a formula cell can display.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub enum ErrorSentinel {
    DivZero,
    Value,
    Ref,
    Name,
    Num,
    Null,
    Error,
}

impl ErrorSentinel {
    pub const ALL: [ErrorSentinel; 7] = [
        ErrorSentinel::DivZero,
        ErrorSentinel::Value,
        ErrorSentinel::Ref,
        ErrorSentinel::Name,
        ErrorSentinel::Num,
        ErrorSentinel::Null,
        ErrorSentinel::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorSentinel::DivZero => "#DIV/0!",
            ErrorSentinel::Value => "#VALUE!",
            ErrorSentinel::Ref => "#REF!",
            ErrorSentinel::Name => "#NAME?",
            ErrorSentinel::Num => "#NUM!",
            ErrorSentinel::Null => "#NULL!",
            ErrorSentinel::Error => "#ERROR!",
        }
    }
}

impl fmt::Display for ErrorSentinel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorSentinel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|e| e.as_str() == s).ok_or(())
    }
}

/// True when a displayed value is one of the error sentinels.
pub fn is_error_value(text: &str) -> bool {
    text.parse::<ErrorSentinel>().is_ok()
}

/// Outcome of evaluating a formula.
#[derive(Clone, Debug, PartialEq)]
pub enum FormulaValue {
    Number(f64),
    /// Input that was not a formula, returned as-is.
    Text(String),
    Error(ErrorSentinel),
}

impl FormulaValue {
    /// Text stored as the cell's displayed value.
    pub fn to_display(&self) -> String {
        match self {
            FormulaValue::Number(n) if n.is_nan() => ErrorSentinel::Value.to_string(),
            FormulaValue::Number(n) if n.is_infinite() => ErrorSentinel::Num.to_string(),
            FormulaValue::Number(n) if *n == 0.0 => "0".to_string(),
            FormulaValue::Number(n) => n.to_string(),
            FormulaValue::Text(s) => s.clone(),
            FormulaValue::Error(e) => e.to_string(),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FormulaValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<f64> for FormulaValue {
    fn from(n: f64) -> Self {
        if n.is_nan() {
            FormulaValue::Error(ErrorSentinel::Value)
        } else {
            FormulaValue::Number(n)
        }
    }
}

/// Failures inside the arithmetic parser. All of them surface as `#ERROR!`.
#[derive(Debug, Error, PartialEq)]
pub enum ArithmeticError {
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),
    #[error("missing closing parenthesis")]
    UnmatchedParen,
    #[error("division by zero")]
    DivisionByZero,
    #[error("trailing input at offset {0}")]
    TrailingInput(usize),
    #[error("expression nested too deeply")]
    TooDeep,
}

/// Deepest run of parentheses and unary signs the arithmetic parser accepts.
pub const MAX_NESTING: usize = 256;

/// Parses cell text as a finite number. Blank or non-numeric text is `None`.
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Evaluates with lenient range parsing.
pub fn evaluate<F>(formula: &str, get_cell_value: F) -> FormulaValue
where
    F: Fn(u32, u32) -> String,
{
    evaluate_with(formula, RangeMode::Lenient, get_cell_value)
}

pub fn evaluate_with<F>(formula: &str, range_mode: RangeMode, get_cell_value: F) -> FormulaValue
where
    F: Fn(u32, u32) -> String,
{
    evaluate_within(formula, range_mode, None, get_cell_value)
}

/// Like [`evaluate_with`], but function ranges are clipped to the first
/// `rows` x `cols` cells. Every function ignores blank cells, so clipping
/// to the area that holds data does not change results.
pub fn evaluate_within<F>(
    formula: &str,
    range_mode: RangeMode,
    extent: Option<(u32, u32)>,
    get_cell_value: F,
) -> FormulaValue
where
    F: Fn(u32, u32) -> String,
{
    let Some(body) = formula.strip_prefix('=') else {
        return FormulaValue::Text(formula.to_string());
    };
    let expr = body.to_uppercase();
    let expr = expr.trim();

    if let Some(captures) = FUNC_REGEX.captures(expr) {
        let name = captures.get(1).map_or("", |m| m.as_str());
        let args = captures.get(2).map_or("", |m| m.as_str());
        let ranges = match address::parse_range_list_with(args, range_mode) {
            Ok(ranges) => ranges,
            Err(_) => return FormulaValue::Error(ErrorSentinel::Ref),
        };
        let values = ranges
            .into_iter()
            .filter_map(|range| match extent {
                Some((rows, cols)) => range.clip(rows, cols),
                None => Some(range),
            })
            .flat_map(|range| range.cells())
            .map(|pos| get_cell_value(pos.row, pos.col));
        return apply_function(name, values);
    }

    let substituted = CELL_REF_REGEX.replace_all(expr, |caps: &Captures| {
        let n = address::parse_reference(&caps[0])
            .and_then(|pos| parse_number(&get_cell_value(pos.row, pos.col)))
            .unwrap_or(0.0);
        n.to_string()
    });

    match evaluate_arithmetic(&substituted) {
        Ok(n) => FormulaValue::from(n),
        Err(_) => FormulaValue::Error(ErrorSentinel::Error),
    }
}

/// Folds the cell values of a function's ranges in one pass.
fn apply_function<I>(name: &str, values: I) -> FormulaValue
where
    I: Iterator<Item = String>,
{
    if matches!(name, "COUNT" | "COUNTA") {
        return FormulaValue::Number(values.filter(|v| !v.trim().is_empty()).count() as f64);
    }
    let numbers = values.filter_map(|v| parse_number(&v));
    match name {
        "SUM" => FormulaValue::from(numbers.sum::<f64>()),
        "AVERAGE" => {
            let (sum, count) = numbers.fold((0.0, 0usize), |(sum, count), n| (sum + n, count + 1));
            if count == 0 {
                FormulaValue::Error(ErrorSentinel::DivZero)
            } else {
                FormulaValue::from(sum / count as f64)
            }
        }
        "MAX" => numbers
            .reduce(f64::max)
            .map_or(FormulaValue::Error(ErrorSentinel::Null), FormulaValue::from),
        "MIN" => numbers
            .reduce(f64::min)
            .map_or(FormulaValue::Error(ErrorSentinel::Null), FormulaValue::from),
        "COUNTNUMBERS" => FormulaValue::Number(numbers.count() as f64),
        _ => FormulaValue::Error(ErrorSentinel::Name),
    }
}

/// Ranges a formula reads, used to order recalculation. Non-formulas and
/// range arguments that fail to parse read nothing.
pub fn referenced_ranges(formula: &str, range_mode: RangeMode) -> Vec<CellRange> {
    let Some(body) = formula.strip_prefix('=') else {
        return Vec::new();
    };
    let expr = body.to_uppercase();
    let expr = expr.trim();

    if let Some(captures) = FUNC_REGEX.captures(expr) {
        let args = captures.get(2).map_or("", |m| m.as_str());
        return address::parse_range_list_with(args, range_mode).unwrap_or_default();
    }

    CELL_REF_REGEX
        .find_iter(expr)
        .filter_map(|m| address::parse_reference(m.as_str()))
        .map(CellRange::single)
        .collect()
}

/// Evaluates `+ - * / ( )` over decimal literals with the usual precedence.
pub fn evaluate_arithmetic(expr: &str) -> Result<f64, ArithmeticError> {
    let mut parser = ArithmeticParser {
        chars: expr.chars().collect(),
        pos: 0,
        depth: 0,
    };
    let value = parser.expression()?;
    parser.skip_whitespace();
    if parser.pos < parser.chars.len() {
        return Err(ArithmeticError::TrailingInput(parser.pos));
    }
    Ok(value)
}

struct ArithmeticParser {
    chars: Vec<char>,
    pos: usize,
    depth: usize,
}

impl ArithmeticParser {
    fn skip_whitespace(&mut self) {
        while self.pos < self.chars.len() && self.chars[self.pos].is_whitespace() {
            self.pos += 1;
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_whitespace();
        self.chars.get(self.pos).copied()
    }

    fn expression(&mut self) -> Result<f64, ArithmeticError> {
        let mut value = self.term()?;
        while let Some(op @ ('+' | '-')) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            if op == '+' {
                value += rhs;
            } else {
                value -= rhs;
            }
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<f64, ArithmeticError> {
        let mut value = self.factor()?;
        while let Some(op @ ('*' | '/')) = self.peek() {
            self.pos += 1;
            let rhs = self.factor()?;
            if op == '*' {
                value *= rhs;
            } else {
                if rhs == 0.0 {
                    return Err(ArithmeticError::DivisionByZero);
                }
                value /= rhs;
            }
        }
        Ok(value)
    }

    fn factor(&mut self) -> Result<f64, ArithmeticError> {
        if self.depth >= MAX_NESTING {
            return Err(ArithmeticError::TooDeep);
        }
        self.depth += 1;
        let value = self.primary();
        self.depth -= 1;
        value
    }

    fn primary(&mut self) -> Result<f64, ArithmeticError> {
        match self.peek() {
            None => Err(ArithmeticError::UnexpectedEnd),
            Some('-') => {
                self.pos += 1;
                Ok(-self.factor()?)
            }
            Some('+') => {
                self.pos += 1;
                self.factor()
            }
            Some('(') => {
                self.pos += 1;
                let value = self.expression()?;
                if self.peek() != Some(')') {
                    return Err(ArithmeticError::UnmatchedParen);
                }
                self.pos += 1;
                Ok(value)
            }
            Some(c) if c.is_ascii_digit() || c == '.' => self.number(),
            Some(c) => Err(ArithmeticError::UnexpectedChar(c)),
        }
    }

    fn number(&mut self) -> Result<f64, ArithmeticError> {
        let start = self.pos;
        while self.pos < self.chars.len()
            && (self.chars[self.pos].is_ascii_digit() || self.chars[self.pos] == '.')
        {
            self.pos += 1;
        }
        let literal: String = self.chars[start..self.pos].iter().collect();
        literal
            .parse::<f64>()
            .map_err(|_| ArithmeticError::UnexpectedChar(self.chars[start]))
    }
}
