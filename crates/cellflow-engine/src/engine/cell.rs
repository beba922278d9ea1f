//! Cell content and the cell store.
//!
//! - [`CellContent`] - what a user put in a cell (number, text or formula)
//! - [`CellValue`] - what that content evaluates to
//! - [`CellStore`] - sparse name -> content storage

use std::collections::BTreeMap;

use super::cell_name::NameRules;
use super::eval::FormulaError;
use super::formula::{Formula, FormulaFormatError};

/// The content stored in a cell.
#[derive(Clone, Debug, PartialEq)]
pub enum CellContent {
    Number(f64),
    Text(String),
    Formula(Formula),
}

impl CellContent {
    /// Reconstruct content from its literal string form.
    /// - Empty string -> empty text (an empty cell)
    /// - Finite number -> Number
    /// - Starts with '=' -> Formula parsed from the rest
    /// - Otherwise -> Text, verbatim
    pub fn parse(literal: &str, rules: &NameRules) -> Result<CellContent, FormulaFormatError> {
        if literal.is_empty() {
            return Ok(CellContent::Text(String::new()));
        }

        if let Ok(n) = literal.parse::<f64>() {
            if n.is_finite() {
                return Ok(CellContent::Number(n));
            }
        }

        if let Some(source) = literal.strip_prefix('=') {
            return Ok(CellContent::Formula(Formula::with_rules(source, rules)?));
        }

        Ok(CellContent::Text(literal.to_string()))
    }

    /// Canonical literal form, the inverse of [`CellContent::parse`].
    pub fn to_literal(&self) -> String {
        match self {
            CellContent::Number(n) => n.to_string(),
            CellContent::Text(s) => s.clone(),
            CellContent::Formula(f) => format!("={}", f),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellContent::Text(s) if s.is_empty())
    }

    pub fn as_formula(&self) -> Option<&Formula> {
        match self {
            CellContent::Formula(f) => Some(f),
            _ => None,
        }
    }
}

impl From<f64> for CellContent {
    fn from(n: f64) -> Self {
        CellContent::Number(n)
    }
}

impl From<Formula> for CellContent {
    fn from(f: Formula) -> Self {
        CellContent::Formula(f)
    }
}

impl From<&str> for CellContent {
    fn from(s: &str) -> Self {
        CellContent::Text(s.to_string())
    }
}

/// The evaluated value of a cell.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Error(FormulaError),
}

impl CellValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, CellValue::Error(_))
    }
}

/// Sparse storage of non-empty cells, keyed by normalized name.
#[derive(Clone, Debug, Default)]
pub struct CellStore {
    cells: BTreeMap<String, CellContent>,
}

impl CellStore {
    pub fn new() -> CellStore {
        CellStore::default()
    }

    /// Replace the content of `name`, returning what was there before.
    /// Empty text clears the cell.
    pub fn set_content(&mut self, name: &str, content: CellContent) -> Option<CellContent> {
        if content.is_empty() {
            self.cells.remove(name)
        } else {
            self.cells.insert(name.to_string(), content)
        }
    }

    /// Put back a previously taken content (`None` clears the cell).
    pub fn restore(&mut self, name: &str, previous: Option<CellContent>) {
        match previous {
            Some(content) => {
                self.cells.insert(name.to_string(), content);
            }
            None => {
                self.cells.remove(name);
            }
        }
    }

    pub fn content(&self, name: &str) -> Option<&CellContent> {
        self.cells.get(name)
    }

    /// Evaluate a cell: formulas run through `lookup`, numbers and text pass
    /// through unchanged. Empty cells read as empty text.
    pub fn value<F>(&self, name: &str, lookup: F) -> CellValue
    where
        F: Fn(&str) -> Option<f64>,
    {
        match self.cells.get(name) {
            None => CellValue::Text(String::new()),
            Some(CellContent::Number(n)) => CellValue::Number(*n),
            Some(CellContent::Text(s)) => CellValue::Text(s.clone()),
            Some(CellContent::Formula(f)) => match f.evaluate(lookup) {
                Ok(n) => CellValue::Number(n),
                Err(e) => CellValue::Error(e),
            },
        }
    }

    /// Names of all non-empty cells, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.cells.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellContent)> + '_ {
        self.cells.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
