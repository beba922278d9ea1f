//! Recalculation engine API.
//!
//! This module provides the core computation engine for the spreadsheet:
//!
//! - [`CellContent`], [`CellValue`], [`CellStore`] - Data structures for cell storage
//! - [`NameRules`], [`is_valid_name`] - Name grammar plus normalizer/validator strategy
//! - [`DependencyGraph`] - Dependent/dependee pairs between cell names
//! - [`Formula`] - Parsed, validated infix formulas
//! - [`Formula::evaluate`] - Two-stack evaluation returning [`FormulaError`] values
//! - [`recalc_order`], [`cells_to_recalculate`] - Recompute order and cycle detection

mod cell;
mod cell_name;
mod cycle;
mod deps;
mod eval;
mod formula;
mod token;

pub use cell::{CellContent, CellStore, CellValue};
pub use cell_name::{NameRules, is_valid_name};
pub use cycle::{CircularDependency, cells_to_recalculate, recalc_order};
pub use deps::{DependencyGraph, SavedDependees};
pub use eval::{EvalResult, FormulaError};
pub use formula::{Formula, FormulaFormatError};
pub use token::{Operator, Token};
