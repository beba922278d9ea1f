//! cellflow-core - Spreadsheet document model + snapshot storage.

pub mod document;
pub mod error;
pub mod storage;

pub use document::{SheetOptions, Spreadsheet};
pub use error::{Result, SheetError};
pub use storage::Snapshot;

pub use cellflow_engine::engine::{CellContent, CellValue, Formula, FormulaError, NameRules};
