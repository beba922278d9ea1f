//! Error types for Cellflow core.

use thiserror::Error;

use cellflow_engine::engine::{CircularDependency, FormulaFormatError};

/// Errors that can occur while editing or persisting a spreadsheet
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Invalid cell name: {0}")]
    InvalidName(String),

    #[error(transparent)]
    FormulaFormat(#[from] FormulaFormatError),

    #[error(transparent)]
    CircularDependency(#[from] CircularDependency),

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: String, found: String },

    #[error("Bad snapshot entry for {name}: {message}")]
    Snapshot { name: String, message: String },

    #[error("No file path set")]
    NoFilePath,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SheetError>;
