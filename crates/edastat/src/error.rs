//! Error types for the edastat library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for edastat operations.
///
/// Analysis operations on the engine never fail: degenerate input yields an
/// empty result record instead. Errors come from the boundary around the
/// engine (building tables, loading files, reading configuration).
#[derive(Debug, Error)]
pub enum EdaError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File format not supported.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Empty file or no data to analyze.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Columns of a table do not share the same length.
    #[error("Column '{column}' has {found} rows, expected {expected}")]
    RaggedColumns {
        column: String,
        expected: usize,
        found: usize,
    },

    /// Two columns of a table share a name.
    #[error("Duplicate column name: {0}")]
    DuplicateColumn(String),

    /// Requested column does not exist.
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for edastat operations.
pub type Result<T> = std::result::Result<T, EdaError>;
