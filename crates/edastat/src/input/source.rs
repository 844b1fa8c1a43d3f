//! Source file metadata and the raw cell grid read from it.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata about a loaded data file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    pub path: PathBuf,
    /// `sha256:` followed by the hex digest of the file contents.
    pub hash: String,
    pub size_bytes: u64,
    /// Detected format (csv, tsv, json, ...).
    pub format: String,
    /// Text encoding the contents were decoded with.
    pub encoding: String,
    /// Data rows loaded (excluding header).
    pub row_count: usize,
    pub column_count: usize,
    /// When the file was loaded.
    pub analyzed_at: DateTime<Utc>,
}

impl SourceMetadata {
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        format: String,
        encoding: String,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            format,
            encoding,
            row_count,
            column_count,
            analyzed_at: Utc::now(),
        }
    }
}

/// Row-major grid of text cells from a delimited file, before typing.
#[derive(Debug, Clone)]
pub(crate) struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Cells of one column, top to bottom.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(index).map(String::as_str).unwrap_or(""))
    }
}

/// Whether a text cell stands for a missing value.
pub fn is_null_value(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("na")
        || trimmed.eq_ignore_ascii_case("n/a")
        || trimmed.eq_ignore_ascii_case("null")
        || trimmed.eq_ignore_ascii_case("none")
        || trimmed.eq_ignore_ascii_case("nil")
        || trimmed.eq_ignore_ascii_case("nan")
        || trimmed == "."
        || trimmed == "-"
}
