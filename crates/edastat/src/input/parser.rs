//! File loader: delimited text and JSON into a typed [`Table`].

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use indexmap::IndexMap;
use serde_json::Value;
use sha2::{Digest, Sha256};

use super::infer::{infer_json_column, infer_text_column};
use super::source::{RawTable, SourceMetadata};
use crate::error::{EdaError, Result};
use crate::table::Table;

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Keys of a JSON object that may hold the record list.
const RECORD_KEYS: &[&str] = &["data", "records"];

/// Loader configuration.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Whether delimited files have a header row.
    pub has_header: bool,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            max_rows: None,
            quote: b'"',
        }
    }
}

/// Input format, chosen from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Delimited,
    Tsv,
    Json,
}

impl Format {
    fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "csv" | "txt" => Ok(Format::Delimited),
            "tsv" | "tab" => Ok(Format::Tsv),
            "json" => Ok(Format::Json),
            "xlsx" | "xls" => Err(EdaError::UnsupportedFormat(format!(
                "Excel files are not supported (.{}); export the sheet as CSV",
                ext
            ))),
            "" => Err(EdaError::UnsupportedFormat(format!(
                "no file extension on '{}'",
                path.display()
            ))),
            other => Err(EdaError::UnsupportedFormat(format!(".{}", other))),
        }
    }
}

/// Loads data files into tables.
#[derive(Debug, Clone, Default)]
pub struct Loader {
    config: LoaderConfig,
}

impl Loader {
    /// Create a loader with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// Load a file and return the typed table and its metadata.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<(Table, SourceMetadata)> {
        let path = path.as_ref();
        let format = Format::from_path(path)?;

        let io_err = |e| EdaError::Io {
            path: path.to_path_buf(),
            source: e,
        };
        let mut file = File::open(path).map_err(io_err)?;
        let mut contents = Vec::new();
        file.read_to_end(&mut contents).map_err(io_err)?;
        let size_bytes = contents.len() as u64;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let (text, encoding) = decode(&contents);

        let (table, format_name) = match format {
            Format::Json => (self.parse_json(&text)?, "json".to_string()),
            Format::Tsv | Format::Delimited => {
                let delimiter = match (self.config.delimiter, format) {
                    (Some(d), _) => d,
                    (None, Format::Tsv) => b'\t',
                    (None, _) => detect_delimiter(text.as_bytes())?,
                };
                let format_name = match delimiter {
                    b'\t' => "tsv",
                    b',' => "csv",
                    b';' => "csv-semicolon",
                    b'|' => "psv",
                    _ => "delimited",
                };
                (
                    self.parse_delimited(text.as_bytes(), delimiter)?,
                    format_name.to_string(),
                )
            }
        };

        let metadata = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            size_bytes,
            format_name,
            encoding.to_string(),
            table.row_count(),
            table.column_count(),
        );

        Ok((table, metadata))
    }

    /// Parse delimited text with a known delimiter.
    pub fn parse_delimited(&self, bytes: &[u8], delimiter: u8) -> Result<Table> {
        let raw = self.read_raw(bytes, delimiter)?;
        let columns = raw
            .headers
            .iter()
            .enumerate()
            .map(|(i, name)| infer_text_column(name, raw.column_values(i)))
            .collect();
        Table::new(columns)
    }

    fn read_raw(&self, bytes: &[u8], delimiter: u8) -> Result<RawTable> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let mut records = reader.records();

        let first = match records.next() {
            Some(record) => record?,
            None => return Err(EdaError::EmptyData("The file is empty".to_string())),
        };

        let (headers, mut rows) = if self.config.has_header {
            let names: Vec<String> = first.iter().map(str::to_string).collect();
            (unique_headers(names), Vec::new())
        } else {
            let names: Vec<String> = (0..first.len()).map(|i| format!("column_{}", i + 1)).collect();
            (names, vec![first.iter().map(str::to_string).collect::<Vec<_>>()])
        };

        if headers.is_empty() {
            return Err(EdaError::EmptyData("No columns found".to_string()));
        }
        let expected = headers.len();

        for record in records {
            if self.config.max_rows.is_some_and(|max| rows.len() >= max) {
                break;
            }
            let record = record?;
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(expected, String::new());
            rows.push(row);
        }

        if let Some(max) = self.config.max_rows {
            rows.truncate(max);
        }
        if rows.is_empty() {
            return Err(EdaError::EmptyData("No data rows found".to_string()));
        }

        Ok(RawTable { headers, rows })
    }

    /// Parse JSON: an array of records, an object holding one under
    /// `data` or `records`, an object of equal-length column arrays, or a
    /// single record.
    pub fn parse_json(&self, text: &str) -> Result<Table> {
        let value: Value = serde_json::from_str(text)?;

        let mut columns = match value {
            Value::Array(records) => records_to_columns(records)?,
            Value::Object(mut object) => {
                let key = RECORD_KEYS
                    .iter()
                    .find(|key| object.get(**key).is_some_and(Value::is_array));
                if let Some(Value::Array(records)) = key.and_then(|key| object.remove(*key)) {
                    records_to_columns(records)?
                } else if !object.is_empty() && object.values().all(Value::is_array) {
                    object
                        .into_iter()
                        .map(|(name, values)| match values {
                            Value::Array(values) => (name, values),
                            other => (name, vec![other]),
                        })
                        .collect()
                } else {
                    records_to_columns(vec![Value::Object(object)])?
                }
            }
            _ => {
                return Err(EdaError::UnsupportedFormat(
                    "JSON must be an array of records or an object".to_string(),
                ));
            }
        };

        if let Some(max) = self.config.max_rows {
            for values in columns.values_mut() {
                values.truncate(max);
            }
        }
        if columns.is_empty() || columns.values().all(Vec::is_empty) {
            return Err(EdaError::EmptyData("The file is empty".to_string()));
        }

        Table::new(
            columns
                .into_iter()
                .map(|(name, values)| infer_json_column(&name, values))
                .collect(),
        )
    }
}

/// Pivot records into columns, in order of first key appearance. Keys a
/// record lacks become `null`.
fn records_to_columns(records: Vec<Value>) -> Result<IndexMap<String, Vec<Value>>> {
    let mut columns: IndexMap<String, Vec<Value>> = IndexMap::new();

    for (row, record) in records.into_iter().enumerate() {
        let Value::Object(fields) = record else {
            return Err(EdaError::UnsupportedFormat(format!(
                "JSON record {} is not an object",
                row
            )));
        };
        for (key, value) in fields {
            let column = columns.entry(key).or_insert_with(|| vec![Value::Null; row]);
            column.push(value);
        }
        for column in columns.values_mut() {
            column.resize(row + 1, Value::Null);
        }
    }

    Ok(columns)
}

/// Fill blank header cells and suffix repeated names with `.1`, `.2`, ...
fn unique_headers(names: Vec<String>) -> Vec<String> {
    let mut seen: IndexMap<String, usize> = IndexMap::new();
    let mut out = Vec::with_capacity(names.len());

    for (i, name) in names.into_iter().enumerate() {
        let base = match name.trim() {
            "" => format!("Unnamed: {}", i),
            trimmed => trimmed.to_string(),
        };
        let mut candidate = base.clone();
        while let Some(count) = seen.get_mut(&candidate) {
            *count += 1;
            candidate = format!("{}.{}", base, count);
        }
        seen.insert(candidate.clone(), 0);
        out.push(candidate);
    }

    out
}

/// Decode file contents as UTF-8, falling back to Latin-1.
fn decode(bytes: &[u8]) -> (String, &'static str) {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => (text.to_string(), "utf-8"),
        Err(_) => (bytes.iter().map(|&b| b as char).collect(), "latin-1"),
    }
}

/// Detect the delimiter by analyzing the first few lines.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let lines: Vec<String> = BufReader::new(bytes)
        .lines()
        .take(10)
        .map_while(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return Err(EdaError::EmptyData("The file is empty".to_string()));
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        let consistent = counts.iter().all(|&c| c == first_count);
        let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
        let variance =
            counts.iter().map(|&c| (c as f64 - mean).powi(2)).sum::<f64>() / counts.len() as f64;

        // Consistent counts win; tabs break ties since they rarely occur in values.
        let score = if consistent {
            first_count * 1000 + if delim == b'\t' { 100 } else { 0 }
        } else if variance < 1.0 {
            first_count * 100
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    Ok(best_delimiter)
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}
