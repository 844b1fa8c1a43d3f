//! Typed column storage.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::types::ColumnKind;

/// Column values in their storage type. `None` marks a missing cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "values", rename_all = "snake_case")]
pub enum ColumnData {
    Integer(Vec<Option<i64>>),
    Float(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
    DateTime(Vec<Option<NaiveDateTime>>),
    Boolean(Vec<Option<bool>>),
    /// Opaque values (e.g. nested JSON) with no natural ordering.
    Other(Vec<Option<serde_json::Value>>),
}

impl ColumnData {
    /// Number of positions, present or missing.
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Integer(v) => v.len(),
            ColumnData::Float(v) => v.len(),
            ColumnData::Text(v) => v.len(),
            ColumnData::DateTime(v) => v.len(),
            ColumnData::Boolean(v) => v.len(),
            ColumnData::Other(v) => v.len(),
        }
    }

    /// Returns true if there are no positions.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The semantic category implied by the storage type.
    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnData::Integer(_) | ColumnData::Float(_) => ColumnKind::Numeric,
            ColumnData::Text(_) => ColumnKind::Categorical,
            ColumnData::DateTime(_) => ColumnKind::Datetime,
            ColumnData::Boolean(_) => ColumnKind::Boolean,
            ColumnData::Other(_) => ColumnKind::Other,
        }
    }

    /// Name of the storage type.
    pub fn type_name(&self) -> &'static str {
        match self {
            ColumnData::Integer(_) => "int64",
            ColumnData::Float(_) => "float64",
            ColumnData::Text(_) => "text",
            ColumnData::DateTime(_) => "datetime",
            ColumnData::Boolean(_) => "bool",
            ColumnData::Other(_) => "object",
        }
    }

    /// Whether the cell at `index` is missing. Out-of-range is not missing.
    pub fn is_missing(&self, index: usize) -> bool {
        fn check<T>(values: &[Option<T>], index: usize) -> bool {
            values.get(index).is_some_and(Option::is_none)
        }

        match self {
            ColumnData::Integer(v) => check(v, index),
            ColumnData::Float(v) => check(v, index),
            ColumnData::Text(v) => check(v, index),
            ColumnData::DateTime(v) => check(v, index),
            ColumnData::Boolean(v) => check(v, index),
            ColumnData::Other(v) => check(v, index),
        }
    }

    /// One flag per position, `true` where the cell is missing.
    pub fn missing_mask(&self) -> Vec<bool> {
        fn mask<T>(values: &[Option<T>]) -> Vec<bool> {
            values.iter().map(Option::is_none).collect()
        }

        match self {
            ColumnData::Integer(v) => mask(v),
            ColumnData::Float(v) => mask(v),
            ColumnData::Text(v) => mask(v),
            ColumnData::DateTime(v) => mask(v),
            ColumnData::Boolean(v) => mask(v),
            ColumnData::Other(v) => mask(v),
        }
    }
}

/// A named, immutable sequence of values of one kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    /// Create a column from typed storage.
    ///
    /// Non-finite floats (`NaN`, `±inf`) are normalised to missing cells.
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        let data = match data {
            ColumnData::Float(values) => ColumnData::Float(
                values
                    .into_iter()
                    .map(|v| v.filter(|x| x.is_finite()))
                    .collect(),
            ),
            other => other,
        };

        Self {
            name: name.into(),
            data,
        }
    }

    /// Create an integer column.
    pub fn integer(name: impl Into<String>, values: impl IntoIterator<Item = Option<i64>>) -> Self {
        Self::new(name, ColumnData::Integer(values.into_iter().collect()))
    }

    /// Create a float column. `NaN` and infinities become missing cells.
    pub fn float(name: impl Into<String>, values: impl IntoIterator<Item = Option<f64>>) -> Self {
        Self::new(name, ColumnData::Float(values.into_iter().collect()))
    }

    /// Create a text column.
    pub fn text<S: Into<String>>(
        name: impl Into<String>,
        values: impl IntoIterator<Item = Option<S>>,
    ) -> Self {
        Self::new(
            name,
            ColumnData::Text(values.into_iter().map(|v| v.map(Into::into)).collect()),
        )
    }

    /// Create a datetime column.
    pub fn datetime(
        name: impl Into<String>,
        values: impl IntoIterator<Item = Option<NaiveDateTime>>,
    ) -> Self {
        Self::new(name, ColumnData::DateTime(values.into_iter().collect()))
    }

    /// Create a boolean column.
    pub fn boolean(name: impl Into<String>, values: impl IntoIterator<Item = Option<bool>>) -> Self {
        Self::new(name, ColumnData::Boolean(values.into_iter().collect()))
    }

    /// Create a column of opaque values.
    pub fn other(
        name: impl Into<String>,
        values: impl IntoIterator<Item = Option<serde_json::Value>>,
    ) -> Self {
        Self::new(name, ColumnData::Other(values.into_iter().collect()))
    }

    /// Column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Underlying storage.
    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    /// Semantic category.
    pub fn kind(&self) -> ColumnKind {
        self.data.kind()
    }

    /// Number of positions, present or missing.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the column has no positions.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether the cell at `index` is missing.
    pub fn is_missing(&self, index: usize) -> bool {
        self.data.is_missing(index)
    }

    /// One flag per position, `true` where the cell is missing.
    pub fn missing_mask(&self) -> Vec<bool> {
        self.data.missing_mask()
    }

    /// Number of missing cells.
    pub fn missing_count(&self) -> usize {
        self.missing_mask().into_iter().filter(|&m| m).count()
    }

    /// Number of present cells.
    pub fn present_count(&self) -> usize {
        self.len() - self.missing_count()
    }

    /// Present numeric values with their row index, in column order.
    ///
    /// Returns `None` for non-numeric columns.
    pub fn numeric_values(&self) -> Option<Vec<(usize, f64)>> {
        match &self.data {
            ColumnData::Integer(values) => Some(
                values
                    .iter()
                    .enumerate()
                    .filter_map(|(i, v)| v.map(|x| (i, x as f64)))
                    .collect(),
            ),
            ColumnData::Float(values) => Some(
                values
                    .iter()
                    .enumerate()
                    .filter_map(|(i, v)| v.map(|x| (i, x)))
                    .collect(),
            ),
            _ => None,
        }
    }

    /// Present numeric values without indices. Empty for non-numeric columns.
    pub fn present_f64(&self) -> Vec<f64> {
        self.numeric_values()
            .map(|values| values.into_iter().map(|(_, v)| v).collect())
            .unwrap_or_default()
    }
}
