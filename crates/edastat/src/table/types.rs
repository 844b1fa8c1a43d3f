//! Core type definitions for column categories and cell values.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Semantic category of a column, derived from its storage type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Integer or floating-point values.
    Numeric,
    /// Text labels.
    Categorical,
    /// Timestamps.
    Datetime,
    /// True/false values.
    Boolean,
    /// Anything else (nested or opaque values).
    Other,
}

impl ColumnKind {
    /// All kinds, in display order.
    pub const ALL: [ColumnKind; 5] = [
        ColumnKind::Numeric,
        ColumnKind::Categorical,
        ColumnKind::Datetime,
        ColumnKind::Boolean,
        ColumnKind::Other,
    ];

    /// Returns true if this kind is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnKind::Numeric)
    }

    /// Whether values of this kind have a natural ordering (for min/max).
    pub fn is_ordered(&self) -> bool {
        !matches!(self, ColumnKind::Other)
    }

    /// Get a lowercase label.
    pub fn label(&self) -> &'static str {
        match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Categorical => "categorical",
            ColumnKind::Datetime => "datetime",
            ColumnKind::Boolean => "boolean",
            ColumnKind::Other => "other",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single present cell value.
///
/// Used where a result can hold a value of any column kind (mode, and the
/// extremes of non-numeric columns).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Boolean(bool),
    Number(f64),
    DateTime(NaiveDateTime),
    Text(String),
}

impl Scalar {
    /// Numeric value, if this is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Boolean(b) => write!(f, "{}", b),
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}
