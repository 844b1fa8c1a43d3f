//! Static column typing for loaded cells.
//!
//! A column gets the narrowest storage every present cell fits:
//! integer, then float, then boolean, then datetime, falling back to text.

use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::table::{Column, ColumnData};

use super::source::is_null_value;

// Cheap shape checks before trying chrono formats.
static DATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"^\d{4}-\d{1,2}-\d{1,2}").unwrap(), // ISO date
        Regex::new(r"^\d{4}/\d{1,2}/\d{1,2}").unwrap(), // Alt ISO
        Regex::new(r"^\d{1,2}/\d{1,2}/\d{4}").unwrap(), // US or European date
        Regex::new(r"^\d{1,2}-\d{1,2}-\d{4}").unwrap(), // European date
    ]
});

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y"];

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" => Some(true),
        "false" | "no" => Some(false),
        _ => None,
    }
}

fn parse_float(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_with(value: &str, format: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, format).ok().or_else(|| {
        NaiveDate::parse_from_str(value, format)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    })
}

/// Parse every value with the first format that accepts all of them.
///
/// Using one format per column keeps `01/02/2024` from meaning different
/// days in different rows.
fn parse_datetimes(present: &[&str]) -> Option<Vec<NaiveDateTime>> {
    if !present
        .iter()
        .all(|v| DATE_PATTERNS.iter().any(|p| p.is_match(v)))
    {
        return None;
    }

    DATETIME_FORMATS
        .iter()
        .chain(DATE_FORMATS)
        .find_map(|format| present.iter().map(|v| parse_with(v, format)).collect())
}

/// Re-expand values parsed from present cells into a full column.
fn scatter<T>(cells: &[Option<&str>], parsed: Vec<T>) -> Vec<Option<T>> {
    let mut parsed = parsed.into_iter();
    cells
        .iter()
        .map(|cell| cell.and_then(|_| parsed.next()))
        .collect()
}

/// Type a column of text cells, treating null tokens as missing.
pub(crate) fn infer_text_column<'a>(
    name: &str,
    values: impl IntoIterator<Item = &'a str>,
) -> Column {
    let cells: Vec<Option<&str>> = values
        .into_iter()
        .map(|v| (!is_null_value(v)).then(|| v.trim()))
        .collect();
    let present: Vec<&str> = cells.iter().flatten().copied().collect();

    // No evidence either way: pandas-style float column of missing values.
    if present.is_empty() {
        return Column::new(name, ColumnData::Float(vec![None; cells.len()]));
    }

    let data = if let Some(ints) = all(&present, |v| v.parse::<i64>().ok()) {
        ColumnData::Integer(scatter(&cells, ints))
    } else if let Some(floats) = all(&present, parse_float) {
        ColumnData::Float(scatter(&cells, floats))
    } else if let Some(flags) = all(&present, parse_bool) {
        ColumnData::Boolean(scatter(&cells, flags))
    } else if let Some(stamps) = parse_datetimes(&present) {
        ColumnData::DateTime(scatter(&cells, stamps))
    } else {
        ColumnData::Text(cells.iter().map(|c| c.map(str::to_string)).collect())
    };

    Column::new(name, data)
}

fn all<T>(present: &[&str], parse: impl Fn(&str) -> Option<T>) -> Option<Vec<T>> {
    present.iter().map(|v| parse(v)).collect()
}

/// Type a column of JSON values. `null` is missing; strings are kept as
/// text; arrays and objects make the whole column opaque.
pub(crate) fn infer_json_column(name: &str, values: Vec<Value>) -> Column {
    let present: Vec<&Value> = values.iter().filter(|v| !v.is_null()).collect();

    if present.is_empty() {
        return Column::new(name, ColumnData::Float(vec![None; values.len()]));
    }

    let nested = present.iter().any(|v| v.is_array() || v.is_object());
    let data = if nested {
        ColumnData::Other(values.into_iter().map(|v| (!v.is_null()).then_some(v)).collect())
    } else if present.iter().all(|v| v.is_i64()) {
        ColumnData::Integer(values.iter().map(Value::as_i64).collect())
    } else if present.iter().all(|v| v.is_number()) {
        ColumnData::Float(values.iter().map(Value::as_f64).collect())
    } else if present.iter().all(|v| v.is_boolean()) {
        ColumnData::Boolean(values.iter().map(Value::as_bool).collect())
    } else {
        ColumnData::Text(
            values
                .iter()
                .map(|v| match v {
                    Value::Null => None,
                    Value::String(s) => Some(s.clone()),
                    other => Some(other.to_string()),
                })
                .collect(),
        )
    };

    Column::new(name, data)
}
