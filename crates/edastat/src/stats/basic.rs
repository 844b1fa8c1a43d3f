//! Per-column descriptive statistics.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::table::{Column, ColumnData, Scalar};

use super::numeric::{cmp_f64, mean, percentage, percentile_sorted, sample_variance};

/// Central tendency, dispersion, extremes and cardinality of one column.
///
/// Numeric-only fields (`mean`, `median`, `std`, `variance`, `range`) are
/// `None` for other kinds. `std` and `variance` are sample estimates
/// (n - 1 denominator) and need at least two present values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicStats {
    /// Present values.
    pub count: usize,
    /// All positions.
    pub count_total: usize,
    pub missing: usize,
    pub missing_pct: f64,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    /// Most frequent present value; on a tie, the first in natural order.
    pub mode: Option<Scalar>,
    /// How many values share the highest frequency.
    pub mode_count: usize,
    pub std: Option<f64>,
    pub variance: Option<f64>,
    pub min: Option<Scalar>,
    pub max: Option<Scalar>,
    pub range: Option<f64>,
    /// Distinct present values.
    pub unique: usize,
}

impl BasicStats {
    /// Result for a column without present values.
    pub fn empty(count_total: usize) -> Self {
        Self {
            count: 0,
            count_total,
            missing: count_total,
            missing_pct: percentage(count_total, count_total),
            mean: None,
            median: None,
            mode: None,
            mode_count: 0,
            std: None,
            variance: None,
            min: None,
            max: None,
            range: None,
            unique: 0,
        }
    }

    /// Numeric minimum, if any.
    pub fn min_f64(&self) -> Option<f64> {
        self.min.as_ref().and_then(Scalar::as_f64)
    }

    /// Numeric maximum, if any.
    pub fn max_f64(&self) -> Option<f64> {
        self.max.as_ref().and_then(Scalar::as_f64)
    }
}

/// Summary of sorted present values: extremes, mode and cardinality.
struct Tally<T> {
    min: T,
    max: T,
    mode: T,
    mode_count: usize,
    unique: usize,
}

/// Sort `values` and walk runs of equal values.
fn tally<T: Clone>(mut values: Vec<T>, cmp: impl Fn(&T, &T) -> Ordering) -> Option<Tally<T>> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(&cmp);

    let mut unique = 0;
    let mut best = (0usize, 0usize); // (run length, start)
    let mut ties = 0;
    let mut start = 0;

    for run in values.chunk_by(|a, b| cmp(a, b) == Ordering::Equal) {
        unique += 1;
        match run.len().cmp(&best.0) {
            Ordering::Greater => {
                best = (run.len(), start);
                ties = 1;
            }
            Ordering::Equal => ties += 1,
            Ordering::Less => {}
        }
        start += run.len();
    }

    Some(Tally {
        min: values[0].clone(),
        max: values[values.len() - 1].clone(),
        mode: values[best.1].clone(),
        mode_count: ties,
        unique,
    })
}

fn present<T: Clone>(values: &[Option<T>]) -> Vec<T> {
    values.iter().flatten().cloned().collect()
}

fn other_repr(values: &[Option<serde_json::Value>]) -> Vec<String> {
    values.iter().flatten().map(|v| v.to_string()).collect()
}

/// Compute descriptive statistics for any column kind.
pub fn basic_stats(column: &Column) -> BasicStats {
    let count_total = column.len();
    let count = column.present_count();
    if count == 0 {
        return BasicStats::empty(count_total);
    }

    let mut stats = BasicStats::empty(count_total);
    stats.count = count;
    stats.missing = count_total - count;
    stats.missing_pct = percentage(stats.missing, count_total);

    // Extremes only exist for kinds with a natural order.
    let ordered = column.kind().is_ordered();

    match column.data() {
        ColumnData::Integer(_) | ColumnData::Float(_) => {
            let values = column.present_f64();
            fill_numeric(&mut stats, &values);
        }
        ColumnData::Text(values) => {
            fill_tally(&mut stats, present(values), Ord::cmp, Scalar::Text, ordered);
        }
        ColumnData::DateTime(values) => {
            fill_tally(&mut stats, present(values), Ord::cmp, Scalar::DateTime, ordered);
        }
        ColumnData::Boolean(values) => {
            fill_tally(&mut stats, present(values), Ord::cmp, Scalar::Boolean, ordered);
        }
        ColumnData::Other(values) => {
            fill_tally(&mut stats, other_repr(values), Ord::cmp, Scalar::Text, ordered);
        }
    }

    stats
}

fn fill_numeric(stats: &mut BasicStats, values: &[f64]) {
    let Some(t) = tally(values.to_vec(), cmp_f64) else {
        return;
    };

    let mut sorted = values.to_vec();
    sorted.sort_by(cmp_f64);

    let m = mean(values);
    let variance = m.and_then(|m| sample_variance(values, m));

    stats.mean = m;
    stats.median = Some(percentile_sorted(&sorted, 0.5));
    stats.variance = variance;
    stats.std = variance.map(f64::sqrt);
    stats.range = Some(t.max - t.min);
    stats.min = Some(Scalar::Number(t.min));
    stats.max = Some(Scalar::Number(t.max));
    stats.mode = Some(Scalar::Number(t.mode));
    stats.mode_count = t.mode_count;
    stats.unique = t.unique;
}

fn fill_tally<T: Clone>(
    stats: &mut BasicStats,
    values: Vec<T>,
    cmp: impl Fn(&T, &T) -> Ordering,
    wrap: impl Fn(T) -> Scalar,
    with_extremes: bool,
) {
    if let Some(t) = tally(values, cmp) {
        if with_extremes {
            stats.min = Some(wrap(t.min));
            stats.max = Some(wrap(t.max));
        }
        stats.mode = Some(wrap(t.mode));
        stats.mode_count = t.mode_count;
        stats.unique = t.unique;
    }
}

/// Number of distinct present values in a column.
pub(crate) fn distinct_count(column: &Column) -> usize {
    fn count<T: Clone>(values: Vec<T>, cmp: impl Fn(&T, &T) -> Ordering) -> usize {
        tally(values, cmp).map(|t| t.unique).unwrap_or(0)
    }

    match column.data() {
        ColumnData::Integer(values) => count(present(values), Ord::cmp),
        ColumnData::Float(values) => count(present(values), cmp_f64),
        ColumnData::Text(values) => count(present(values), Ord::cmp),
        ColumnData::DateTime(values) => count(present(values), Ord::cmp),
        ColumnData::Boolean(values) => count(present(values), Ord::cmp),
        ColumnData::Other(values) => count(other_repr(values), Ord::cmp),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn test_numeric_stats() {
        let col = Column::float("x", [Some(2.0), Some(4.0), Some(4.0), None, Some(6.0)]);
        let stats = basic_stats(&col);

        assert_eq!(stats.count, 4);
        assert_eq!(stats.count_total, 5);
        assert_eq!(stats.missing, 1);
        assert!((stats.missing_pct - 20.0).abs() < 1e-12);
        assert_eq!(stats.mean, Some(4.0));
        assert_eq!(stats.median, Some(4.0));
        assert_eq!(stats.mode, Some(Scalar::Number(4.0)));
        assert_eq!(stats.mode_count, 1);
        assert!((stats.variance.unwrap() - 8.0 / 3.0).abs() < 1e-12);
        assert!((stats.std.unwrap() - (8.0f64 / 3.0).sqrt()).abs() < 1e-12);
        assert_eq!(stats.min_f64(), Some(2.0));
        assert_eq!(stats.max_f64(), Some(6.0));
        assert_eq!(stats.range, Some(4.0));
        assert_eq!(stats.unique, 3);
    }

    #[test]
    fn test_constant_column() {
        let col = Column::integer("c", std::iter::repeat(Some(7)).take(10));
        let stats = basic_stats(&col);

        assert_eq!(stats.mean, Some(7.0));
        assert_eq!(stats.std, Some(0.0));
        assert_eq!(stats.range, Some(0.0));
        assert_eq!(stats.unique, 1);
        assert_eq!(stats.mode_count, 1);
    }

    #[test]
    fn test_mode_tie_takes_smallest() {
        let col = Column::integer("t", [Some(3), Some(1), Some(3), Some(1), Some(2)]);
        let stats = basic_stats(&col);

        assert_eq!(stats.mode, Some(Scalar::Number(1.0)));
        assert_eq!(stats.mode_count, 2);
    }

    #[test]
    fn test_single_value_has_no_dispersion() {
        let stats = basic_stats(&Column::float("one", [Some(5.0)]));
        assert_eq!(stats.mean, Some(5.0));
        assert!(stats.std.is_none());
        assert!(stats.variance.is_none());
        assert_eq!(stats.range, Some(0.0));
    }

    #[test]
    fn test_text_column_uses_lexicographic_order() {
        let col = Column::text("city", [Some("Lima"), Some("Bogota"), None, Some("Lima")]);
        let stats = basic_stats(&col);

        assert!(stats.mean.is_none());
        assert!(stats.median.is_none());
        assert!(stats.std.is_none());
        assert!(stats.range.is_none());
        assert_eq!(stats.min, Some(Scalar::Text("Bogota".into())));
        assert_eq!(stats.max, Some(Scalar::Text("Lima".into())));
        assert_eq!(stats.mode, Some(Scalar::Text("Lima".into())));
        assert_eq!(stats.unique, 2);
    }

    #[test]
    fn test_datetime_and_boolean_extremes() {
        let d = |day| {
            NaiveDate::from_ymd_opt(2024, 1, day)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        };
        let dates = basic_stats(&Column::datetime("d", [Some(d(5)), Some(d(2)), Some(d(9))]));
        assert_eq!(dates.min, Some(Scalar::DateTime(d(2))));
        assert_eq!(dates.max, Some(Scalar::DateTime(d(9))));
        assert!(dates.range.is_none());

        let flags = basic_stats(&Column::boolean("b", [Some(true), Some(false), Some(true)]));
        assert_eq!(flags.min, Some(Scalar::Boolean(false)));
        assert_eq!(flags.max, Some(Scalar::Boolean(true)));
        assert_eq!(flags.mode, Some(Scalar::Boolean(true)));
    }

    #[test]
    fn test_other_column_has_no_extremes() {
        let col = Column::other(
            "meta",
            [
                Some(serde_json::json!({"a": 1})),
                Some(serde_json::json!([1, 2])),
                Some(serde_json::json!({"a": 1})),
            ],
        );
        let stats = basic_stats(&col);

        assert!(stats.min.is_none());
        assert!(stats.max.is_none());
        assert_eq!(stats.unique, 2);
        assert_eq!(stats.mode, Some(Scalar::Text("{\"a\":1}".into())));
    }

    #[test]
    fn test_all_missing_column() {
        let stats = basic_stats(&Column::float("gone", [None, None, None]));

        assert_eq!(stats.count, 0);
        assert_eq!(stats.count_total, 3);
        assert_eq!(stats.missing, 3);
        assert_eq!(stats.missing_pct, 100.0);
        assert!(stats.mean.is_none());
        assert!(stats.mode.is_none());
        assert_eq!(stats.unique, 0);
    }

    #[test]
    fn test_empty_column() {
        let stats = basic_stats(&Column::float("none", []));
        assert_eq!(stats.count, 0);
        assert_eq!(stats.count_total, 0);
        assert_eq!(stats.missing_pct, 0.0);
    }

    #[test]
    fn test_distinct_count() {
        assert_eq!(distinct_count(&Column::integer("a", [Some(1), Some(1), None])), 1);
        assert_eq!(distinct_count(&Column::text("b", [Some("x"), Some("y")])), 2);
        assert_eq!(distinct_count(&Column::float("c", [None])), 0);
    }
}
