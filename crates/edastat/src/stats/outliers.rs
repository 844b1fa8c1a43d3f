//! Outlier detection by interquartile range and by Z-score.

use serde::{Deserialize, Serialize};

use crate::table::Column;

use super::numeric::{mean, percentage, percentile_sorted, sample_variance, sorted};

/// Outlier detection method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlierMethod {
    Iqr,
    ZScore,
}

impl OutlierMethod {
    pub fn label(&self) -> &'static str {
        match self {
            OutlierMethod::Iqr => "IQR",
            OutlierMethod::ZScore => "Z-Score",
        }
    }
}

/// How many outlier entries a result lists.
///
/// Applies to `outlier_indices`, `outlier_values` and `outlier_zscores`
/// only. Counts and percentages always cover every outlier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListLimit {
    /// Keep the first `n` outliers in column order.
    Capped(usize),
    Unbounded,
}

impl ListLimit {
    pub const DEFAULT_CAP: usize = 100;

    fn take(&self) -> usize {
        match self {
            ListLimit::Capped(n) => *n,
            ListLimit::Unbounded => usize::MAX,
        }
    }
}

impl Default for ListLimit {
    fn default() -> Self {
        ListLimit::Capped(Self::DEFAULT_CAP)
    }
}

/// Method-specific part of an outlier result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum OutlierDetail {
    Iqr {
        q1: f64,
        q3: f64,
        iqr: f64,
        k: f64,
        lower_outlier_count: usize,
        upper_outlier_count: usize,
    },
    ZScore {
        mean: f64,
        std: f64,
        threshold: f64,
        /// Signed Z-scores, parallel to `outlier_values` and capped the same way.
        outlier_zscores: Vec<f64>,
    },
}

/// Outliers of one column under one method.
///
/// The index, value and Z-score lists hold at most the number of entries
/// allowed by the [`ListLimit`] the detection ran with (100 by default),
/// taken in column order. This is a display-size cap: `outlier_count` and
/// `outlier_pct` always describe the full column, so a list can be shorter
/// than the count. See [`OutlierResult::is_truncated`].
///
/// The empty result (`detail == None`) means detection did not apply:
/// no present values, a non-numeric column, or zero standard deviation
/// for the Z-score method. Check [`OutlierResult::method`] before reading
/// bounds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutlierResult {
    pub detail: Option<OutlierDetail>,
    pub outlier_count: usize,
    pub outlier_pct: f64,
    pub lower_bound: Option<f64>,
    pub upper_bound: Option<f64>,
    /// Row positions in the column.
    pub outlier_indices: Vec<usize>,
    pub outlier_values: Vec<f64>,
    /// Smallest value inside the bounds.
    pub normal_min: Option<f64>,
    /// Largest value inside the bounds.
    pub normal_max: Option<f64>,
}

impl OutlierResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn method(&self) -> Option<OutlierMethod> {
        self.detail.as_ref().map(|detail| match detail {
            OutlierDetail::Iqr { .. } => OutlierMethod::Iqr,
            OutlierDetail::ZScore { .. } => OutlierMethod::ZScore,
        })
    }

    /// True when detection did not apply.
    pub fn is_empty(&self) -> bool {
        self.detail.is_none()
    }

    /// True when the lists hold fewer entries than `outlier_count`.
    pub fn is_truncated(&self) -> bool {
        self.outlier_indices.len() < self.outlier_count
    }
}

/// Partition of present values by a pair of strict bounds.
struct Split {
    indices: Vec<usize>,
    values: Vec<f64>,
    count: usize,
    below: usize,
    above: usize,
    normal_min: Option<f64>,
    normal_max: Option<f64>,
}

fn split(values: &[(usize, f64)], lower: f64, upper: f64, limit: ListLimit) -> Split {
    let cap = limit.take();
    let mut out = Split {
        indices: Vec::new(),
        values: Vec::new(),
        count: 0,
        below: 0,
        above: 0,
        normal_min: None,
        normal_max: None,
    };

    for &(index, value) in values {
        let below = value < lower;
        let above = value > upper;
        if below || above {
            out.count += 1;
            out.below += below as usize;
            out.above += above as usize;
            if out.indices.len() < cap {
                out.indices.push(index);
                out.values.push(value);
            }
        } else {
            out.normal_min = Some(out.normal_min.map_or(value, |m: f64| m.min(value)));
            out.normal_max = Some(out.normal_max.map_or(value, |m: f64| m.max(value)));
        }
    }

    out
}

/// Flag values below `q1 - k * iqr` or above `q3 + k * iqr`.
pub(crate) fn detect_iqr(column: &Column, k: f64, limit: ListLimit) -> OutlierResult {
    let Some(values) = column.numeric_values().filter(|v| !v.is_empty()) else {
        return OutlierResult::empty();
    };

    let present: Vec<f64> = values.iter().map(|&(_, v)| v).collect();
    let ordered = sorted(&present);
    let q1 = percentile_sorted(&ordered, 0.25);
    let q3 = percentile_sorted(&ordered, 0.75);
    let iqr = q3 - q1;
    let lower = q1 - k * iqr;
    let upper = q3 + k * iqr;

    let s = split(&values, lower, upper, limit);

    OutlierResult {
        detail: Some(OutlierDetail::Iqr {
            q1,
            q3,
            iqr,
            k,
            lower_outlier_count: s.below,
            upper_outlier_count: s.above,
        }),
        outlier_count: s.count,
        outlier_pct: percentage(s.count, present.len()),
        lower_bound: Some(lower),
        upper_bound: Some(upper),
        outlier_indices: s.indices,
        outlier_values: s.values,
        normal_min: s.normal_min,
        normal_max: s.normal_max,
    }
}

/// Flag values whose absolute Z-score exceeds `threshold`.
///
/// Uses the sample standard deviation, matching the basic statistics.
pub(crate) fn detect_zscore(column: &Column, threshold: f64, limit: ListLimit) -> OutlierResult {
    let Some(values) = column.numeric_values().filter(|v| !v.is_empty()) else {
        return OutlierResult::empty();
    };

    let present: Vec<f64> = values.iter().map(|&(_, v)| v).collect();
    let Some(m) = mean(&present) else {
        return OutlierResult::empty();
    };
    let std = match sample_variance(&present, m).map(f64::sqrt) {
        Some(std) if std > 0.0 && std.is_finite() => std,
        _ => return OutlierResult::empty(),
    };

    let lower = m - threshold * std;
    let upper = m + threshold * std;
    let s = split(&values, lower, upper, limit);
    let outlier_zscores = s.values.iter().map(|v| (v - m) / std).collect();

    OutlierResult {
        detail: Some(OutlierDetail::ZScore {
            mean: m,
            std,
            threshold,
            outlier_zscores,
        }),
        outlier_count: s.count,
        outlier_pct: percentage(s.count, present.len()),
        lower_bound: Some(lower),
        upper_bound: Some(upper),
        outlier_indices: s.indices,
        outlier_values: s.values,
        normal_min: s.normal_min,
        normal_max: s.normal_max,
    }
}

/// Both detection methods on one column, with advice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierSummary {
    pub iqr: OutlierResult,
    pub zscore: OutlierResult,
    pub recommendations: Vec<String>,
}

impl OutlierSummary {
    pub(crate) fn new(iqr: OutlierResult, zscore: OutlierResult) -> Self {
        let recommendations = outlier_recommendations(iqr.outlier_pct, zscore.outlier_pct)
            .iter()
            .map(|s| s.to_string())
            .collect();
        Self {
            iqr,
            zscore,
            recommendations,
        }
    }
}

fn outlier_recommendations(iqr_pct: f64, zscore_pct: f64) -> &'static [&'static str] {
    if iqr_pct == 0.0 && zscore_pct == 0.0 {
        &["No outliers detected"]
    } else if iqr_pct < 5.0 {
        &[
            "Moderate outliers: review them individually",
            "Consider winsorizing",
            "Prefer robust statistics such as the median",
        ]
    } else {
        &[
            "High number of outliers",
            "Check for data-entry errors",
            "Consider a log transform",
            "Apply truncation techniques",
        ]
    }
}
