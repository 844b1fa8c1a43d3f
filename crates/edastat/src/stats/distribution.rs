//! Percentiles, shape and normality of numeric columns.

use serde::{Deserialize, Serialize};

use crate::table::Column;

use super::normality::{NormalityFailure, NormalityTest, draw_sample, sample_seed, shapiro_wilk};
use super::numeric::{Moments, mean, percentile_sorted, sorted};

/// Minimum number of present values for distribution statistics.
pub const MIN_DISTRIBUTION_VALUES: usize = 3;

/// Shape values with magnitude below this are labelled neutral.
const SHAPE_TOLERANCE: f64 = 0.5;

/// Fixed percentile set, by linear interpolation between order statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Percentiles {
    pub p10: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
    pub p95: f64,
    pub p99: f64,
}

impl Percentiles {
    /// `sorted` must be non-empty and in ascending order.
    pub(crate) fn of_sorted(sorted: &[f64]) -> Self {
        let at = |q| percentile_sorted(sorted, q);
        Self {
            p10: at(0.10),
            p25: at(0.25),
            p50: at(0.50),
            p75: at(0.75),
            p90: at(0.90),
            p95: at(0.95),
            p99: at(0.99),
        }
    }

    pub fn iqr(&self) -> f64 {
        self.p75 - self.p25
    }

    /// `(quantile label, value)` pairs in ascending order.
    pub fn entries(&self) -> [(&'static str, f64); 7] {
        [
            ("p10", self.p10),
            ("p25", self.p25),
            ("p50", self.p50),
            ("p75", self.p75),
            ("p90", self.p90),
            ("p95", self.p95),
            ("p99", self.p99),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkewShape {
    Symmetric,
    RightSkewed,
    LeftSkewed,
}

impl SkewShape {
    pub fn classify(skewness: f64) -> Self {
        if skewness.abs() < SHAPE_TOLERANCE {
            SkewShape::Symmetric
        } else if skewness > 0.0 {
            SkewShape::RightSkewed
        } else {
            SkewShape::LeftSkewed
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SkewShape::Symmetric => "symmetric",
            SkewShape::RightSkewed => "positive skew (right tail)",
            SkewShape::LeftSkewed => "negative skew (left tail)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KurtosisShape {
    Mesokurtic,
    Leptokurtic,
    Platykurtic,
}

impl KurtosisShape {
    pub fn classify(excess_kurtosis: f64) -> Self {
        if excess_kurtosis.abs() < SHAPE_TOLERANCE {
            KurtosisShape::Mesokurtic
        } else if excess_kurtosis > 0.0 {
            KurtosisShape::Leptokurtic
        } else {
            KurtosisShape::Platykurtic
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            KurtosisShape::Mesokurtic => "mesokurtic",
            KurtosisShape::Leptokurtic => "leptokurtic (heavy tails)",
            KurtosisShape::Platykurtic => "platykurtic (light tails)",
        }
    }
}

/// Distribution shape of a numeric column.
///
/// Every field is `None` when the column is not numeric or has fewer than
/// three present values. `skewness` and `kurtosis` are also `None` at zero
/// variance, and `normality`/`is_normal` are `None` when the test fails
/// numerically. Percentiles and moments always use every present value;
/// only the normality test may run on a sample.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DistributionStats {
    pub percentiles: Option<Percentiles>,
    pub iqr: Option<f64>,
    pub skewness: Option<f64>,
    /// Excess kurtosis (0 for a normal distribution).
    pub kurtosis: Option<f64>,
    pub skew_shape: Option<SkewShape>,
    pub kurtosis_shape: Option<KurtosisShape>,
    pub normality: Option<NormalityTest>,
    pub is_normal: Option<bool>,
}

impl DistributionStats {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.percentiles.is_none()
    }
}

/// Distribution statistics plus the reason the normality test was dropped.
pub(crate) struct DistributionRun {
    pub stats: DistributionStats,
    pub normality_failure: Option<NormalityFailure>,
}

/// Compute distribution statistics, testing normality on at most
/// `sample_cap` values and comparing its p-value against `alpha`.
pub(crate) fn distribution_stats(column: &Column, sample_cap: usize, alpha: f64) -> DistributionRun {
    let empty = DistributionRun {
        stats: DistributionStats::empty(),
        normality_failure: None,
    };

    if !column.kind().is_numeric() {
        return empty;
    }
    let values = column.present_f64();
    if values.len() < MIN_DISTRIBUTION_VALUES {
        return empty;
    }
    let Some(m) = mean(&values) else {
        return empty;
    };

    let percentiles = Percentiles::of_sorted(&sorted(&values));
    let moments = Moments::about(&values, m);
    let skewness = moments.skewness();
    let kurtosis = moments.excess_kurtosis();

    let sample = draw_sample(
        &values,
        sample_cap,
        sample_seed(column.name(), values.len()),
    );
    let sampled = sample.len() < values.len();

    let (normality, normality_failure) = match shapiro_wilk(&sample) {
        Ok((statistic, p_value)) => (
            Some(NormalityTest {
                statistic,
                p_value,
                sample_size: sample.len(),
                sampled,
            }),
            None,
        ),
        Err(failure) => (None, Some(failure)),
    };

    DistributionRun {
        stats: DistributionStats {
            percentiles: Some(percentiles),
            iqr: Some(percentiles.iqr()),
            skewness,
            kurtosis,
            skew_shape: skewness.map(SkewShape::classify),
            kurtosis_shape: kurtosis.map(KurtosisShape::classify),
            is_normal: normality.as_ref().map(|t| t.p_value > alpha),
            normality,
        },
        normality_failure,
    }
}
