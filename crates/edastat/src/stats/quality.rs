//! Dataset-level quality scoring.

use serde::{Deserialize, Serialize};

use super::missing::MissingReport;

/// Share of missing cells above which an issue is raised.
const MISSING_ISSUE_PCT: f64 = 5.0;

/// Severity tier derived from completeness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityTier {
    Excellent,
    Good,
    Fair,
    Critical,
}

impl QualityTier {
    pub fn classify(completeness: f64) -> Self {
        if completeness >= 95.0 {
            QualityTier::Excellent
        } else if completeness >= 80.0 {
            QualityTier::Good
        } else if completeness >= 60.0 {
            QualityTier::Fair
        } else {
            QualityTier::Critical
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QualityTier::Excellent => "Excellent",
            QualityTier::Good => "Good",
            QualityTier::Fair => "Fair",
            QualityTier::Critical => "Critical",
        }
    }

    /// Display colour as a hex RGB string.
    pub fn color(&self) -> &'static str {
        match self {
            QualityTier::Excellent => "#2ecc71",
            QualityTier::Good => "#f1c40f",
            QualityTier::Fair => "#e67e22",
            QualityTier::Critical => "#e74c3c",
        }
    }
}

/// Aggregate quality of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualitySummary {
    /// `100 - total_missing_pct`.
    pub completeness: f64,
    pub tier: QualityTier,
    pub label: String,
    pub color: String,
    pub missing: MissingReport,
    /// IQR outliers summed over numeric columns.
    pub total_outliers: usize,
    /// Numeric columns with at least one IQR outlier.
    pub outlier_columns: usize,
    pub issues: Vec<String>,
    pub has_issues: bool,
}

impl QualitySummary {
    pub(crate) fn new(missing: MissingReport, total_outliers: usize, outlier_columns: usize) -> Self {
        let completeness = 100.0 - missing.total_missing_pct;
        let tier = QualityTier::classify(completeness);

        let mut issues = Vec::new();
        if missing.total_missing_pct > MISSING_ISSUE_PCT {
            issues.push(format!("Missing data: {:.1}%", missing.total_missing_pct));
        }
        if outlier_columns > 0 {
            issues.push(format!("Columns with outliers: {}", outlier_columns));
        }

        Self {
            completeness,
            tier,
            label: tier.label().to_string(),
            color: tier.color().to_string(),
            missing,
            total_outliers,
            outlier_columns,
            has_issues: !issues.is_empty(),
            issues,
        }
    }
}
