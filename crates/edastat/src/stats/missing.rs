//! Missing-value analysis for whole tables and single columns.

use serde::{Deserialize, Serialize};

use crate::table::{Column, Table};

use super::numeric::percentage;

/// How missing values are laid out in a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingPattern {
    /// No missing values.
    None,
    /// Every value is missing.
    Complete,
    /// A long contiguous block of missing values.
    Systematic,
    /// Missing values are scattered.
    Random,
}

impl MissingPattern {
    /// Classify a column from its missing mask.
    ///
    /// `systematic_fraction` is the share of the column length the longest
    /// missing run must exceed to count as systematic.
    pub fn classify(mask: &[bool], systematic_fraction: f64) -> Self {
        let missing = mask.iter().filter(|&&m| m).count();
        if missing == 0 {
            return MissingPattern::None;
        }
        if missing == mask.len() {
            return MissingPattern::Complete;
        }

        if longest_run(mask) as f64 > mask.len() as f64 * systematic_fraction {
            MissingPattern::Systematic
        } else {
            MissingPattern::Random
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MissingPattern::None => "none",
            MissingPattern::Complete => "complete",
            MissingPattern::Systematic => "systematic",
            MissingPattern::Random => "random",
        }
    }
}

/// Longest run of consecutive `true` entries.
fn longest_run(mask: &[bool]) -> usize {
    mask.chunk_by(|a, b| a == b)
        .filter(|run| run[0])
        .map(<[bool]>::len)
        .max()
        .unwrap_or(0)
}

/// Missing-percentage bracket that selects remediation advice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingBracket {
    /// Exactly 0%.
    Clean,
    /// Above 0% and below 5%.
    Low,
    /// 5% up to 20%.
    Moderate,
    /// 20% up to 50%.
    High,
    /// 50% and above.
    Severe,
}

impl MissingBracket {
    pub fn classify(missing_pct: f64) -> Self {
        if missing_pct <= 0.0 {
            MissingBracket::Clean
        } else if missing_pct < 5.0 {
            MissingBracket::Low
        } else if missing_pct < 20.0 {
            MissingBracket::Moderate
        } else if missing_pct < 50.0 {
            MissingBracket::High
        } else {
            MissingBracket::Severe
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MissingBracket::Clean => "clean",
            MissingBracket::Low => "low",
            MissingBracket::Moderate => "moderate",
            MissingBracket::High => "high",
            MissingBracket::Severe => "severe",
        }
    }

    /// Ordered remediation strategies for this bracket.
    pub fn recommendations(&self) -> &'static [&'static str] {
        match self {
            MissingBracket::Clean => &["No action required"],
            MissingBracket::Low => &[
                "Drop rows with missing values",
                "Impute with mean/median (numeric)",
                "Impute with mode (categorical)",
            ],
            MissingBracket::Moderate => &[
                "Multiple imputation recommended",
                "Impute with KNN or a predictive model",
                "Avoid dropping rows",
            ],
            MissingBracket::High => &[
                "High share of missing values",
                "Consider removing the column",
                "Create a missing-value indicator variable",
            ],
            MissingBracket::Severe => &[
                "Most values are missing",
                "Removing the column is recommended",
                "Do not use for critical analyses",
            ],
        }
    }
}

/// Missing-value profile of a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMissing {
    pub column: String,
    pub total: usize,
    pub missing: usize,
    pub missing_pct: f64,
    pub complete: usize,
    pub complete_pct: f64,
    pub pattern: MissingPattern,
    pub bracket: MissingBracket,
    pub recommendations: Vec<String>,
}

/// One row of the dataset-level breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMissingDetail {
    pub column: String,
    pub missing_count: usize,
    pub missing_pct: f64,
    pub complete_pct: f64,
}

/// Missing-value profile of a whole table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingReport {
    pub total_cells: usize,
    pub total_missing: usize,
    pub total_missing_pct: f64,
    /// Columns with at least one missing value.
    pub columns_with_missing: usize,
    pub total_columns: usize,
    /// Rows with at least one missing cell.
    pub rows_with_missing: usize,
    /// Rows with no missing cell in any column.
    pub complete_rows: usize,
    pub complete_rows_pct: f64,
    /// Sorted by missing percentage, highest first. Ties keep column order.
    pub column_details: Vec<ColumnMissingDetail>,
}

pub(crate) fn analyze_column_missing(column: &Column, systematic_fraction: f64) -> ColumnMissing {
    let mask = column.missing_mask();
    let total = mask.len();
    let missing = mask.iter().filter(|&&m| m).count();
    let missing_pct = percentage(missing, total);
    let bracket = MissingBracket::classify(missing_pct);

    ColumnMissing {
        column: column.name().to_string(),
        total,
        missing,
        missing_pct,
        complete: total - missing,
        complete_pct: percentage(total - missing, total),
        pattern: MissingPattern::classify(&mask, systematic_fraction),
        bracket,
        recommendations: bracket
            .recommendations()
            .iter()
            .map(|s| s.to_string())
            .collect(),
    }
}

pub(crate) fn analyze_missing_data(table: &Table) -> MissingReport {
    let rows = table.row_count();
    let mut row_has_missing = vec![false; rows];
    let mut column_details = Vec::with_capacity(table.column_count());
    let mut total_missing = 0;

    for column in table.columns() {
        let mask = column.missing_mask();
        let mut missing_count = 0;
        for (row, &missing) in mask.iter().enumerate() {
            if missing {
                missing_count += 1;
                row_has_missing[row] = true;
            }
        }
        total_missing += missing_count;

        column_details.push(ColumnMissingDetail {
            column: column.name().to_string(),
            missing_count,
            missing_pct: percentage(missing_count, rows),
            complete_pct: percentage(rows - missing_count, rows),
        });
    }

    // Vec::sort_by is stable.
    column_details.sort_by(|a, b| b.missing_pct.total_cmp(&a.missing_pct));

    let total_cells = table.cell_count();
    let rows_with_missing = row_has_missing.iter().filter(|&&m| m).count();
    let complete_rows = rows - rows_with_missing;

    MissingReport {
        total_cells,
        total_missing,
        total_missing_pct: percentage(total_missing, total_cells),
        columns_with_missing: column_details.iter().filter(|d| d.missing_count > 0).count(),
        total_columns: table.column_count(),
        rows_with_missing,
        complete_rows,
        complete_rows_pct: percentage(complete_rows, rows),
        column_details,
    }
}
