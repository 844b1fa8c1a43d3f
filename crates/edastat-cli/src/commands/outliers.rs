//! Outliers command - IQR and Z-score detection over numeric columns.

use colored::Colorize;
use edastat::{Column, OutlierDetail, OutlierResult};
use serde_json::{Map, Value};

use super::{CommandResult, Session, num, pct_colored, print_json};
use crate::cli::MethodChoice;

pub fn run(
    session: &Session,
    column: Option<&str>,
    method: MethodChoice,
    k: Option<f64>,
    threshold: Option<f64>,
    json_output: bool,
) -> CommandResult {
    let config = session.engine.config();
    let k = k.unwrap_or(config.iqr_k);
    let threshold = threshold.unwrap_or(config.zscore_threshold);
    if !(k.is_finite() && k >= 0.0 && threshold.is_finite() && threshold >= 0.0) {
        return Err("k and threshold must be finite and non-negative".into());
    }

    let columns: Vec<&Column> = match column {
        Some(name) => vec![session.table.require_column(name)?],
        None => session
            .table
            .columns()
            .iter()
            .filter(|c| c.kind().is_numeric())
            .collect(),
    };

    if columns.is_empty() {
        return Err("No numeric columns to check".into());
    }

    let mut results = Map::new();
    for column in columns {
        let iqr = matches!(method, MethodChoice::Iqr | MethodChoice::Both)
            .then(|| session.engine.detect_outliers_iqr(column, k));
        let zscore = matches!(method, MethodChoice::Zscore | MethodChoice::Both)
            .then(|| session.engine.detect_outliers_zscore(column, threshold));

        if json_output {
            results.insert(
                column.name().to_string(),
                serde_json::json!({ "iqr": iqr, "zscore": zscore }),
            );
            continue;
        }

        println!("{}", column.name().cyan().bold());
        if let Some(result) = &iqr {
            print_result("IQR", result);
        }
        if let Some(result) = &zscore {
            print_result("Z-score", result);
        }
        println!();
    }

    if json_output {
        return print_json(&Value::Object(results));
    }
    Ok(())
}

fn print_result(label: &str, result: &OutlierResult) {
    let Some(detail) = &result.detail else {
        println!("  {:8} {}", label, "not applicable".dimmed());
        return;
    };

    let params = match detail {
        OutlierDetail::Iqr { q1, q3, k, .. } => {
            format!("Q1={} Q3={} k={}", num(Some(*q1)), num(Some(*q3)), k)
        }
        OutlierDetail::ZScore {
            mean,
            std,
            threshold,
            ..
        } => format!(
            "mean={} std={} threshold={}",
            num(Some(*mean)),
            num(Some(*std)),
            threshold
        ),
    };

    println!(
        "  {:8} {} outliers ({}) bounds [{}, {}]  {}",
        label,
        result.outlier_count.to_string().white().bold(),
        pct_colored(result.outlier_pct),
        num(result.lower_bound),
        num(result.upper_bound),
        params.dimmed()
    );

    if result.outlier_count == 0 {
        return;
    }

    let listed: Vec<String> = result
        .outlier_indices
        .iter()
        .zip(&result.outlier_values)
        .map(|(row, value)| format!("row {}: {}", row, num(Some(*value))))
        .collect();
    println!("           {}", listed.join(", "));
    if result.is_truncated() {
        println!(
            "           {} (showing {} of {}, use --all for every row)",
            "...".dimmed(),
            listed.len(),
            result.outlier_count
        );
    }
}
