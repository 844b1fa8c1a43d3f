//! Summary command - dataset overview and quality score.

use colored::Colorize;
use serde_json::json;

use super::{CommandResult, Session, print_json, tier_colored};

pub fn run(session: &Session, json_output: bool) -> CommandResult {
    let summary = session.table.summary();
    let quality = session.engine.quality_summary(&session.table);

    if json_output {
        return print_json(&json!({
            "source": session.source,
            "summary": summary,
            "columns": session.table.column_info(),
            "quality": quality,
        }));
    }

    println!("{}", "Columns:".yellow().bold());
    for info in session.table.column_info() {
        println!(
            "  {:24} {:12} {:>8} present {:>6.1}% {:>8} unique",
            info.name,
            format!("{} ({})", info.kind, info.dtype),
            info.non_null_count,
            info.completeness,
            info.unique_count
        );
    }
    println!();

    println!("{}", "Column kinds:".yellow().bold());
    for (kind, count) in summary.kind_counts.iter().filter(|(_, c)| **c > 0) {
        println!("  {:12} {}", kind.to_string(), count);
    }
    println!();

    println!(
        "Data quality: {} ({:.1}% complete)",
        tier_colored(quality.tier, quality.label.clone()).bold(),
        quality.completeness
    );
    println!(
        "Outliers (IQR): {} across {} numeric columns",
        quality.total_outliers.to_string().white().bold(),
        quality.outlier_columns
    );

    if quality.has_issues {
        println!();
        println!("{}", "Issues:".yellow().bold());
        for issue in &quality.issues {
            println!("  - {}", issue);
        }
    } else {
        println!("{}", "No issues found - data looks clean!".green());
    }

    Ok(())
}
