//! Missing command - per-column missing-data breakdown.

use colored::Colorize;
use serde_json::json;

use super::{CommandResult, Session, pct_colored, print_json};

pub fn run(session: &Session, json_output: bool) -> CommandResult {
    let report = session.engine.analyze_missing_data(&session.table);

    if json_output {
        let columns: Vec<_> = session
            .table
            .columns()
            .iter()
            .map(|c| session.engine.analyze_column_missing(c))
            .collect();
        return print_json(&json!({ "report": report, "columns": columns }));
    }

    println!(
        "Missing cells: {} of {} ({})",
        report.total_missing.to_string().white().bold(),
        report.total_cells,
        pct_colored(report.total_missing_pct)
    );
    println!(
        "Columns with missing data: {}/{}",
        report.columns_with_missing, report.total_columns
    );
    println!(
        "Complete rows: {} ({:.1}%), rows with missing: {}",
        report.complete_rows, report.complete_rows_pct, report.rows_with_missing
    );
    println!();

    if report.columns_with_missing == 0 {
        println!("{}", "No missing values.".green());
        return Ok(());
    }

    println!("{}", "By column:".yellow().bold());
    for detail in report.column_details.iter().filter(|d| d.missing_count > 0) {
        let column = session.table.require_column(&detail.column)?;
        let analysis = session.engine.analyze_column_missing(column);
        println!(
            "  {:24} {:>8} {:>8}  {} / {}",
            detail.column,
            detail.missing_count,
            pct_colored(detail.missing_pct),
            analysis.pattern.label(),
            analysis.bracket.label()
        );
    }

    Ok(())
}
