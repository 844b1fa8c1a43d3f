//! Report command - write a full JSON report next to the data file.

use std::path::PathBuf;

use colored::Colorize;
use edastat::{BasicStats, ColumnInfo, DatasetSummary, MissingReport, QualitySummary, SourceMetadata};
use serde::Serialize;

use super::{CommandResult, Session, tier_colored};

/// Columns listed in the per-column section of a report.
const REPORT_COLUMN_LIMIT: usize = 30;

#[derive(Serialize)]
struct Report<'a> {
    source: &'a SourceMetadata,
    summary: DatasetSummary,
    quality: QualitySummary,
    missing: MissingReport,
    columns: Vec<ColumnSection>,
    /// Columns left out of `columns`.
    columns_omitted: usize,
}

#[derive(Serialize)]
struct ColumnSection {
    info: ColumnInfo,
    basic: BasicStats,
}

pub fn run(session: &Session, output: Option<PathBuf>) -> CommandResult {
    let engine = &session.engine;
    let table = &session.table;

    let columns: Vec<ColumnSection> = table
        .column_info()
        .into_iter()
        .zip(table.columns())
        .take(REPORT_COLUMN_LIMIT)
        .map(|(info, column)| ColumnSection {
            info,
            basic: engine.basic_stats(column),
        })
        .collect();

    let quality = engine.quality_summary(table);
    let report = Report {
        source: &session.source,
        summary: table.summary(),
        missing: quality.missing.clone(),
        columns_omitted: table.column_count() - columns.len(),
        quality,
        columns,
    };

    let output_path = output.unwrap_or_else(|| {
        let mut p = session.source.path.clone();
        let stem = p.file_stem().unwrap_or_default().to_string_lossy().into_owned();
        p.set_file_name(format!("{}.report.json", stem));
        p
    });

    let json = serde_json::to_string_pretty(&report)?;
    std::fs::write(&output_path, json)
        .map_err(|e| format!("Cannot write {}: {}", output_path.display(), e))?;

    println!(
        "{} {}",
        "Saved to".green().bold(),
        output_path.display().to_string().white()
    );
    println!(
        "Data quality: {} ({:.1}% complete)",
        tier_colored(report.quality.tier, report.quality.label.clone()).bold(),
        report.quality.completeness
    );
    if report.columns_omitted > 0 {
        println!(
            "Column section lists the first {} of {} columns",
            REPORT_COLUMN_LIMIT,
            table.column_count()
        );
    }

    Ok(())
}
