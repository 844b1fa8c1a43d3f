//! Column command - every analysis for a single column.

use colored::Colorize;
use edastat::{ColumnReport, OutlierResult};

use super::{CommandResult, Session, num, pct_colored, print_json};

pub fn run(session: &Session, name: &str, json_output: bool) -> CommandResult {
    let column = session.table.require_column(name)?;
    let report = session.engine.analyze_column(column);

    if json_output {
        return print_json(&report);
    }

    print_report(&report);
    Ok(())
}

fn print_report(report: &ColumnReport) {
    let basic = &report.basic;
    println!(
        "{} {} ({})",
        "Column".cyan().bold(),
        report.column.white().bold(),
        report.kind
    );
    println!();

    println!("{}", "Basic statistics:".yellow().bold());
    println!(
        "  Count:    {} of {} ({} missing)",
        basic.count, basic.count_total, basic.missing
    );
    println!("  Unique:   {}", basic.unique);
    if let Some(mode) = &basic.mode {
        println!("  Mode:     {} (x{})", mode, basic.mode_count);
    }
    if let (Some(min), Some(max)) = (&basic.min, &basic.max) {
        println!("  Min/Max:  {} / {}", min, max);
    }
    if basic.mean.is_some() {
        println!("  Mean:     {}", num(basic.mean));
        println!("  Median:   {}", num(basic.median));
        println!("  Std:      {}", num(basic.std));
        println!("  Range:    {}", num(basic.range));
    }
    println!();

    let dist = &report.distribution;
    if let Some(percentiles) = &dist.percentiles {
        println!("{}", "Distribution:".yellow().bold());
        let line: Vec<String> = percentiles
            .entries()
            .iter()
            .map(|(label, value)| format!("{}={}", label, num(Some(*value))))
            .collect();
        println!("  {}", line.join("  "));
        println!("  IQR:      {}", num(dist.iqr));
        if let (Some(skew), Some(shape)) = (dist.skewness, dist.skew_shape) {
            println!("  Skewness: {:.4} ({})", skew, shape.label());
        }
        if let (Some(kurt), Some(shape)) = (dist.kurtosis, dist.kurtosis_shape) {
            println!("  Kurtosis: {:.4} ({})", kurt, shape.label());
        }
        match &dist.normality {
            Some(test) => {
                let verdict = if dist.is_normal == Some(true) {
                    "normal".green()
                } else {
                    "not normal".red()
                };
                println!(
                    "  Shapiro-Wilk: W={:.4} p={:.4} n={}{} -> {}",
                    test.statistic,
                    test.p_value,
                    test.sample_size,
                    if test.sampled { " (sampled)" } else { "" },
                    verdict
                );
            }
            None => println!("  Shapiro-Wilk: not computed"),
        }
        println!();
    }

    let missing = &report.missing;
    println!("{}", "Missing data:".yellow().bold());
    println!(
        "  {} missing, pattern: {}",
        pct_colored(missing.missing_pct),
        missing.pattern.label()
    );
    for advice in &missing.recommendations {
        println!("  - {}", advice);
    }
    println!();

    if !report.outliers.iqr.is_empty() {
        println!("{}", "Outliers:".yellow().bold());
        print_outliers("IQR", &report.outliers.iqr);
        print_outliers("Z-score", &report.outliers.zscore);
        for advice in &report.outliers.recommendations {
            println!("  - {}", advice);
        }
    }
}

fn print_outliers(label: &str, result: &OutlierResult) {
    if result.is_empty() {
        println!("  {:8} not applicable", label);
        return;
    }
    println!(
        "  {:8} {} ({}) outside [{}, {}]",
        label,
        result.outlier_count,
        pct_colored(result.outlier_pct),
        num(result.lower_bound),
        num(result.upper_bound)
    );
}
