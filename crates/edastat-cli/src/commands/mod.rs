//! CLI command implementations.

pub mod column;
pub mod missing;
pub mod outliers;
pub mod report;
pub mod summary;

use colored::{ColoredString, Colorize};
use edastat::{
    EngineConfig, ListLimit, Loader, LoaderConfig, QualityTier, SourceMetadata, StatisticsEngine, Table,
    TracingObserver,
};

use crate::cli::{Cli, Commands};

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// A loaded file and the engine configured for it.
pub struct Session {
    pub table: Table,
    pub source: SourceMetadata,
    pub engine: StatisticsEngine,
}

impl Session {
    pub fn open(cli: &Cli) -> Result<Self, Box<dyn std::error::Error>> {
        let file = cli.file();
        if !file.exists() {
            return Err(format!("File not found: {}", file.display()).into());
        }

        let mut config = match &cli.config {
            Some(path) => EngineConfig::from_json_file(path)?,
            None => EngineConfig::default(),
        };
        if let Commands::Outliers { all: true, .. } = cli.command {
            config = config.with_outlier_list_limit(ListLimit::Unbounded);
        }

        let mut engine = StatisticsEngine::with_config(config);
        if cli.verbose {
            engine = engine.with_observer(TracingObserver);
        }

        let loader = Loader::with_config(LoaderConfig {
            max_rows: cli.max_rows,
            ..LoaderConfig::default()
        });
        let (table, source) = loader.load_file(file)?;

        if !cli.json {
            println!(
                "{} {} ({} rows x {} columns, {})",
                "Loaded".cyan().bold(),
                source.file.white(),
                source.row_count,
                source.column_count,
                source.format
            );
            println!();
        }

        Ok(Self {
            table,
            source,
            engine,
        })
    }
}

pub fn print_json(value: &impl serde::Serialize) -> CommandResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Format an optional number, `-` when absent.
pub fn num(value: Option<f64>) -> String {
    match value {
        Some(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{:.0}", v),
        Some(v) => format!("{:.4}", v),
        None => "-".to_string(),
    }
}

pub fn tier_colored(tier: QualityTier, text: String) -> ColoredString {
    match tier {
        QualityTier::Excellent => text.green(),
        QualityTier::Good => text.yellow(),
        QualityTier::Fair => text.truecolor(230, 126, 34),
        QualityTier::Critical => text.red(),
    }
}

/// Color a percentage of bad cells: green at zero, yellow below 5%, red above.
pub fn pct_colored(pct: f64) -> ColoredString {
    let text = format!("{:.1}%", pct);
    if pct == 0.0 {
        text.green()
    } else if pct < 5.0 {
        text.yellow()
    } else {
        text.red()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_formatting() {
        assert_eq!(num(Some(3.0)), "3");
        assert_eq!(num(Some(2.25)), "2.2500");
        assert_eq!(num(None), "-");
    }
}
