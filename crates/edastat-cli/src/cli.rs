//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// edastat: exploratory statistics and data-quality checks for CSV/TSV/JSON files
#[derive(Parser)]
#[command(name = "edastat")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output (engine events on stderr; RUST_LOG overrides the level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Engine configuration file (JSON)
    #[arg(long, global = true, value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Load at most this many data rows
    #[arg(long, global = true)]
    pub max_rows: Option<usize>,
}

impl Cli {
    /// The data file every subcommand operates on.
    pub fn file(&self) -> &PathBuf {
        match &self.command {
            Commands::Summary { file }
            | Commands::Column { file, .. }
            | Commands::Missing { file }
            | Commands::Outliers { file, .. }
            | Commands::Report { file, .. } => file,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Dataset overview and quality score
    Summary {
        /// Path to the data file (CSV/TSV/JSON)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Full statistics for one column
    Column {
        /// Path to the data file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Column name
        #[arg(value_name = "COLUMN")]
        name: String,
    },

    /// Missing-data breakdown per column
    Missing {
        /// Path to the data file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Outlier detection for numeric columns
    Outliers {
        /// Path to the data file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Only this column (default: every numeric column)
        #[arg(short, long)]
        column: Option<String>,

        /// Detection method
        #[arg(short, long, default_value = "iqr")]
        method: MethodChoice,

        /// IQR fence multiplier (default from config)
        #[arg(short, long = "iqr-k")]
        k: Option<f64>,

        /// Z-score threshold (default from config)
        #[arg(short, long)]
        threshold: Option<f64>,

        /// List every outlier instead of the configured cap
        #[arg(long)]
        all: bool,
    },

    /// Write a full JSON report
    Report {
        /// Path to the data file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output path (default: <file>.report.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum MethodChoice {
    Iqr,
    Zscore,
    Both,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "edastat", "outliers", "data.csv", "-m", "both", "--iqr-k", "3", "--json",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.file(), &PathBuf::from("data.csv"));
        assert!(matches!(
            cli.command,
            Commands::Outliers {
                method: MethodChoice::Both,
                k: Some(3.0),
                ..
            }
        ));
    }
}
