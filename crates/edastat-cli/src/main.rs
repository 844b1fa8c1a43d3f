//! edastat CLI - statistics and data-quality reports for tabular files.

mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Cli, Commands};
use commands::Session;

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        logging::init();
    }

    let result = Session::open(&cli).and_then(|session| match cli.command {
        Commands::Summary { .. } => commands::summary::run(&session, cli.json),

        Commands::Column { name, .. } => commands::column::run(&session, &name, cli.json),

        Commands::Missing { .. } => commands::missing::run(&session, cli.json),

        Commands::Outliers {
            column,
            method,
            k,
            threshold,
            ..
        } => commands::outliers::run(&session, column.as_deref(), method, k, threshold, cli.json),

        Commands::Report { output, .. } => commands::report::run(&session, output),
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
