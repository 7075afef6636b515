//! batchfix CLI
//!
//! Runs an external linter over files and applies its fixes in
//! non-overlapping batches, or serves them to editors over LSP.

mod cli;
mod commands;
mod fix;
mod output;
mod session;
mod utils;

use std::process::ExitCode;

use clap::Parser;
use miette::Result;
use tracing::error;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use commands::fix::run_fix;
use commands::lint::run_lint;
use commands::lsp::run_lsp;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(has_errors) => {
            if has_errors {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<bool> {
    match &cli.command {
        Commands::Lint { files, format } => run_lint(&cli, files, *format),
        Commands::Fix {
            files,
            dry_run,
            time_budget_ms,
        } => run_fix(&cli, files, *dry_run, *time_budget_ms),
        Commands::Lsp => {
            run_lsp()?;
            Ok(false)
        }
    }
}
