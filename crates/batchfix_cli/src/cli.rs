//! CLI argument definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// batchfix - Apply linter fixes in non-overlapping batches
#[derive(Parser)]
#[command(name = "batchfix")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Lint files and report their diagnostics
    Lint {
        /// Files to lint
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Apply every available fix, batch by batch
    Fix {
        /// Files to fix
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Report what would change without writing files
        #[arg(long)]
        dry_run: bool,

        /// Stop fixing a file after this many milliseconds
        #[arg(long)]
        time_budget_ms: Option<u64>,
    },

    /// Start the LSP server
    Lsp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
