//! Fix command implementation

use std::path::PathBuf;
use std::time::Duration;

use miette::{IntoDiagnostic, Result};
use tracing::info;

use crate::cli::Cli;
use crate::commands::lint::read_source;
use crate::fix::{FixSummary, fix_text, output_fix_summary};
use crate::utils::{configured_linter, create_tokio_runtime, load_config};

/// Fixes every file in place and returns whether problems remain.
pub fn run_fix(
    cli: &Cli,
    files: &[PathBuf],
    dry_run: bool,
    time_budget_ms: Option<u64>,
) -> Result<bool> {
    let config = load_config(cli.config.as_deref())?;
    let linter = configured_linter(&config)?;
    let time_budget = match time_budget_ms {
        Some(0) => None,
        Some(ms) => Some(Duration::from_millis(ms)),
        None => config.time_budget(),
    };

    let runtime = create_tokio_runtime()?;
    let mut summary = FixSummary::default();

    for file in files {
        let Some(content) = read_source(file) else {
            continue;
        };

        let fix = match runtime.block_on(fix_text(&linter, file, &content, time_budget)) {
            Ok(fix) => fix,
            Err(e) => {
                summary.record_error(file, e.to_string());
                continue;
            }
        };

        if fix.modified && !dry_run {
            std::fs::write(file, &fix.text).into_diagnostic()?;
            info!("Wrote {}", file.display());
        }
        summary.record(file, &fix);
    }

    output_fix_summary(&summary, dry_run);

    Ok(summary.remaining > 0 || !summary.errors.is_empty())
}
