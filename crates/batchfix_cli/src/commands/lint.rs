//! Lint command implementation

use std::path::{Path, PathBuf};

use batchfix_core::LintEngine;
use miette::{IntoDiagnostic, Result};
use tracing::{debug, warn};

use crate::cli::{Cli, OutputFormat};
use crate::output::{FileReport, output_results};
use crate::utils::{configured_linter, load_config};

pub fn run_lint(cli: &Cli, files: &[PathBuf], format: OutputFormat) -> Result<bool> {
    let config = load_config(cli.config.as_deref())?;
    let linter = configured_linter(&config)?;

    let mut results = Vec::with_capacity(files.len());
    for file in files {
        let Some(content) = read_source(file) else {
            continue;
        };
        results.push(lint_file(&linter, file, &content)?);
    }

    output_results(&results, format)
}

/// Reads a file to lint, skipping it with a warning when unreadable.
pub fn read_source(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) => {
            warn!("Skipping {}: {}", path.display(), e);
            None
        }
    }
}

fn lint_file(linter: &dyn LintEngine, path: &Path, content: &str) -> Result<FileReport> {
    let absolute = std::path::absolute(path).into_diagnostic()?;
    let messages = linter.lint(Some(&absolute), content).into_diagnostic()?;
    debug!("{}: {} messages", path.display(), messages.len());

    Ok(FileReport {
        path: path.to_path_buf(),
        fixable: messages.iter().filter(|m| m.fix.is_some()).count(),
        diagnostics: messages.iter().map(|m| m.to_diagnostic()).collect(),
    })
}
