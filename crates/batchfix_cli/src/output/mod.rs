//! Output formatting module

mod json;
mod text;

use std::path::PathBuf;

use batchfix_core::Diagnostic;
use miette::Result;

use crate::cli::OutputFormat;

/// Lint outcome for one file.
pub struct FileReport {
    pub path: PathBuf,
    pub diagnostics: Vec<Diagnostic>,
    /// How many of the diagnostics carry a fix.
    pub fixable: usize,
}

/// Prints the reports and returns whether any file has diagnostics.
pub fn output_results(results: &[FileReport], format: OutputFormat) -> Result<bool> {
    let has_errors = results.iter().any(|r| !r.diagnostics.is_empty());

    match format {
        OutputFormat::Json => json::output_json(results)?,
        OutputFormat::Text => text::output_text(results),
    }

    Ok(has_errors)
}
