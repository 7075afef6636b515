//! JSON output formatter

use miette::{IntoDiagnostic, Result};

use super::FileReport;

pub fn output_json(results: &[FileReport]) -> Result<()> {
    let output: Vec<_> = results
        .iter()
        .map(|r| {
            serde_json::json!({
                "path": r.path.display().to_string(),
                "diagnostics": r.diagnostics,
                "fixable": r.fixable,
            })
        })
        .collect();
    println!(
        "{}",
        serde_json::to_string_pretty(&output).into_diagnostic()?
    );
    Ok(())
}
