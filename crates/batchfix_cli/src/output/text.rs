//! Text output formatter

use super::FileReport;

pub fn output_text(results: &[FileReport]) {
    for result in results {
        if result.diagnostics.is_empty() {
            continue;
        }

        println!("\n{}:", result.path.display());
        for diag in &result.diagnostics {
            // Ranges are zero-based; editors show lines and columns from 1.
            println!(
                "  {}:{} [{}]: {}",
                diag.range.start.line + 1,
                diag.range.start.character + 1,
                diag.rule_code,
                diag.message
            );
        }
    }

    let total_files = results.len();
    let total_issues: usize = results.iter().map(|r| r.diagnostics.len()).sum();
    let fixable: usize = results.iter().map(|r| r.fixable).sum();

    println!();
    println!(
        "Checked {} files, found {} issues ({} fixable)",
        total_files, total_issues, fixable
    );
}
