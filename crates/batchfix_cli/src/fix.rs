//! Fix application logic

use std::path::{Path, PathBuf};
use std::time::Duration;

use batchfix_core::client::fix_all_problems;
use batchfix_core::{AbortReason, ApplyRetryLoop, LintEngine, LoopOutcome, LoopReport};
use miette::{IntoDiagnostic, Result, miette};
use tracing::{debug, error};

use crate::session::LocalSession;

/// Result of running the batch loop over one file.
pub struct FileFix {
    pub text: String,
    pub modified: bool,
    pub report: LoopReport,
    /// Diagnostics that disappeared.
    pub fixed: usize,
    /// Diagnostics still reported after the last batch.
    pub remaining: usize,
}

/// Runs the batch loop over `content` until it settles.
pub async fn fix_text(
    linter: &dyn LintEngine,
    path: &Path,
    content: &str,
    time_budget: Option<Duration>,
) -> Result<FileFix> {
    let absolute = std::path::absolute(path).into_diagnostic()?;
    let mut session = LocalSession::open(linter, &absolute, content).into_diagnostic()?;
    let before = session.diagnostics().len();

    let report = match time_budget {
        Some(budget) => Some(
            ApplyRetryLoop::new()
                .with_time_budget(Some(budget))
                .run(&mut session)
                .await,
        ),
        None => fix_all_problems(true, Some(&mut session)).await,
    };
    let report = report.ok_or_else(|| miette!("No fix session for {}", path.display()))?;
    debug!("{}: {:?}", path.display(), report);

    let remaining = session.diagnostics().len();
    Ok(FileFix {
        modified: session.text() != content,
        text: session.text().to_string(),
        report,
        fixed: before.saturating_sub(remaining),
        remaining,
    })
}

/// Summary of applied fixes.
#[derive(Default)]
pub struct FixSummary {
    pub total_fixes: usize,
    pub files_fixed: usize,
    pub fixes_by_file: Vec<(PathBuf, usize)>,
    pub errors: Vec<(PathBuf, String)>,
    pub remaining: usize,
}

impl FixSummary {
    /// Adds the outcome for one file.
    pub fn record(&mut self, path: &Path, fix: &FileFix) {
        self.remaining += fix.remaining;

        if let LoopOutcome::Aborted(reason) = fix.report.outcome {
            let message = match reason {
                AbortReason::ApplyFailed => "edits could not be applied",
                AbortReason::VersionMismatch => "document changed while fixing",
            };
            error!("Failed to fix {}: {}", path.display(), message);
            self.errors.push((path.to_path_buf(), message.to_string()));
        }

        if fix.modified {
            self.fixes_by_file.push((path.to_path_buf(), fix.fixed));
            self.total_fixes += fix.fixed;
            self.files_fixed += 1;
        }
    }

    pub fn record_error(&mut self, path: &Path, message: String) {
        error!("Failed to fix {}: {}", path.display(), message);
        self.errors.push((path.to_path_buf(), message));
    }
}

/// Outputs the fix summary.
pub fn output_fix_summary(summary: &FixSummary, dry_run: bool) {
    if summary.files_fixed == 0 && summary.errors.is_empty() {
        println!("No fixable issues found.");
    }

    if summary.files_fixed > 0 {
        let action = if dry_run { "Would fix" } else { "Fixed" };

        println!(
            "\n{} {} issues in {} files:",
            action, summary.total_fixes, summary.files_fixed
        );
        print_fix_list(&summary.fixes_by_file);

        if dry_run {
            println!("\nRun without --dry-run to apply fixes.");
        }
    }

    if summary.remaining > 0 {
        println!("{} issues remain.", summary.remaining);
    }

    if !summary.errors.is_empty() {
        eprintln!("\nFailed to fix {} file(s):", summary.errors.len());
        for (path, err) in &summary.errors {
            eprintln!("  {}: {}", path.display(), err);
        }
    }
}

fn print_fix_list(fixes_by_file: &[(PathBuf, usize)]) {
    for (path, count) in fixes_by_file {
        println!("  {}: {} fixes", path.display(), count);
    }
}
