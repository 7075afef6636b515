//! In-process fixing session for one file.
//!
//! Plays both sides of the batch protocol: the fix store answers batch
//! requests, and the file's buffer is linted again after every batch.

use std::path::{Path, PathBuf};

use batchfix_core::{
    AllFixesParams, BatchResult, Diagnostic, Edit, EditorDocument, FixError, FixRequester,
    FixStore, LintEngine, apply_edits, build_batch,
};
use tracing::{debug, warn};

pub struct LocalSession<'a> {
    linter: &'a dyn LintEngine,
    store: FixStore,
    path: PathBuf,
    uri: String,
    text: String,
    version: i32,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> LocalSession<'a> {
    /// Opens `text` as version 1 of `path` and runs the first lint pass.
    pub fn open(
        linter: &'a dyn LintEngine,
        path: &Path,
        text: impl Into<String>,
    ) -> Result<Self, FixError> {
        let mut session = Self {
            linter,
            // Every pass replaces the previous one; edits from older passes
            // would point at text that no longer exists.
            store: FixStore::with_retention(false),
            path: path.to_path_buf(),
            uri: format!("file://{}", path.display()),
            text: text.into(),
            version: 1,
            diagnostics: Vec::new(),
        };
        session.relint()?;
        Ok(session)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Diagnostics from the latest lint pass.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    fn relint(&mut self) -> Result<(), FixError> {
        let messages = self.linter.lint(Some(&self.path), &self.text)?;
        self.diagnostics = self
            .store
            .record_lint_pass(&self.uri, self.version, &messages);
        debug!(
            "{} v{}: {} diagnostics",
            self.path.display(),
            self.version,
            self.diagnostics.len()
        );
        Ok(())
    }
}

impl FixRequester for LocalSession<'_> {
    async fn request_all_fixes(&mut self, params: AllFixesParams) -> Option<BatchResult> {
        build_batch(self.store.document_fixes(&params.text_document.uri), true)
    }
}

impl EditorDocument for LocalSession<'_> {
    fn uri(&self) -> &str {
        &self.uri
    }

    fn version(&self) -> i32 {
        self.version
    }

    async fn apply_edits(&mut self, edits: &[Edit]) -> Result<(), FixError> {
        self.text = apply_edits(&self.text, edits)?;
        self.version += 1;
        self.relint()
    }

    fn show_information(&self, message: &str) {
        warn!("{}: {}", self.path.display(), message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use batchfix_core::{ApplyRetryLoop, DoneReason, LintFix, LintMessage, LoopOutcome};

    /// Flags `red` and suggests `#f00`.
    struct HexLinter;

    impl LintEngine for HexLinter {
        fn lint(&self, _path: Option<&Path>, content: &str) -> Result<Vec<LintMessage>, FixError> {
            let mut messages = Vec::new();
            for (index, line) in content.lines().enumerate() {
                for (column, _) in line.match_indices("red") {
                    messages.push(LintMessage {
                        line: index as u32 + 1,
                        start: column as u32 + 1,
                        endline: index as u32 + 1,
                        end: column as u32 + 3,
                        descr: "Use hex color".to_string(),
                        rule: "hex".to_string(),
                        fix: Some(LintFix {
                            replace: "#f00".to_string(),
                        }),
                    });
                }
            }
            Ok(messages)
        }
    }

    #[test]
    fn test_open_lints_once() {
        let session =
            LocalSession::open(&HexLinter, Path::new("/w/a.styl"), "a red\nb red\n").unwrap();
        assert_eq!(session.version(), 1);
        assert_eq!(session.uri(), "file:///w/a.styl");
        assert_eq!(session.diagnostics().len(), 2);
    }

    #[tokio::test]
    async fn test_loop_fixes_buffer() {
        let mut session =
            LocalSession::open(&HexLinter, Path::new("/w/a.styl"), "a red\nb red\n").unwrap();

        let report = ApplyRetryLoop::new().run(&mut session).await;

        assert_eq!(report.outcome, LoopOutcome::Done(DoneReason::Converged));
        assert_eq!(session.text(), "a #f00\nb #f00\n");
        assert!(session.diagnostics().is_empty());
        assert_eq!(session.version(), 2);
    }

    #[tokio::test]
    async fn test_clean_file_is_untouched() {
        let mut session =
            LocalSession::open(&HexLinter, Path::new("/w/a.styl"), "a #fff\n").unwrap();

        let report = ApplyRetryLoop::new().run(&mut session).await;

        assert_eq!(report.outcome, LoopOutcome::Done(DoneReason::NoFixes));
        assert_eq!(report.batches_applied, 0);
        assert_eq!(session.text(), "a #fff\n");
    }
}
