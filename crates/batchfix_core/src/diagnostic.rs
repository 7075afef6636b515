//! Diagnostic types and the external linter's report format.

use serde::{Deserialize, Serialize};

use crate::position::{TextPosition, TextRange};

/// A lint issue reported for a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// Zero-based source range.
    pub range: TextRange,
    /// The rule that generated this diagnostic.
    pub rule_code: String,
    /// The diagnostic message.
    pub message: String,
}

impl Diagnostic {
    /// Creates a new diagnostic.
    pub fn new(range: TextRange, rule_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            range,
            rule_code: rule_code.into(),
            message: message.into(),
        }
    }
}

/// Replacement proposed by the linter for a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintFix {
    pub replace: String,
}

/// A single problem as reported by the external linter.
///
/// Lines and columns are 1-based; `end` is reported inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintMessage {
    pub line: u32,
    pub start: u32,
    pub endline: u32,
    pub end: u32,
    pub descr: String,
    pub rule: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix: Option<LintFix>,
}

impl LintMessage {
    /// Translates the linter's 1-based coordinates into a zero-based range.
    ///
    /// The end character is taken as-is: an inclusive 1-based column is the
    /// same number as an exclusive 0-based one.
    pub fn range(&self) -> TextRange {
        TextRange::new(
            TextPosition::new(self.line.saturating_sub(1), self.start.saturating_sub(1)),
            TextPosition::new(self.endline.saturating_sub(1), self.end),
        )
    }

    /// Builds the diagnostic published for this message.
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::new(self.range(), &self.rule, &self.descr)
    }
}

/// Problems reported for one linted file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportedFile {
    #[serde(default)]
    pub message: Vec<LintMessage>,
}

/// Top-level linter report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintReport {
    #[serde(default = "default_passed")]
    pub passed: bool,
    #[serde(default)]
    pub errors: Vec<ReportedFile>,
}

fn default_passed() -> bool {
    true
}

impl LintReport {
    /// Flattens the report into its messages.
    ///
    /// A report that claims to have passed contributes nothing, even if it
    /// lists errors.
    pub fn into_messages(self) -> Vec<LintMessage> {
        if self.passed {
            return Vec::new();
        }
        self.errors
            .into_iter()
            .flat_map(|file| file.message)
            .collect()
    }
}
