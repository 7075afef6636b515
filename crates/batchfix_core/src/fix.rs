//! Candidate fixes and their lookup keys.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::diagnostic::Diagnostic;
use crate::position::{Edit, TextRange};

/// Version used when no document version is known.
pub const UNKNOWN_VERSION: i32 = -1;

/// A labeled, versioned candidate correction.
///
/// `edits` are expected in ascending document order and are never re-sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fix {
    pub label: String,
    pub document_version: i32,
    pub rule_code: String,
    pub edits: Vec<Edit>,
}

impl Fix {
    /// Creates a fix with a single edit.
    pub fn single(
        label: impl Into<String>,
        document_version: i32,
        rule_code: impl Into<String>,
        edit: Edit,
    ) -> Self {
        Self {
            label: label.into(),
            document_version,
            rule_code: rule_code.into(),
            edits: vec![edit],
        }
    }

    /// Builds the fix proposed for `diagnostic`, replacing its whole range.
    pub fn for_diagnostic(
        diagnostic: &Diagnostic,
        document_version: i32,
        replacement: impl Into<String>,
    ) -> Self {
        Self::single(
            format!("Fix: {}", diagnostic.message),
            document_version,
            &diagnostic.rule_code,
            Edit::replace(diagnostic.range, replacement),
        )
    }

    /// First edit in document order, if any.
    pub fn first_edit(&self) -> Option<&Edit> {
        self.edits.first()
    }
}

/// Fingerprint of a diagnostic: `[startLine,startChar,endLine,endChar]-ruleCode`.
///
/// Both the lint pass that stores fixes and the quick-fix lookup go through
/// this type, so the format only lives here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FixKey(String);

impl FixKey {
    /// Computes the key for a range and rule code.
    pub fn new(range: &TextRange, rule_code: &str) -> Self {
        Self(format!(
            "[{},{},{},{}]-{}",
            range.start.line, range.start.character, range.end.line, range.end.character, rule_code
        ))
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&Diagnostic> for FixKey {
    fn from(diagnostic: &Diagnostic) -> Self {
        Self::new(&diagnostic.range, &diagnostic.rule_code)
    }
}

impl fmt::Display for FixKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
