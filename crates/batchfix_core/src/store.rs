//! Per-document storage of candidate fixes.

use std::collections::HashMap;

use tracing::debug;

use crate::diagnostic::{Diagnostic, LintMessage};
use crate::fix::{Fix, FixKey};

/// Fixes recorded for one document, keyed by diagnostic fingerprint.
///
/// Iteration order is unspecified.
pub type DocumentFixes = HashMap<FixKey, Fix>;

/// Candidate fixes for every document, keyed by document URI.
///
/// By default a lint pass only overwrites the entries whose keys it produces
/// again; fixes from an earlier pass stay until a colliding key replaces
/// them. With `retain_stale` disabled each pass starts from an empty map.
#[derive(Debug, Clone)]
pub struct FixStore {
    documents: HashMap<String, DocumentFixes>,
    retain_stale: bool,
}

impl FixStore {
    /// Creates an empty store that retains fixes across lint passes.
    pub fn new() -> Self {
        Self::with_retention(true)
    }

    /// Creates an empty store with the given retention behaviour.
    pub fn with_retention(retain_stale: bool) -> Self {
        Self {
            documents: HashMap::new(),
            retain_stale,
        }
    }

    /// Whether fixes survive across lint passes.
    pub fn retains_stale(&self) -> bool {
        self.retain_stale
    }

    /// Changes the retention behaviour for subsequent lint passes.
    pub fn set_retention(&mut self, retain_stale: bool) {
        self.retain_stale = retain_stale;
    }

    /// Stores `fix` for `diagnostic`; the last write for a key wins.
    pub fn record(&mut self, uri: &str, diagnostic: &Diagnostic, fix: Fix) {
        let key = FixKey::from(diagnostic);
        debug!("Recording fix {} for {}", key, uri);
        self.documents
            .entry(uri.to_string())
            .or_default()
            .insert(key, fix);
    }

    /// Records the outcome of one lint pass and returns its diagnostics.
    ///
    /// Every message becomes a diagnostic; only messages carrying a
    /// replacement produce a stored fix.
    pub fn record_lint_pass(
        &mut self,
        uri: &str,
        document_version: i32,
        messages: &[LintMessage],
    ) -> Vec<Diagnostic> {
        if !self.retain_stale {
            self.clear(uri);
        }

        let mut diagnostics = Vec::with_capacity(messages.len());
        for message in messages {
            let diagnostic = message.to_diagnostic();
            if let Some(fix) = &message.fix {
                let fix = Fix::for_diagnostic(&diagnostic, document_version, &fix.replace);
                self.record(uri, &diagnostic, fix);
            }
            diagnostics.push(diagnostic);
        }
        diagnostics
    }

    /// Looks up the fix recorded for `diagnostic`.
    pub fn get(&self, uri: &str, diagnostic: &Diagnostic) -> Option<&Fix> {
        self.documents.get(uri)?.get(&FixKey::from(diagnostic))
    }

    /// All fixes recorded for a document, in map order.
    pub fn document_fixes(&self, uri: &str) -> Option<&DocumentFixes> {
        self.documents.get(uri)
    }

    /// Whether any fix is recorded for a document.
    pub fn has_fixes(&self, uri: &str) -> bool {
        self.documents.get(uri).is_some_and(|fixes| !fixes.is_empty())
    }

    /// Drops every fix recorded for a document.
    pub fn clear(&mut self, uri: &str) {
        self.documents.remove(uri);
    }
}

impl Default for FixStore {
    fn default() -> Self {
        Self::new()
    }
}
