//! Server side of the batch auto-fix protocol.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::fix::{Fix, UNKNOWN_VERSION};
use crate::position::Edit;
use crate::resolver::{concatenate_edits, get_all_non_overlapping_fixes};
use crate::store::DocumentFixes;

/// One globally non-overlapping batch of edits for a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    /// Version of the document the edits were computed against.
    pub document_version: i32,
    pub edits: Vec<Edit>,
    /// Whether fixes were held back because they overlapped accepted ones.
    #[serde(rename = "overlappingFixes")]
    pub overlapping_fixes_remain: bool,
}

/// Builds the batch answer for a document.
///
/// Returns `None` when the document is not open or has no stored fixes; the
/// caller treats that as nothing to do.
///
/// The reported version is the version of whichever fix the map yields
/// first. When fixes from several lint passes are stored for the document
/// that choice is arbitrary; clients compare it against their own version
/// and retry on mismatch.
pub fn build_batch(fixes: Option<&DocumentFixes>, document_open: bool) -> Option<BatchResult> {
    if !document_open {
        return None;
    }
    let fixes = fixes.filter(|fixes| !fixes.is_empty())?;

    let document_version = fixes
        .values()
        .next()
        .map_or(UNKNOWN_VERSION, |fix| fix.document_version);

    let candidates: Vec<&Fix> = fixes.values().collect();
    let (accepted, overlapping_fixes_remain) = get_all_non_overlapping_fixes(candidates);

    debug!(
        "Batch for version {}: {} of {} fixes accepted",
        document_version,
        accepted.len(),
        fixes.len()
    );

    Some(BatchResult {
        document_version,
        edits: concatenate_edits(&accepted),
        overlapping_fixes_remain,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::{LintFix, LintMessage};
    use crate::position::TextRange;
    use crate::store::FixStore;
    use pretty_assertions::assert_eq;

    const URI: &str = "file:///tmp/style.styl";

    fn message(line: u32, start: u32, end: u32, replace: &str) -> LintMessage {
        LintMessage {
            line,
            start,
            endline: line,
            end,
            descr: "problem".to_string(),
            rule: "color".to_string(),
            fix: Some(LintFix {
                replace: replace.to_string(),
            }),
        }
    }

    #[test]
    fn test_closed_document_has_no_batch() {
        let mut store = FixStore::new();
        store.record_lint_pass(URI, 1, &[message(1, 1, 5, "a")]);

        assert_eq!(build_batch(store.document_fixes(URI), false), None);
    }

    #[test]
    fn test_document_without_fixes_has_no_batch() {
        let store = FixStore::new();
        assert_eq!(build_batch(store.document_fixes(URI), true), None);

        let empty = DocumentFixes::new();
        assert_eq!(build_batch(Some(&empty), true), None);
    }

    #[test]
    fn test_batch_drops_overlaps_and_flags_them() {
        let mut store = FixStore::new();
        // (0,0)-(0,5), (0,3)-(0,8), (1,0)-(1,2)
        store.record_lint_pass(
            URI,
            3,
            &[
                message(1, 1, 5, "F1"),
                message(1, 4, 8, "F2"),
                message(2, 1, 2, "F3"),
            ],
        );

        let batch = build_batch(store.document_fixes(URI), true).unwrap();

        assert_eq!(batch.document_version, 3);
        assert!(batch.overlapping_fixes_remain);
        assert_eq!(batch.edits.len(), 2);
        assert_eq!(batch.edits[1].new_text, "F3");
        assert_eq!(batch.edits[1].range, TextRange::from_coords(1, 0, 1, 2));
    }

    #[test]
    fn test_batch_without_overlaps() {
        let mut store = FixStore::new();
        store.record_lint_pass(URI, 2, &[message(1, 1, 2, "a"), message(3, 1, 2, "b")]);

        let batch = build_batch(store.document_fixes(URI), true).unwrap();

        assert!(!batch.overlapping_fixes_remain);
        let texts: Vec<&str> = batch.edits.iter().map(|e| e.new_text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b"]);
    }

    #[test]
    fn test_batch_version_comes_from_some_stored_fix() {
        let mut store = FixStore::new();
        store.record_lint_pass(URI, 1, &[message(1, 1, 2, "a")]);
        store.record_lint_pass(URI, 2, &[message(3, 1, 2, "b")]);

        let batch = build_batch(store.document_fixes(URI), true).unwrap();

        assert!([1, 2].contains(&batch.document_version));
    }

    #[test]
    fn test_wire_format() {
        let batch = BatchResult {
            document_version: 4,
            edits: Vec::new(),
            overlapping_fixes_remain: true,
        };

        let json = serde_json::to_value(&batch).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "documentVersion": 4, "edits": [], "overlappingFixes": true })
        );
    }
}
