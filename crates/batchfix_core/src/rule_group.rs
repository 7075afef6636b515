//! Quick-fix grouping by rule.
//!
//! For the diagnostics selected in the editor this builds one direct fix per
//! diagnostic plus two aggregates over the whole document: every
//! non-overlapping fix of the selected rule, and every non-overlapping fix
//! regardless of rule.

use crate::diagnostic::Diagnostic;
use crate::fix::{Fix, FixKey, UNKNOWN_VERSION};
use crate::position::Edit;
use crate::resolver::{concatenate_edits, overlaps, sort_fixes};
use crate::store::DocumentFixes;

/// Label of the aggregate that fixes every rule.
pub const FIX_ALL_LABEL: &str = "Fix all auto-fixable problems";

/// A fix offered for one selected diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectFix {
    pub label: String,
    pub diagnostic: Diagnostic,
    /// Version of the lint pass that produced this fix.
    pub document_version: i32,
    pub edits: Vec<Edit>,
}

/// A batch of non-overlapping fixes offered as one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateFix {
    pub label: String,
    /// Number of fixes merged into `edits`.
    pub fix_count: usize,
    pub edits: Vec<Edit>,
}

/// Quick fixes available for a selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickFixPlan {
    /// Document version the edits were computed against, or
    /// [`UNKNOWN_VERSION`].
    pub document_version: i32,
    pub direct: Vec<DirectFix>,
    /// Present when more than one fix of the selected rule exists.
    pub same_rule: Option<AggregateFix>,
    /// Present when more than one fix of any rule exists.
    pub all_rules: Option<AggregateFix>,
}

impl QuickFixPlan {
    fn empty() -> Self {
        Self {
            document_version: UNKNOWN_VERSION,
            direct: Vec::new(),
            same_rule: None,
            all_rules: None,
        }
    }

    /// Whether nothing can be offered.
    pub fn is_empty(&self) -> bool {
        self.direct.is_empty()
    }
}

/// Builds the quick fixes for `selected` from a document's stored fixes.
///
/// Diagnostics without a stored fix are skipped. The target rule and the
/// reported version come from the last selected diagnostic that matched.
/// Aggregates are only computed when at least one direct fix exists.
pub fn build_quick_fixes(fixes: Option<&DocumentFixes>, selected: &[Diagnostic]) -> QuickFixPlan {
    let mut plan = QuickFixPlan::empty();
    let Some(fixes) = fixes else {
        return plan;
    };

    let mut rule_code: Option<&str> = None;
    for diagnostic in selected {
        if let Some(fix) = fixes.get(&FixKey::from(diagnostic)) {
            plan.document_version = fix.document_version;
            rule_code = Some(fix.rule_code.as_str());
            plan.direct.push(DirectFix {
                label: fix.label.clone(),
                diagnostic: diagnostic.clone(),
                document_version: fix.document_version,
                edits: fix.edits.clone(),
            });
        }
    }

    if plan.direct.is_empty() {
        return plan;
    }

    let mut sorted: Vec<&Fix> = fixes.values().collect();
    sort_fixes(&mut sorted);

    let mut same: Vec<&Fix> = Vec::new();
    let mut all: Vec<&Fix> = Vec::new();
    for fix in sorted {
        if plan.document_version == UNKNOWN_VERSION {
            plan.document_version = fix.document_version;
        }
        if Some(fix.rule_code.as_str()) == rule_code && !overlaps(same.last().copied(), fix) {
            same.push(fix);
        }
        if !overlaps(all.last().copied(), fix) {
            all.push(fix);
        }
    }

    if same.len() > 1 {
        plan.same_rule = Some(AggregateFix {
            label: format!("Fix all: {}", same[0].rule_code),
            fix_count: same.len(),
            edits: concatenate_edits(&same),
        });
    }

    if all.len() > 1 {
        plan.all_rules = Some(AggregateFix {
            label: FIX_ALL_LABEL.to_string(),
            fix_count: all.len(),
            edits: concatenate_edits(&all),
        });
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::{LintFix, LintMessage};
    use crate::store::FixStore;
    use pretty_assertions::assert_eq;

    const URI: &str = "file:///tmp/style.styl";

    fn message(line: u32, start: u32, end: u32, rule: &str, fixable: bool) -> LintMessage {
        LintMessage {
            line,
            start,
            endline: line,
            end,
            descr: format!("{} at {}", rule, line),
            rule: rule.to_string(),
            fix: fixable.then(|| LintFix {
                replace: "x".to_string(),
            }),
        }
    }

    #[test]
    fn test_direct_fixes_keep_their_pass_version() {
        let mut store = FixStore::new();
        let old = store.record_lint_pass(URI, 1, &[message(1, 1, 2, "color", true)]);
        let new = store.record_lint_pass(URI, 2, &[message(3, 1, 2, "color", true)]);
        let selected = vec![old[0].clone(), new[0].clone()];

        let plan = build_quick_fixes(store.document_fixes(URI), &selected);

        let versions: Vec<i32> = plan.direct.iter().map(|d| d.document_version).collect();
        assert_eq!(versions, vec![1, 2]);
        assert_eq!(plan.document_version, 2);
    }

    fn store_with(messages: &[LintMessage]) -> (FixStore, Vec<Diagnostic>) {
        let mut store = FixStore::new();
        let diagnostics = store.record_lint_pass(URI, 7, messages);
        (store, diagnostics)
    }

    #[test]
    fn test_no_document_fixes() {
        let diag = message(1, 1, 2, "color", true).to_diagnostic();
        let plan = build_quick_fixes(None, &[diag]);

        assert!(plan.is_empty());
        assert_eq!(plan.document_version, UNKNOWN_VERSION);
    }

    #[test]
    fn test_selection_without_stored_fix() {
        let (store, diagnostics) = store_with(&[
            message(1, 1, 2, "color", true),
            message(2, 1, 2, "color", true),
            message(3, 1, 2, "depthControl", false),
        ]);

        let plan = build_quick_fixes(store.document_fixes(URI), &diagnostics[2..]);

        assert!(plan.is_empty());
        assert!(plan.same_rule.is_none());
        assert!(plan.all_rules.is_none());
    }

    #[test]
    fn test_single_fix_has_no_aggregates() {
        let (store, diagnostics) = store_with(&[message(1, 1, 2, "color", true)]);

        let plan = build_quick_fixes(store.document_fixes(URI), &diagnostics);

        assert_eq!(plan.direct.len(), 1);
        assert_eq!(plan.direct[0].label, "Fix: color at 1");
        assert_eq!(plan.direct[0].diagnostic, diagnostics[0]);
        assert_eq!(plan.direct[0].document_version, 7);
        assert_eq!(plan.document_version, 7);
        assert!(plan.same_rule.is_none());
        assert!(plan.all_rules.is_none());
    }

    #[test]
    fn test_same_rule_and_all_rules_aggregates() {
        let (store, diagnostics) = store_with(&[
            message(1, 1, 2, "color", true),
            message(2, 1, 2, "color", true),
            message(3, 1, 2, "semicolons", true),
        ]);

        let plan = build_quick_fixes(store.document_fixes(URI), &diagnostics[..1]);

        let same = plan.same_rule.expect("same-rule aggregate");
        assert_eq!(same.label, "Fix all: color");
        assert_eq!(same.fix_count, 2);
        assert_eq!(same.edits.len(), 2);
        assert_eq!(same.edits[0].range.start.line, 0);
        assert_eq!(same.edits[1].range.start.line, 1);

        let all = plan.all_rules.expect("all-rules aggregate");
        assert_eq!(all.label, FIX_ALL_LABEL);
        assert_eq!(all.fix_count, 3);
    }

    #[test]
    fn test_aggregates_skip_overlapping_fixes() {
        let (store, diagnostics) = store_with(&[
            message(1, 1, 6, "color", true),
            message(1, 4, 9, "semicolons", true),
            message(2, 1, 3, "color", true),
        ]);

        let plan = build_quick_fixes(store.document_fixes(URI), &diagnostics[2..]);

        // Both color fixes are on different lines; they form the same-rule set.
        let same = plan.same_rule.expect("same-rule aggregate");
        assert_eq!(same.fix_count, 2);

        // The semicolons fix overlaps the first color fix on line 0.
        let all = plan.all_rules.expect("all-rules aggregate");
        assert_eq!(all.fix_count, 2);
    }

    #[test]
    fn test_same_rule_needs_more_than_one() {
        let (store, diagnostics) = store_with(&[
            message(1, 1, 2, "color", true),
            message(2, 1, 2, "semicolons", true),
        ]);

        let plan = build_quick_fixes(store.document_fixes(URI), &diagnostics[..1]);

        assert!(plan.same_rule.is_none());
        assert_eq!(plan.all_rules.map(|a| a.fix_count), Some(2));
    }

    #[test]
    fn test_target_rule_is_last_matched_selection() {
        let (store, diagnostics) = store_with(&[
            message(1, 1, 2, "color", true),
            message(2, 1, 2, "semicolons", true),
            message(3, 1, 2, "semicolons", true),
        ]);

        let plan = build_quick_fixes(store.document_fixes(URI), &diagnostics[..2]);

        assert_eq!(plan.direct.len(), 2);
        assert_eq!(
            plan.same_rule.map(|s| s.label),
            Some("Fix all: semicolons".to_string())
        );
    }
}
