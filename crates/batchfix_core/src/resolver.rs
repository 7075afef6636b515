//! Conflict resolution between candidate fixes.
//!
//! Fixes are ordered by their first edit and accepted greedily: a fix is kept
//! when it does not overlap the last fix already kept. This is greedy by
//! start position, not the end-ordered interval scheduling that maximizes
//! the number of kept fixes, so a long early fix can shadow several short
//! later ones. The dropped fixes are picked up by a later batch once the
//! accepted ones have been applied and the document has been linted again.

use tracing::debug;

use crate::fix::Fix;
use crate::position::Edit;

/// Sorts fixes by the start line, then the end line, of their first edit.
///
/// The sort is stable; fixes that compare equal keep their input order.
pub fn sort_fixes(fixes: &mut [&Fix]) {
    fixes.sort_by_key(|fix| {
        fix.first_edit()
            .map(|edit| (edit.range.start.line, edit.range.end.line))
    });
}

/// Returns whether applying `next` after `previous` could corrupt offsets.
///
/// Only the end of each edit in `previous` is compared against the start of
/// each edit in `next`; an edit ending exactly where the next one starts on
/// the same line counts as overlapping. This is not a symmetric interval
/// intersection test.
pub fn overlaps(previous: Option<&Fix>, next: &Fix) -> bool {
    let Some(previous) = previous else {
        return false;
    };

    previous.edits.iter().any(|last| {
        next.edits.iter().any(|edit| {
            let last_end = last.range.end;
            let next_start = edit.range.start;
            last_end.line > next_start.line
                || (last_end.line == next_start.line && last_end.character >= next_start.character)
        })
    })
}

/// Selects a non-overlapping subset of `fixes`.
///
/// Returns the accepted fixes in document order and whether any fix was
/// dropped because it overlapped the previously accepted one.
pub fn get_all_non_overlapping_fixes<'a>(mut fixes: Vec<&'a Fix>) -> (Vec<&'a Fix>, bool) {
    sort_fixes(&mut fixes);

    let mut accepted: Vec<&Fix> = Vec::with_capacity(fixes.len());
    let mut has_overlapping = false;

    for fix in fixes {
        if overlaps(accepted.last().copied(), fix) {
            debug!("Skipping overlapping fix: {}", fix.label);
            has_overlapping = true;
        } else {
            accepted.push(fix);
        }
    }

    (accepted, has_overlapping)
}

/// Flattens the edits of `fixes`, in fix order then edit order.
pub fn concatenate_edits(fixes: &[&Fix]) -> Vec<Edit> {
    fixes
        .iter()
        .flat_map(|fix| fix.edits.iter().cloned())
        .collect()
}
