//! Position, range and edit types for document locations.
//!
//! Lines and characters are zero-based. Characters count UTF-16 code units,
//! the default LSP encoding, and are not guaranteed to fall on grapheme
//! boundaries.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::FixError;

/// A position in a text document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextPosition {
    /// Line number (0-indexed).
    pub line: u32,
    /// Character offset within the line (0-indexed).
    pub character: u32,
}

impl TextPosition {
    /// Creates a new position.
    #[inline]
    pub const fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// A range in a text document. The end is exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextRange {
    pub start: TextPosition,
    pub end: TextPosition,
}

impl TextRange {
    /// Creates a new range.
    #[inline]
    pub const fn new(start: TextPosition, end: TextPosition) -> Self {
        Self { start, end }
    }

    /// Shorthand for `TextRange::new(TextPosition::new(..), TextPosition::new(..))`.
    #[inline]
    pub const fn from_coords(
        start_line: u32,
        start_character: u32,
        end_line: u32,
        end_character: u32,
    ) -> Self {
        Self {
            start: TextPosition::new(start_line, start_character),
            end: TextPosition::new(end_line, end_character),
        }
    }
}

/// A single range-to-text replacement. Empty `new_text` deletes the range.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edit {
    pub range: TextRange,
    #[serde(default)]
    pub new_text: String,
}

impl Edit {
    /// Creates a replacement edit.
    pub fn replace(range: TextRange, new_text: impl Into<String>) -> Self {
        Self {
            range,
            new_text: new_text.into(),
        }
    }

    /// Creates an edit that deletes `range`.
    pub fn delete(range: TextRange) -> Self {
        Self {
            range,
            new_text: String::new(),
        }
    }
}

/// Converts a position to a byte offset in `text`.
///
/// Characters past the end of a line are clamped to the line end, matching
/// how editors treat out-of-range columns. Returns `None` for lines past the
/// end of the document.
pub fn position_to_offset(text: &str, position: TextPosition) -> Option<usize> {
    let mut line_start = 0;
    for _ in 0..position.line {
        let newline = text[line_start..].find('\n')?;
        line_start += newline + 1;
    }

    let line_end = text[line_start..]
        .find('\n')
        .map_or(text.len(), |n| line_start + n);

    let mut col = 0u32;
    let mut offset = line_start;
    for ch in text[line_start..line_end].chars() {
        if col >= position.character {
            break;
        }
        col += ch.len_utf16() as u32;
        offset += ch.len_utf8();
    }

    Some(offset)
}

/// Converts a byte offset to a position in `text`.
pub fn offset_to_position(offset: usize, text: &str) -> Option<TextPosition> {
    if offset > text.len() {
        return None;
    }

    let mut line = 0u32;
    let mut col = 0u32;
    let mut current_offset = 0;

    for ch in text.chars() {
        if current_offset >= offset {
            break;
        }

        if ch == '\n' {
            line += 1;
            col = 0;
        } else {
            col += ch.len_utf16() as u32;
        }

        current_offset += ch.len_utf8();
    }

    Some(TextPosition::new(line, col))
}

/// Applies a set of edits to `text` and returns the new content.
///
/// Edits are resolved against the original text and applied from the end of
/// the document to the beginning so earlier offsets stay valid. Edits whose
/// ranges intersect are rejected rather than applied in an arbitrary order.
pub fn apply_edits(text: &str, edits: &[Edit]) -> Result<String, FixError> {
    let mut resolved = Vec::with_capacity(edits.len());
    for edit in edits {
        let start = position_to_offset(text, edit.range.start).ok_or_else(|| {
            FixError::Internal(format!("Edit start {:?} is outside the document", edit.range.start))
        })?;
        let end = position_to_offset(text, edit.range.end).ok_or_else(|| {
            FixError::Internal(format!("Edit end {:?} is outside the document", edit.range.end))
        })?;
        if start > end {
            return Err(FixError::Internal(format!(
                "Edit range is inverted: start={}, end={}",
                start, end
            )));
        }
        resolved.push((start, end, edit.new_text.as_str()));
    }

    resolved.sort_by(|a, b| b.0.cmp(&a.0));

    for window in resolved.windows(2) {
        let (later_start, _, _) = window[0];
        let (_, earlier_end, _) = window[1];
        if earlier_end > later_start {
            return Err(FixError::Internal(format!(
                "Edits intersect at byte offset {}",
                later_start
            )));
        }
    }

    let mut result = text.to_string();
    for (start, end, new_text) in resolved {
        debug!("Applying edit: replace [{}..{}] with '{}'", start, end, new_text);
        result.replace_range(start..end, new_text);
    }

    Ok(result)
}
