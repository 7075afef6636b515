//! LSP type conversion utilities.

use tower_lsp::lsp_types::{
    Diagnostic, DiagnosticSeverity, NumberOrString, Position, Range, TextEdit,
};

use batchfix_core::{Diagnostic as FixDiagnostic, Edit, TextPosition, TextRange};

/// Converts a core position to an LSP position.
pub fn to_lsp_position(position: TextPosition) -> Position {
    Position::new(position.line, position.character)
}

/// Converts a core range to an LSP range.
pub fn to_lsp_range(range: TextRange) -> Range {
    Range::new(to_lsp_position(range.start), to_lsp_position(range.end))
}

/// Converts an LSP range to a core range.
pub fn from_lsp_range(range: Range) -> TextRange {
    TextRange::from_coords(
        range.start.line,
        range.start.character,
        range.end.line,
        range.end.character,
    )
}

/// Converts a core edit to an LSP text edit.
pub fn to_lsp_text_edit(edit: &Edit) -> TextEdit {
    TextEdit {
        range: to_lsp_range(edit.range),
        new_text: edit.new_text.clone(),
    }
}

/// Converts a recorded diagnostic to an LSP diagnostic.
///
/// The rule is published as both code and source.
pub fn to_lsp_diagnostic(diag: &FixDiagnostic) -> Diagnostic {
    Diagnostic {
        range: to_lsp_range(diag.range),
        severity: Some(DiagnosticSeverity::ERROR),
        code: Some(NumberOrString::String(diag.rule_code.clone())),
        source: Some(diag.rule_code.clone()),
        message: diag.message.clone(),
        ..Default::default()
    }
}

/// Converts a diagnostic sent back by the client to the core form used for
/// fix lookup. A missing code maps to an empty rule.
pub fn from_lsp_diagnostic(diag: &Diagnostic) -> FixDiagnostic {
    let rule_code = match &diag.code {
        Some(NumberOrString::String(code)) => code.clone(),
        Some(NumberOrString::Number(code)) => code.to_string(),
        None => String::new(),
    };
    FixDiagnostic::new(from_lsp_range(diag.range), rule_code, diag.message.clone())
}
