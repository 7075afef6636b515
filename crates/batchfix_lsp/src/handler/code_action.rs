//! Code action handler for auto-fix support.

use serde_json::json;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tracing::{debug, error};

use batchfix_core::{
    AggregateFix, Diagnostic as FixDiagnostic, Edit, build_quick_fixes, command_ids,
};

use crate::conversion::{from_lsp_diagnostic, to_lsp_text_edit};
use crate::state::SharedState;

/// Suffix of the source action that fixes every rule.
const SOURCE_SUFFIX: &str = " (batchfix)";

/// Handles the `textDocument/codeAction` request.
///
/// Offers one quick fix per selected diagnostic with a stored fix, plus the
/// same-rule and all-rules aggregates when they merge more than one fix.
pub async fn handle_code_action(
    state: &SharedState,
    params: CodeActionParams,
) -> Result<Option<CodeActionResponse>> {
    debug!("Code action request: {}", params.text_document.uri);

    let uri = &params.text_document.uri;
    let selected: Vec<FixDiagnostic> = params
        .context
        .diagnostics
        .iter()
        .map(from_lsp_diagnostic)
        .collect();

    let plan = {
        let fixes = match state.fixes.read() {
            Ok(guard) => guard,
            Err(e) => {
                error!("Fix store lock poisoned: {}", e);
                return Ok(None);
            }
        };
        build_quick_fixes(fixes.document_fixes(uri.as_str()), &selected)
    };

    let only = params.context.only.as_deref();
    let wants_quickfix = kind_requested(only, &CodeActionKind::QUICKFIX);
    let wants_source = kind_requested(only, &CodeActionKind::SOURCE);
    let version = plan.document_version;

    let mut actions = Vec::new();

    if wants_quickfix {
        for fix in &plan.direct {
            let diagnostic = params
                .context
                .diagnostics
                .iter()
                .find(|d| from_lsp_diagnostic(d) == fix.diagnostic)
                .cloned();
            let mut action = command_action(
                &fix.label,
                CodeActionKind::QUICKFIX,
                command_ids::APPLY_SINGLE_FIX,
                uri,
                fix.document_version,
                &fix.edits,
            );
            action.diagnostics = diagnostic.map(|d| vec![d]);
            actions.push(CodeActionOrCommand::CodeAction(action));
        }

        if let Some(same) = &plan.same_rule {
            actions.push(aggregate_action(
                same,
                &same.label,
                CodeActionKind::QUICKFIX,
                command_ids::APPLY_SAME_FIXES,
                uri,
                version,
            ));
        }
    }

    if let Some(all) = &plan.all_rules {
        // Offered both as a source action and, for editors that only show
        // the light bulb, as a quick fix.
        if wants_source {
            actions.push(aggregate_action(
                all,
                &format!("{}{}", all.label, SOURCE_SUFFIX),
                CodeActionKind::SOURCE,
                command_ids::APPLY_ALL_FIXES,
                uri,
                version,
            ));
        }
        if wants_quickfix {
            actions.push(aggregate_action(
                all,
                &all.label,
                CodeActionKind::QUICKFIX,
                command_ids::APPLY_ALL_FIXES,
                uri,
                version,
            ));
        }
    }

    Ok(Some(actions))
}

/// Whether `kind` passes the client's `only` filter. A requested kind also
/// matches its sub-kinds.
fn kind_requested(only: Option<&[CodeActionKind]>, kind: &CodeActionKind) -> bool {
    let Some(only) = only else {
        return true;
    };
    only.iter().any(|requested| {
        let requested = requested.as_str();
        let kind = kind.as_str();
        kind == requested
            || kind
                .strip_prefix(requested)
                .is_some_and(|rest| rest.starts_with('.'))
    })
}

fn aggregate_action(
    fix: &AggregateFix,
    title: &str,
    kind: CodeActionKind,
    command: &str,
    uri: &Url,
    version: i32,
) -> CodeActionOrCommand {
    CodeActionOrCommand::CodeAction(command_action(title, kind, command, uri, version, &fix.edits))
}

/// Builds an action whose command carries `[uri, documentVersion, edits]`.
fn command_action(
    title: &str,
    kind: CodeActionKind,
    command: &str,
    uri: &Url,
    version: i32,
    edits: &[Edit],
) -> CodeAction {
    let edits: Vec<TextEdit> = edits.iter().map(to_lsp_text_edit).collect();
    CodeAction {
        title: title.to_string(),
        kind: Some(kind),
        command: Some(Command {
            title: title.to_string(),
            command: command.to_string(),
            arguments: Some(vec![json!(uri), json!(version), json!(edits)]),
        }),
        ..Default::default()
    }
}
