//! Batch request handler.

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::Url;
use tracing::{debug, error};

use batchfix_core::{AllFixesParams, BatchResult, build_batch};

use crate::state::SharedState;

/// Handles the `textDocument/batchfix/allFixes` request.
///
/// Answers with one batch of non-overlapping edits, or `null` when the
/// document is not open or has no stored fixes.
pub async fn handle_all_fixes(
    state: &SharedState,
    params: AllFixesParams,
) -> Result<Option<BatchResult>> {
    debug!(
        "All fixes request: {} (on save: {})",
        params.text_document.uri, params.is_on_save
    );

    let uri = match Url::parse(&params.text_document.uri) {
        Ok(uri) => uri,
        Err(e) => {
            debug!("Ignoring invalid URI {}: {}", params.text_document.uri, e);
            return Ok(None);
        }
    };

    let open = state.is_open(&uri);
    let fixes = match state.fixes.read() {
        Ok(guard) => guard,
        Err(e) => {
            error!("Fix store lock poisoned: {}", e);
            return Ok(None);
        }
    };

    Ok(build_batch(fixes.document_fixes(uri.as_str()), open))
}
