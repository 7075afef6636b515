//! Watched files handler.

use tower_lsp::lsp_types::*;
use tracing::{debug, info};

use batchfix_core::FixConfig;

use crate::config::reload_config;
use crate::state::BackendState;

/// Handles the `workspace/didChangeWatchedFiles` notification.
///
/// Returns `true` when the configuration was reloaded and open documents
/// should be validated again.
pub async fn handle_did_change_watched_files(
    state: &BackendState,
    params: DidChangeWatchedFilesParams,
) -> bool {
    debug!("Watched files changed: {:?}", params.changes);

    let config_changed = params.changes.iter().any(|change| {
        change
            .uri
            .to_file_path()
            .is_ok_and(|path| FixConfig::is_config_file(&path))
    });

    if !config_changed {
        return false;
    }

    info!("Configuration file changed, reloading...");
    reload_config(state)
}
