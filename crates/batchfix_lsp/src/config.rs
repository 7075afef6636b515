//! Configuration management for LSP server.

use std::sync::Arc;

use tracing::{debug, error, info};

use batchfix_core::FixConfig;

use crate::state::BackendState;

/// Reloads configuration from the workspace root.
///
/// Returns `true` when a new configuration was installed.
pub fn reload_config(state: &BackendState) -> bool {
    let root = match state.workspace_root.read() {
        Ok(g) => g.clone(),
        Err(e) => {
            error!("Workspace root lock poisoned: {}", e);
            return false;
        }
    };

    let Some(root) = root else {
        return false;
    };

    let config = match FixConfig::discover(&root) {
        Some(config_path) => {
            info!("Found config file: {}", config_path.display());
            match FixConfig::from_file(&config_path) {
                Ok(config) => config,
                Err(e) => {
                    error!("Failed to load config: {}", e);
                    return false;
                }
            }
        }
        None => {
            debug!("No config file in {}, using defaults", root.display());
            FixConfig::new()
        }
    };

    apply_config(state, config);
    true
}

/// Installs `config` and the linter it describes.
pub fn apply_config(state: &BackendState, config: FixConfig) {
    if let Some(linter) = config.command_linter() {
        match state.linter.write() {
            Ok(mut guard) => {
                info!("Using linter command: {}", linter.program());
                *guard = Some(Arc::new(linter));
            }
            Err(e) => error!("Linter lock poisoned: {}", e),
        }
    }

    match state.fixes.write() {
        Ok(mut fixes) => fixes.set_retention(config.retain_stale_fixes),
        Err(e) => error!("Fix store lock poisoned: {}", e),
    }

    match state.config.write() {
        Ok(mut guard) => {
            *guard = config;
            info!("Loaded configuration from workspace");
        }
        Err(e) => error!("Config lock poisoned: {}", e),
    }
}
