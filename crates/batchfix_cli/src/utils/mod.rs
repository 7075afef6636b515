//! CLI utility functions

use std::path::Path;

use batchfix_core::{CommandLinter, FixConfig};
use miette::{IntoDiagnostic, Result, miette};
use tokio::runtime::Runtime;
use tracing::{debug, info};

pub fn create_tokio_runtime() -> Result<Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .into_diagnostic()
}

/// Loads the configuration named on the command line, or the one found in
/// the current directory.
pub fn load_config(path: Option<&Path>) -> Result<FixConfig> {
    if let Some(path) = path {
        info!("Using config file: {}", path.display());
        return FixConfig::from_file(path).into_diagnostic();
    }

    let cwd = std::env::current_dir().into_diagnostic()?;
    debug!("Looking for config in {}", cwd.display());
    FixConfig::load(&cwd).into_diagnostic()
}

/// Builds the linter named by the configuration.
pub fn configured_linter(config: &FixConfig) -> Result<CommandLinter> {
    config
        .command_linter()
        .ok_or_else(|| miette!("No linter configured: add a \"linter\" entry to .batchfixrc"))
}
