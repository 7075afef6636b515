//! Workspace configuration.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use jsonc_parser::ParseOptions;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::FixError;
use crate::linter::CommandLinter;

/// Configuration file names, in lookup order.
pub const CONFIG_FILES: [&str; 3] = [".batchfixrc", ".batchfixrc.json", "batchfixrc.json"];

/// Configuration for linting and fixing a workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixConfig {
    /// When false, lint passes publish and store nothing.
    #[serde(default = "default_true")]
    pub enable: bool,

    /// External lint command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linter: Option<LinterCommand>,

    /// Whether clients run the batch loop when a document is saved.
    #[serde(default)]
    pub auto_fix_on_save: bool,

    /// Wall-clock bound for the batch loop, in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_budget_ms: Option<u64>,

    /// Keep fixes from earlier lint passes until a new pass replaces them.
    #[serde(default = "default_true")]
    pub retain_stale_fixes: bool,

    /// Directory containing the configuration file.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

/// The command used to lint a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinterCommand {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

fn default_true() -> bool {
    true
}

impl FixConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self {
            enable: true,
            linter: None,
            auto_fix_on_save: false,
            time_budget_ms: None,
            retain_stale_fixes: true,
            base_dir: None,
        }
    }

    /// Finds the first configuration file in `root`.
    pub fn discover(root: &Path) -> Option<PathBuf> {
        CONFIG_FILES
            .iter()
            .map(|name| root.join(name))
            .find(|path| path.is_file())
    }

    /// Loads the configuration of `root`, or the default when none exists.
    pub fn load(root: &Path) -> Result<Self, FixError> {
        match Self::discover(root) {
            Some(path) => Self::from_file(path),
            None => {
                debug!("No config file in {}, using defaults", root.display());
                Ok(Self::new())
            }
        }
    }

    /// Loads configuration from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FixError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| FixError::config(format!("Failed to read config: {}", e)))?;

        let mut config = Self::from_jsonc(&content)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            config.base_dir = Some(parent.to_path_buf());
        }

        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parses configuration from JSON, allowing comments and trailing commas.
    pub fn from_jsonc(content: &str) -> Result<Self, FixError> {
        let value = jsonc_parser::parse_to_serde_value(content, &ParseOptions::default())
            .map_err(|e| FixError::config(format!("Invalid JSON: {}", e)))?
            .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new()));

        serde_json::from_value(value)
            .map_err(|e| FixError::config(format!("Invalid config: {}", e)))
    }

    /// Whether `path` names a configuration file.
    pub fn is_config_file(path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| CONFIG_FILES.contains(&name))
    }

    /// Time budget for the batch loop. Zero means no budget.
    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }

    /// Builds the configured linter, if any.
    ///
    /// The linter runs in the configuration file's directory.
    pub fn command_linter(&self) -> Option<CommandLinter> {
        let linter = self.linter.as_ref()?;
        let mut command = CommandLinter::new(&linter.command).args(linter.args.iter().cloned());
        if let Some(dir) = &self.base_dir {
            command = command.current_dir(dir);
        }
        Some(command)
    }
}

impl Default for FixConfig {
    fn default() -> Self {
        Self::new()
    }
}
