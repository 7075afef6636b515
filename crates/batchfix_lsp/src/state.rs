//! LSP Backend state management.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use tower_lsp::lsp_types::Url;

use batchfix_core::{FixConfig, FixStore, LintEngine};

/// Document content and version cache.
#[derive(Debug)]
pub(crate) struct DocumentData {
    pub text: String,
    pub version: i32,
}

/// Shared backend state.
pub(crate) struct BackendState {
    /// Document contents cache.
    pub documents: RwLock<HashMap<Url, DocumentData>>,
    /// Lint engine (None until a linter is configured).
    pub linter: RwLock<Option<Arc<dyn LintEngine>>>,
    /// Candidate fixes recorded by lint passes.
    pub fixes: RwLock<FixStore>,
    /// Active workspace configuration.
    pub config: RwLock<FixConfig>,
    /// Workspace root path.
    pub workspace_root: RwLock<Option<PathBuf>>,
}

impl fmt::Debug for BackendState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendState")
            .field("documents", &"<HashMap<Url, DocumentData>>")
            .field("linter", &"<Option<dyn LintEngine>>")
            .field("fixes", &self.fixes)
            .field("config", &self.config)
            .field("workspace_root", &self.workspace_root)
            .finish()
    }
}

impl BackendState {
    /// Creates a new empty state.
    pub fn new() -> Self {
        Self::with_linter(None)
    }

    /// Creates a new state with a pre-initialized lint engine.
    pub fn with_linter(linter: Option<Arc<dyn LintEngine>>) -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
            linter: RwLock::new(linter),
            fixes: RwLock::new(FixStore::new()),
            config: RwLock::new(FixConfig::new()),
            workspace_root: RwLock::new(None),
        }
    }

    /// Whether a document is currently open.
    pub fn is_open(&self, uri: &Url) -> bool {
        self.documents
            .read()
            .map(|docs| docs.contains_key(uri))
            .unwrap_or(false)
    }

    /// Version of an open document.
    pub fn document_version(&self, uri: &Url) -> Option<i32> {
        self.documents.read().ok()?.get(uri).map(|doc| doc.version)
    }
}

impl Default for BackendState {
    fn default() -> Self {
        Self::new()
    }
}

/// Type alias for shared state.
pub type SharedState = Arc<BackendState>;
