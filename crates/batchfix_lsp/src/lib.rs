//! batchfix LSP Server
//!
//! Language Server Protocol implementation for batchfix.
//! Publishes lint diagnostics, offers their fixes as code actions and
//! answers batch requests with non-overlapping edits.

use std::path::PathBuf;
use std::sync::Arc;

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, ClientSocket, LanguageServer, LspService, Server};
use tracing::{debug, error, info};

use batchfix_core::{
    ALL_FIXES_METHOD, AllFixesParams, BatchResult, LintEngine, LintMessage, UNKNOWN_VERSION,
};

mod config;
mod conversion;
mod debounce;
mod handler;
mod state;

use conversion::to_lsp_diagnostic;
use state::{BackendState, SharedState};

/// The LSP backend for batchfix.
#[derive(Clone)]
pub struct Backend {
    /// LSP client for sending notifications.
    client: Client,
    /// Shared state
    state: SharedState,
}

impl Backend {
    /// Creates a new backend with the given client.
    ///
    /// The lint command is taken from the workspace configuration during
    /// `initialize`.
    pub fn new(client: Client) -> Self {
        Self::with_engine(client, None)
    }

    /// Creates a backend with a pre-configured lint engine.
    ///
    /// A linter named by the workspace configuration still replaces it.
    pub fn with_engine(client: Client, engine: Option<Arc<dyn LintEngine>>) -> Self {
        Self {
            client,
            state: Arc::new(BackendState::with_linter(engine)),
        }
    }

    /// Handles the `textDocument/batchfix/allFixes` request.
    pub async fn all_fixes(&self, params: AllFixesParams) -> Result<Option<BatchResult>> {
        handler::handle_all_fixes(&self.state, params).await
    }

    /// Lints a document, records its fixes and publishes diagnostics.
    async fn validate_document(&self, uri: &Url, text: &str, version: Option<i32>) {
        debug!("Validating document: {}", uri);

        let enabled = match self.state.config.read() {
            Ok(config) => config.enable,
            Err(e) => {
                error!("Config lock poisoned: {}", e);
                return;
            }
        };
        if !enabled {
            debug!("Linting disabled, skipping {}", uri);
            return;
        }

        let messages = self.lint_text(text, uri.to_file_path().ok()).await;

        let document_version = version
            .or_else(|| self.state.document_version(uri))
            .unwrap_or(UNKNOWN_VERSION);

        let diagnostics = match self.state.fixes.write() {
            Ok(mut fixes) => fixes.record_lint_pass(uri.as_str(), document_version, &messages),
            Err(e) => {
                error!("Fix store lock poisoned: {}", e);
                return;
            }
        };

        let lsp_diagnostics: Vec<Diagnostic> = diagnostics.iter().map(to_lsp_diagnostic).collect();

        self.client
            .publish_diagnostics(uri.clone(), lsp_diagnostics, version)
            .await;
    }

    /// Runs the lint engine.
    ///
    /// The engine usually spawns a process, so it runs on the blocking pool.
    async fn lint_text(&self, text: &str, path: Option<PathBuf>) -> Vec<LintMessage> {
        let engine = match self.state.linter.read() {
            Ok(guard) => guard.as_ref().cloned(),
            Err(poisoned) => {
                error!("Linter lock poisoned: {}", poisoned);
                return vec![];
            }
        };

        let Some(engine) = engine else {
            debug!("Linter not available, skipping linting");
            return vec![];
        };

        let text = text.to_string();
        tokio::task::spawn_blocking(move || match engine.lint(path.as_deref(), &text) {
            Ok(messages) => messages,
            Err(e) => {
                error!("Lint error: {}", e);
                vec![]
            }
        })
        .await
        .unwrap_or_default()
    }

    /// Validates every open document again.
    async fn revalidate_open_documents(&self) {
        let open: Vec<(Url, String, i32)> = match self.state.documents.read() {
            Ok(docs) => docs
                .iter()
                .map(|(uri, doc)| (uri.clone(), doc.text.clone(), doc.version))
                .collect(),
            Err(e) => {
                error!("Documents lock poisoned: {}", e);
                return;
            }
        };

        for (uri, text, version) in open {
            self.validate_document(&uri, &text, Some(version)).await;
        }
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        handler::handle_initialize(&self.state, params).await
    }

    async fn initialized(&self, _: InitializedParams) {
        handler::handle_initialized(&self.client).await;
    }

    async fn shutdown(&self) -> Result<()> {
        handler::handle_shutdown().await
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let (uri, text, version) = handler::handle_did_open(&self.state, params).await;
        self.validate_document(&uri, &text, version).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let Some((uri, text, version)) = handler::handle_did_change(&self.state, params).await
        else {
            return;
        };

        let backend = self.clone();
        debounce::spawn_debounced_validation(
            self.state.clone(),
            uri.clone(),
            version,
            move || async move {
                backend.validate_document(&uri, &text, Some(version)).await;
            },
        );
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        let (uri, text) = handler::handle_did_save(params).await;
        if let Some(text) = text {
            self.validate_document(&uri, &text, None).await;
        }
    }

    async fn did_change_watched_files(&self, params: DidChangeWatchedFilesParams) {
        if handler::handle_did_change_watched_files(&self.state, params).await {
            self.revalidate_open_documents().await;
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = handler::handle_did_close(&self.state, params).await;
        self.client.publish_diagnostics(uri, vec![], None).await;
    }

    async fn code_action(&self, params: CodeActionParams) -> Result<Option<CodeActionResponse>> {
        handler::handle_code_action(&self.state, params).await
    }
}

/// Builds the service with the batch request registered.
pub fn build_service<F>(init: F) -> (LspService<Backend>, ClientSocket)
where
    F: FnOnce(Client) -> Backend,
{
    LspService::build(init)
        .custom_method(ALL_FIXES_METHOD, Backend::all_fixes)
        .finish()
}

/// Runs the server on stdin/stdout.
pub async fn run() {
    info!("batchfix LSP server starting...");

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = build_service(Backend::new);
    Server::new(stdin, stdout, socket).serve(service).await;
}
