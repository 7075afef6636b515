//! Error types for fix reconciliation.

use thiserror::Error;

/// Errors that can occur while linting or loading configuration.
///
/// Errors never cross the request/response boundary: the LSP layer logs them
/// and answers with an absent result instead.
#[derive(Debug, Error)]
pub enum FixError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The external linter failed to run or reported garbage.
    #[error("Linter error: {0}")]
    Linter(String),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl FixError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a linter error.
    pub fn linter(message: impl Into<String>) -> Self {
        Self::Linter(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }
}
