//! Request and command identifiers shared by the server and its clients.

use serde::{Deserialize, Serialize};

/// Custom request returning one batch of non-overlapping edits.
pub const ALL_FIXES_METHOD: &str = "textDocument/batchfix/allFixes";

/// Command identifiers dispatched by the editor to the client.
pub mod command_ids {
    pub const APPLY_SINGLE_FIX: &str = "batchfix.applySingleFix";
    pub const APPLY_SAME_FIXES: &str = "batchfix.applySameFixes";
    pub const APPLY_ALL_FIXES: &str = "batchfix.applyAllFixes";
    pub const APPLY_AUTO_FIX: &str = "batchfix.applyAutoFix";

    /// Every command the client registers.
    pub const ALL: [&str; 4] = [
        APPLY_SINGLE_FIX,
        APPLY_SAME_FIXES,
        APPLY_ALL_FIXES,
        APPLY_AUTO_FIX,
    ];
}

/// Identifies a text document by URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentIdentifier {
    pub uri: String,
}

/// Parameters of the [`ALL_FIXES_METHOD`] request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllFixesParams {
    pub text_document: DocumentIdentifier,
    #[serde(default)]
    pub is_on_save: bool,
}

impl AllFixesParams {
    /// Creates request parameters for `uri`.
    pub fn new(uri: impl Into<String>, is_on_save: bool) -> Self {
        Self {
            text_document: DocumentIdentifier { uri: uri.into() },
            is_on_save,
        }
    }
}
