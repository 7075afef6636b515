//! Client-side command handling.
//!
//! Code actions published by the server carry a command whose arguments are
//! `[uri, documentVersion, edits]`. The helpers here apply those edits to the
//! editor's document and drive the batch loop for the fix-all and on-save
//! paths.

use serde_json::Value;
use tracing::{debug, warn};

use crate::FixError;
use crate::config::FixConfig;
use crate::fix::UNKNOWN_VERSION;
use crate::position::Edit;
use crate::protocol::command_ids;
use crate::retry::{ApplyRetryLoop, EditorDocument, FixRequester, LoopReport};

/// Notice shown when a code action was computed for an older document.
pub const OUTDATED_NOTICE: &str =
    "Batchfix fixes are outdated and can't be applied to the document.";

/// Applies `edits` to `document` if it is the document they were made for.
///
/// A `document_version` other than [`UNKNOWN_VERSION`] must match the live
/// version; otherwise the user is told the fixes are outdated and nothing is
/// changed. A document with a different URI is left alone. Both cases count
/// as handled; only a failed edit returns `false`.
pub async fn apply_text_edits<D>(
    document: &mut D,
    uri: &str,
    document_version: i32,
    edits: &[Edit],
) -> bool
where
    D: EditorDocument,
{
    if document.uri() != uri {
        debug!("Ignoring edits for {}: active document is {}", uri, document.uri());
        return true;
    }

    if document_version != UNKNOWN_VERSION && document.version() != document_version {
        document.show_information(OUTDATED_NOTICE);
        return true;
    }

    match document.apply_edits(edits).await {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to apply {} edits to {}: {}", edits.len(), uri, e);
            false
        }
    }
}

/// Runs the batch loop on the active document with no time budget.
///
/// Does nothing when the server is not running or no document is active.
pub async fn fix_all_problems<C>(server_running: bool, active: Option<&mut C>) -> Option<LoopReport>
where
    C: FixRequester + EditorDocument,
{
    if !server_running {
        return None;
    }
    let client = active?;
    Some(ApplyRetryLoop::new().run(client).await)
}

/// Runs the batch loop for a document that is being saved.
///
/// Does nothing unless the configuration enables fixing on save.
pub async fn auto_fix_on_save<C>(client: &mut C, config: &FixConfig) -> Option<LoopReport>
where
    C: FixRequester + EditorDocument,
{
    if !config.enable || !config.auto_fix_on_save {
        return None;
    }
    let report = ApplyRetryLoop::new()
        .with_time_budget(config.time_budget())
        .on_save(true)
        .run(client)
        .await;
    Some(report)
}

/// A command invoked from a code action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    /// Apply one fix, or the fixes of one rule.
    ApplyEdits {
        uri: String,
        document_version: i32,
        edits: Vec<Edit>,
    },
    /// Run the batch loop on the active document.
    FixAll,
    /// Run the batch loop as if the document were being saved.
    AutoFix,
}

/// Result of executing a [`ClientCommand`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Edits were handled; `false` when the editor rejected them.
    Edits(bool),
    /// The batch loop ran.
    Loop(LoopReport),
    /// Nothing to do.
    Skipped,
}

impl ClientCommand {
    /// Parses a command invocation.
    pub fn parse(command: &str, arguments: &[Value]) -> Result<Self, FixError> {
        match command {
            command_ids::APPLY_SINGLE_FIX | command_ids::APPLY_SAME_FIXES => {
                let [uri, version, edits] = arguments else {
                    return Err(FixError::parse(format!(
                        "{} expects 3 arguments, got {}",
                        command,
                        arguments.len()
                    )));
                };
                let uri = uri
                    .as_str()
                    .ok_or_else(|| FixError::parse("document URI must be a string"))?;
                let document_version = version
                    .as_i64()
                    .and_then(|v| i32::try_from(v).ok())
                    .ok_or_else(|| FixError::parse("document version must be an integer"))?;
                let edits: Vec<Edit> = serde_json::from_value(edits.clone())
                    .map_err(|e| FixError::parse(format!("Invalid edits: {}", e)))?;
                Ok(Self::ApplyEdits {
                    uri: uri.to_string(),
                    document_version,
                    edits,
                })
            }
            // The fix-all action carries edits too, but the loop recomputes them.
            command_ids::APPLY_ALL_FIXES => Ok(Self::FixAll),
            command_ids::APPLY_AUTO_FIX => Ok(Self::AutoFix),
            other => Err(FixError::parse(format!("Unknown command: {}", other))),
        }
    }

    /// Executes the command against the active document.
    pub async fn execute<C>(
        &self,
        server_running: bool,
        active: Option<&mut C>,
        config: &FixConfig,
    ) -> CommandOutcome
    where
        C: FixRequester + EditorDocument,
    {
        match self {
            Self::ApplyEdits {
                uri,
                document_version,
                edits,
            } => match active {
                Some(document) => {
                    CommandOutcome::Edits(
                        apply_text_edits(document, uri, *document_version, edits).await,
                    )
                }
                None => CommandOutcome::Edits(true),
            },
            Self::FixAll => fix_all_problems(server_running, active).await.into(),
            Self::AutoFix => match active {
                Some(client) if server_running => {
                    auto_fix_on_save(client, config).await.into()
                }
                _ => CommandOutcome::Skipped,
            },
        }
    }
}

impl From<Option<LoopReport>> for CommandOutcome {
    fn from(report: Option<LoopReport>) -> Self {
        report.map_or(Self::Skipped, Self::Loop)
    }
}
