//! Client-side apply/retry loop for batch auto-fixing.
//!
//! The loop asks the server for a batch, applies it to the live document
//! and asks again while the server reports held-back overlapping fixes or
//! answered for an older document version. It always terminates: either
//! the optional time budget or the iteration ceiling ends it.

use std::future::Future;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::FixError;
use crate::batch::BatchResult;
use crate::position::Edit;
use crate::protocol::AllFixesParams;

/// Maximum number of passes before the loop gives up.
pub const MAX_ITERATIONS: u32 = 10;

/// Notice shown when the document changed while fixes were in flight.
pub const VERSION_MISMATCH_NOTICE: &str =
    "Batchfix: Auto fix on save, fixes could not be applied (client version mismatch).";

/// Notice shown when the editor refused the edits.
pub const APPLY_FAILED_NOTICE: &str = "Batchfix: Auto fix on save, edits could not be applied";

/// Sends batch requests to the server.
pub trait FixRequester {
    /// Sends one [`crate::ALL_FIXES_METHOD`] request.
    fn request_all_fixes(
        &mut self,
        params: AllFixesParams,
    ) -> impl Future<Output = Option<BatchResult>>;
}

/// The live document in the editor.
pub trait EditorDocument {
    /// URI of the document.
    fn uri(&self) -> &str;

    /// Current version of the document.
    fn version(&self) -> i32;

    /// Applies edits to the document buffer.
    fn apply_edits(&mut self, edits: &[Edit]) -> impl Future<Output = Result<(), FixError>>;

    /// Shows an informational message to the user.
    fn show_information(&self, message: &str);
}

/// Why the loop stopped without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoneReason {
    /// The last batch left nothing behind.
    Converged,
    /// The server had nothing to offer.
    NoFixes,
    /// The time budget ran out.
    TimeBudgetExceeded,
    /// The iteration ceiling was reached.
    RetriesExhausted,
}

/// Why the loop stopped early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// The document changed outside the loop.
    VersionMismatch,
    /// The editor could not apply a batch.
    ApplyFailed,
}

/// Terminal state of the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopOutcome {
    Done(DoneReason),
    Aborted(AbortReason),
}

/// Summary of one loop run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopReport {
    pub outcome: LoopOutcome,
    /// Number of batch requests sent.
    pub requests: u32,
    /// Number of batches applied to the document.
    pub batches_applied: u32,
}

enum LoopState {
    Requesting,
    Deciding(Option<BatchResult>),
    Applying(BatchResult),
    Settling { overlapping: bool, retry: bool },
    Finished(LoopOutcome),
}

/// Drives the request/apply/retry cycle for one document.
#[derive(Debug, Clone)]
pub struct ApplyRetryLoop {
    time_budget: Option<Duration>,
    max_iterations: u32,
    is_on_save: bool,
}

impl ApplyRetryLoop {
    /// Creates a loop with no time budget.
    pub fn new() -> Self {
        Self {
            time_budget: None,
            max_iterations: MAX_ITERATIONS,
            is_on_save: true,
        }
    }

    /// Bounds the total wall-clock time of the loop.
    pub fn with_time_budget(mut self, budget: Option<Duration>) -> Self {
        self.time_budget = budget;
        self
    }

    /// Sets the `isOnSave` flag sent with every request.
    pub fn on_save(mut self, is_on_save: bool) -> Self {
        self.is_on_save = is_on_save;
        self
    }

    /// Runs the loop against `client` until it is done or aborted.
    ///
    /// At most one request is outstanding at a time; edits are only applied
    /// when the server answered for the version the loop last observed.
    pub async fn run<C>(&self, client: &mut C) -> LoopReport
    where
        C: FixRequester + EditorDocument,
    {
        let params = AllFixesParams::new(client.uri(), self.is_on_save);
        let start = Instant::now();
        let mut iterations = 0u32;
        let mut last_version = client.version();
        let mut requests = 0u32;
        let mut batches_applied = 0u32;
        let mut state = LoopState::Requesting;

        let outcome = loop {
            state = match state {
                LoopState::Requesting => {
                    requests += 1;
                    LoopState::Deciding(client.request_all_fixes(params.clone()).await)
                }
                LoopState::Deciding(result) => {
                    iterations += 1;
                    self.decide(&*client, result, start, iterations, last_version)
                }
                LoopState::Applying(result) => {
                    // The live version was checked while deciding; the edits
                    // go in without a second guard.
                    match client.apply_edits(&result.edits).await {
                        Ok(()) => {
                            batches_applied += 1;
                            LoopState::Settling {
                                overlapping: result.overlapping_fixes_remain,
                                retry: false,
                            }
                        }
                        Err(e) => {
                            warn!("Applying {} edits failed: {}", result.edits.len(), e);
                            client.show_information(APPLY_FAILED_NOTICE);
                            LoopState::Finished(LoopOutcome::Aborted(AbortReason::ApplyFailed))
                        }
                    }
                }
                LoopState::Settling { overlapping, retry } => {
                    last_version = client.version();
                    if overlapping || retry {
                        LoopState::Requesting
                    } else {
                        LoopState::Finished(LoopOutcome::Done(DoneReason::Converged))
                    }
                }
                LoopState::Finished(outcome) => break outcome,
            };
        };

        debug!(
            "Auto fix finished for {}: {:?} after {} requests",
            client.uri(),
            outcome,
            requests
        );

        LoopReport {
            outcome,
            requests,
            batches_applied,
        }
    }

    fn decide<C>(
        &self,
        client: &C,
        result: Option<BatchResult>,
        start: Instant,
        iterations: u32,
        last_version: i32,
    ) -> LoopState
    where
        C: EditorDocument,
    {
        if let Some(budget) = self.time_budget
            && start.elapsed() > budget
        {
            info!(
                "Auto fix maximum time budget ({}ms) exceeded.",
                budget.as_millis()
            );
            return LoopState::Finished(LoopOutcome::Done(DoneReason::TimeBudgetExceeded));
        }

        if iterations > self.max_iterations {
            info!("Auto fix maximum retries exceeded.");
            return LoopState::Finished(LoopOutcome::Done(DoneReason::RetriesExhausted));
        }

        let Some(result) = result else {
            return LoopState::Finished(LoopOutcome::Done(DoneReason::NoFixes));
        };

        if client.version() != last_version {
            client.show_information(VERSION_MISMATCH_NOTICE);
            return LoopState::Finished(LoopOutcome::Aborted(AbortReason::VersionMismatch));
        }

        if result.document_version != last_version {
            info!(
                "Server document version {} differs from client version {}",
                result.document_version, last_version
            );
            return LoopState::Settling {
                overlapping: result.overlapping_fixes_remain,
                retry: true,
            };
        }

        LoopState::Applying(result)
    }
}

impl Default for ApplyRetryLoop {
    fn default() -> Self {
        Self::new()
    }
}
