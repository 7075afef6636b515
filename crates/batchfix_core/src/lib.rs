//! # batchfix_core
//!
//! Reconciles overlapping lint fixes into batches that can be applied in one
//! edit.
//!
//! This crate provides:
//! - The fix model and its per-diagnostic key
//! - A per-document fix store fed by lint passes
//! - Conflict resolution between overlapping fixes
//! - Quick-fix grouping by rule
//! - The batch request answered by a server
//! - The client-side apply/retry loop
//! - Configuration and the external linter boundary
//!
//! ## Example
//!
//! ```rust
//! use batchfix_core::{FixStore, LintFix, LintMessage, build_batch};
//!
//! let mut store = FixStore::new();
//! let message = LintMessage {
//!     line: 1,
//!     start: 8,
//!     endline: 1,
//!     end: 10,
//!     descr: "Use hex color".to_string(),
//!     rule: "color".to_string(),
//!     fix: Some(LintFix { replace: "#fff".to_string() }),
//! };
//! store.record_lint_pass("file:///a.styl", 1, &[message]);
//!
//! let batch = build_batch(store.document_fixes("file:///a.styl"), true).unwrap();
//! assert_eq!(batch.edits.len(), 1);
//! assert!(!batch.overlapping_fixes_remain);
//! ```

mod batch;
pub mod client;
mod config;
mod diagnostic;
mod error;
mod fix;
mod linter;
pub mod position;
mod protocol;
pub mod resolver;
pub mod retry;
mod rule_group;
mod store;

pub use batch::{BatchResult, build_batch};
pub use config::{CONFIG_FILES, FixConfig, LinterCommand};
pub use diagnostic::{Diagnostic, LintFix, LintMessage, LintReport, ReportedFile};
pub use error::FixError;
pub use fix::{Fix, FixKey, UNKNOWN_VERSION};
pub use linter::{CommandLinter, LintEngine, parse_report};
pub use position::{Edit, TextPosition, TextRange, apply_edits};
pub use protocol::{ALL_FIXES_METHOD, AllFixesParams, DocumentIdentifier, command_ids};
pub use retry::{
    AbortReason, ApplyRetryLoop, DoneReason, EditorDocument, FixRequester, LoopOutcome,
    LoopReport, MAX_ITERATIONS,
};
pub use rule_group::{AggregateFix, DirectFix, FIX_ALL_LABEL, QuickFixPlan, build_quick_fixes};
pub use store::{DocumentFixes, FixStore};
