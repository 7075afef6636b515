//! Subcommand implementations

pub mod fix;
pub mod lint;
pub mod lsp;
