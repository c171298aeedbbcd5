//! CLI support for objfilter
//!
//! Provides programmatic access to the `objfilter` command so other tools
//! can run the same checks.

mod check;
mod docs;

pub use check::{execute_check, CheckOptions, CheckResult};
pub use docs::{get_doc_category, get_docs_overview, operator_table, DocCategory};

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid query: {0}")]
    Filter(#[from] crate::FilterError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No input provided. Use --input or pipe JSON to stdin.")]
    NoInput,

    #[error("Unknown category: '{0}'\nRun 'objfilter docs' to see available categories.")]
    UnknownCategory(String),
}
