//! CLI error types.

use thiserror::Error;

/// Errors surfaced by the replay tool.
#[derive(Debug, Error)]
pub enum CliError {
    /// Monitor or store error.
    #[error(transparent)]
    Monitor(#[from] actormon_core::Error),

    /// Malformed replay line.
    #[error("line {line}: {message}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What was wrong.
        message: String,
    },

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON output error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
