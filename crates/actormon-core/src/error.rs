//! Core error types.

use thiserror::Error;

use crate::metrics::MetricKind;

/// Core monitoring errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Backing store rejected an operation.
    #[error("store error: {0}")]
    Store(String),

    /// Category could not be created in the backing store.
    #[error("failed to create category '{category}': {reason}")]
    CategoryCreation {
        /// Category label.
        category: String,
        /// Reason reported by the store.
        reason: String,
    },

    /// Definition was never registered with the store.
    #[error("unknown {kind} '{name}' in category '{category}'")]
    UnknownDefinition {
        /// Category label.
        category: String,
        /// Metric name.
        name: String,
        /// Metric kind.
        kind: MetricKind,
    },

    /// Operation does not apply to the definition's kind.
    #[error("'{name}' is a {actual}, expected a {expected}")]
    KindMismatch {
        /// Metric name.
        name: String,
        /// Kind the operation requires.
        expected: MetricKind,
        /// Kind of the definition.
        actual: MetricKind,
    },

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for monitoring operations.
pub type Result<T> = std::result::Result<T, Error>;
