//! Error types for the `docquery-rag` crate.

use thiserror::Error;

/// Errors that can occur in pipeline operations.
///
/// Expected per-query conditions (not-found signals, parse failures,
/// resolution misses) are *not* errors — they are represented as data in
/// [`Answer`](docquery_core::Answer) and
/// [`ResolvedDocument`](docquery_core::ResolvedDocument).
#[derive(Debug, Error)]
pub enum RagError {
    /// The retrieval service call failed.
    #[error("retrieval error ({provider}): {message}")]
    Retrieval {
        /// The retrieval provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// A configuration validation error.
    #[error("configuration error: {0}")]
    Config(String),

    /// An error in pipeline orchestration.
    #[error("pipeline error: {0}")]
    Pipeline(String),

    /// The document store root is unusable.
    #[error("document store error: {0}")]
    Store(String),

    /// An error propagated from `docquery-core`.
    #[error(transparent)]
    Core(#[from] docquery_core::CoreError),
}

/// A convenience result type for pipeline operations.
pub type Result<T> = std::result::Result<T, RagError>;
