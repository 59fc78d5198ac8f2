//! Error types for the `docquery-model` crate.

use thiserror::Error;

/// Errors that can occur when requesting a completion.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The client was misconfigured (empty API key, bad URL, ...).
    #[error("model configuration error: {0}")]
    Config(String),

    /// The request failed at the network layer (including timeouts).
    #[error("completion request failed: {0}")]
    Transport(String),

    /// The service returned a non-success status.
    #[error("completion API returned {status}: {message}")]
    Api {
        /// The HTTP status code.
        status: u16,
        /// Error detail extracted from the response body, or the raw body.
        message: String,
    },

    /// The service response carried no usable completion text.
    #[error("completion response was empty or malformed: {0}")]
    EmptyResponse(String),
}

/// A convenience result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
