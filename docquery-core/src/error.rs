//! Error types for the `docquery-core` crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in core-level validation.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The document store root does not exist or is not a directory.
    #[error("invalid document store root: {0}")]
    InvalidStoreRoot(PathBuf),
}
