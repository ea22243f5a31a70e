//! Category index error types.

use thiserror::Error;

/// Errors that can occur while generating the category index.
#[derive(Debug, Error)]
pub enum CategoryError {
    /// The input directory does not exist.
    #[error("Category directory not found: {path}")]
    MissingDirectory { path: String },

    /// Failed to read or write a file.
    #[error("I/O error on '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize the index.
    #[error("Failed to serialize category index: {0}")]
    SerializeError(#[from] serde_json::Error),
}
