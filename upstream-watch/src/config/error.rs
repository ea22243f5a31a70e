//! Configuration error types.

use thiserror::Error;

/// Errors that can occur while scanning or parsing declarations and settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file or directory.
    #[error("Failed to read '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a JSON declaration.
    #[error("Failed to parse declaration '{path}': {source}")]
    JsonError {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Failed to parse the TOML settings file.
    #[error("Failed to parse settings '{path}': {source}")]
    TomlError {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// Validation error in a declaration.
    #[error("Validation error in '{path}': {message}")]
    ValidationError { path: String, message: String },

    /// Missing required file or directory.
    #[error("Missing required file: {path}")]
    MissingFile { path: String },
}
