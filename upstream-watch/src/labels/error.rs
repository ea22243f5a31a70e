//! Label cleanup error types.

use thiserror::Error;

/// Errors that can occur during label cleanup.
#[derive(Debug, Error)]
pub enum LabelError {
    /// No event payload path was provided.
    #[error("No event payload path given (set GITHUB_EVENT_PATH or --event-path)")]
    MissingEventPath,

    /// Failed to read the event payload.
    #[error("Failed to read event payload '{path}': {source}")]
    EventIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the event payload.
    #[error("Failed to parse event payload '{path}': {source}")]
    EventParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// GitHub API error.
    #[error("GitHub API error: {0}")]
    GitHubError(#[from] octocrab::Error),
}
