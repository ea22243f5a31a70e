//! Upstream error types.

use thiserror::Error;

/// Errors that can occur while querying the upstream hosting service.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// GitHub API error (transport, non-success status or malformed body).
    #[error("GitHub API error: {0}")]
    GitHubError(#[from] octocrab::Error),

    /// Owner or repository name that cannot be placed in a request path.
    #[error("Invalid repository coordinates: {owner}/{repo}")]
    InvalidCoordinates { owner: String, repo: String },

    /// Revision identifier that cannot be placed in a compare request.
    #[error("Invalid revision identifier: '{revision}'")]
    InvalidRevision { revision: String },
}
