//! Pull request event payload.

use super::LabelError;
use serde::Deserialize;
use std::path::Path;

/// Environment variable GitHub Actions uses for the event payload path.
pub const EVENT_PATH_ENV: &str = "GITHUB_EVENT_PATH";

/// The parts of a `pull_request` event payload label cleanup needs.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestEvent {
    /// Event action (e.g. "closed").
    pub action: String,

    /// The pull request.
    pub pull_request: PullRequestInfo,

    /// Repository the pull request belongs to.
    pub repository: RepositoryInfo,
}

/// Pull request fields from the event payload.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestInfo {
    /// Pull request number.
    pub number: u64,

    /// Whether the pull request was merged. GitHub sends `null` while open.
    #[serde(default)]
    pub merged: Option<bool>,
}

/// Repository fields from the event payload.
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryInfo {
    /// Repository name.
    pub name: String,

    /// Repository owner.
    pub owner: OwnerInfo,
}

/// Repository owner.
#[derive(Debug, Clone, Deserialize)]
pub struct OwnerInfo {
    /// Owner login.
    pub login: String,
}

impl PullRequestEvent {
    /// Loads an event payload from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`LabelError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, LabelError> {
        let content = std::fs::read_to_string(path).map_err(|e| LabelError::EventIo {
            path: path.display().to_string(),
            source: e,
        })?;

        serde_json::from_str(&content).map_err(|e| LabelError::EventParse {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Loads the event payload named by `GITHUB_EVENT_PATH`.
    ///
    /// # Errors
    ///
    /// Returns [`LabelError::MissingEventPath`] if the variable is unset or
    /// empty, otherwise the errors of [`PullRequestEvent::load`].
    pub fn from_env() -> Result<Self, LabelError> {
        match std::env::var_os(EVENT_PATH_ENV) {
            Some(path) if !path.is_empty() => Self::load(Path::new(&path)),
            _ => Err(LabelError::MissingEventPath),
        }
    }

    /// Returns true if this event closed the pull request by merging it.
    #[must_use]
    pub fn is_merge(&self) -> bool {
        self.action == "closed" && self.pull_request.merged.unwrap_or(false)
    }
}
