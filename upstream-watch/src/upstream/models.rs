//! Revision and changed-file records returned by the upstream service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of abbreviated revision identifiers in console output.
const SHORT_SHA_LEN: usize = 7;

/// The newest upstream revision touching a declaration's scope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Revision {
    /// Revision identifier (commit hash).
    pub sha: String,

    /// Committer timestamp, falling back to the author timestamp.
    pub date: Option<DateTime<Utc>>,

    /// Full commit message.
    pub message: String,
}

impl Revision {
    /// Returns the first line of the commit message.
    #[must_use]
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or_default().trim()
    }

    /// Returns the abbreviated revision identifier.
    #[must_use]
    pub fn short_sha(&self) -> &str {
        short_sha(&self.sha)
    }
}

/// Abbreviates a revision identifier to its first seven characters.
#[must_use]
pub fn short_sha(sha: &str) -> &str {
    sha.char_indices()
        .nth(SHORT_SHA_LEN)
        .map_or(sha, |(index, _)| &sha[..index])
}

/// Kind of change recorded for a file between two revisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Modified,
    Removed,
    Renamed,
    /// Copied, changed, unchanged or anything newer.
    #[serde(other)]
    Other,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Added => "added",
            Self::Modified => "modified",
            Self::Removed => "removed",
            Self::Renamed => "renamed",
            Self::Other => "changed",
        };
        f.write_str(label)
    }
}

/// A file changed between two revisions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangedFile {
    /// Repository-relative path after the change.
    #[serde(rename = "filename")]
    pub path: String,

    /// Kind of change.
    #[serde(rename = "status")]
    pub kind: ChangeKind,

    /// Lines added.
    #[serde(default)]
    pub additions: u64,

    /// Lines deleted.
    #[serde(default)]
    pub deletions: u64,

    /// Unified diff text. GitHub omits it for binary or very large files.
    #[serde(default)]
    pub patch: Option<String>,

    /// Path before a rename.
    #[serde(default, rename = "previous_filename")]
    pub previous_path: Option<String>,
}

/// Entry of `GET /repos/{owner}/{repo}/commits`.
#[derive(Debug, Deserialize)]
pub(crate) struct CommitEntry {
    sha: String,
    commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    message: String,
    author: Option<Signature>,
    committer: Option<Signature>,
}

#[derive(Debug, Deserialize)]
struct Signature {
    date: Option<DateTime<Utc>>,
}

impl From<CommitEntry> for Revision {
    fn from(entry: CommitEntry) -> Self {
        let CommitDetail {
            message,
            author,
            committer,
        } = entry.commit;
        let date = committer
            .and_then(|signature| signature.date)
            .or_else(|| author.and_then(|signature| signature.date));

        Self {
            sha: entry.sha,
            date,
            message,
        }
    }
}

/// Body of `GET /repos/{owner}/{repo}/compare/{base}...{head}`.
#[derive(Debug, Deserialize)]
pub(crate) struct Comparison {
    #[serde(default)]
    pub(crate) files: Vec<ChangedFile>,
}
