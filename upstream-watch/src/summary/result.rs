//! Per-declaration check outcomes.

use crate::relevance::RelevanceReport;
use crate::upstream::Revision;
use serde::Serialize;
use std::path::PathBuf;

/// Why a declaration was judged up to date.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum UpToDateReason {
    /// Latest upstream revision equals the recorded one.
    Unchanged,

    /// Upstream moved, but none of the tracked files changed.
    NoRelevantChanges {
        /// Files changed between the recorded and latest revision.
        total_changes: usize,
    },

    /// Upstream moved, but the comparison failed. Treated as up to date.
    RelevanceUnknown {
        /// Error message from the comparison.
        error: String,
    },
}

/// Result of checking a single declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    /// Nothing the declaration tracks has changed upstream.
    UpToDate {
        /// Latest upstream revision.
        latest: Revision,
        /// Why no update is needed.
        reason: UpToDateReason,
    },

    /// The declaration should be updated.
    UpdateAvailable {
        /// Latest upstream revision.
        latest: Revision,
        /// Relevant changes, absent when the declaration tracks no files.
        relevance: Option<RelevanceReport>,
    },

    /// The declaration could not be checked.
    Error {
        /// Error message.
        message: String,
    },
}

impl Verdict {
    /// Returns true for [`Verdict::UpdateAvailable`].
    #[must_use]
    pub fn is_update_available(&self) -> bool {
        matches!(self, Self::UpdateAvailable { .. })
    }

    /// Returns true for [`Verdict::Error`].
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

/// A verdict together with the declaration it belongs to.
#[derive(Debug, Clone, Serialize)]
pub struct CheckOutcome {
    /// Declaration display name, or the file path if it could not be loaded.
    pub name: String,

    /// Upstream repository in "owner/repo" format, if known.
    pub repository: Option<String>,

    /// Scope path within the upstream repository.
    pub scope: Option<String>,

    /// Recorded revision, if known.
    pub recorded: Option<String>,

    /// Declaration file.
    pub source_file: PathBuf,

    /// Check result.
    pub verdict: Verdict,
}
