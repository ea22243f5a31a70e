//! Last-updated timestamp resolution.
//!
//! Timestamps come from an ordered chain of strategies. Each strategy may
//! come up empty; the first plausible answer wins, and the generation time is
//! the fallback when none is.

use super::git::last_commit_time;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::path::Path;
use tracing::debug;

/// One way of finding when a category last changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampStrategy {
    /// Newest commit touching the category's data file.
    DataFileHistory,

    /// Newest commit touching the category's source directory.
    SourceHistory,

    /// Newest commit touching the data file, following renames.
    RenameHistory,

    /// File-system modification time of the data file.
    FileModified,
}

/// Strategy order used by the generator.
pub const DEFAULT_STRATEGIES: [TimestampStrategy; 4] = [
    TimestampStrategy::DataFileHistory,
    TimestampStrategy::SourceHistory,
    TimestampStrategy::RenameHistory,
    TimestampStrategy::FileModified,
];

/// Label recorded when no strategy produced a usable timestamp.
pub const DEFAULT_SOURCE: &str = "default";

/// Paths a strategy may consult for one category.
#[derive(Debug, Clone, Copy)]
pub struct CategoryTarget<'a> {
    /// Working directory for git queries.
    pub repo_dir: &'a Path,

    /// The category's data file.
    pub data_file: &'a Path,

    /// The category's source directory, if configured.
    pub source_dir: Option<&'a Path>,
}

/// A resolved timestamp and the strategy that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTimestamp {
    /// When the category last changed.
    pub value: DateTime<Utc>,

    /// [`TimestampStrategy::name`] of the winning strategy, or
    /// [`DEFAULT_SOURCE`].
    pub source: &'static str,
}

impl TimestampStrategy {
    /// Stable name recorded in the index.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::DataFileHistory => "data-file-history",
            Self::SourceHistory => "source-history",
            Self::RenameHistory => "rename-history",
            Self::FileModified => "file-modified",
        }
    }

    /// Runs the strategy for one category.
    pub async fn resolve(self, target: CategoryTarget<'_>) -> Option<DateTime<Utc>> {
        match self {
            Self::DataFileHistory => {
                last_commit_time(target.repo_dir, target.data_file, false).await
            }
            Self::SourceHistory => {
                let source_dir = target.source_dir?;
                last_commit_time(target.repo_dir, source_dir, false).await
            }
            Self::RenameHistory => last_commit_time(target.repo_dir, target.data_file, true).await,
            Self::FileModified => {
                let metadata = tokio::fs::metadata(target.data_file).await.ok()?;
                metadata.modified().ok().map(DateTime::<Utc>::from)
            }
        }
    }
}

/// Returns true if `value` is a believable last-updated time for a run at
/// `now`: not before 2000 and no more than a day in the future.
#[must_use]
pub fn is_plausible(value: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    let earliest = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).single();
    earliest.is_some_and(|earliest| value >= earliest) && value <= now + Duration::days(1)
}

/// Walks `strategies` in order and returns the first plausible timestamp,
/// or `now` when none is.
pub async fn resolve_timestamp(
    strategies: &[TimestampStrategy],
    target: CategoryTarget<'_>,
    now: DateTime<Utc>,
) -> ResolvedTimestamp {
    for strategy in strategies {
        match strategy.resolve(target).await {
            Some(value) if is_plausible(value, now) => {
                return ResolvedTimestamp {
                    value,
                    source: strategy.name(),
                };
            }
            Some(value) => {
                debug!(
                    strategy = strategy.name(),
                    %value,
                    "Rejected implausible timestamp"
                );
            }
            None => {}
        }
    }

    ResolvedTimestamp {
        value: now,
        source: DEFAULT_SOURCE,
    }
}
