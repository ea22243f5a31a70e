//! Access to the upstream hosting service.
//!
//! The staleness checker only needs two capabilities from upstream: the
//! newest revision touching a path, and the files changed between two
//! revisions. [`UpstreamSource`] captures exactly those so the checker can be
//! driven by GitHub in production and by in-memory fakes in tests.

mod error;
mod github;
mod models;

pub use error::UpstreamError;
pub use github::GitHubSource;
pub use models::{short_sha, ChangeKind, ChangedFile, Revision};

use std::future::Future;

/// Read-only view of an upstream repository's history.
pub trait UpstreamSource {
    /// Returns the newest revision touching `scope` (or the whole repository
    /// when `scope` is `None`), or `None` if there is no such revision.
    fn latest_revision(
        &self,
        owner: &str,
        repo: &str,
        scope: Option<&str>,
    ) -> impl Future<Output = Result<Option<Revision>, UpstreamError>> + Send;

    /// Returns every file changed between `base` and `head`.
    fn compare(
        &self,
        owner: &str,
        repo: &str,
        base: &str,
        head: &str,
    ) -> impl Future<Output = Result<Vec<ChangedFile>, UpstreamError>> + Send;

    /// Runs once before a batch of checks. Sources with a request budget
    /// use it to wait out an exhausted window.
    fn prepare(&self) -> impl Future<Output = ()> + Send {
        async {}
    }
}
