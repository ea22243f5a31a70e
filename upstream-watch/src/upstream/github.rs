//! GitHub REST implementation of [`UpstreamSource`].

use super::models::{CommitEntry, Comparison};
use super::{ChangedFile, Revision, UpstreamError, UpstreamSource};
use crate::rate_limit::{ensure_core_rate_limit, RequestGate};
use octocrab::Octocrab;
use tracing::{debug, info_span, warn, Instrument};

/// GitHub returns at most this many files from a comparison.
const MAX_COMPARE_FILES: usize = 300;

/// Route for the newest commit touching `scope`, with its query string.
///
/// The `path` parameter is left out entirely for the repository root.
fn commits_route(owner: &str, repo: &str, scope: Option<&str>) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    query.append_pair("per_page", "1");
    if let Some(scope) = scope {
        query.append_pair("path", scope);
    }
    format!("/repos/{owner}/{repo}/commits?{}", query.finish())
}

/// Upstream source backed by the GitHub REST API.
///
/// Every request passes through the shared [`RequestGate`].
pub struct GitHubSource {
    octocrab: Octocrab,
    gate: RequestGate,
}

impl GitHubSource {
    /// Wraps an authenticated client.
    #[must_use]
    pub fn new(octocrab: Octocrab, gate: RequestGate) -> Self {
        Self { octocrab, gate }
    }
}

impl UpstreamSource for GitHubSource {
    async fn latest_revision(
        &self,
        owner: &str,
        repo: &str,
        scope: Option<&str>,
    ) -> Result<Option<Revision>, UpstreamError> {
        let span = info_span!("latest_revision", repo = %format!("{owner}/{repo}"), scope);

        async {
            validate_coordinates(owner, repo)?;
            let route = commits_route(owner, repo, scope);

            self.gate.wait().await;
            let entries: Vec<CommitEntry> = self.octocrab.get(route, None::<&()>).await?;

            let revision = entries.into_iter().next().map(Revision::from);
            debug!(sha = revision.as_ref().map(|r| r.sha.as_str()), "Fetched latest revision");
            Ok(revision)
        }
        .instrument(span)
        .await
    }

    async fn compare(
        &self,
        owner: &str,
        repo: &str,
        base: &str,
        head: &str,
    ) -> Result<Vec<ChangedFile>, UpstreamError> {
        let span = info_span!("compare", repo = %format!("{owner}/{repo}"), base, head);

        async {
            validate_coordinates(owner, repo)?;
            validate_revision(base)?;
            validate_revision(head)?;
            let route = format!("/repos/{owner}/{repo}/compare/{base}...{head}");

            self.gate.wait().await;
            let comparison: Comparison = self.octocrab.get(route, None::<&()>).await?;

            if comparison.files.len() >= MAX_COMPARE_FILES {
                warn!(
                    count = comparison.files.len(),
                    "Comparison hit GitHub's file limit, change list may be truncated"
                );
            }
            debug!(count = comparison.files.len(), "Fetched changed files");
            Ok(comparison.files)
        }
        .instrument(span)
        .await
    }

    async fn prepare(&self) {
        if let Err(e) = ensure_core_rate_limit(&self.octocrab).await {
            warn!(error = %e, "Failed to check rate limit, continuing");
        }
    }
}

/// Rejects owner/repo values that would escape their path segment.
fn validate_coordinates(owner: &str, repo: &str) -> Result<(), UpstreamError> {
    let valid = |part: &str| {
        !part.is_empty()
            && part
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    };

    if valid(owner) && valid(repo) {
        Ok(())
    } else {
        Err(UpstreamError::InvalidCoordinates {
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }
}

/// Rejects revisions that would break the `base...head` compare route.
fn validate_revision(revision: &str) -> Result<(), UpstreamError> {
    let valid = !revision.is_empty()
        && !revision.contains("..")
        && revision
            .chars()
            .all(|c| !c.is_whitespace() && !c.is_control() && !matches!(c, '?' | '#'));

    if valid {
        Ok(())
    } else {
        Err(UpstreamError::InvalidRevision {
            revision: revision.to_string(),
        })
    }
}
