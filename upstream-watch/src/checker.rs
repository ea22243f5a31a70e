//! Staleness check for a single declaration.
//!
//! Two tiers: a cheap comparison of the latest upstream revision against the
//! recorded one, then, only when they differ and the declaration tracks
//! specific files, a comparison of the two revisions filtered down to those
//! files. Upstream churn outside the tracked files never flags an update.

use crate::config::Declaration;
use crate::relevance::filter_relevant;
use crate::summary::{CheckOutcome, UpToDateReason, Verdict};
use crate::upstream::UpstreamSource;
use std::path::Path;
use tracing::{debug, error, info, info_span, warn, Instrument};

/// Checks one declaration against upstream.
///
/// # Returns
///
/// - [`Verdict::Error`] if the latest revision cannot be fetched.
/// - [`Verdict::UpToDate`] if the revision is unchanged, no tracked file
///   changed, or the comparison failed.
/// - [`Verdict::UpdateAvailable`] if the declaration tracks no files and the
///   revision moved, or at least one tracked file changed.
pub async fn check_declaration<S: UpstreamSource>(
    source: &S,
    declaration: &Declaration,
) -> Verdict {
    let span = info_span!(
        "check",
        name = %declaration.name,
        repo = %declaration.full_name()
    );

    async {
        let scope = declaration.scope();
        let latest = match source
            .latest_revision(&declaration.owner, &declaration.repo, scope.as_deref())
            .await
        {
            Ok(Some(revision)) => revision,
            Ok(None) => {
                warn!(scope = scope.as_deref(), "No upstream revisions found");
                return Verdict::Error {
                    message: "no upstream revisions found".to_string(),
                };
            }
            Err(e) => {
                error!(
                    operation = "latest_revision",
                    error = %e,
                    "Failed to fetch latest revision"
                );
                return Verdict::Error {
                    message: e.to_string(),
                };
            }
        };

        if latest.sha == declaration.commit {
            debug!(sha = %latest.sha, "Recorded revision is current");
            return Verdict::UpToDate {
                latest,
                reason: UpToDateReason::Unchanged,
            };
        }

        let tracked_paths = declaration.tracked_paths();
        if tracked_paths.is_empty() {
            info!(latest = %latest.sha, "Revision moved and no files are tracked");
            return Verdict::UpdateAvailable {
                latest,
                relevance: None,
            };
        }

        match source
            .compare(
                &declaration.owner,
                &declaration.repo,
                &declaration.commit,
                &latest.sha,
            )
            .await
        {
            Ok(changed) => {
                let report = filter_relevant(changed, &tracked_paths);
                debug!(
                    total = report.total_changes,
                    relevant = report.relevant_changes(),
                    "Compared revisions"
                );
                if report.has_relevant_changes() {
                    Verdict::UpdateAvailable {
                        latest,
                        relevance: Some(report),
                    }
                } else {
                    Verdict::UpToDate {
                        latest,
                        reason: UpToDateReason::NoRelevantChanges {
                            total_changes: report.total_changes,
                        },
                    }
                }
            }
            Err(e) => {
                warn!(
                    operation = "compare",
                    error = %e,
                    "Failed to compare revisions, assuming no relevant changes"
                );
                Verdict::UpToDate {
                    latest,
                    reason: UpToDateReason::RelevanceUnknown {
                        error: e.to_string(),
                    },
                }
            }
        }
    }
    .instrument(span)
    .await
}

/// Loads and checks the declaration at `path`.
///
/// A declaration that cannot be loaded becomes an error outcome instead of
/// failing the run.
pub async fn check_path<S: UpstreamSource>(source: &S, path: &Path) -> CheckOutcome {
    match Declaration::load(path) {
        Ok(declaration) => {
            let verdict = check_declaration(source, &declaration).await;
            CheckOutcome {
                repository: Some(declaration.full_name()),
                scope: declaration.scope(),
                recorded: Some(declaration.commit),
                name: declaration.name,
                source_file: declaration.source_file,
                verdict,
            }
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "Failed to load declaration");
            CheckOutcome {
                name: path.display().to_string(),
                repository: None,
                scope: None,
                recorded: None,
                source_file: path.to_path_buf(),
                verdict: Verdict::Error {
                    message: e.to_string(),
                },
            }
        }
    }
}
