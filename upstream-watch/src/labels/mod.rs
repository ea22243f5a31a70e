//! Triage label cleanup for merged pull requests.
//!
//! When a pull request is merged, labels such as "needs-review" no longer
//! apply. This module removes a fixed set of them from the pull request.

mod error;
mod event;

pub use error::LabelError;
pub use event::{OwnerInfo, PullRequestEvent, PullRequestInfo, RepositoryInfo, EVENT_PATH_ENV};

use crate::rate_limit::ensure_core_rate_limit;
use octocrab::Octocrab;
use std::future::Future;
use tracing::{debug, info, info_span, warn, Instrument};

/// Issue label operations needed by the cleanup.
pub trait LabelStore {
    /// Returns the names of the labels on an issue or pull request.
    fn list_labels(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> impl Future<Output = Result<Vec<String>, LabelError>> + Send;

    /// Removes a label from an issue or pull request.
    fn remove_label(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        label: &str,
    ) -> impl Future<Output = Result<(), LabelError>> + Send;
}

impl LabelStore for Octocrab {
    async fn list_labels(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<String>, LabelError> {
        ensure_core_rate_limit(self).await?;
        let page = self
            .issues(owner, repo)
            .list_labels_for_issue(number)
            .per_page(100)
            .send()
            .await?;
        Ok(page.items.into_iter().map(|label| label.name).collect())
    }

    async fn remove_label(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        label: &str,
    ) -> Result<(), LabelError> {
        self.issues(owner, repo).remove_label(number, label).await?;
        Ok(())
    }
}

/// Result of a cleanup pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Labels removed.
    pub removed: Vec<String>,

    /// Labels whose removal failed.
    pub failed: Vec<String>,

    /// Why the pull request was left alone, if it was.
    pub skipped: Option<String>,
}

impl CleanupReport {
    /// Returns true if any removal failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Removes the configured triage labels from a merged pull request.
///
/// Events other than a merge are skipped without any API call. A failed
/// removal is recorded and the remaining labels are still attempted.
///
/// # Arguments
///
/// * `store` - Label API
/// * `event` - Pull request event payload
/// * `labels` - Label names to remove, matched case-insensitively
///
/// # Errors
///
/// Returns [`LabelError`] if the labels on the pull request cannot be listed.
pub async fn cleanup_labels<S: LabelStore>(
    store: &S,
    event: &PullRequestEvent,
    labels: &[String],
) -> Result<CleanupReport, LabelError> {
    let owner = &event.repository.owner.login;
    let repo = &event.repository.name;
    let number = event.pull_request.number;
    let span = info_span!(
        "cleanup_labels",
        repo = %format!("{owner}/{repo}"),
        pr = number
    );

    async {
        if !event.is_merge() {
            let reason = if event.action == "closed" {
                "pull request was closed without merging".to_string()
            } else {
                format!("event action is '{}', not a merge", event.action)
            };
            info!(%reason, "Skipping label cleanup");
            return Ok(CleanupReport {
                skipped: Some(reason),
                ..CleanupReport::default()
            });
        }

        let current = store.list_labels(owner, repo, number).await?;
        debug!(labels = ?current, "Current labels");

        let mut report = CleanupReport::default();
        for label in current
            .iter()
            .filter(|name| labels.iter().any(|wanted| wanted.eq_ignore_ascii_case(name)))
        {
            match store.remove_label(owner, repo, number, label).await {
                Ok(()) => {
                    info!(label = %label, "Removed label");
                    report.removed.push(label.clone());
                }
                Err(e) => {
                    warn!(label = %label, error = %e, "Failed to remove label");
                    report.failed.push(label.clone());
                }
            }
        }

        if report.removed.is_empty() && report.failed.is_empty() {
            info!("No triage labels to remove");
        }
        Ok(report)
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// In-memory label store.
    struct FakeStore {
        labels: Vec<&'static str>,
        failing: Option<&'static str>,
        removed: Mutex<Vec<String>>,
        list_calls: Mutex<usize>,
    }

    impl FakeStore {
        fn new(labels: Vec<&'static str>) -> Self {
            Self {
                labels,
                failing: None,
                removed: Mutex::new(Vec::new()),
                list_calls: Mutex::new(0),
            }
        }
    }

    impl LabelStore for FakeStore {
        async fn list_labels(
            &self,
            _owner: &str,
            _repo: &str,
            _number: u64,
        ) -> Result<Vec<String>, LabelError> {
            *self.list_calls.lock().unwrap() += 1;
            Ok(self.labels.iter().map(ToString::to_string).collect())
        }

        async fn remove_label(
            &self,
            _owner: &str,
            _repo: &str,
            _number: u64,
            label: &str,
        ) -> Result<(), LabelError> {
            if self.failing == Some(label) {
                return Err(LabelError::MissingEventPath);
            }
            self.removed.lock().unwrap().push(label.to_string());
            Ok(())
        }
    }

    fn event(action: &str, merged: Option<bool>) -> PullRequestEvent {
        PullRequestEvent {
            action: action.to_string(),
            pull_request: PullRequestInfo { number: 12, merged },
            repository: RepositoryInfo {
                name: "catalog".to_string(),
                owner: OwnerInfo {
                    login: "acme".to_string(),
                },
            },
        }
    }

    fn triage() -> Vec<String> {
        vec!["needs-review".to_string(), "needs-triage".to_string()]
    }

    #[tokio::test]
    async fn removes_only_listed_labels() {
        let store = FakeStore::new(vec!["Needs-Review", "enhancement", "needs-triage"]);

        let report = cleanup_labels(&store, &event("closed", Some(true)), &triage())
            .await
            .unwrap();

        assert_eq!(report.removed, vec!["Needs-Review", "needs-triage"]);
        assert!(!report.has_failures());
        assert_eq!(report.skipped, None);
        assert_eq!(
            *store.removed.lock().unwrap(),
            vec!["Needs-Review", "needs-triage"]
        );
    }

    #[tokio::test]
    async fn unmerged_pull_request_is_skipped() {
        let store = FakeStore::new(vec!["needs-review"]);

        let report = cleanup_labels(&store, &event("closed", Some(false)), &triage())
            .await
            .unwrap();

        assert!(report.skipped.is_some());
        assert!(report.removed.is_empty());
        assert_eq!(*store.list_calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn other_actions_are_skipped() {
        let store = FakeStore::new(vec!["needs-review"]);

        let report = cleanup_labels(&store, &event("synchronize", None), &triage())
            .await
            .unwrap();

        assert!(report.skipped.unwrap().contains("synchronize"));
        assert_eq!(*store.list_calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn failed_removal_does_not_stop_others() {
        let mut store = FakeStore::new(vec!["needs-review", "needs-triage"]);
        store.failing = Some("needs-review");

        let report = cleanup_labels(&store, &event("closed", Some(true)), &triage())
            .await
            .unwrap();

        assert_eq!(report.failed, vec!["needs-review"]);
        assert_eq!(report.removed, vec!["needs-triage"]);
        assert!(report.has_failures());
    }
}
