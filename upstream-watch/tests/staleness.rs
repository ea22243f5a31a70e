use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tempfile::TempDir;
use upstream_watch::upstream::ChangeKind;
use upstream_watch::{
    ChangedFile, CheckOutcome, Revision, Runner, RunnerConfig, RunnerError, UpToDateReason,
    UpstreamError, UpstreamSource, Verdict,
};

/// Upstream keyed by repository name: latest revision and changed files.
#[derive(Default)]
struct FakeUpstream {
    latest: HashMap<&'static str, &'static str>,
    changes: HashMap<&'static str, Vec<&'static str>>,
    compare_calls: Arc<AtomicUsize>,
}

impl FakeUpstream {
    fn repo(mut self, repo: &'static str, latest: &'static str, changed: Vec<&'static str>) -> Self {
        self.latest.insert(repo, latest);
        self.changes.insert(repo, changed);
        self
    }

    fn compare_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.compare_calls)
    }
}

impl UpstreamSource for FakeUpstream {
    async fn latest_revision(
        &self,
        _owner: &str,
        repo: &str,
        _scope: Option<&str>,
    ) -> Result<Option<Revision>, UpstreamError> {
        Ok(self.latest.get(repo).map(|sha| Revision {
            sha: sha.to_string(),
            date: None,
            message: "Upstream change".to_string(),
        }))
    }

    async fn compare(
        &self,
        _owner: &str,
        repo: &str,
        _base: &str,
        _head: &str,
    ) -> Result<Vec<ChangedFile>, UpstreamError> {
        self.compare_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .changes
            .get(repo)
            .into_iter()
            .flatten()
            .map(|path| ChangedFile {
                path: path.to_string(),
                kind: ChangeKind::Modified,
                additions: 1,
                deletions: 1,
                patch: None,
                previous_path: None,
            })
            .collect())
    }
}

fn write_declaration(root: &Path, dir: &str, json: &str) {
    let dir = root.join(dir);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("metadata.json"), json).unwrap();
}

fn runner(root: &Path, source: FakeUpstream) -> Runner<FakeUpstream> {
    let config = RunnerConfig::new(root.to_path_buf(), "token".to_string()).with_concurrency(2);
    Runner::with_source(config, source)
}

fn outcome<'a>(outcomes: &'a [CheckOutcome], name: &str) -> &'a CheckOutcome {
    outcomes
        .iter()
        .find(|outcome| outcome.name == name)
        .unwrap()
}

#[tokio::test]
async fn unchanged_revision_is_up_to_date() {
    let temp = TempDir::new().unwrap();
    write_declaration(
        temp.path(),
        "same",
        r#"{ "name": "same", "owner": "acme", "repo": "same", "commit": "abc123",
             "files": ["lib/x.js"] }"#,
    );
    let runner = runner(
        temp.path(),
        FakeUpstream::default().repo("same", "abc123", vec!["lib/x.js"]),
    );

    let summary = runner.run().await.unwrap();

    assert_eq!(summary.checked, 1);
    assert_eq!(summary.up_to_date(), 1);
    assert_eq!(summary.available, 0);
}

#[tokio::test]
async fn tracked_change_is_an_update() {
    let temp = TempDir::new().unwrap();
    write_declaration(
        temp.path(),
        "tracked",
        r#"{ "name": "tracked", "owner": "acme", "repo": "tracked", "commit": "abc123",
             "files": ["lib/x.js"] }"#,
    );
    let runner = runner(
        temp.path(),
        FakeUpstream::default().repo("tracked", "def456", vec!["lib/x.js"]),
    );

    let outcomes = runner.check_all().await.unwrap();

    let Verdict::UpdateAvailable {
        relevance: Some(report),
        ..
    } = &outcome(&outcomes, "tracked").verdict
    else {
        panic!("expected an update with a relevance report");
    };
    assert_eq!(report.relevant_changes(), 1);
    assert_eq!(report.relevant_files[0].path, "lib/x.js");
}

#[tokio::test]
async fn unrelated_change_is_up_to_date() {
    let temp = TempDir::new().unwrap();
    write_declaration(
        temp.path(),
        "unrelated",
        r#"{ "name": "unrelated", "owner": "acme", "repo": "unrelated", "commit": "abc123",
             "files": ["lib/x.js"] }"#,
    );
    let runner = runner(
        temp.path(),
        FakeUpstream::default().repo("unrelated", "def456", vec!["README.md"]),
    );

    let outcomes = runner.check_all().await.unwrap();

    assert_eq!(
        outcome(&outcomes, "unrelated").verdict,
        Verdict::UpToDate {
            latest: Revision {
                sha: "def456".to_string(),
                date: None,
                message: "Upstream change".to_string(),
            },
            reason: UpToDateReason::NoRelevantChanges { total_changes: 1 },
        }
    );
}

#[tokio::test]
async fn untracked_declaration_updates_without_compare() {
    let temp = TempDir::new().unwrap();
    write_declaration(
        temp.path(),
        "untracked",
        r#"{ "name": "untracked", "owner": "acme", "repo": "untracked", "commit": "abc123" }"#,
    );
    let source = FakeUpstream::default().repo("untracked", "def456", vec!["README.md"]);
    let compare_calls = source.compare_counter();
    let runner = runner(temp.path(), source);

    let summary = runner.run().await.unwrap();

    assert_eq!(summary.available, 1);
    assert_eq!(summary.updates, vec!["untracked"]);
    assert_eq!(compare_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn mixed_catalog_summary_balances() {
    let temp = TempDir::new().unwrap();
    write_declaration(
        temp.path(),
        "a",
        r#"{ "name": "same", "owner": "acme", "repo": "same", "commit": "abc123" }"#,
    );
    write_declaration(
        temp.path(),
        "b",
        r#"{ "name": "tracked", "owner": "acme", "repo": "tracked", "commit": "abc123",
             "files": ["lib/x.js"] }"#,
    );
    write_declaration(
        temp.path(),
        "c",
        r#"{ "name": "untracked", "owner": "acme", "repo": "untracked", "commit": "abc123" }"#,
    );
    write_declaration(
        temp.path(),
        "d",
        r#"{ "name": "gone", "owner": "acme", "repo": "gone", "commit": "abc123" }"#,
    );
    write_declaration(temp.path(), "e", "{ not json");
    let source = FakeUpstream::default()
        .repo("same", "abc123", Vec::new())
        .repo("tracked", "def456", vec!["lib/x.js"])
        .repo("untracked", "def456", Vec::new());
    let runner = runner(temp.path(), source);

    let summary = runner.run().await.unwrap();

    assert_eq!(summary.checked, 5);
    assert_eq!(summary.available, 2);
    assert_eq!(summary.errors, 2);
    assert_eq!(summary.up_to_date(), 1);
    assert_eq!(
        summary.checked,
        summary.available + summary.errors + summary.up_to_date()
    );
    assert_eq!(summary.updates, vec!["tracked", "untracked"]);
}

#[tokio::test]
async fn compare_runs_only_for_tracked_mismatches() {
    let temp = TempDir::new().unwrap();
    write_declaration(
        temp.path(),
        "a",
        r#"{ "name": "same", "owner": "acme", "repo": "same", "commit": "abc123",
             "files": ["lib/x.js"] }"#,
    );
    write_declaration(
        temp.path(),
        "b",
        r#"{ "name": "untracked", "owner": "acme", "repo": "untracked", "commit": "abc123" }"#,
    );
    write_declaration(
        temp.path(),
        "c",
        r#"{ "name": "tracked", "owner": "acme", "repo": "tracked", "commit": "abc123",
             "files": ["lib/x.js"] }"#,
    );
    let source = FakeUpstream::default()
        .repo("same", "abc123", Vec::new())
        .repo("untracked", "def456", Vec::new())
        .repo("tracked", "def456", vec!["README.md"]);
    let compare_calls = source.compare_counter();
    let runner = runner(temp.path(), source);

    let summary = runner.run().await.unwrap();

    // Only "tracked" has both a moved revision and declared files.
    assert_eq!(compare_calls.load(Ordering::SeqCst), 1);
    assert_eq!(summary.available, 1);
    assert_eq!(summary.up_to_date(), 2);
}

#[tokio::test]
async fn empty_root_completes_with_zero_counts() {
    let temp = TempDir::new().unwrap();
    let runner = runner(temp.path(), FakeUpstream::default());

    let summary = runner.run().await.unwrap();

    assert_eq!(summary.checked, 0);
    assert!(!summary.has_errors());
}

#[tokio::test]
async fn missing_root_is_fatal() {
    let temp = TempDir::new().unwrap();
    let runner = runner(&temp.path().join("missing"), FakeUpstream::default());

    let result = runner.run().await;

    assert!(matches!(result, Err(RunnerError::Config(_))));
}
