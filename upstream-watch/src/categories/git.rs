//! Local git history queries.

use chrono::{DateTime, Utc};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Returns the committer time of the newest commit touching `target`.
///
/// `None` covers every way this can come up empty: git missing, not a
/// repository, path never committed, or unparsable output.
pub(crate) async fn last_commit_time(
    repo_dir: &Path,
    target: &Path,
    follow: bool,
) -> Option<DateTime<Utc>> {
    let mut args = vec!["log", "-1", "--format=%cI"];
    if follow {
        args.push("--follow");
    }

    let output = Command::new("git")
        .args(&args)
        .arg("--")
        .arg(target)
        .current_dir(repo_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .ok()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!(
            path = %target.display(),
            stderr = %stderr.trim(),
            "git log failed"
        );
        return None;
    }

    parse_commit_time(&String::from_utf8_lossy(&output.stdout))
}

/// Parses the `%cI` (strict ISO 8601) output of `git log`.
fn parse_commit_time(stdout: &str) -> Option<DateTime<Utc>> {
    let line = stdout.lines().next()?.trim();
    DateTime::parse_from_rfc3339(line)
        .ok()
        .map(|time| time.with_timezone(&Utc))
}
