//! Filtering upstream changes down to the files a declaration tracks.

use crate::upstream::ChangedFile;
use serde::Serialize;

/// Outcome of matching a comparison's changed files against tracked paths.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelevanceReport {
    /// Number of files changed between the two revisions.
    pub total_changes: usize,

    /// Changed files that match at least one tracked path.
    pub relevant_files: Vec<ChangedFile>,
}

impl RelevanceReport {
    /// Number of relevant changed files.
    #[must_use]
    pub fn relevant_changes(&self) -> usize {
        self.relevant_files.len()
    }

    /// Returns true if any tracked file changed.
    #[must_use]
    pub fn has_relevant_changes(&self) -> bool {
        !self.relevant_files.is_empty()
    }
}

/// Returns true if `changed_path` and `tracked_path` overlap.
///
/// The match is a substring test in either direction after stripping the
/// tracked path's leading `/`. It tolerates tracked paths that are prefixes
/// or suffixes of the real repository path, and accepts the false positives
/// that come with it (`app` matches `lib/apply.js`).
#[must_use]
pub fn paths_overlap(changed_path: &str, tracked_path: &str) -> bool {
    let tracked = tracked_path.trim_start_matches('/');
    changed_path.contains(tracked) || tracked.contains(changed_path)
}

/// Keeps the changed files that overlap any tracked path.
#[must_use]
pub fn filter_relevant(changed: Vec<ChangedFile>, tracked_paths: &[String]) -> RelevanceReport {
    let total_changes = changed.len();
    let relevant_files = changed
        .into_iter()
        .filter(|file| {
            tracked_paths
                .iter()
                .any(|tracked| paths_overlap(&file.path, tracked))
        })
        .collect();

    RelevanceReport {
        total_changes,
        relevant_files,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::ChangeKind;

    fn changed(path: &str) -> ChangedFile {
        ChangedFile {
            path: path.to_string(),
            kind: ChangeKind::Modified,
            additions: 1,
            deletions: 1,
            patch: None,
            previous_path: None,
        }
    }

    #[test]
    fn tracked_suffix_matches_nested_path() {
        assert!(paths_overlap("packages/foo/src/app.json", "src/app.json"));
        assert!(paths_overlap("packages/foo/src/app.json", "/src/app.json"));
    }

    #[test]
    fn changed_path_inside_tracked_directory_path() {
        assert!(paths_overlap("src", "src/app.json"));
    }

    #[test]
    fn loose_matching_keeps_false_positives() {
        assert!(paths_overlap("lib/apply.js", "app"));
        assert!(!paths_overlap("README.md", "lib/x.js"));
    }

    #[test]
    fn can_filter_relevant_files() {
        let report = filter_relevant(
            vec![changed("lib/x.js"), changed("README.md"), changed("docs/guide.md")],
            &["lib/x.js".to_string(), "/docs".to_string()],
        );

        assert_eq!(report.total_changes, 3);
        assert_eq!(report.relevant_changes(), 2);
        assert_eq!(report.relevant_files[0].path, "lib/x.js");
        assert_eq!(report.relevant_files[1].path, "docs/guide.md");
    }

    #[test]
    fn unrelated_changes_are_not_relevant() {
        let report = filter_relevant(vec![changed("README.md")], &["lib/x.js".to_string()]);

        assert_eq!(report.total_changes, 1);
        assert!(!report.has_relevant_changes());
    }
}
