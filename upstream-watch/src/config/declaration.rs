//! Declaration records loaded from `metadata.json` files.

use crate::config::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A single entry of a declaration's `files` list.
///
/// Entries are either a bare path or an object naming a `source` path; any
/// other keys on the object are ignored. Values of any other shape are kept
/// as [`TrackedFile::Other`] so a single odd entry does not reject the whole
/// declaration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TrackedFile {
    /// A bare relative path.
    Path(String),

    /// An object with a `source` path.
    Mapped {
        /// Path of the file in the upstream repository.
        source: Option<String>,
    },

    /// Anything else. Never resolves to a path.
    Other(serde_json::Value),
}

impl TrackedFile {
    /// Returns the path this entry refers to, if it has one.
    #[must_use]
    pub fn source_path(&self) -> Option<&str> {
        let raw = match self {
            Self::Path(path) => path.as_str(),
            Self::Mapped {
                source: Some(source),
            } => source.as_str(),
            _ => return None,
        };
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

/// A tracked upstream repository, as declared in a `metadata.json` file.
#[derive(Debug, Clone, Deserialize)]
pub struct Declaration {
    /// Display identifier.
    pub name: String,

    /// Upstream owner (user or organization).
    pub owner: String,

    /// Upstream repository name.
    pub repo: String,

    /// Last recorded upstream revision.
    pub commit: String,

    /// Optional subpath that scopes which upstream changes matter.
    #[serde(default)]
    pub path: Option<String>,

    /// Tracked file descriptors, relative to [`Declaration::path`].
    #[serde(default)]
    pub files: Option<Vec<TrackedFile>>,

    /// File the declaration was loaded from.
    #[serde(skip)]
    pub source_file: PathBuf,
}

impl Declaration {
    /// Loads and validates a declaration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, is not valid JSON,
    /// lacks a required field or has an empty one.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "Loading declaration");

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        let mut declaration: Self =
            serde_json::from_str(&content).map_err(|e| ConfigError::JsonError {
                path: path.display().to_string(),
                source: e,
            })?;

        declaration.validate(path)?;
        declaration.source_file = path.to_path_buf();
        Ok(declaration)
    }

    /// Checks that all required fields carry a value.
    fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        let required = [
            ("name", &self.name),
            ("owner", &self.owner),
            ("repo", &self.repo),
            ("commit", &self.commit),
        ];

        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::ValidationError {
                    path: path.display().to_string(),
                    message: format!("{field} must not be empty"),
                });
            }
        }

        Ok(())
    }

    /// Returns the repository in "owner/repo" format.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    /// Returns the normalized scope path, or `None` for the repository root.
    #[must_use]
    pub fn scope(&self) -> Option<String> {
        let scope = normalize_path(self.path.as_deref().unwrap_or_default());
        (!scope.is_empty()).then_some(scope)
    }

    /// Builds the tracked path list by joining every resolvable `files`
    /// entry onto the declaration's scope.
    #[must_use]
    pub fn tracked_paths(&self) -> Vec<String> {
        let scope = self.scope();
        self.files
            .iter()
            .flatten()
            .filter_map(TrackedFile::source_path)
            .map(|entry| match &scope {
                Some(scope) => normalize_path(&format!("{scope}/{entry}")),
                None => normalize_path(entry),
            })
            .filter(|path| !path.is_empty())
            .collect()
    }
}

/// Collapses a slash-separated path: drops empty and `.` segments and
/// resolves `..` against the preceding segment.
fn normalize_path(raw: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in raw.trim().split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn parse(json: &str) -> Declaration {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn load_valid_declaration() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("metadata.json");
        fs::write(
            &path,
            r#"{
                "name": "Widget Kit",
                "owner": "acme",
                "repo": "widgets",
                "commit": "abc123",
                "path": "packages/kit",
                "files": ["index.js", { "source": "lib/x.js", "target": "x.js" }]
            }"#,
        )
        .unwrap();

        let declaration = Declaration::load(&path).unwrap();

        assert_eq!(declaration.name, "Widget Kit");
        assert_eq!(declaration.full_name(), "acme/widgets");
        assert_eq!(declaration.commit, "abc123");
        assert_eq!(declaration.source_file, path);
        assert_eq!(
            declaration.tracked_paths(),
            vec!["packages/kit/index.js", "packages/kit/lib/x.js"]
        );
    }

    #[test]
    fn load_rejects_missing_field() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("metadata.json");
        fs::write(&path, r#"{ "name": "x", "owner": "acme", "repo": "widgets" }"#).unwrap();

        let result = Declaration::load(&path);
        assert!(matches!(result, Err(ConfigError::JsonError { .. })));
    }

    #[test]
    fn load_rejects_blank_commit() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("metadata.json");
        fs::write(
            &path,
            r#"{ "name": "x", "owner": "acme", "repo": "widgets", "commit": "  " }"#,
        )
        .unwrap();

        let result = Declaration::load(&path);
        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }

    #[test]
    fn load_rejects_invalid_json() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("metadata.json");
        fs::write(&path, "{ not json").unwrap();

        let result = Declaration::load(&path);
        assert!(matches!(result, Err(ConfigError::JsonError { .. })));
    }

    #[test]
    fn tracked_paths_drop_unresolvable_entries() {
        let declaration = parse(
            r#"{
                "name": "x", "owner": "o", "repo": "r", "commit": "c",
                "files": ["", { "target": "only-target" }, 42, { "source": "  " }, "keep.json"]
            }"#,
        );

        assert_eq!(declaration.tracked_paths(), vec!["keep.json"]);
    }

    #[test]
    fn tracked_paths_without_files_are_empty() {
        let declaration = parse(r#"{ "name": "x", "owner": "o", "repo": "r", "commit": "c" }"#);
        assert!(declaration.tracked_paths().is_empty());

        let declaration = parse(
            r#"{ "name": "x", "owner": "o", "repo": "r", "commit": "c", "files": null }"#,
        );
        assert!(declaration.tracked_paths().is_empty());
    }

    #[test]
    fn root_scope_keeps_entries_as_declared() {
        let declaration = parse(
            r#"{ "name": "x", "owner": "o", "repo": "r", "commit": "c",
                 "path": "./", "files": ["/src/app.json", "./lib/x.js"] }"#,
        );

        assert_eq!(declaration.scope(), None);
        assert_eq!(declaration.tracked_paths(), vec!["src/app.json", "lib/x.js"]);
    }

    #[test]
    fn can_normalize_paths() {
        assert_eq!(normalize_path("/a//b/./c/"), "a/b/c");
        assert_eq!(normalize_path("a/b/../c"), "a/c");
        assert_eq!(normalize_path("."), "");
        assert_eq!(normalize_path("dir\\file.txt"), "dir/file.txt");
    }
}
