//! Configuration and declaration loading.
//!
//! This module finds `metadata.json` declarations on disk, parses them, and
//! loads the optional TOML settings file.

mod declaration;
mod error;
mod settings;

pub use declaration::{Declaration, TrackedFile};
pub use error::ConfigError;
pub use settings::{
    CategorySettings, LabelSettings, Settings, DEFAULT_CONCURRENCY, DEFAULT_DECLARATION_FILE,
    DEFAULT_MIN_INTERVAL_MS, DEFAULT_TRIAGE_LABELS,
};

use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Scans a directory tree for declaration files.
///
/// The layout is free-form; any file named `file_name` counts:
/// ```text
/// catalog/
/// ├── widgets/
/// │   └── metadata.json
/// └── tools/
///     └── formatter/
///         └── metadata.json
/// ```
///
/// Only paths are collected here. Parsing happens per declaration so that a
/// single malformed file does not abort the run.
///
/// # Arguments
///
/// * `root` - Directory to scan
/// * `file_name` - Declaration file name (e.g. `metadata.json`)
///
/// # Returns
///
/// The paths of all declaration files, sorted.
///
/// # Errors
///
/// Returns an error if `root` doesn't exist or any directory can't be read.
pub fn scan_declarations(root: &Path, file_name: &str) -> Result<Vec<PathBuf>, ConfigError> {
    info!(path = %root.display(), file_name, "Scanning declarations");

    if !root.is_dir() {
        return Err(ConfigError::MissingFile {
            path: root.display().to_string(),
        });
    }

    let mut found = Vec::new();
    scan_directory_recursive(root, file_name, &mut found)?;
    found.sort();

    info!(count = found.len(), "Found declarations");
    Ok(found)
}

/// Recursively collects declaration files below `current_path`.
fn scan_directory_recursive(
    current_path: &Path,
    file_name: &str,
    found: &mut Vec<PathBuf>,
) -> Result<(), ConfigError> {
    let entries = std::fs::read_dir(current_path).map_err(|e| ConfigError::IoError {
        path: current_path.display().to_string(),
        source: e,
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::IoError {
            path: current_path.display().to_string(),
            source: e,
        })?;

        let path = entry.path();

        if path.is_dir() {
            scan_directory_recursive(&path, file_name, found)?;
        } else if entry.file_name() == file_name {
            debug!(path = %path.display(), "Found declaration");
            found.push(path);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_declaration(dir: &Path) {
        fs::create_dir_all(dir).unwrap();
        fs::write(
            dir.join("metadata.json"),
            r#"{ "name": "x", "owner": "o", "repo": "r", "commit": "c" }"#,
        )
        .unwrap();
    }

    #[test]
    fn can_scan_nested_declarations() {
        let temp = TempDir::new().unwrap();
        write_declaration(&temp.path().join("widgets"));
        write_declaration(&temp.path().join("tools/formatter"));
        fs::write(temp.path().join("tools/README.md"), "ignored").unwrap();

        let found = scan_declarations(temp.path(), "metadata.json").unwrap();

        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|path| path.ends_with("metadata.json")));
        assert!(found.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn scan_respects_file_name() {
        let temp = TempDir::new().unwrap();
        write_declaration(&temp.path().join("widgets"));

        let found = scan_declarations(temp.path(), "tracking.json").unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn scan_missing_directory() {
        let temp = TempDir::new().unwrap();
        let missing_path = temp.path().join("nonexistent");

        let result = scan_declarations(&missing_path, "metadata.json");
        assert!(matches!(result, Err(ConfigError::MissingFile { .. })));
    }

    #[test]
    fn scan_empty_directory() {
        let temp = TempDir::new().unwrap();

        let found = scan_declarations(temp.path(), "metadata.json").unwrap();
        assert!(found.is_empty());
    }
}
