//! Optional TOML settings shared by all subcommands.

use crate::config::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default name of the per-repository declaration file.
pub const DEFAULT_DECLARATION_FILE: &str = "metadata.json";

/// Default number of declarations checked concurrently.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Default spacing between upstream API requests.
pub const DEFAULT_MIN_INTERVAL_MS: u64 = 100;

/// Labels removed from a pull request once it is merged.
pub const DEFAULT_TRIAGE_LABELS: [&str; 3] = ["needs-review", "needs-triage", "awaiting-merge"];

/// Parsed contents of a settings file.
///
/// Every key is optional; missing keys fall back to the defaults above.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Settings {
    /// File name that marks a declaration.
    pub declaration_file: String,

    /// Maximum declarations checked at once.
    pub concurrency: usize,

    /// Minimum spacing between upstream API requests, in milliseconds.
    pub min_interval_ms: u64,

    /// Hourly request budget. When set, it replaces `min-interval-ms` with
    /// an even spacing across the hour.
    pub requests_per_hour: Option<u32>,

    /// Label cleanup settings.
    pub labels: LabelSettings,

    /// Category index settings.
    pub categories: CategorySettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            declaration_file: DEFAULT_DECLARATION_FILE.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
            min_interval_ms: DEFAULT_MIN_INTERVAL_MS,
            requests_per_hour: None,
            labels: LabelSettings::default(),
            categories: CategorySettings::default(),
        }
    }
}

/// Settings for the `cleanup-labels` subcommand.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct LabelSettings {
    /// Label names removed from merged pull requests.
    pub remove: Vec<String>,
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            remove: DEFAULT_TRIAGE_LABELS.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Settings for the `categories` subcommand.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CategorySettings {
    /// Directory holding per-category JSON files.
    pub input_dir: PathBuf,

    /// Path of the generated index.
    pub output: PathBuf,

    /// Optional root whose `<slug>` subdirectories hold each category's sources.
    pub source_root: Option<PathBuf>,
}

impl Default for CategorySettings {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("data/categories"),
            output: PathBuf::from("data/categories.json"),
            source_root: None,
        }
    }
}

impl Settings {
    /// Loads settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed, or if a
    /// value is out of range.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "Loading settings");

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        let settings: Self = toml::from_str(&content).map_err(|e| ConfigError::TomlError {
            path: path.display().to_string(),
            source: e,
        })?;

        settings.validate(path)?;
        Ok(settings)
    }

    /// Loads settings from `path` when given, otherwise returns defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a given file cannot be loaded.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        let path_str = path.display().to_string();

        if self.concurrency == 0 {
            return Err(ConfigError::ValidationError {
                path: path_str,
                message: "concurrency must be at least 1".to_string(),
            });
        }

        if self.requests_per_hour == Some(0) {
            return Err(ConfigError::ValidationError {
                path: path_str,
                message: "requests-per-hour must be at least 1".to_string(),
            });
        }

        let file_name = self.declaration_file.as_str();
        if file_name.is_empty()
            || file_name.trim() != file_name
            || file_name.contains('/')
            || file_name.contains('\\')
        {
            return Err(ConfigError::ValidationError {
                path: path_str,
                message: "declaration-file must be a bare file name".to_string(),
            });
        }

        Ok(())
    }
}
