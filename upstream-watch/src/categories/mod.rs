//! Category index generation.
//!
//! Reads per-category data files, resolves a last-updated timestamp for each
//! from version-control history, and writes a combined `categories.json`.

mod error;
mod git;
mod index;
mod timestamp;

pub use error::CategoryError;
pub use index::{CategoryEntry, CategoryFile, CategoryIndex};
pub use timestamp::{
    is_plausible, resolve_timestamp, CategoryTarget, ResolvedTimestamp, TimestampStrategy,
    DEFAULT_SOURCE, DEFAULT_STRATEGIES,
};

use crate::config::CategorySettings;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, info_span, warn, Instrument};

/// Inputs and output of a generator run.
#[derive(Debug, Clone)]
pub struct CategoryConfig {
    /// Directory containing the per-category `*.json` files.
    pub input_dir: PathBuf,

    /// Where the index is written.
    pub output: PathBuf,

    /// Directory holding one source directory per category slug.
    pub source_root: Option<PathBuf>,
}

impl From<&CategorySettings> for CategoryConfig {
    fn from(settings: &CategorySettings) -> Self {
        Self {
            input_dir: settings.input_dir.clone(),
            output: settings.output.clone(),
            source_root: settings.source_root.clone(),
        }
    }
}

/// Builds the category index.
///
/// # Errors
///
/// Returns [`CategoryError::MissingDirectory`] if the input directory does not
/// exist, or [`CategoryError::IoError`] if it cannot be listed. Individual
/// files that fail to load are skipped.
pub async fn generate_index(config: &CategoryConfig) -> Result<CategoryIndex, CategoryError> {
    let span = info_span!("categories", input = %config.input_dir.display());

    async {
        let now = Utc::now();
        let files = category_files(config)?;
        info!(count = files.len(), "Found category files");

        let mut categories = Vec::with_capacity(files.len());
        for path in files {
            if let Some(entry) = load_entry(config, &path, now).await {
                categories.push(entry);
            }
        }
        categories.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(CategoryIndex {
            generated_at: now,
            total: categories.iter().map(|entry| entry.count).sum(),
            categories,
        })
    }
    .instrument(span)
    .await
}

/// Writes `index` to `path` through a temporary file and a rename.
///
/// # Errors
///
/// Returns [`CategoryError`] if serialization or any file operation fails.
pub fn write_index(index: &CategoryIndex, path: &Path) -> Result<(), CategoryError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error(parent))?;
    }

    let mut json = serde_json::to_string_pretty(index)?;
    json.push('\n');

    let temp = path.with_extension("json.tmp");
    fs::write(&temp, json).map_err(io_error(&temp))?;
    fs::rename(&temp, path).map_err(io_error(path))?;

    info!(
        path = %path.display(),
        categories = index.categories.len(),
        total = index.total,
        "Wrote category index"
    );
    Ok(())
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> CategoryError {
    let path = path.display().to_string();
    move |source| CategoryError::IoError { path, source }
}

/// Lists the `*.json` files in the input directory, minus the output file.
fn category_files(config: &CategoryConfig) -> Result<Vec<PathBuf>, CategoryError> {
    let dir = &config.input_dir;
    if !dir.is_dir() {
        return Err(CategoryError::MissingDirectory {
            path: dir.display().to_string(),
        });
    }

    let entries = fs::read_dir(dir).map_err(io_error(dir))?;

    let output = absolute(&config.output);
    let mut files: Vec<PathBuf> = entries
        .map(|entry| entry.map(|entry| entry.path()))
        .filter_map(|entry| readable_entry(entry, dir))
        .filter(|path| path.is_file())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .filter(|path| absolute(path) != output)
        .collect();
    files.sort();
    Ok(files)
}

/// Passes a directory entry through, logging and dropping unreadable ones.
fn readable_entry(entry: std::io::Result<PathBuf>, dir: &Path) -> Option<PathBuf> {
    match entry {
        Ok(path) => Some(path),
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "Skipping unreadable directory entry");
            None
        }
    }
}

async fn load_entry(
    config: &CategoryConfig,
    path: &Path,
    now: DateTime<Utc>,
) -> Option<CategoryEntry> {
    let slug = path.file_stem()?.to_string_lossy().into_owned();

    let file: CategoryFile = match fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|content| serde_json::from_str(&content).map_err(|e| e.to_string()))
    {
        Ok(file) => file,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Skipping unreadable category file");
            return None;
        }
    };

    let data_file = absolute(path);
    let source_dir = config
        .source_root
        .as_ref()
        .map(|root| absolute(&root.join(&slug)));
    let target = CategoryTarget {
        repo_dir: &config.input_dir,
        data_file: &data_file,
        source_dir: source_dir.as_deref(),
    };
    let resolved = resolve_timestamp(&DEFAULT_STRATEGIES, target, now).await;
    debug!(
        slug = %slug,
        last_updated = %resolved.value,
        source = resolved.source,
        "Resolved category timestamp"
    );

    let count = file.item_count();
    Some(CategoryEntry {
        name: file
            .name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| slug.clone()),
        count,
        slug,
        last_updated: resolved.value,
        source: resolved.source.to_string(),
    })
}

/// Makes `path` absolute so git can resolve it from any working directory.
fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
