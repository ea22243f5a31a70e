//! Runner configuration.

use crate::config::{
    Settings, DEFAULT_CONCURRENCY, DEFAULT_DECLARATION_FILE, DEFAULT_MIN_INTERVAL_MS,
};
use crate::rate_limit::RequestGate;
use crate::report::ReportOptions;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for a staleness check run.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Directory scanned for declarations.
    root: PathBuf,
    /// GitHub token used for API calls.
    token: String,
    /// Declaration file name.
    declaration_file: String,
    /// Maximum declarations checked at once.
    concurrency: usize,
    /// Minimum spacing between upstream requests.
    min_interval: Duration,
    /// Console output switches.
    report: ReportOptions,
}

impl RunnerConfig {
    /// Creates a configuration with default settings.
    pub fn new(root: PathBuf, token: String) -> Self {
        Self {
            root,
            token,
            declaration_file: DEFAULT_DECLARATION_FILE.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
            min_interval: Duration::from_millis(DEFAULT_MIN_INTERVAL_MS),
            report: ReportOptions::default(),
        }
    }

    /// Applies values from a settings file.
    pub fn with_settings(mut self, settings: &Settings) -> Self {
        self.declaration_file = settings.declaration_file.clone();
        self.concurrency = settings.concurrency;
        self.min_interval = match settings.requests_per_hour {
            Some(limit) => RequestGate::hourly_interval(limit),
            None => Duration::from_millis(settings.min_interval_ms),
        };
        self
    }

    /// Sets the maximum number of concurrent checks (at least 1).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Sets the minimum spacing between upstream requests.
    pub fn with_min_interval(mut self, min_interval: Duration) -> Self {
        self.min_interval = min_interval;
        self
    }

    /// Spaces requests so at most `limit` are made per hour.
    pub fn with_requests_per_hour(mut self, limit: u32) -> Self {
        self.min_interval = RequestGate::hourly_interval(limit);
        self
    }

    /// Sets the console output switches.
    pub fn with_report_options(mut self, report: ReportOptions) -> Self {
        self.report = report;
        self
    }

    /// Returns the declaration root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the configured GitHub token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the declaration file name.
    pub fn declaration_file(&self) -> &str {
        &self.declaration_file
    }

    /// Returns the max concurrent checks.
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Returns the minimum spacing between upstream requests.
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Returns the console output switches.
    pub fn report(&self) -> ReportOptions {
        self.report
    }
}
