//! Orchestrates a staleness check run over every declaration.

mod config;
mod error;

pub use config::RunnerConfig;
pub use error::RunnerError;

use crate::checker::check_path;
use crate::config::scan_declarations;
use crate::rate_limit::RequestGate;
use crate::report::render_outcome;
use crate::summary::{CheckOutcome, RunSummary};
use crate::upstream::{GitHubSource, UpstreamSource};
use futures::stream::{self, StreamExt};
use octocrab::Octocrab;
use tracing::{info, warn};

/// Runs the staleness check for every declaration under a root directory.
pub struct Runner<S = GitHubSource> {
    config: RunnerConfig,
    source: S,
}

impl Runner<GitHubSource> {
    /// Builds a runner backed by the GitHub API.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Octocrab`] if the client cannot be built.
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        let octocrab = Octocrab::builder()
            .personal_token(config.token().to_string())
            .build()?;
        let gate = RequestGate::new(config.min_interval());
        Ok(Self {
            source: GitHubSource::new(octocrab, gate),
            config,
        })
    }
}

impl<S: UpstreamSource> Runner<S> {
    /// Builds a runner over any upstream source.
    pub fn with_source(config: RunnerConfig, source: S) -> Self {
        Self { config, source }
    }

    /// Executes the full run and returns its summary.
    ///
    /// Per-declaration failures are part of the summary; only a failed scan
    /// of the root directory is an error.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Config`] if the root cannot be scanned.
    pub async fn run(&self) -> Result<RunSummary, RunnerError> {
        let outcomes = self.check_all().await?;
        Ok(RunSummary::from_outcomes(&outcomes))
    }

    /// Checks every declaration, printing each outcome as it completes.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Config`] if the root cannot be scanned.
    pub async fn check_all(&self) -> Result<Vec<CheckOutcome>, RunnerError> {
        info!(path = %self.config.root().display(), "Loading declarations");
        let paths = scan_declarations(self.config.root(), self.config.declaration_file())?;

        if paths.is_empty() {
            warn!("No declarations found");
            return Ok(Vec::new());
        }

        self.source.prepare().await;

        let options = self.config.report();
        let outcomes: Vec<CheckOutcome> = stream::iter(paths)
            .map(|path| async move {
                let outcome = check_path(&self.source, &path).await;
                if let Some(block) = render_outcome(&outcome, options) {
                    println!("{block}");
                }
                outcome
            })
            .buffer_unordered(self.config.concurrency())
            .collect()
            .await;

        info!(count = outcomes.len(), "Checked declarations");
        Ok(outcomes)
    }
}
