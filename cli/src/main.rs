//! CLI for upstream-watch.
//!
//! Checks catalog declarations against their upstream repositories, cleans up
//! triage labels on merged pull requests, and regenerates the category index.

use clap::builder::BoolishValueParser;
use clap::{Args, Parser, Subcommand};
use octocrab::Octocrab;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use upstream_watch::categories::{generate_index, write_index, CategoryConfig};
use upstream_watch::labels::{cleanup_labels, CleanupReport, LabelError, PullRequestEvent};
use upstream_watch::{ReportOptions, RunSummary, Runner, RunnerConfig, RunnerError, Settings};

/// Upstream Watch - keep catalog entries in step with their upstream repositories.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML settings file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check every declaration for relevant upstream changes.
    Check(CheckArgs),

    /// Remove triage labels from a merged pull request.
    CleanupLabels(CleanupArgs),

    /// Regenerate the category index with last-updated timestamps.
    Categories(CategoryArgs),
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Directory to scan for declarations.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// GitHub Personal Access Token.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: String,

    /// Print changed files and diffs for declarations with updates.
    #[arg(
        long,
        env = "VERBOSE",
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        default_value = "false",
        default_missing_value = "true"
    )]
    verbose: bool,

    /// Print only declarations with updates.
    #[arg(
        long,
        env = "UPDATES_ONLY",
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        default_value = "false",
        default_missing_value = "true"
    )]
    updates_only: bool,

    /// Maximum concurrent declaration checks.
    #[arg(long)]
    concurrency: Option<usize>,

    /// Minimum spacing between upstream requests, in milliseconds.
    #[arg(long)]
    min_interval_ms: Option<u64>,

    /// Hourly request budget; spaces requests evenly across the hour.
    #[arg(long, conflicts_with = "min_interval_ms")]
    requests_per_hour: Option<u32>,
}

#[derive(Args, Debug)]
struct CleanupArgs {
    /// GitHub Personal Access Token.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: String,

    /// Path to the pull request event payload [default: $GITHUB_EVENT_PATH].
    #[arg(long)]
    event_path: Option<PathBuf>,

    /// Label to remove; repeat to replace the configured list.
    #[arg(long = "label")]
    labels: Vec<String>,
}

#[derive(Args, Debug)]
struct CategoryArgs {
    /// Directory containing per-category JSON files.
    #[arg(long)]
    input_dir: Option<PathBuf>,

    /// Path of the generated index.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Directory holding one source directory per category.
    #[arg(long)]
    source_root: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    install_crypto_provider();
    init_tracing();

    let cli = Cli::parse();

    let settings = match Settings::load_or_default(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = %e, "Failed to load settings");
            return ExitCode::from(2);
        }
    };

    match cli.command {
        Commands::Check(args) => check(args, &settings).await,
        Commands::CleanupLabels(args) => cleanup(args, &settings).await,
        Commands::Categories(args) => categories(args, &settings).await,
    }
}

/// Installs aws-lc-rs as the process-wide rustls provider.
///
/// octocrab's TLS stack also enables `ring`, so rustls cannot pick a
/// provider on its own and panics when the client is built.
fn install_crypto_provider() {
    // Err means a provider is already installed.
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
}

/// Initializes tracing with environment filter support.
///
/// Sets up the global tracing subscriber with:
/// - Compact log formatting (single-line output)
/// - Log level filtering via `RUST_LOG` env var (defaults to "info")
fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

async fn check(args: CheckArgs, settings: &Settings) -> ExitCode {
    match run_check(args, settings).await {
        Ok(summary) => {
            print_summary(&summary);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Critical failure");
            ExitCode::from(2)
        }
    }
}

async fn run_check(args: CheckArgs, settings: &Settings) -> Result<RunSummary, RunnerError> {
    let mut config = RunnerConfig::new(args.root, args.token)
        .with_settings(settings)
        .with_report_options(ReportOptions {
            verbose: args.verbose,
            updates_only: args.updates_only,
        });
    if let Some(concurrency) = args.concurrency {
        config = config.with_concurrency(concurrency);
    }
    if let Some(ms) = args.min_interval_ms {
        config = config.with_min_interval(Duration::from_millis(ms));
    }
    if let Some(limit) = args.requests_per_hour {
        config = config.with_requests_per_hour(limit);
    }

    let runner = Runner::new(config)?;
    runner.run().await
}

/// Prints the final run summary.
fn print_summary(summary: &RunSummary) {
    println!("\nSummary:");
    println!("  Declarations checked: {}", summary.checked);
    println!("  Updates available: {}", summary.available);
    println!("  Up to date: {}", summary.up_to_date());
    println!("  Errors: {}", summary.errors);

    if !summary.updates.is_empty() {
        println!("\nUpdates available for:");
        for name in &summary.updates {
            println!("  - {name}");
        }
    }
}

async fn cleanup(args: CleanupArgs, settings: &Settings) -> ExitCode {
    let event = match load_event(args.event_path.as_deref()) {
        Ok(event) => event,
        Err(e) => {
            error!(error = %e, "Failed to read pull request event");
            return ExitCode::from(2);
        }
    };

    let octocrab = match Octocrab::builder().personal_token(args.token).build() {
        Ok(octocrab) => octocrab,
        Err(e) => {
            error!(error = %e, "Failed to build GitHub client");
            return ExitCode::from(2);
        }
    };

    let labels = if args.labels.is_empty() {
        settings.labels.remove.clone()
    } else {
        args.labels
    };

    match cleanup_labels(&octocrab, &event, &labels).await {
        Ok(report) => {
            print_cleanup(&report);
            if report.has_failures() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            error!(error = %e, "Label cleanup failed");
            ExitCode::from(1)
        }
    }
}

/// Loads the event from `path`, or from `GITHUB_EVENT_PATH` when absent.
fn load_event(path: Option<&Path>) -> Result<PullRequestEvent, LabelError> {
    match path {
        Some(path) => PullRequestEvent::load(path),
        None => PullRequestEvent::from_env(),
    }
}

fn print_cleanup(report: &CleanupReport) {
    if let Some(reason) = &report.skipped {
        println!("Skipped: {reason}");
        return;
    }

    println!("\nLabel cleanup:");
    println!("  Removed: {}", join_or_none(&report.removed));
    println!("  Failed: {}", join_or_none(&report.failed));
}

fn join_or_none(labels: &[String]) -> String {
    if labels.is_empty() {
        "none".to_string()
    } else {
        labels.join(", ")
    }
}

async fn categories(args: CategoryArgs, settings: &Settings) -> ExitCode {
    let mut config = CategoryConfig::from(&settings.categories);
    if let Some(input_dir) = args.input_dir {
        config.input_dir = input_dir;
    }
    if let Some(output) = args.output {
        config.output = output;
    }
    if args.source_root.is_some() {
        config.source_root = args.source_root;
    }

    let index = match generate_index(&config).await {
        Ok(index) => index,
        Err(e) => {
            error!(error = %e, "Failed to generate category index");
            return ExitCode::from(1);
        }
    };

    if let Err(e) = write_index(&index, &config.output) {
        error!(error = %e, "Failed to write category index");
        return ExitCode::from(1);
    }

    print_categories(index.categories.len(), index.total, &config.output);
    ExitCode::SUCCESS
}

fn print_categories(categories: usize, total: u64, output: &Path) {
    println!("\nCategory index:");
    println!("  Categories: {categories}");
    println!("  Items: {total}");
    println!("  Written to: {}", output.display());
}
