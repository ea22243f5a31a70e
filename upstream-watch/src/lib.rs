#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod categories;
pub mod checker;
pub mod config;
pub mod labels;
pub mod rate_limit;
pub mod relevance;
pub mod report;
pub mod runner;
pub mod summary;
pub mod upstream;

pub use categories::{
    generate_index, write_index, CategoryConfig, CategoryError, CategoryIndex, TimestampStrategy,
};
pub use checker::{check_declaration, check_path};
pub use config::{scan_declarations, ConfigError, Declaration, Settings, TrackedFile};
pub use labels::{cleanup_labels, CleanupReport, LabelError, LabelStore, PullRequestEvent};
pub use rate_limit::{
    check_core_rate_limit, ensure_core_rate_limit, wait_if_needed, RateLimitInfo, RequestGate,
};
pub use relevance::{filter_relevant, paths_overlap, RelevanceReport};
pub use report::{render_outcome, ReportOptions};
pub use runner::{Runner, RunnerConfig, RunnerError};
pub use summary::{CheckOutcome, RunSummary, UpToDateReason, Verdict};
pub use upstream::{ChangedFile, GitHubSource, Revision, UpstreamError, UpstreamSource};
