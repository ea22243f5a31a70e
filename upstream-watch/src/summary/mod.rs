//! Run summary types and helpers.

mod result;
mod run_summary;

pub use result::{CheckOutcome, UpToDateReason, Verdict};
pub use run_summary::RunSummary;
