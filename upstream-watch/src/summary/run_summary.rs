//! Run summary types.

use super::result::{CheckOutcome, Verdict};

/// Summary of a complete staleness check run.
///
/// Built by folding every [`CheckOutcome`]; the fold does not depend on the
/// order outcomes arrive in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of declarations checked.
    pub checked: usize,

    /// Number of declarations with an update available.
    pub available: usize,

    /// Number of declarations that could not be checked.
    pub errors: usize,

    /// Names of declarations with an update available, sorted.
    pub updates: Vec<String>,
}

impl RunSummary {
    /// Creates a new empty summary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a summary from a set of outcomes.
    #[must_use]
    pub fn from_outcomes<'a>(outcomes: impl IntoIterator<Item = &'a CheckOutcome>) -> Self {
        let mut summary = Self::new();
        for outcome in outcomes {
            summary.record(outcome);
        }
        summary
    }

    /// Updates the summary with a check outcome.
    pub fn record(&mut self, outcome: &CheckOutcome) {
        self.checked += 1;
        match &outcome.verdict {
            Verdict::UpdateAvailable { .. } => {
                self.available += 1;
                let position = self
                    .updates
                    .binary_search(&outcome.name)
                    .unwrap_or_else(|index| index);
                self.updates.insert(position, outcome.name.clone());
            }
            Verdict::Error { .. } => self.errors += 1,
            Verdict::UpToDate { .. } => {}
        }
    }

    /// Number of declarations that are up to date.
    #[must_use]
    pub fn up_to_date(&self) -> usize {
        self.checked - self.available - self.errors
    }

    /// Returns true if any declaration could not be checked.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }
}
