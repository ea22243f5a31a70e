//! Console rendering of check outcomes.
//!
//! Each outcome is rendered into one block of text so concurrent checks can
//! print without interleaving lines.

use crate::relevance::RelevanceReport;
use crate::summary::{CheckOutcome, UpToDateReason, Verdict};
use crate::upstream::{short_sha, Revision};
use std::fmt::Write;

/// Diff lines shown per file in verbose output.
const MAX_PATCH_LINES: usize = 20;

/// Output switches for per-declaration reporting.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOptions {
    /// Print per-file details for declarations with updates.
    pub verbose: bool,

    /// Print only declarations with updates.
    pub updates_only: bool,
}

/// Renders one outcome, or `None` if the options suppress it.
///
/// `updates_only` hides up-to-date outcomes and the "Checking" prefix;
/// updates and errors are always shown.
#[must_use]
pub fn render_outcome(outcome: &CheckOutcome, options: ReportOptions) -> Option<String> {
    if options.updates_only && matches!(outcome.verdict, Verdict::UpToDate { .. }) {
        return None;
    }

    let mut out = String::new();
    let heading = heading(outcome);
    if options.updates_only {
        let _ = writeln!(out, "{heading}");
    } else {
        let _ = writeln!(out, "Checking {heading}...");
    }

    match &outcome.verdict {
        Verdict::UpToDate { latest, reason } => {
            write_revisions(&mut out, outcome, latest);
            let detail = match reason {
                UpToDateReason::Unchanged => String::new(),
                UpToDateReason::NoRelevantChanges { total_changes } => format!(
                    " (no relevant file changes, {total_changes} changed file(s) untracked)"
                ),
                UpToDateReason::RelevanceUnknown { error } => {
                    format!(" (could not compare revisions: {error})")
                }
            };
            let _ = writeln!(out, "  Up to date{detail}");
        }
        Verdict::UpdateAvailable { latest, relevance } => {
            write_revisions(&mut out, outcome, latest);
            write_update(&mut out, latest, relevance.as_ref(), options.verbose);
        }
        Verdict::Error { message } => {
            let _ = writeln!(out, "  Error: {message}");
        }
    }

    Some(out)
}

/// Declaration identity: name, repository and scope.
fn heading(outcome: &CheckOutcome) -> String {
    match (&outcome.repository, &outcome.scope) {
        (Some(repository), Some(scope)) => {
            format!("{} ({repository}, path: {scope})", outcome.name)
        }
        (Some(repository), None) => format!("{} ({repository})", outcome.name),
        _ => outcome.name.clone(),
    }
}

fn write_revisions(out: &mut String, outcome: &CheckOutcome, latest: &Revision) {
    let recorded = outcome.recorded.as_deref().map_or("unknown", short_sha);
    let _ = writeln!(
        out,
        "  Recorded: {recorded}  Latest: {}",
        latest.short_sha()
    );
}

fn write_update(
    out: &mut String,
    latest: &Revision,
    relevance: Option<&RelevanceReport>,
    verbose: bool,
) {
    let date = latest
        .date
        .map(|date| format!(" ({})", date.format("%Y-%m-%d")))
        .unwrap_or_default();
    let _ = writeln!(out, "  Update available: {}{date}", latest.summary());

    let Some(report) = relevance else {
        let _ = writeln!(out, "  No tracked files declared, any change in scope counts");
        return;
    };

    let _ = writeln!(
        out,
        "  {} of {} changed file(s) are tracked",
        report.relevant_changes(),
        report.total_changes
    );

    if !verbose {
        return;
    }

    for file in &report.relevant_files {
        let renamed = file
            .previous_path
            .as_deref()
            .map(|previous| format!(" (from {previous})"))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "    {} {}{renamed} (+{} -{})",
            file.kind, file.path, file.additions, file.deletions
        );

        if let Some(patch) = &file.patch {
            for line in patch.lines().take(MAX_PATCH_LINES) {
                let _ = writeln!(out, "      {line}");
            }
            if patch.lines().count() > MAX_PATCH_LINES {
                let _ = writeln!(out, "      ...");
            }
        }
    }
}
