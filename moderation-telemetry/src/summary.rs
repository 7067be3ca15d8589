//! Batch summaries emitted at the end of a run.

use moderation_policy::BatchReport;
use tracing::info;

/// Renders the per-action counts as `label=count` pairs in label order.
#[must_use]
pub fn render_counts(report: &BatchReport) -> String {
    report
        .decisions()
        .iter()
        .map(|(label, count)| format!("{label}={count}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Logs the report at `info`.
pub fn log_report(report: &BatchReport) {
    info!(
        batch = %report.batch_id(),
        evaluated = report.evaluated(),
        rejected = report.rejected(),
        decisions = %render_counts(report),
        "moderation batch summary"
    );
}
