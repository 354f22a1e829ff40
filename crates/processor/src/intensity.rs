//! Review intensity: reviews per hour of a PR's open-to-merge lifetime

use common::models::{IntensityReport, PullRequest};
use common::{Error, Result};

use crate::metrics;

/// Reviews per hour between creation and merge.
///
/// `None` when the PR was not merged or its merge duration is not strictly
/// positive. Never zero-filled.
pub fn review_intensity(pr: &PullRequest, review_count: usize) -> Option<f64> {
    let hours = metrics::merge_duration(pr.created_at, pr.merged_at)?;
    if hours > 0.0 {
        Some(review_count as f64 / hours)
    } else {
        None
    }
}

/// Build the report record for a PR.
///
/// Unmerged PRs yield `Ok(None)`. A merge at or before creation is a
/// [`Error::MalformedTimestamp`].
pub fn intensity_report(pr: &PullRequest, review_count: usize) -> Result<Option<IntensityReport>> {
    let Some(hours) = metrics::merge_duration(pr.created_at, pr.merged_at) else {
        return Ok(None);
    };
    let Some(intensity) = review_intensity(pr, review_count) else {
        return Err(Error::MalformedTimestamp {
            pr_number: pr.number,
            detail: format!("merge duration {:.2}h is not positive", hours),
        });
    };

    Ok(Some(IntensityReport {
        pr_number: pr.number,
        title: pr.title.clone(),
        author: pr.author.clone(),
        review_count,
        merge_duration_hours: hours,
        intensity,
    }))
}

/// One-line rendering used for log output
pub fn format_report(report: &IntensityReport) -> String {
    format!(
        "PR #{}: Review Count: {}, Merge Time (hrs): {:.2}, Review Intensity: {:.2}",
        report.pr_number, report.review_count, report.merge_duration_hours, report.intensity
    )
}
