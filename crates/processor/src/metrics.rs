//! Time metrics computation

use chrono::{DateTime, Utc};
use common::models::Review;
use common::{Error, Result};

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Elapsed time from `from` to `to` in fractional hours. Negative if `to`
/// precedes `from`.
pub fn hours_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / MILLIS_PER_HOUR
}

/// Calculate time to first review in hours.
///
/// The earliest review is chosen by `submitted_at`, regardless of the order
/// the reviews were fetched in. Returns `None` when there are no reviews.
pub fn time_to_first_review(created_at: DateTime<Utc>, reviews: &[Review]) -> Option<f64> {
    let mut submitted: Vec<DateTime<Utc>> = reviews.iter().map(|r| r.submitted_at).collect();
    submitted.sort();
    submitted
        .first()
        .map(|first| hours_between(created_at, *first))
}

/// Time from creation to merge in hours, `None` if the PR was never merged
pub fn merge_duration(created_at: DateTime<Utc>, merged_at: Option<DateTime<Utc>>) -> Option<f64> {
    merged_at.map(|merged| hours_between(created_at, merged))
}

/// Reject samples that can only come from malformed upstream timestamps
pub fn check_sample(pr_number: i32, hours: f64) -> Result<f64> {
    if !hours.is_finite() {
        return Err(Error::MalformedTimestamp {
            pr_number,
            detail: format!("non-finite duration {}", hours),
        });
    }
    if hours < 0.0 {
        return Err(Error::MalformedTimestamp {
            pr_number,
            detail: format!("negative duration {:.2}h", hours),
        });
    }
    Ok(hours)
}
