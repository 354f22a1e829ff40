//! Domain models

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A pull request, as fetched for one analysis run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    pub github_id: i64,
    pub number: i32,
    pub title: String,
    pub author: Option<String>,
    pub state: PrState,
    pub created_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum PrState {
    Open,
    Merged,
    Closed,
}

impl PrState {
    /// Classify a PR from the raw API `state` string and its merge timestamp.
    /// GitHub reports merged PRs as "closed", so `merged_at` wins.
    pub fn derive(api_state: &str, merged_at: Option<DateTime<Utc>>) -> Self {
        if merged_at.is_some() {
            PrState::Merged
        } else if api_state.eq_ignore_ascii_case("closed") {
            PrState::Closed
        } else {
            PrState::Open
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PrState::Open => "open",
            PrState::Merged => "merged",
            PrState::Closed => "closed",
        }
    }
}

impl fmt::Display for PrState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "open" => Ok(PrState::Open),
            "merged" => Ok(PrState::Merged),
            "closed" => Ok(PrState::Closed),
            other => Err(format!("unknown PR state '{}'", other)),
        }
    }
}

/// A submitted PR review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub github_id: i64,
    pub pr_number: i32,
    pub submitted_at: DateTime<Utc>,
}

/// A derived per-PR scalar, in hours
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct MetricSample {
    pub pr_number: i32,
    pub hours: f64,
}

/// One equal-width histogram bucket.
///
/// Covers `[lower, upper)`, except the last bucket which is closed on both ends.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HistogramBucket {
    pub index: usize,
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
    /// Share of all samples; masses sum to 1.0 for non-empty input
    pub mass: f64,
}

/// Per-PR review intensity record
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct IntensityReport {
    pub pr_number: i32,
    pub title: String,
    pub author: Option<String>,
    pub review_count: usize,
    pub merge_duration_hours: f64,
    /// Reviews per hour
    pub intensity: f64,
}
