//! Error types

use thiserror::Error;

/// Main error type for review-latency
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    /// A timestamp pair that yields a negative or meaningless duration
    #[error("Malformed timestamps on PR #{pr_number}: {detail}")]
    MalformedTimestamp { pr_number: i32, detail: String },

    /// Reviews for a single PR could not be retrieved
    #[error("Failed to fetch reviews for PR #{pr_number}: {message}")]
    FetchFailure { pr_number: i32, message: String },

    /// The histogram was configured to reject an empty sample set
    #[error("No samples to aggregate")]
    EmptyInput,

    #[error("Histogram error: {0}")]
    Histogram(String),
}

impl Error {
    /// Whether the error came from building the histogram
    pub fn is_histogram(&self) -> bool {
        matches!(self, Error::EmptyInput | Error::Histogram(_))
    }

    /// PR the error is attached to, if any
    pub fn pr_number(&self) -> Option<i32> {
        match self {
            Error::MalformedTimestamp { pr_number, .. } | Error::FetchFailure { pr_number, .. } => {
                Some(*pr_number)
            }
            _ => None,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
