//! Equal-width, mass-normalized histograms over metric samples

use common::models::HistogramBucket;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HistogramError {
    #[error("No samples to aggregate")]
    EmptyInput,
    #[error("Bucket count must be positive")]
    InvalidBucketCount,
    #[error("Sample {index} is not finite: {value}")]
    NonFiniteSample { index: usize, value: f64 },
}

impl From<HistogramError> for common::Error {
    fn from(e: HistogramError) -> Self {
        match e {
            HistogramError::EmptyInput => common::Error::EmptyInput,
            other => common::Error::Histogram(other.to_string()),
        }
    }
}

/// What an empty sample set produces
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmptyPolicy {
    /// `bucket_count` buckets with zero bounds and zero mass
    #[default]
    ZeroMass,
    /// [`HistogramError::EmptyInput`]
    Strict,
}

/// Bin `samples` into `bucket_count` equal-width buckets spanning
/// `[min, max]` and normalize each bucket's count to a share of the total.
///
/// Buckets are half-open `[lower, upper)` except the last, which also
/// includes `max`. When every sample is identical all bounds collapse to
/// that value and the whole mass lands in the last bucket.
pub fn build_histogram(
    samples: &[f64],
    bucket_count: usize,
    policy: EmptyPolicy,
) -> Result<Vec<HistogramBucket>, HistogramError> {
    if bucket_count == 0 {
        return Err(HistogramError::InvalidBucketCount);
    }
    if let Some((index, &value)) = samples.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(HistogramError::NonFiniteSample { index, value });
    }

    if samples.is_empty() {
        return match policy {
            EmptyPolicy::Strict => Err(HistogramError::EmptyInput),
            EmptyPolicy::ZeroMass => Ok((0..bucket_count)
                .map(|index| HistogramBucket {
                    index,
                    lower: 0.0,
                    upper: 0.0,
                    count: 0,
                    mass: 0.0,
                })
                .collect()),
        };
    }

    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let bounds = bucket_bounds(min, max, bucket_count);

    let mut counts = vec![0usize; bucket_count];
    for &sample in samples {
        counts[bucket_index(sample, &bounds)] += 1;
    }

    let total = samples.len() as f64;
    Ok(counts
        .into_iter()
        .enumerate()
        .map(|(index, count)| HistogramBucket {
            index,
            lower: bounds[index],
            upper: bounds[index + 1],
            count,
            mass: count as f64 / total,
        })
        .collect())
}

/// `bucket_count + 1` edges; the final edge is exactly `max`.
/// The width is taken from the scaled endpoints so `max - min` cannot
/// overflow for finite samples spanning most of the `f64` range.
fn bucket_bounds(min: f64, max: f64, bucket_count: usize) -> Vec<f64> {
    let n = bucket_count as f64;
    let width = max / n - min / n;
    (0..=bucket_count)
        .map(|i| {
            if i == bucket_count {
                max
            } else {
                min + width * i as f64
            }
        })
        .collect()
}

/// Index of the bucket holding `value`, decided against the same edges that
/// are reported, so rounding in the width cannot misplace a sample.
fn bucket_index(value: f64, bounds: &[f64]) -> usize {
    let interior = &bounds[1..bounds.len() - 1];
    interior.partition_point(|&upper| upper <= value)
}

/// Descriptive statistics over a sample set
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SampleSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

/// Summarize samples, `None` if there are none
pub fn summarize(samples: &[f64]) -> Option<SampleSummary> {
    if samples.is_empty() {
        return None;
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);

    let count = sorted.len();
    let mid = count / 2;
    let median = if count % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    };

    Some(SampleSummary {
        count,
        mean: sorted.iter().sum::<f64>() / count as f64,
        median,
        min: sorted[0],
        max: sorted[count - 1],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn masses(buckets: &[HistogramBucket]) -> Vec<f64> {
        buckets.iter().map(|b| b.mass).collect()
    }

    #[test]
    fn test_worked_example() {
        let buckets = build_histogram(&[1.0, 1.0, 3.0, 5.0], 4, EmptyPolicy::ZeroMass).unwrap();

        let bounds: Vec<(f64, f64)> = buckets.iter().map(|b| (b.lower, b.upper)).collect();
        assert_eq!(bounds, vec![(1.0, 2.0), (2.0, 3.0), (3.0, 4.0), (4.0, 5.0)]);

        let counts: Vec<usize> = buckets.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![2, 0, 1, 1]);
        assert_eq!(masses(&buckets), vec![0.5, 0.0, 0.25, 0.25]);
    }

    #[test]
    fn test_mass_sums_to_one() {
        let samples: Vec<f64> = (0..997).map(|i| (i as f64 * 0.37).sin() * 40.0 + 41.3).collect();
        for bucket_count in [1, 3, 16, 50] {
            let buckets = build_histogram(&samples, bucket_count, EmptyPolicy::ZeroMass).unwrap();
            assert_eq!(buckets.len(), bucket_count);
            let total: f64 = masses(&buckets).iter().sum();
            assert!((total - 1.0).abs() < EPSILON, "sum was {}", total);
            let counted: usize = buckets.iter().map(|b| b.count).sum();
            assert_eq!(counted, samples.len());
        }
    }

    #[test]
    fn test_identical_samples_concentrate_in_one_bucket() {
        let buckets = build_histogram(&[2.5, 2.5, 2.5], 16, EmptyPolicy::ZeroMass).unwrap();

        let full: Vec<&HistogramBucket> = buckets.iter().filter(|b| b.mass > 0.0).collect();
        assert_eq!(full.len(), 1);
        assert_eq!(full[0].mass, 1.0);
        assert_eq!(full[0].index, 15);
        assert!(buckets.iter().all(|b| b.lower == 2.5 && b.upper == 2.5));
    }

    #[test]
    fn test_max_lands_in_last_bucket() {
        let buckets = build_histogram(&[0.0, 10.0], 5, EmptyPolicy::ZeroMass).unwrap();
        assert_eq!(buckets[0].count, 1);
        assert_eq!(buckets[4].count, 1);
        assert_eq!(buckets[4].upper, 10.0);
    }

    #[test]
    fn test_boundary_value_goes_to_upper_bucket() {
        // 2.0 is the upper edge of bucket 0 and the lower edge of bucket 1
        let buckets = build_histogram(&[0.0, 2.0, 4.0], 2, EmptyPolicy::ZeroMass).unwrap();
        let counts: Vec<usize> = buckets.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 2]);
    }

    #[test]
    fn test_negative_samples_are_binned() {
        let buckets = build_histogram(&[-3.0, -1.0, 1.0], 2, EmptyPolicy::ZeroMass).unwrap();
        assert_eq!(buckets[0].lower, -3.0);
        assert_eq!(buckets[1].upper, 1.0);
        assert_eq!(buckets[0].count + buckets[1].count, 3);
    }

    #[test]
    fn test_extreme_range_keeps_edges_finite() {
        let buckets = build_histogram(&[-1e308, 1e308], 4, EmptyPolicy::ZeroMass).unwrap();

        assert!(buckets.iter().all(|b| b.lower.is_finite() && b.upper.is_finite()));
        assert_eq!(buckets[0].lower, -1e308);
        assert_eq!(buckets[3].upper, 1e308);
        let counts: Vec<usize> = buckets.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 0, 0, 1]);
        let total: f64 = masses(&buckets).iter().sum();
        assert!((total - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_error_conversion_keeps_detail() {
        assert_eq!(
            common::Error::from(HistogramError::EmptyInput),
            common::Error::EmptyInput
        );
        let err = common::Error::from(HistogramError::NonFiniteSample {
            index: 2,
            value: f64::INFINITY,
        });
        assert!(matches!(err, common::Error::Histogram(ref msg) if msg.contains("Sample 2")));
    }

    #[test]
    fn test_empty_zero_mass() {
        let buckets = build_histogram(&[], 4, EmptyPolicy::ZeroMass).unwrap();
        assert_eq!(buckets.len(), 4);
        assert!(buckets.iter().all(|b| b.mass == 0.0 && b.count == 0));
    }

    #[test]
    fn test_empty_strict() {
        assert_eq!(
            build_histogram(&[], 4, EmptyPolicy::Strict),
            Err(HistogramError::EmptyInput)
        );
    }

    #[test]
    fn test_zero_buckets_rejected() {
        assert_eq!(
            build_histogram(&[1.0], 0, EmptyPolicy::ZeroMass),
            Err(HistogramError::InvalidBucketCount)
        );
    }

    #[test]
    fn test_non_finite_rejected() {
        let err = build_histogram(&[1.0, f64::NAN], 4, EmptyPolicy::ZeroMass).unwrap_err();
        assert!(matches!(err, HistogramError::NonFiniteSample { index: 1, .. }));
    }

    #[test]
    fn test_summarize() {
        assert_eq!(summarize(&[]), None);

        let summary = summarize(&[5.0, 1.0, 3.0, 1.0]).unwrap();
        assert_eq!(summary.count, 4);
        assert_eq!(summary.mean, 2.5);
        assert_eq!(summary.median, 2.0);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 5.0);

        let odd = summarize(&[9.0, 2.0, 4.0]).unwrap();
        assert_eq!(odd.median, 4.0);
    }
}
