//! Analysis pipeline: fetch PRs and reviews, derive samples, aggregate

use std::collections::HashSet;

use common::models::{HistogramBucket, IntensityReport, MetricSample, PrState, Review};
use common::Config;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::histogram::{self, EmptyPolicy, SampleSummary};
use crate::intensity;
use crate::metrics;
use crate::source::{RepoRef, ReviewSource};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("GitHub API error: {0}")]
    GitHub(#[from] github::ClientError),
}

/// Knobs for one analysis run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Only PRs in these states are analyzed
    pub include_states: HashSet<PrState>,
    pub bucket_count: usize,
    pub empty_policy: EmptyPolicy,
    pub per_page: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            include_states: [PrState::Merged, PrState::Closed].into_iter().collect(),
            bucket_count: 16,
            empty_policy: EmptyPolicy::ZeroMass,
            per_page: 30,
        }
    }
}

impl From<&Config> for PipelineConfig {
    fn from(config: &Config) -> Self {
        Self {
            include_states: config.include_states.clone(),
            bucket_count: config.histogram_buckets,
            empty_policy: if config.histogram_strict {
                EmptyPolicy::Strict
            } else {
                EmptyPolicy::ZeroMass
            },
            per_page: config.per_page,
        }
    }
}

/// Everything one run produces
#[derive(Debug, Default)]
pub struct AnalysisRun {
    /// PRs whose reviews were fetched
    pub prs_processed: u32,
    /// Time-to-first-review samples that passed validation
    pub samples: Vec<MetricSample>,
    pub histogram: Vec<HistogramBucket>,
    pub summary: Option<SampleSummary>,
    pub intensity: Vec<IntensityReport>,
    /// Problems that excluded data without aborting the run
    pub issues: Vec<common::Error>,
}

impl AnalysisRun {
    /// Why the histogram could not be built, if it could not
    pub fn histogram_error(&self) -> Option<&common::Error> {
        self.issues.iter().find(|e| e.is_histogram())
    }
}

pub struct Pipeline<S> {
    source: S,
    repo: RepoRef,
    config: PipelineConfig,
}

impl<S: ReviewSource> Pipeline<S> {
    pub fn new(source: S, repo: RepoRef, config: PipelineConfig) -> Self {
        Self {
            source,
            repo,
            config,
        }
    }

    /// Run the analysis. Only failing to list PRs is fatal; per-PR failures
    /// and a histogram that could not be built land in [`AnalysisRun::issues`],
    /// leaving the intensity reports intact.
    pub async fn run(&self) -> Result<AnalysisRun, PipelineError> {
        info!(
            "Analyzing {} (states: {:?}, buckets: {})",
            self.repo, self.config.include_states, self.config.bucket_count
        );

        let prs = self
            .source
            .pull_requests(&self.repo, &self.config.include_states, self.config.per_page)
            .await?;
        let prs: Vec<_> = prs
            .into_iter()
            .filter(|pr| self.config.include_states.contains(&pr.state))
            .collect();

        info!("Processing {} PRs", prs.len());

        let mut run = AnalysisRun::default();

        for pr in &prs {
            let reviews = match self.source.reviews(&self.repo, pr.number).await {
                Ok(r) => dedupe_reviews(r),
                Err(e) => {
                    warn!("Error fetching reviews for PR #{}: {}", pr.number, e);
                    run.issues.push(common::Error::FetchFailure {
                        pr_number: pr.number,
                        message: e.to_string(),
                    });
                    // Continue with other PRs
                    continue;
                }
            };
            run.prs_processed += 1;
            info!("PR #{} has {} reviews", pr.number, reviews.len());

            if let Some(hours) = metrics::time_to_first_review(pr.created_at, &reviews) {
                match metrics::check_sample(pr.number, hours) {
                    Ok(hours) => run.samples.push(MetricSample {
                        pr_number: pr.number,
                        hours,
                    }),
                    Err(e) => {
                        warn!("Excluding sample: {}", e);
                        run.issues.push(e);
                    }
                }
            }

            match intensity::intensity_report(pr, reviews.len()) {
                Ok(Some(report)) => {
                    info!("{}", intensity::format_report(&report));
                    run.intensity.push(report);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!("Skipping intensity: {}", e);
                    run.issues.push(e);
                }
            }
        }

        let values: Vec<f64> = run.samples.iter().map(|s| s.hours).collect();
        let built = histogram::build_histogram(
            &values,
            self.config.bucket_count,
            self.config.empty_policy,
        );
        match built {
            Ok(buckets) => run.histogram = buckets,
            Err(e) => {
                warn!("Histogram not built: {}", e);
                run.issues.push(e.into());
            }
        }
        run.summary = histogram::summarize(&values);

        info!(
            "Analysis complete: {} PRs, {} samples, {} intensity reports, {} issues",
            run.prs_processed,
            run.samples.len(),
            run.intensity.len(),
            run.issues.len()
        );

        Ok(run)
    }
}

/// Drop repeated review ids, keeping the first occurrence
fn dedupe_reviews(reviews: Vec<Review>) -> Vec<Review> {
    let mut seen = HashSet::new();
    let before = reviews.len();
    let unique: Vec<Review> = reviews
        .into_iter()
        .filter(|r| seen.insert(r.github_id))
        .collect();
    if unique.len() < before {
        debug!("Dropped {} duplicate reviews", before - unique.len());
    }
    unique
}
