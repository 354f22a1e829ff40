//! Review latency metrics and their aggregation

pub mod histogram;
pub mod intensity;
pub mod metrics;
pub mod pipeline;
pub mod source;


pub use histogram::{build_histogram, summarize, EmptyPolicy, HistogramError, SampleSummary};
pub use pipeline::{AnalysisRun, Pipeline, PipelineConfig, PipelineError};
pub use source::{RepoRef, ReviewSource};
