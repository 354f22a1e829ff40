//! Reporting sinks: a text histogram for the terminal, a JSON file and a PNG chart

use std::fs;
use std::path::Path;

use anyhow::Context;
use common::models::{HistogramBucket, IntensityReport};
use processor::{AnalysisRun, RepoRef, SampleSummary};
use plotters::prelude::*;
use serde::Serialize;

const BAR_WIDTH: usize = 40;
const CHART_SIZE: (u32, u32) = (800, 600);

#[derive(Serialize)]
struct JsonReport<'a> {
    repository: String,
    prs_processed: u32,
    summary: Option<&'a SampleSummary>,
    histogram: &'a [HistogramBucket],
    intensity: &'a [IntensityReport],
    issues: Vec<String>,
}

/// Render the histogram as rows of `[lower, upper) count mass bar`
pub fn render_table(run: &AnalysisRun) -> String {
    let mut out = String::new();

    if let Some(summary) = &run.summary {
        out.push_str(&format!(
            "samples: {}  mean: {:.2}h  median: {:.2}h  min: {:.2}h  max: {:.2}h\n",
            summary.count, summary.mean, summary.median, summary.min, summary.max
        ));
    } else {
        out.push_str("no samples\n");
    }

    let peak = run.histogram.iter().map(|b| b.mass).fold(0.0, f64::max);
    let last = run.histogram.len().saturating_sub(1);

    for bucket in &run.histogram {
        let close = if bucket.index == last { ']' } else { ')' };
        let bar_len = if peak > 0.0 {
            (bucket.mass / peak * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        out.push_str(&format!(
            "[{:>8.2}, {:>8.2}{} {:>5} {:>6.3} {}\n",
            bucket.lower,
            bucket.upper,
            close,
            bucket.count,
            bucket.mass,
            "#".repeat(bar_len)
        ));
    }

    out
}

/// Serialize the run to `path`, creating parent directories as needed
pub fn write_json(path: &Path, repo: &RepoRef, run: &AnalysisRun) -> anyhow::Result<()> {
    let report = JsonReport {
        repository: repo.to_string(),
        prs_processed: run.prs_processed,
        summary: run.summary.as_ref(),
        histogram: &run.histogram,
        intensity: &run.intensity,
        issues: run.issues.iter().map(|e| e.to_string()).collect(),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(&report)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Draw bucket masses as a bar chart PNG at `path`.
///
/// Bars are laid out by bucket index; the chart carries no text so it
/// renders without system fonts.
pub fn write_png(path: &Path, run: &AnalysisRun) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let peak = run.histogram.iter().map(|b| b.mass).fold(0.0, f64::max);
    let y_max = if peak > 0.0 { peak * 1.1 } else { 1.0 };
    let n = run.histogram.len().max(1) as f64;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .build_cartesian_2d(0f64..n, 0f64..y_max)?;

    chart.draw_series(run.histogram.iter().map(|bucket| {
        let x = bucket.index as f64;
        Rectangle::new([(x, 0.0), (x + 1.0, bucket.mass)], BLUE.mix(0.7).filled())
    }))?;

    root.present().with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
