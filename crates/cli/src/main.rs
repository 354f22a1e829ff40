//! review-latency: time-to-first-review and review intensity for a GitHub repository

use anyhow::Context;
use github::GitHubClient;
use processor::{Pipeline, PipelineConfig, RepoRef};
use tracing::info;

mod report;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("review_latency=debug".parse()?)
                .add_directive("processor=debug".parse()?),
        )
        .init();

    // Missing credentials or coordinates abort before anything is fetched
    let config = common::Config::from_env().context("Invalid configuration")?;

    info!("Starting review latency analysis for {}", config.repo_full_name());

    let client = GitHubClient::new(Some(config.github_token.clone()));
    let repo = RepoRef::new(&config.repo_owner, &config.repo_name);
    let pipeline = Pipeline::new(client, repo.clone(), PipelineConfig::from(&config));

    let run = pipeline.run().await.context("Analysis failed")?;

    println!("Time to First Review (hours)");
    print!("{}", report::render_table(&run));

    report::write_json(&config.output_path, &repo, &run)?;
    info!("Wrote report to {}", config.output_path.display());

    if !run.histogram.is_empty() {
        report::write_png(&config.histogram_png, &run)?;
        info!("Wrote chart to {}", config.histogram_png.display());
    }

    // Strict mode: outputs are written, but the run still fails
    if let Some(e) = run.histogram_error() {
        anyhow::bail!("Histogram could not be built: {}", e);
    }

    Ok(())
}
