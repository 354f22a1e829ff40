//! Application configuration

use std::collections::HashSet;
use std::env;
use std::path::PathBuf;

use tracing::debug;

use crate::error::{Error, Result};
use crate::models::PrState;

/// GitHub caps list endpoints at 100 items per page
const MAX_PER_PAGE: u32 = 100;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub github_token: String,
    pub repo_owner: String,
    pub repo_name: String,
    /// PR states included in the analysis
    pub include_states: HashSet<PrState>,
    pub histogram_buckets: usize,
    /// Treat an empty sample set as an error instead of zero-mass buckets
    pub histogram_strict: bool,
    pub per_page: u32,
    /// Where the JSON report is written
    pub output_path: PathBuf,
    /// Where the histogram chart is drawn
    pub histogram_png: PathBuf,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| Error::Config(format!("Set the {} environment variable", key)))
        };

        let github_token = required("RM_GITHUB_TOKEN")?;
        let repo_owner = required("RM_GITHUB_REPOSITORY_OWNER")?;
        let repo_name = required("RM_GITHUB_REPOSITORY_NAME")?;

        let include_states = match lookup("RM_INCLUDE_STATES") {
            Some(raw) => parse_states(&raw)?,
            None => [PrState::Merged, PrState::Closed].into_iter().collect(),
        };

        let histogram_buckets = parse_or(&lookup, "RM_HISTOGRAM_BUCKETS", 16)?;
        if histogram_buckets == 0 {
            return Err(Error::Config(
                "RM_HISTOGRAM_BUCKETS must be at least 1".to_string(),
            ));
        }

        let histogram_strict = parse_or(&lookup, "RM_HISTOGRAM_STRICT", false)?;
        let per_page: u32 = parse_or(&lookup, "RM_PER_PAGE", 30)?;
        if !(1..=MAX_PER_PAGE).contains(&per_page) {
            return Err(Error::Config(format!(
                "RM_PER_PAGE must be between 1 and {}, got {}",
                MAX_PER_PAGE, per_page
            )));
        }

        let output_path = path_or(&lookup, "RM_OUTPUT", "histogram.json");
        let histogram_png = path_or(&lookup, "RM_HISTOGRAM_PNG", "hist.png");

        debug!(
            "Loaded configuration for {}/{} (states: {:?}, buckets: {})",
            repo_owner, repo_name, include_states, histogram_buckets
        );

        Ok(Self {
            github_token,
            repo_owner,
            repo_name,
            include_states,
            histogram_buckets,
            histogram_strict,
            per_page,
            output_path,
            histogram_png,
        })
    }

    /// "owner/name"
    pub fn repo_full_name(&self) -> String {
        format!("{}/{}", self.repo_owner, self.repo_name)
    }
}

fn parse_states(raw: &str) -> Result<HashSet<PrState>> {
    let states = raw
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.parse::<PrState>().map_err(Error::Config))
        .collect::<Result<HashSet<_>>>()?;

    if states.is_empty() {
        return Err(Error::Config(
            "RM_INCLUDE_STATES must name at least one state".to_string(),
        ));
    }
    Ok(states)
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(v) if !v.trim().is_empty() => v
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("Invalid value for {}: '{}'", key, v))),
        _ => Ok(default),
    }
}

fn path_or<F>(lookup: &F, key: &str, default: &str) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}
