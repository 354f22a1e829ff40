//! GitHub REST API client for fetching PRs and reviews

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use common::models::{PrState, PullRequest, Review};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

const DEFAULT_API_URL: &str = "https://api.github.com";

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Rate limited, retry after {retry_after} seconds")]
    RateLimited { retry_after: u64 },
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("GitHub API error: {status} - {message}")]
    Api { status: u16, message: String },
}

/// GitHub API client
pub struct GitHubClient {
    client: reqwest::Client,
    token: Option<String>,
    base_url: String,
}

/// PR as returned by GitHub API
#[derive(Debug, Deserialize)]
pub struct GithubPr {
    pub id: i64,
    pub number: i32,
    pub title: String,
    pub state: String,
    pub user: Option<GithubUser>,
    pub created_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
}

impl GithubPr {
    pub fn into_model(self) -> PullRequest {
        PullRequest {
            github_id: self.id,
            number: self.number,
            state: PrState::derive(&self.state, self.merged_at),
            title: self.title,
            author: self.user.map(|u| u.login),
            created_at: self.created_at,
            merged_at: self.merged_at,
        }
    }
}

/// Review as returned by GitHub API
#[derive(Debug, Deserialize)]
pub struct GithubReview {
    pub id: i64,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl GithubReview {
    /// Convert to a domain review. Pending reviews have no `submitted_at`
    /// and yield `None`.
    pub fn into_model(self, pr_number: i32) -> Option<Review> {
        let submitted_at = self.submitted_at?;
        Some(Review {
            github_id: self.id,
            pr_number,
            submitted_at,
        })
    }
}

/// User as returned by GitHub API
#[derive(Debug, Deserialize)]
pub struct GithubUser {
    pub login: String,
}

/// Pick the `state` query value for the pulls endpoint that covers every
/// requested state. Merged PRs are listed under "closed".
pub fn api_state_for(states: &HashSet<PrState>) -> &'static str {
    let wants_open = states.contains(&PrState::Open);
    let wants_closed = states.contains(&PrState::Merged) || states.contains(&PrState::Closed);
    match (wants_open, wants_closed) {
        (true, false) => "open",
        (false, true) => "closed",
        _ => "all",
    }
}

impl GitHubClient {
    pub fn new(token: Option<String>) -> Self {
        Self::with_base_url(token, DEFAULT_API_URL)
    }

    /// Client against a different API root (GitHub Enterprise, test servers)
    pub fn with_base_url(token: Option<String>, base_url: &str) -> Self {
        let client = reqwest::Client::new();
        Self {
            client,
            token,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("review-latency/0.1"));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        if let Some(ref token) = self.token {
            if let Ok(val) = HeaderValue::from_str(&format!("Bearer {}", token)) {
                headers.insert(AUTHORIZATION, val);
            }
        }
        headers
    }

    async fn get<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T, ClientError> {
        debug!("GET {}", url);
        let resp = self.client.get(url).headers(self.headers()).send().await?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(url.to_string()));
        }
        if status == reqwest::StatusCode::FORBIDDEN
            || status == reqwest::StatusCode::TOO_MANY_REQUESTS
        {
            let retry_after = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(ClientError::RateLimited { retry_after });
        }
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp.json().await?)
    }

    /// Fetch one page of PRs, most recently updated first
    pub async fn list_prs(
        &self,
        owner: &str,
        repo: &str,
        state: &str, // "all", "open", "closed"
        page: u32,
        per_page: u32,
    ) -> Result<Vec<GithubPr>, ClientError> {
        let url = format!(
            "{}/repos/{}/{}/pulls?state={}&page={}&per_page={}&sort=updated&direction=desc",
            self.base_url, owner, repo, state, page, per_page
        );
        let prs: Vec<GithubPr> = self.get(&url).await?;
        info!("Fetched {} PRs for {}/{}", prs.len(), owner, repo);
        Ok(prs)
    }

    /// Fetch reviews for a PR
    pub async fn list_reviews(
        &self,
        owner: &str,
        repo: &str,
        pr_number: i32,
        per_page: u32,
    ) -> Result<Vec<GithubReview>, ClientError> {
        let url = format!(
            "{}/repos/{}/{}/pulls/{}/reviews?per_page={}",
            self.base_url, owner, repo, pr_number, per_page
        );
        self.get(&url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = GitHubClient::new(None);
        assert!(client.token.is_none());
        assert_eq!(client.base_url, "https://api.github.com");

        let client = GitHubClient::with_base_url(Some("test".to_string()), "http://localhost:8080/");
        assert_eq!(client.token, Some("test".to_string()));
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_headers_carry_token() {
        let client = GitHubClient::new(Some("abc".to_string()));
        let headers = client.headers();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer abc");
        assert!(headers.get(USER_AGENT).is_some());

        let anonymous = GitHubClient::new(None);
        assert!(anonymous.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_api_state_for() {
        let merged: HashSet<_> = [PrState::Merged].into_iter().collect();
        assert_eq!(api_state_for(&merged), "closed");

        let open: HashSet<_> = [PrState::Open].into_iter().collect();
        assert_eq!(api_state_for(&open), "open");

        let mixed: HashSet<_> = [PrState::Open, PrState::Closed].into_iter().collect();
        assert_eq!(api_state_for(&mixed), "all");
    }

    #[test]
    fn test_pr_into_model() {
        let json = r#"{
            "id": 1001,
            "number": 7,
            "title": "Add widgets",
            "state": "closed",
            "user": {"id": 1, "login": "octocat", "avatar_url": null},
            "created_at": "2026-01-01T10:00:00Z",
            "updated_at": "2026-01-02T10:00:00Z",
            "merged_at": "2026-01-01T20:00:00Z",
            "closed_at": "2026-01-01T20:00:00Z"
        }"#;
        let pr: GithubPr = serde_json::from_str(json).unwrap();
        let model = pr.into_model();

        assert_eq!(model.number, 7);
        assert_eq!(model.state, PrState::Merged);
        assert_eq!(model.author.as_deref(), Some("octocat"));
        assert!(model.merged_at.is_some());
    }

    #[test]
    fn test_pending_review_is_dropped() {
        let json = r#"[
            {"id": 1, "user": {"id": 2, "login": "alice", "avatar_url": null},
             "state": "APPROVED", "body": "", "submitted_at": "2026-01-01T12:00:00Z"},
            {"id": 2, "user": null, "state": "PENDING", "body": null, "submitted_at": null}
        ]"#;
        let reviews: Vec<GithubReview> = serde_json::from_str(json).unwrap();
        let models: Vec<Review> = reviews
            .into_iter()
            .filter_map(|r| r.into_model(7))
            .collect();

        assert_eq!(models.len(), 1);
        assert_eq!(models[0].github_id, 1);
        assert_eq!(models[0].pr_number, 7);
    }
}
