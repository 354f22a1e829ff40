//! Where PRs and reviews come from

use std::collections::HashSet;
use std::fmt;

use common::models::{PrState, PullRequest, Review};
use github::{api_state_for, ClientError, GitHubClient, GithubPr};

/// Reviews are requested in one page of this size
const REVIEWS_PER_PAGE: u32 = 100;

/// Repository coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Supplies already-converted PRs and reviews to the pipeline
#[allow(async_fn_in_trait)]
pub trait ReviewSource {
    /// PRs covering at least `states`; callers still filter by state
    async fn pull_requests(
        &self,
        repo: &RepoRef,
        states: &HashSet<PrState>,
        per_page: u32,
    ) -> Result<Vec<PullRequest>, ClientError>;

    /// Submitted reviews for one PR, in whatever order the source returns
    async fn reviews(&self, repo: &RepoRef, pr_number: i32) -> Result<Vec<Review>, ClientError>;
}

impl ReviewSource for GitHubClient {
    async fn pull_requests(
        &self,
        repo: &RepoRef,
        states: &HashSet<PrState>,
        per_page: u32,
    ) -> Result<Vec<PullRequest>, ClientError> {
        let prs = self
            .list_prs(&repo.owner, &repo.name, api_state_for(states), 1, per_page)
            .await?;
        Ok(prs.into_iter().map(GithubPr::into_model).collect())
    }

    async fn reviews(&self, repo: &RepoRef, pr_number: i32) -> Result<Vec<Review>, ClientError> {
        let reviews = self
            .list_reviews(&repo.owner, &repo.name, pr_number, REVIEWS_PER_PAGE)
            .await?;
        Ok(reviews
            .into_iter()
            .filter_map(|r| r.into_model(pr_number))
            .collect())
    }
}
