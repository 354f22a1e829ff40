//! GitHub API client for fetching PRs and reviews

pub mod client;

pub use client::{api_state_for, ClientError, GitHubClient, GithubPr, GithubReview, GithubUser};
