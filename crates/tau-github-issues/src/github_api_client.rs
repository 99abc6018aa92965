use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::json;
use tau_jira_link::{DiscussionClient, DiscussionError, RepoRef};

use crate::github_payloads::{GithubIssue, GithubIssueComment};
use crate::github_transport_helpers::{
    is_retryable_github_response, is_retryable_transport_error, parse_retry_after, retry_delay,
    truncate_for_error,
};

pub const DEFAULT_GITHUB_API_BASE: &str = "https://api.github.com";

#[derive(Clone)]
/// Public struct `GithubClientConfig` used across Tau components.
pub struct GithubClientConfig {
    pub api_base: String,
    pub token: String,
    pub request_timeout_ms: u64,
    pub retry_max_attempts: usize,
    pub retry_base_delay_ms: u64,
}

impl std::fmt::Debug for GithubClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubClientConfig")
            .field("api_base", &self.api_base)
            .field("token", &"<redacted>")
            .field("request_timeout_ms", &self.request_timeout_ms)
            .field("retry_max_attempts", &self.retry_max_attempts)
            .field("retry_base_delay_ms", &self.retry_base_delay_ms)
            .finish()
    }
}

/// GitHub REST client for editing comments and issue or pull request bodies.
#[derive(Clone)]
pub struct GithubApiClient {
    http: reqwest::Client,
    api_base: String,
    retry_max_attempts: usize,
    retry_base_delay_ms: u64,
}

impl GithubApiClient {
    pub fn new(config: GithubClientConfig) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("Tau-jira-linker"),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            reqwest::header::HeaderValue::from_static("2022-11-28"),
        );
        let token = config.token.trim();
        if token.is_empty() {
            bail!("github token must not be empty");
        }
        let mut auth_value = reqwest::header::HeaderValue::from_str(&format!("Bearer {token}"))
            .context("invalid github authorization header")?;
        auth_value.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, auth_value);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(config.request_timeout_ms.max(1)))
            .build()
            .context("failed to create github api client")?;
        Ok(Self {
            http,
            api_base: config.api_base.trim().trim_end_matches('/').to_string(),
            retry_max_attempts: config.retry_max_attempts.max(1),
            retry_base_delay_ms: config.retry_base_delay_ms.max(1),
        })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub async fn edit_issue_comment(
        &self,
        repo: &RepoRef,
        comment_id: u64,
        body: &str,
    ) -> Result<GithubIssueComment> {
        let payload = json!({ "body": body });
        let url = format!(
            "{}/repos/{}/{}/issues/comments/{comment_id}",
            self.api_base, repo.owner, repo.name
        );
        self.request_json("edit issue comment", || {
            self.http.patch(url.as_str()).json(&payload)
        })
        .await
    }

    pub async fn get_issue(&self, repo: &RepoRef, number: u64) -> Result<GithubIssue> {
        let url = format!(
            "{}/repos/{}/{}/issues/{number}",
            self.api_base, repo.owner, repo.name
        );
        self.request_json("get issue", || self.http.get(url.as_str()))
            .await
    }

    pub async fn edit_issue_body(
        &self,
        repo: &RepoRef,
        number: u64,
        body: &str,
    ) -> Result<GithubIssue> {
        let payload = json!({ "body": body });
        let url = format!(
            "{}/repos/{}/{}/issues/{number}",
            self.api_base, repo.owner, repo.name
        );
        self.request_json("edit issue body", || {
            self.http.patch(url.as_str()).json(&payload)
        })
        .await
    }

    async fn request_json<T, F>(&self, operation: &str, mut request_builder: F) -> Result<T>
    where
        T: DeserializeOwned,
        F: FnMut() -> reqwest::RequestBuilder,
    {
        let mut attempt = 0_usize;
        loop {
            attempt = attempt.saturating_add(1);
            let sent = request_builder()
                .header("x-tau-retry-attempt", attempt.saturating_sub(1).to_string())
                .send()
                .await;
            let response = match sent {
                Ok(response) => response,
                Err(error) => {
                    if attempt < self.retry_max_attempts && is_retryable_transport_error(&error) {
                        tracing::warn!(operation, attempt, %error, "retrying github request");
                        tokio::time::sleep(retry_delay(self.retry_base_delay_ms, attempt, None))
                            .await;
                        continue;
                    }
                    return Err(error)
                        .with_context(|| format!("github api {operation} request failed"));
                }
            };

            let status = response.status();
            if status.is_success() {
                return response
                    .json::<T>()
                    .await
                    .with_context(|| format!("failed to decode github {operation}"));
            }

            let retryable = is_retryable_github_response(status.as_u16(), response.headers());
            let retry_after = parse_retry_after(response.headers());
            let body = response.text().await.unwrap_or_default();
            if retryable && attempt < self.retry_max_attempts {
                tracing::warn!(
                    operation,
                    attempt,
                    status = status.as_u16(),
                    "retrying github request"
                );
                tokio::time::sleep(retry_delay(self.retry_base_delay_ms, attempt, retry_after))
                    .await;
                continue;
            }

            bail!(
                "github api {operation} failed with status {}: {}",
                status.as_u16(),
                truncate_for_error(&body, 800)
            );
        }
    }
}

fn remote_error(operation: &str, error: anyhow::Error) -> DiscussionError {
    DiscussionError::remote(operation, format!("{error:#}"))
}

#[async_trait]
impl DiscussionClient for GithubApiClient {
    async fn edit_comment(
        &self,
        repo: &RepoRef,
        comment_id: u64,
        body: &str,
    ) -> Result<(), DiscussionError> {
        self.edit_issue_comment(repo, comment_id, body)
            .await
            .map(|_| ())
            .map_err(|error| remote_error("edit comment", error))
    }

    async fn get_thread_body(
        &self,
        repo: &RepoRef,
        number: u64,
    ) -> Result<String, DiscussionError> {
        self.get_issue(repo, number)
            .await
            .map(|issue| issue.body.unwrap_or_default())
            .map_err(|error| remote_error("get thread body", error))
    }

    async fn edit_thread_body(
        &self,
        repo: &RepoRef,
        number: u64,
        body: &str,
    ) -> Result<(), DiscussionError> {
        self.edit_issue_body(repo, number, body)
            .await
            .map(|_| ())
            .map_err(|error| remote_error("edit thread body", error))
    }
}
