use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use tau_jira_link::{RemoteLink, TrackerClient, TrackerError, TrackerIssue};

use crate::jira_transport_helpers::{
    is_replayable_create_status, is_replayable_create_transport_error, is_retryable_jira_status,
    is_retryable_transport_error, parse_retry_after_ms, retry_delay, truncate_for_error,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RequestReplay {
    Idempotent,
    /// Replayed only when the request provably never reached Jira.
    Create,
}

impl RequestReplay {
    fn allows_status(self, status: u16) -> bool {
        match self {
            Self::Idempotent => is_retryable_jira_status(status),
            Self::Create => is_replayable_create_status(status),
        }
    }

    fn allows_transport_error(self, error: &reqwest::Error) -> bool {
        match self {
            Self::Idempotent => is_retryable_transport_error(error),
            Self::Create => is_replayable_create_transport_error(error),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
/// Enumerates supported `JiraAuth` values.
pub enum JiraAuth {
    Anonymous,
    Basic { username: String, password: String },
    Bearer { token: String },
}

impl std::fmt::Debug for JiraAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Anonymous => f.write_str("Anonymous"),
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Self::Bearer { .. } => f.write_str("Bearer(<redacted>)"),
        }
    }
}

#[derive(Debug, Clone)]
/// Public struct `JiraClientConfig` used across Tau components.
pub struct JiraClientConfig {
    pub base_url: String,
    pub auth: JiraAuth,
    pub request_timeout_ms: u64,
    pub retry_max_attempts: usize,
    pub retry_base_delay_ms: u64,
}

/// Jira REST v2 client covering issue lookup and remote links.
#[derive(Clone)]
pub struct JiraApiClient {
    http: reqwest::Client,
    base_url: String,
    auth: JiraAuth,
    retry_max_attempts: usize,
    retry_base_delay_ms: u64,
}

impl JiraApiClient {
    pub fn new(config: JiraClientConfig) -> Result<Self, TrackerError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("Tau-jira-linker"),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(config.request_timeout_ms.max(1)))
            .build()
            .map_err(|error| {
                TrackerError::Transport(format!("failed to create jira api client: {error}"))
            })?;
        Ok(Self {
            http,
            base_url: config.base_url.trim().trim_end_matches('/').to_string(),
            auth: config.auth,
            retry_max_attempts: config.retry_max_attempts.max(1),
            retry_base_delay_ms: config.retry_base_delay_ms.max(1),
        })
    }

    pub async fn get_issue(&self, issue_id: &str) -> Result<TrackerIssue, TrackerError> {
        let url = self.issue_url(issue_id);
        let response = self
            .send_with_retry("get issue", issue_id, RequestReplay::Idempotent, || {
                self.request(Method::GET, &url)
                    .query(&[("fields", "summary")])
            })
            .await?;
        decode_json(response, "get issue").await
    }

    pub async fn get_remote_links(&self, issue_id: &str) -> Result<Vec<RemoteLink>, TrackerError> {
        let url = format!("{}/remotelink", self.issue_url(issue_id));
        let response = self
            .send_with_retry("get remote links", issue_id, RequestReplay::Idempotent, || {
                self.request(Method::GET, &url)
            })
            .await?;
        decode_json(response, "get remote links").await
    }

    pub async fn add_remote_link(
        &self,
        issue_id: &str,
        link: &RemoteLink,
    ) -> Result<(), TrackerError> {
        let url = format!("{}/remotelink", self.issue_url(issue_id));
        self.send_with_retry("add remote link", issue_id, RequestReplay::Create, || {
            self.request(Method::POST, &url).json(link)
        })
        .await?;
        Ok(())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn issue_url(&self, issue_id: &str) -> String {
        format!("{}/rest/api/2/issue/{}", self.base_url, issue_id)
    }

    fn request(&self, method: Method, url: &str) -> reqwest::RequestBuilder {
        let request = self.http.request(method, url);
        match &self.auth {
            JiraAuth::Anonymous => request,
            JiraAuth::Basic { username, password } => request.basic_auth(username, Some(password)),
            JiraAuth::Bearer { token } => request.bearer_auth(token.trim()),
        }
    }

    /// Sends the request, retrying what `replay` allows: rate limits, server
    /// errors, and transient transport failures for reads, but only rate limits
    /// and connect failures for creates. A 404 maps to [`TrackerError::NotFound`].
    async fn send_with_retry<F>(
        &self,
        operation: &str,
        issue_id: &str,
        replay: RequestReplay,
        mut request_builder: F,
    ) -> Result<reqwest::Response, TrackerError>
    where
        F: FnMut() -> reqwest::RequestBuilder,
    {
        let mut attempt = 0_usize;
        loop {
            attempt = attempt.saturating_add(1);
            let response = request_builder()
                .header("x-tau-retry-attempt", attempt.saturating_sub(1).to_string())
                .send()
                .await;
            match response {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }
                    if status == StatusCode::NOT_FOUND {
                        return Err(TrackerError::NotFound {
                            issue_id: issue_id.to_string(),
                        });
                    }

                    let retry_after_ms = parse_retry_after_ms(response.headers());
                    let body = response.text().await.unwrap_or_default();
                    if attempt < self.retry_max_attempts && replay.allows_status(status.as_u16()) {
                        tracing::warn!(
                            operation,
                            issue_id,
                            status = status.as_u16(),
                            attempt,
                            "retrying jira request"
                        );
                        tokio::time::sleep(retry_delay(
                            self.retry_base_delay_ms,
                            attempt,
                            retry_after_ms,
                        ))
                        .await;
                        continue;
                    }

                    return Err(TrackerError::HttpStatus {
                        status: status.as_u16(),
                        body: truncate_for_error(&body, 800),
                    });
                }
                Err(error) => {
                    if attempt < self.retry_max_attempts && replay.allows_transport_error(&error) {
                        tokio::time::sleep(retry_delay(self.retry_base_delay_ms, attempt, None))
                            .await;
                        continue;
                    }
                    return Err(TrackerError::Transport(format!(
                        "jira api {operation} request failed: {error}"
                    )));
                }
            }
        }
    }
}

async fn decode_json<T: DeserializeOwned>(
    response: reqwest::Response,
    operation: &str,
) -> Result<T, TrackerError> {
    response.json::<T>().await.map_err(|error| {
        TrackerError::InvalidResponse(format!("failed to decode jira {operation}: {error}"))
    })
}

#[async_trait]
impl TrackerClient for JiraApiClient {
    async fn get_issue(&self, issue_id: &str) -> Result<TrackerIssue, TrackerError> {
        JiraApiClient::get_issue(self, issue_id).await
    }

    async fn get_remote_links(&self, issue_id: &str) -> Result<Vec<RemoteLink>, TrackerError> {
        JiraApiClient::get_remote_links(self, issue_id).await
    }

    async fn add_remote_link(
        &self,
        issue_id: &str,
        link: &RemoteLink,
    ) -> Result<(), TrackerError> {
        JiraApiClient::add_remote_link(self, issue_id, link).await
    }

    fn base_url(&self) -> &str {
        JiraApiClient::base_url(self)
    }
}
