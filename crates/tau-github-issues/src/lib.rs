//! GitHub side of the Tau Jira linker.
//! This crate normalizes webhook deliveries into discussion events and provides
//! a REST client implementing [`tau_jira_link::DiscussionClient`].

mod github_api_client;
pub mod github_payloads;
mod github_transport_helpers;
mod webhook_event;

pub use github_api_client::{GithubApiClient, GithubClientConfig, DEFAULT_GITHUB_API_BASE};
pub use webhook_event::{discussion_event_from_webhook, GithubWebhookKind};
