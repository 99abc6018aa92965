//! Jira REST client used by the Tau Jira linker.
//!
//! Implements [`tau_jira_link::TrackerClient`] over the Jira REST v2 issue and
//! remote link endpoints, with bounded retries for rate limits and server errors.

mod jira_api_client;
mod jira_transport_helpers;

pub use jira_api_client::{JiraApiClient, JiraAuth, JiraClientConfig};
