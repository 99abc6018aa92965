use std::path::PathBuf;

use clap::{ArgAction, Parser};

fn parse_positive_usize(value: &str) -> Result<usize, String> {
    let parsed = value
        .parse::<usize>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(parsed)
}

fn parse_positive_u64(value: &str) -> Result<u64, String> {
    let parsed = value
        .parse::<u64>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(parsed)
}

fn parse_base_url(value: &str) -> Result<String, String> {
    let trimmed = value.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err("base url must not be empty".to_string());
    }
    if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
        return Err("base url must start with http:// or https://".to_string());
    }
    Ok(trimmed.to_string())
}

#[derive(Debug, Parser)]
#[command(
    name = "tau-jira-linker",
    about = "Links Jira issues mentioned in GitHub discussions, in both directions",
    version
)]
/// Public struct `Cli` used across Tau components.
pub(crate) struct Cli {
    #[arg(
        long = "github-event-name",
        env = "GITHUB_EVENT_NAME",
        help = "GitHub webhook event name (issue_comment, issues, pull_request, pull_request_review)"
    )]
    pub(crate) github_event_name: String,

    #[arg(
        long = "github-event-path",
        env = "GITHUB_EVENT_PATH",
        help = "Path to the JSON webhook payload delivered for the event"
    )]
    pub(crate) github_event_path: PathBuf,

    #[arg(
        long = "github-token",
        env = "GITHUB_TOKEN",
        hide_env_values = true,
        help = "GitHub token used to edit comments and issue bodies"
    )]
    pub(crate) github_token: String,

    #[arg(
        long = "github-api-base",
        env = "GITHUB_API_URL",
        default_value = "https://api.github.com",
        value_parser = parse_base_url,
        help = "GitHub API base URL"
    )]
    pub(crate) github_api_base: String,

    #[arg(
        long = "jira-base-url",
        env = "TAU_JIRA_BASE_URL",
        value_parser = parse_base_url,
        help = "Jira base URL used for REST calls and /browse/<KEY> links"
    )]
    pub(crate) jira_base_url: String,

    #[arg(
        long = "jira-username",
        env = "TAU_JIRA_USERNAME",
        requires = "jira_password",
        help = "Jira username for basic authentication"
    )]
    pub(crate) jira_username: Option<String>,

    #[arg(
        long = "jira-password",
        env = "TAU_JIRA_PASSWORD",
        hide_env_values = true,
        requires = "jira_username",
        conflicts_with = "jira_token",
        help = "Jira password or API token for basic authentication"
    )]
    pub(crate) jira_password: Option<String>,

    #[arg(
        long = "jira-token",
        env = "TAU_JIRA_TOKEN",
        hide_env_values = true,
        help = "Jira personal access token sent as a bearer credential"
    )]
    pub(crate) jira_token: Option<String>,

    #[arg(
        long = "request-timeout-ms",
        env = "TAU_JIRA_LINKER_REQUEST_TIMEOUT_MS",
        default_value_t = 30_000,
        value_parser = parse_positive_u64,
        help = "HTTP timeout in milliseconds for GitHub and Jira requests"
    )]
    pub(crate) request_timeout_ms: u64,

    #[arg(
        long = "retry-max-attempts",
        env = "TAU_JIRA_LINKER_RETRY_MAX_ATTEMPTS",
        default_value_t = 4,
        value_parser = parse_positive_usize,
        help = "Maximum attempts for retryable api failures (429/5xx/transport)"
    )]
    pub(crate) retry_max_attempts: usize,

    #[arg(
        long = "retry-base-delay-ms",
        env = "TAU_JIRA_LINKER_RETRY_BASE_DELAY_MS",
        default_value_t = 500,
        value_parser = parse_positive_u64,
        help = "Base backoff delay in milliseconds for api retries"
    )]
    pub(crate) retry_base_delay_ms: u64,

    #[arg(
        long,
        action = ArgAction::SetTrue,
        help = "Print the run report as JSON instead of a summary line"
    )]
    pub(crate) json: bool,
}
