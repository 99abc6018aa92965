use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::Value;
use tau_github_issues::{discussion_event_from_webhook, GithubApiClient, GithubClientConfig};
use tau_jira::{JiraApiClient, JiraAuth, JiraClientConfig};
use tau_jira_link::{
    AnnotationOutcome, DiscussionClient, JiraLinker, LinkRunReport, LinkRunStatus, TrackerClient,
};

use crate::cli_args::Cli;

pub(crate) async fn run_cli(cli: Cli) -> Result<()> {
    let Some(report) = run_linker(&cli).await? else {
        return Ok(());
    };
    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("failed to render run report")?
        );
    } else {
        println!("{}", render_summary(&report));
    }
    if report.failure_count() > 0 {
        tracing::warn!(
            failures = report.failure_count(),
            "run completed with partial failures"
        );
    }
    Ok(())
}

/// Returns `None` when the delivery is not a discussion event worth handling.
pub(crate) async fn run_linker(cli: &Cli) -> Result<Option<LinkRunReport>> {
    let payload = load_webhook_payload(&cli.github_event_path)?;
    let Some(event) = discussion_event_from_webhook(&cli.github_event_name, &payload)? else {
        tracing::info!(
            event_name = cli.github_event_name.as_str(),
            action = payload.get("action").and_then(serde_json::Value::as_str).unwrap_or(""),
            "ignoring unsupported github event"
        );
        return Ok(None);
    };

    let tracker = JiraApiClient::new(JiraClientConfig {
        base_url: cli.jira_base_url.clone(),
        auth: jira_auth_from_cli(cli),
        request_timeout_ms: cli.request_timeout_ms,
        retry_max_attempts: cli.retry_max_attempts,
        retry_base_delay_ms: cli.retry_base_delay_ms,
    })
    .context("failed to create jira client")?;
    let discussion = GithubApiClient::new(GithubClientConfig {
        api_base: cli.github_api_base.clone(),
        token: cli.github_token.clone(),
        request_timeout_ms: cli.request_timeout_ms,
        retry_max_attempts: cli.retry_max_attempts,
        retry_base_delay_ms: cli.retry_base_delay_ms,
    })?;

    let linker = JiraLinker::new(
        Arc::new(tracker) as Arc<dyn TrackerClient>,
        Arc::new(discussion) as Arc<dyn DiscussionClient>,
    );
    Ok(Some(linker.handle_event(&event).await))
}

pub(crate) fn load_webhook_payload(path: &Path) -> Result<Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read webhook payload {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse webhook payload {}", path.display()))
}

pub(crate) fn jira_auth_from_cli(cli: &Cli) -> JiraAuth {
    if let Some(token) = cli.jira_token.as_deref() {
        return JiraAuth::Bearer {
            token: token.to_string(),
        };
    }
    match (cli.jira_username.as_deref(), cli.jira_password.as_deref()) {
        (Some(username), Some(password)) => JiraAuth::Basic {
            username: username.to_string(),
            password: password.to_string(),
        },
        _ => JiraAuth::Anonymous,
    }
}

pub(crate) fn render_summary(report: &LinkRunReport) -> String {
    let status = match report.status {
        LinkRunStatus::SkippedDeleted => "skipped_deleted",
        LinkRunStatus::SkippedNoReferences => "skipped_no_references",
        LinkRunStatus::Processed => "processed",
    };
    let annotation = match &report.annotation {
        AnnotationOutcome::NotAttempted => "not_attempted",
        AnnotationOutcome::Unchanged | AnnotationOutcome::ThreadBodyUnchanged => "unchanged",
        AnnotationOutcome::CommentEdited => "comment_edited",
        AnnotationOutcome::ThreadBodyEdited => "thread_body_edited",
        AnnotationOutcome::Failed { .. } => "failed",
    };
    format!(
        "jira link run: status={status} thread={} candidates={} validated={} not_found={} links_created={} annotation={annotation} failures={}",
        report.thread.as_str(),
        report.candidates.len(),
        report.validated.len(),
        report.not_found.len(),
        report.created_link_count(),
        report.failure_count()
    )
}
