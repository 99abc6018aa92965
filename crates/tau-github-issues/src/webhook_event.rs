use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tau_jira_link::{DiscussionAction, DiscussionEvent};

use crate::github_payloads::{
    GithubIssue, GithubIssueComment, GithubPullRequest, GithubRepository, GithubReview,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Enumerates supported `GithubWebhookKind` values.
pub enum GithubWebhookKind {
    IssueComment,
    Issues,
    PullRequest,
    PullRequestReview,
}

impl GithubWebhookKind {
    pub fn parse(event_name: &str) -> Option<Self> {
        match event_name.trim() {
            "issue_comment" => Some(Self::IssueComment),
            "issues" => Some(Self::Issues),
            "pull_request" | "pull_request_target" => Some(Self::PullRequest),
            "pull_request_review" => Some(Self::PullRequestReview),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IssueComment => "issue_comment",
            Self::Issues => "issues",
            Self::PullRequest => "pull_request",
            Self::PullRequestReview => "pull_request_review",
        }
    }

    fn action(&self, raw: &str) -> Option<DiscussionAction> {
        match (self, raw) {
            (Self::IssueComment, "created")
            | (Self::Issues | Self::PullRequest, "opened")
            | (Self::PullRequestReview, "submitted") => Some(DiscussionAction::Created),
            (_, "edited") => Some(DiscussionAction::Edited),
            (Self::IssueComment | Self::Issues, "deleted")
            | (Self::PullRequestReview, "dismissed") => Some(DiscussionAction::Deleted),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct IssueCommentPayload {
    issue: GithubIssue,
    comment: GithubIssueComment,
    repository: GithubRepository,
}

#[derive(Debug, Deserialize)]
struct IssuesPayload {
    issue: GithubIssue,
    repository: GithubRepository,
}

#[derive(Debug, Deserialize)]
struct PullRequestPayload {
    pull_request: GithubPullRequest,
    repository: GithubRepository,
}

#[derive(Debug, Deserialize)]
struct PullRequestReviewPayload {
    review: GithubReview,
    pull_request: GithubPullRequest,
    repository: GithubRepository,
}

fn parse_payload<T: DeserializeOwned>(kind: GithubWebhookKind, payload: &Value) -> Result<T> {
    T::deserialize(payload)
        .with_context(|| format!("failed to parse github {} webhook payload", kind.as_str()))
}

/// Normalizes a GitHub webhook delivery into a discussion event.
///
/// Returns `Ok(None)` for event names and actions that carry no discussion
/// text worth linking (labels, assignments, and so on). Inline review
/// comments (`pull_request_review_comment`) are ignored as well: their
/// anchors point into a diff and they cannot be edited through the issue
/// comment endpoint, so reviews are linked through the `pull_request_review`
/// delivery instead.
pub fn discussion_event_from_webhook(
    event_name: &str,
    payload: &Value,
) -> Result<Option<DiscussionEvent>> {
    let Some(kind) = GithubWebhookKind::parse(event_name) else {
        return Ok(None);
    };
    let raw_action = payload
        .get("action")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let Some(action) = kind.action(raw_action) else {
        return Ok(None);
    };

    let event = match kind {
        GithubWebhookKind::IssueComment => {
            let parsed: IssueCommentPayload = parse_payload(kind, payload)?;
            DiscussionEvent {
                action,
                body: parsed.comment.body.unwrap_or_default(),
                issue_title: parsed.issue.title,
                comment_id: Some(parsed.comment.id),
                repo: parsed.repository.repo_ref(),
                number: parsed.issue.number,
                html_url: parsed.comment.html_url,
                is_pull_request: parsed.issue.pull_request.is_some(),
            }
        }
        GithubWebhookKind::Issues => {
            let parsed: IssuesPayload = parse_payload(kind, payload)?;
            DiscussionEvent {
                action,
                body: parsed.issue.body.unwrap_or_default(),
                issue_title: parsed.issue.title,
                comment_id: None,
                repo: parsed.repository.repo_ref(),
                number: parsed.issue.number,
                html_url: parsed.issue.html_url,
                is_pull_request: false,
            }
        }
        GithubWebhookKind::PullRequest => {
            let parsed: PullRequestPayload = parse_payload(kind, payload)?;
            DiscussionEvent {
                action,
                body: parsed.pull_request.body.unwrap_or_default(),
                issue_title: parsed.pull_request.title,
                comment_id: None,
                repo: parsed.repository.repo_ref(),
                number: parsed.pull_request.number,
                html_url: parsed.pull_request.html_url,
                is_pull_request: true,
            }
        }
        GithubWebhookKind::PullRequestReview => {
            let parsed: PullRequestReviewPayload = parse_payload(kind, payload)?;
            DiscussionEvent {
                action,
                body: parsed.review.body.unwrap_or_default(),
                issue_title: parsed.pull_request.title,
                comment_id: None,
                repo: parsed.repository.repo_ref(),
                number: parsed.pull_request.number,
                html_url: parsed.review.html_url,
                is_pull_request: true,
            }
        }
    };
    Ok(Some(event))
}
