use std::borrow::Cow;
use std::sync::Arc;

use serde::Serialize;

use crate::collaborators::{DiscussionClient, TrackerClient};
use crate::comment_annotation::insert_issue_links;
use crate::discussion_event::DiscussionEvent;
use crate::error::DiscussionError;
use crate::issue_reference::extract_issue_references;
use crate::reference_validation::{validate_issue_references, LookupFailure, ValidatedReferences};
use crate::remote_link_upsert::{
    upsert_remote_links, BackLinkReport, BackLinkStatus, BackLinkTarget,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
/// Enumerates supported `LinkRunStatus` values.
pub enum LinkRunStatus {
    SkippedDeleted,
    SkippedNoReferences,
    Processed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
/// Enumerates supported `ThreadKind` values.
pub enum ThreadKind {
    Issue,
    PullRequest,
}

impl ThreadKind {
    pub fn of(event: &DiscussionEvent) -> Self {
        if event.is_pull_request {
            Self::PullRequest
        } else {
            Self::Issue
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Issue => "issue",
            Self::PullRequest => "pull_request",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
/// Enumerates supported `AnnotationOutcome` values.
pub enum AnnotationOutcome {
    NotAttempted,
    Unchanged,
    CommentEdited,
    ThreadBodyEdited,
    ThreadBodyUnchanged,
    Failed { error: String },
}

/// Aggregated result of handling one discussion event.
///
/// Sub-operation failures are recorded here instead of failing the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkRunReport {
    pub status: LinkRunStatus,
    pub thread: ThreadKind,
    pub candidates: Vec<String>,
    pub validated: Vec<String>,
    pub not_found: Vec<String>,
    pub lookup_failures: Vec<LookupFailure>,
    pub back_links: Vec<BackLinkReport>,
    pub annotation: AnnotationOutcome,
}

impl LinkRunReport {
    fn skipped(status: LinkRunStatus, thread: ThreadKind, candidates: Vec<String>) -> Self {
        Self {
            status,
            thread,
            candidates,
            validated: Vec::new(),
            not_found: Vec::new(),
            lookup_failures: Vec::new(),
            back_links: Vec::new(),
            annotation: AnnotationOutcome::NotAttempted,
        }
    }

    pub fn failure_count(&self) -> usize {
        let annotation_failures = usize::from(matches!(
            self.annotation,
            AnnotationOutcome::Failed { .. }
        ));
        self.lookup_failures.len()
            + self
                .back_links
                .iter()
                .filter(|report| report.is_failure())
                .count()
            + annotation_failures
    }

    pub fn created_link_count(&self) -> usize {
        self.back_links
            .iter()
            .filter(|report| report.status == BackLinkStatus::Created)
            .count()
    }
}

/// Links Jira issues mentioned in GitHub discussion text, in both directions.
#[derive(Clone)]
pub struct JiraLinker {
    tracker: Arc<dyn TrackerClient>,
    discussion: Arc<dyn DiscussionClient>,
}

impl JiraLinker {
    pub fn new(tracker: Arc<dyn TrackerClient>, discussion: Arc<dyn DiscussionClient>) -> Self {
        Self {
            tracker,
            discussion,
        }
    }

    /// Handles one event on a best-effort basis.
    ///
    /// Back-links are upserted concurrently while the discussion text is
    /// annotated; the call returns once both have finished.
    #[tracing::instrument(
        name = "tau_jira_link.handle_event",
        skip_all,
        fields(
            repo = %event.repo.full_name(),
            number = event.number,
            action = event.action.as_str(),
            thread = ThreadKind::of(event).as_str(),
            comment_id = ?event.comment_id
        )
    )]
    pub async fn handle_event(&self, event: &DiscussionEvent) -> LinkRunReport {
        if event.is_deleted() {
            tracing::debug!("skipping deleted discussion event");
            return LinkRunReport::skipped(
                LinkRunStatus::SkippedDeleted,
                ThreadKind::of(event),
                Vec::new(),
            );
        }

        let candidates = extract_issue_references(&event.body, &event.issue_title);
        if candidates.is_empty() {
            tracing::debug!("no issue references found");
            return LinkRunReport::skipped(
                LinkRunStatus::SkippedNoReferences,
                ThreadKind::of(event),
                candidates,
            );
        }

        let validation = validate_issue_references(self.tracker.as_ref(), &candidates).await;
        let target = Arc::new(BackLinkTarget::from_event(event));
        let batch = upsert_remote_links(Arc::clone(&self.tracker), &validation.validated, target);

        let annotation = match self
            .annotate_discussion(event, &validation.validated)
            .await
        {
            Ok(outcome) => outcome,
            Err(error) => {
                tracing::error!(error = %error, "failed to insert links into body");
                AnnotationOutcome::Failed {
                    error: error.to_string(),
                }
            }
        };
        let back_links = batch.join().await;

        let report = LinkRunReport {
            status: LinkRunStatus::Processed,
            thread: ThreadKind::of(event),
            candidates,
            validated: validation.validated.as_slice().to_vec(),
            not_found: validation.not_found,
            lookup_failures: validation.lookup_failures,
            back_links,
            annotation,
        };
        tracing::info!(
            validated = report.validated.len(),
            links_created = report.created_link_count(),
            failures = report.failure_count(),
            "processed discussion event"
        );
        report
    }

    async fn annotate_discussion(
        &self,
        event: &DiscussionEvent,
        validated: &ValidatedReferences,
    ) -> Result<AnnotationOutcome, DiscussionError> {
        let base_url = self.tracker.base_url();
        let with_links = insert_issue_links(&event.body, validated.as_slice(), base_url);
        let Cow::Owned(with_links) = with_links else {
            return Ok(AnnotationOutcome::Unchanged);
        };

        if let Some(comment_id) = event.comment_id {
            self.discussion
                .edit_comment(&event.repo, comment_id, &with_links)
                .await?;
            return Ok(AnnotationOutcome::CommentEdited);
        }

        // Events without a comment id may carry a body other than the thread
        // body (reviews, for example), so the thread body is annotated on its own.
        let thread_body = self
            .discussion
            .get_thread_body(&event.repo, event.number)
            .await?;
        match insert_issue_links(&thread_body, validated.as_slice(), base_url) {
            Cow::Borrowed(_) => Ok(AnnotationOutcome::ThreadBodyUnchanged),
            Cow::Owned(new_body) => {
                self.discussion
                    .edit_thread_body(&event.repo, event.number, &new_body)
                    .await?;
                Ok(AnnotationOutcome::ThreadBodyEdited)
            }
        }
    }
}
