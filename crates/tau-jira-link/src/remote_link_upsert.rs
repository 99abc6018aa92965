use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinSet;
use tracing::Instrument;

use crate::collaborators::TrackerClient;
use crate::discussion_event::DiscussionEvent;
use crate::error::UpsertError;
use crate::reference_validation::ValidatedReferences;
use crate::remote_link::{RemoteLink, RemoteLinkIcon, RemoteLinkObject};

pub const GITHUB_FAVICON_URL: &str = "https://github.com/favicon.ico";
pub const GITHUB_ICON_TITLE: &str = "GitHub";

/// Strips everything from the first `#` so comment anchors map to their thread.
pub fn canonical_thread_url(url: &str) -> &str {
    url.split_once('#').map_or(url, |(thread_url, _)| thread_url)
}

/// The remote link every validated issue should carry for one discussion thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackLinkTarget {
    link: RemoteLink,
}

impl BackLinkTarget {
    /// The canonical URL doubles as the Jira `globalId`, so a create that is
    /// repeated updates the existing link instead of adding a second one.
    pub fn from_event(event: &DiscussionEvent) -> Self {
        let url = canonical_thread_url(&event.html_url).to_string();
        let link = RemoteLink {
            global_id: Some(url.clone()),
            object: RemoteLinkObject {
                url,
                title: format!(
                    "{}#{}: {}",
                    event.repo.full_name(),
                    event.number,
                    event.issue_title
                ),
                icon: Some(RemoteLinkIcon {
                    url_16x16: Some(GITHUB_FAVICON_URL.to_string()),
                    title: Some(GITHUB_ICON_TITLE.to_string()),
                }),
            },
            ..RemoteLink::default()
        };
        Self { link }
    }

    pub fn canonical_url(&self) -> &str {
        self.link.target_url()
    }

    pub fn remote_link(&self) -> &RemoteLink {
        &self.link
    }

    fn is_linked_by(&self, links: &[RemoteLink]) -> bool {
        links.iter().any(|link| {
            link.target_url() == self.canonical_url()
                || link.global_id.as_deref() == Some(self.canonical_url())
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Enumerates supported `UpsertOutcome` values.
pub enum UpsertOutcome {
    Created,
    AlreadyLinked,
}

/// Creates the back-link on one tracker issue unless a link with the same
/// canonical URL already exists.
pub async fn upsert_remote_link(
    tracker: &dyn TrackerClient,
    issue_id: &str,
    target: &BackLinkTarget,
) -> Result<UpsertOutcome, UpsertError> {
    let links = tracker
        .get_remote_links(issue_id)
        .await
        .map_err(UpsertError::FetchLinks)?;
    if target.is_linked_by(&links) {
        tracing::debug!(issue_id, url = target.canonical_url(), "remote link already present");
        return Ok(UpsertOutcome::AlreadyLinked);
    }

    tracker
        .add_remote_link(issue_id, target.remote_link())
        .await
        .map_err(UpsertError::AddLink)?;
    tracing::info!(issue_id, url = target.canonical_url(), "created jira remote link");
    Ok(UpsertOutcome::Created)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
/// Enumerates supported `BackLinkStatus` values.
pub enum BackLinkStatus {
    Created,
    AlreadyLinked,
    Failed { error: String },
}

impl From<UpsertOutcome> for BackLinkStatus {
    fn from(outcome: UpsertOutcome) -> Self {
        match outcome {
            UpsertOutcome::Created => Self::Created,
            UpsertOutcome::AlreadyLinked => Self::AlreadyLinked,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Public struct `BackLinkReport` used across Tau components.
pub struct BackLinkReport {
    pub issue_id: String,
    #[serde(flatten)]
    pub status: BackLinkStatus,
}

impl BackLinkReport {
    pub fn is_failure(&self) -> bool {
        matches!(self.status, BackLinkStatus::Failed { .. })
    }
}

/// Upserts already running in the background, one task per issue.
pub struct RemoteLinkBatch {
    issue_ids: Vec<String>,
    tasks: JoinSet<(String, Result<UpsertOutcome, UpsertError>)>,
}

impl RemoteLinkBatch {
    pub fn len(&self) -> usize {
        self.issue_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issue_ids.is_empty()
    }

    /// Waits for every upsert and reports them in validation order.
    pub async fn join(mut self) -> Vec<BackLinkReport> {
        let mut finished = HashMap::with_capacity(self.issue_ids.len());
        let mut task_errors = Vec::new();
        while let Some(joined) = self.tasks.join_next().await {
            match joined {
                Ok((issue_id, outcome)) => {
                    let status = match outcome {
                        Ok(outcome) => BackLinkStatus::from(outcome),
                        Err(error) => {
                            tracing::error!(
                                issue_id = %issue_id,
                                error = %error,
                                "failed to ensure github link on jira issue"
                            );
                            BackLinkStatus::Failed {
                                error: error.to_string(),
                            }
                        }
                    };
                    finished.insert(issue_id, status);
                }
                Err(error) => {
                    tracing::error!(error = %error, "remote link upsert task failed");
                    task_errors.push(error.to_string());
                }
            }
        }

        self.issue_ids
            .into_iter()
            .map(|issue_id| {
                let status = finished
                    .remove(&issue_id)
                    .unwrap_or_else(|| BackLinkStatus::Failed {
                        error: format!("upsert task did not complete: {}", task_errors.join("; ")),
                    });
                BackLinkReport { issue_id, status }
            })
            .collect()
    }
}

/// Starts one upsert task per validated issue and returns without waiting.
///
/// Must be called from within a tokio runtime.
pub fn upsert_remote_links(
    tracker: Arc<dyn TrackerClient>,
    validated: &ValidatedReferences,
    target: Arc<BackLinkTarget>,
) -> RemoteLinkBatch {
    let mut tasks = JoinSet::new();
    let issue_ids = validated.iter().map(str::to_string).collect::<Vec<_>>();
    for issue_id in issue_ids.iter().cloned() {
        let tracker = Arc::clone(&tracker);
        let target = Arc::clone(&target);
        let span = tracing::info_span!("remote_link_upsert", issue_id = %issue_id);
        tasks.spawn(
            async move {
                let outcome = upsert_remote_link(tracker.as_ref(), &issue_id, &target).await;
                (issue_id, outcome)
            }
            .instrument(span),
        );
    }
    RemoteLinkBatch { issue_ids, tasks }
}
