use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex as AsyncMutex, Notify};

use crate::collaborators::{DiscussionClient, TrackerClient};
use crate::discussion_event::{DiscussionAction, DiscussionEvent, RepoRef};
use crate::error::{DiscussionError, TrackerError};
use crate::remote_link::{RemoteLink, RemoteLinkObject, TrackerIssue};

pub(crate) const BASE_URL: &str = "https://issues.example.com";

pub(crate) fn sample_event(body: &str) -> DiscussionEvent {
    DiscussionEvent {
        action: DiscussionAction::Created,
        body: body.to_string(),
        issue_title: "Improve linker".to_string(),
        comment_id: Some(77),
        repo: RepoRef::new("owner", "repo"),
        number: 42,
        html_url: "https://github.com/owner/repo/pull/42#issuecomment-77".to_string(),
        is_pull_request: true,
    }
}

pub(crate) fn existing_link(url: &str) -> RemoteLink {
    RemoteLink {
        id: Some(1),
        object: RemoteLinkObject {
            url: url.to_string(),
            title: "existing".to_string(),
            icon: None,
        },
        ..RemoteLink::default()
    }
}

#[derive(Default)]
pub(crate) struct FakeTracker {
    existing: HashSet<String>,
    failing_lookups: HashSet<String>,
    failing_link_fetches: HashSet<String>,
    failing_link_creates: HashSet<String>,
    link_fetch_gate: Option<Arc<Notify>>,
    links: AsyncMutex<HashMap<String, Vec<RemoteLink>>>,
    calls: AsyncMutex<Vec<String>>,
}

impl FakeTracker {
    pub(crate) fn with_issues(issue_ids: &[&str]) -> Self {
        Self {
            existing: issue_ids.iter().map(|id| id.to_string()).collect(),
            ..Self::default()
        }
    }

    pub(crate) fn fail_lookup(mut self, issue_id: &str) -> Self {
        self.failing_lookups.insert(issue_id.to_string());
        self
    }

    pub(crate) fn fail_link_fetch(mut self, issue_id: &str) -> Self {
        self.failing_link_fetches.insert(issue_id.to_string());
        self
    }

    pub(crate) fn fail_link_create(mut self, issue_id: &str) -> Self {
        self.failing_link_creates.insert(issue_id.to_string());
        self
    }

    /// Holds every remote link fetch until `gate` is notified.
    pub(crate) fn gate_link_fetches(mut self, gate: Arc<Notify>) -> Self {
        self.link_fetch_gate = Some(gate);
        self
    }

    pub(crate) fn seed_link(self, issue_id: &str, link: RemoteLink) -> Self {
        self.links
            .try_lock()
            .expect("unshared tracker")
            .entry(issue_id.to_string())
            .or_default()
            .push(link);
        self
    }

    pub(crate) async fn links_for(&self, issue_id: &str) -> Vec<RemoteLink> {
        self.links
            .lock()
            .await
            .get(issue_id)
            .cloned()
            .unwrap_or_default()
    }

    pub(crate) async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }

    async fn record(&self, call: String) {
        self.calls.lock().await.push(call);
    }
}

#[async_trait]
impl TrackerClient for FakeTracker {
    async fn get_issue(&self, issue_id: &str) -> Result<TrackerIssue, TrackerError> {
        self.record(format!("get_issue:{issue_id}")).await;
        if self.failing_lookups.contains(issue_id) {
            return Err(TrackerError::HttpStatus {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        if !self.existing.contains(issue_id) {
            return Err(TrackerError::NotFound {
                issue_id: issue_id.to_string(),
            });
        }
        Ok(TrackerIssue {
            id: format!("id-{issue_id}"),
            key: issue_id.to_string(),
        })
    }

    async fn get_remote_links(&self, issue_id: &str) -> Result<Vec<RemoteLink>, TrackerError> {
        self.record(format!("get_remote_links:{issue_id}")).await;
        if let Some(gate) = &self.link_fetch_gate {
            gate.notified().await;
        }
        if self.failing_link_fetches.contains(issue_id) {
            return Err(TrackerError::Transport("connection reset".to_string()));
        }
        Ok(self.links_for(issue_id).await)
    }

    async fn add_remote_link(
        &self,
        issue_id: &str,
        link: &RemoteLink,
    ) -> Result<(), TrackerError> {
        self.record(format!("add_remote_link:{issue_id}")).await;
        if self.failing_link_creates.contains(issue_id) {
            return Err(TrackerError::HttpStatus {
                status: 500,
                body: "create failed".to_string(),
            });
        }
        self.links
            .lock()
            .await
            .entry(issue_id.to_string())
            .or_default()
            .push(link.clone());
        Ok(())
    }

    fn base_url(&self) -> &str {
        BASE_URL
    }
}

#[derive(Default)]
pub(crate) struct FakeDiscussion {
    thread_bodies: AsyncMutex<HashMap<u64, String>>,
    fail_edits: bool,
    comment_edit_signal: Option<Arc<Notify>>,
    calls: AsyncMutex<Vec<String>>,
    comment_edits: AsyncMutex<Vec<(u64, String)>>,
}

impl FakeDiscussion {
    pub(crate) fn with_thread_body(number: u64, body: &str) -> Self {
        let fake = Self::default();
        fake.thread_bodies
            .try_lock()
            .expect("unshared discussion")
            .insert(number, body.to_string());
        fake
    }

    /// Notifies `signal` once a comment edit has been recorded.
    pub(crate) fn signal_comment_edits(mut self, signal: Arc<Notify>) -> Self {
        self.comment_edit_signal = Some(signal);
        self
    }

    pub(crate) fn failing_edits(mut self) -> Self {
        self.fail_edits = true;
        self
    }

    pub(crate) async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }

    pub(crate) async fn comment_edits(&self) -> Vec<(u64, String)> {
        self.comment_edits.lock().await.clone()
    }

    pub(crate) async fn thread_body(&self, number: u64) -> Option<String> {
        self.thread_bodies.lock().await.get(&number).cloned()
    }
}

#[async_trait]
impl DiscussionClient for FakeDiscussion {
    async fn edit_comment(
        &self,
        repo: &RepoRef,
        comment_id: u64,
        body: &str,
    ) -> Result<(), DiscussionError> {
        self.calls
            .lock()
            .await
            .push(format!("edit_comment:{}:{comment_id}", repo.full_name()));
        if self.fail_edits {
            return Err(DiscussionError::remote("edit comment", "status 502"));
        }
        self.comment_edits
            .lock()
            .await
            .push((comment_id, body.to_string()));
        if let Some(signal) = &self.comment_edit_signal {
            signal.notify_one();
        }
        Ok(())
    }

    async fn get_thread_body(
        &self,
        repo: &RepoRef,
        number: u64,
    ) -> Result<String, DiscussionError> {
        self.calls
            .lock()
            .await
            .push(format!("get_thread_body:{}:{number}", repo.full_name()));
        Ok(self.thread_body(number).await.unwrap_or_default())
    }

    async fn edit_thread_body(
        &self,
        repo: &RepoRef,
        number: u64,
        body: &str,
    ) -> Result<(), DiscussionError> {
        self.calls
            .lock()
            .await
            .push(format!("edit_thread_body:{}:{number}", repo.full_name()));
        if self.fail_edits {
            return Err(DiscussionError::remote("edit issue", "status 502"));
        }
        self.thread_bodies
            .lock()
            .await
            .insert(number, body.to_string());
        Ok(())
    }
}
