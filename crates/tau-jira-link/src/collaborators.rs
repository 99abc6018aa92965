use async_trait::async_trait;

use crate::discussion_event::RepoRef;
use crate::error::{DiscussionError, TrackerError};
use crate::remote_link::{RemoteLink, TrackerIssue};

#[async_trait]
/// Trait contract for `DiscussionClient` behavior.
pub trait DiscussionClient: Send + Sync {
    async fn edit_comment(
        &self,
        repo: &RepoRef,
        comment_id: u64,
        body: &str,
    ) -> Result<(), DiscussionError>;

    /// Returns the current body of an issue or pull request.
    async fn get_thread_body(&self, repo: &RepoRef, number: u64)
        -> Result<String, DiscussionError>;

    async fn edit_thread_body(
        &self,
        repo: &RepoRef,
        number: u64,
        body: &str,
    ) -> Result<(), DiscussionError>;
}

#[async_trait]
/// Trait contract for `TrackerClient` behavior.
pub trait TrackerClient: Send + Sync {
    /// Fails with [`TrackerError::NotFound`] when the issue does not exist.
    async fn get_issue(&self, issue_id: &str) -> Result<TrackerIssue, TrackerError>;

    async fn get_remote_links(&self, issue_id: &str) -> Result<Vec<RemoteLink>, TrackerError>;

    async fn add_remote_link(&self, issue_id: &str, link: &RemoteLink)
        -> Result<(), TrackerError>;

    /// Base URL used to build `<base>/browse/<key>` links, without a trailing `/`.
    fn base_url(&self) -> &str;
}
