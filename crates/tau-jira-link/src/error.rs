use thiserror::Error;

#[derive(Debug, Error)]
/// Enumerates supported `TrackerError` values.
pub enum TrackerError {
    #[error("tracker issue `{issue_id}` was not found")]
    NotFound { issue_id: String },
    #[error("tracker returned non-success status {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("tracker transport error: {0}")]
    Transport(String),
    #[error("invalid tracker response: {0}")]
    InvalidResponse(String),
}

impl TrackerError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[derive(Debug, Error)]
/// Enumerates supported `DiscussionError` values.
pub enum DiscussionError {
    #[error("discussion platform {operation} failed: {message}")]
    Remote { operation: String, message: String },
}

impl DiscussionError {
    pub fn remote(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Remote {
            operation: operation.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
/// Enumerates supported `UpsertError` values.
pub enum UpsertError {
    #[error("failed to get remote links: {0}")]
    FetchLinks(#[source] TrackerError),
    #[error("failed to add remote link: {0}")]
    AddLink(#[source] TrackerError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Enumerates supported `RepoRefError` values.
pub enum RepoRefError {
    #[error("repository slug `{0}` must be in owner/repo format")]
    InvalidSlug(String),
}
