use serde::{Deserialize, Serialize};

use crate::error::RepoRefError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Public struct `RepoRef` used across Tau components.
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parses an `owner/repo` slug.
    pub fn parse(raw: &str) -> Result<Self, RepoRefError> {
        let trimmed = raw.trim();
        let (owner, name) = trimmed
            .split_once('/')
            .ok_or_else(|| RepoRefError::InvalidSlug(raw.to_string()))?;
        let owner = owner.trim();
        let name = name.trim();
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(RepoRefError::InvalidSlug(raw.to_string()));
        }
        Ok(Self::new(owner, name))
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Enumerates supported `DiscussionAction` values.
pub enum DiscussionAction {
    Created,
    Edited,
    Deleted,
}

impl DiscussionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Edited => "edited",
            Self::Deleted => "deleted",
        }
    }
}

/// One unit of discussion content: a comment, an issue or pull request body,
/// or a pull request review.
///
/// `comment_id` is set only for comment events. Without it, annotations are
/// written to the issue or pull request body instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscussionEvent {
    pub action: DiscussionAction,
    pub body: String,
    pub issue_title: String,
    pub comment_id: Option<u64>,
    pub repo: RepoRef,
    pub number: u64,
    pub html_url: String,
    #[serde(default)]
    pub is_pull_request: bool,
}

impl DiscussionEvent {
    pub fn is_deleted(&self) -> bool {
        self.action == DiscussionAction::Deleted
    }
}
