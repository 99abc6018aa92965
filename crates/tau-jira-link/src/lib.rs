//! Core linking logic for the Tau Jira linker.
//!
//! Extracts Jira issue keys from GitHub discussion text, validates them against
//! the tracker, upserts reciprocal remote links, and annotates the discussion
//! text with browse links. Remote systems are reached only through the
//! collaborator traits in [`collaborators`].

pub mod collaborators;
pub mod comment_annotation;
pub mod discussion_event;
pub mod error;
pub mod issue_reference;
pub mod link_orchestrator;
pub mod reference_validation;
pub mod remote_link;
pub mod remote_link_upsert;

#[cfg(test)]
mod test_support;

pub use collaborators::{DiscussionClient, TrackerClient};
pub use comment_annotation::insert_issue_links;
pub use discussion_event::{DiscussionAction, DiscussionEvent, RepoRef};
pub use error::{DiscussionError, RepoRefError, TrackerError, UpsertError};
pub use issue_reference::extract_issue_references;
pub use link_orchestrator::{
    AnnotationOutcome, JiraLinker, LinkRunReport, LinkRunStatus, ThreadKind,
};
pub use reference_validation::{
    validate_issue_references, LookupFailure, ReferenceValidation, ValidatedReferences,
};
pub use remote_link::{RemoteLink, RemoteLinkIcon, RemoteLinkObject, TrackerIssue};
pub use remote_link_upsert::{
    canonical_thread_url, upsert_remote_link, upsert_remote_links, BackLinkReport, BackLinkStatus,
    BackLinkTarget, RemoteLinkBatch, UpsertOutcome, GITHUB_FAVICON_URL, GITHUB_ICON_TITLE,
};
