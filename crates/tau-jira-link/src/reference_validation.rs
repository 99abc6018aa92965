use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;

use crate::collaborators::TrackerClient;

/// Issue keys confirmed to exist in the tracker, deduplicated and kept in
/// extraction order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedReferences {
    issue_ids: Arc<[String]>,
}

impl Default for ValidatedReferences {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl ValidatedReferences {
    pub fn new(issue_ids: Vec<String>) -> Self {
        let mut seen = HashSet::new();
        let issue_ids = issue_ids
            .into_iter()
            .filter(|issue_id| seen.insert(issue_id.clone()))
            .collect::<Vec<_>>();
        Self {
            issue_ids: issue_ids.into(),
        }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.issue_ids
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.issue_ids.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.issue_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issue_ids.is_empty()
    }

    pub fn contains(&self, issue_id: &str) -> bool {
        self.iter().any(|candidate| candidate == issue_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Public struct `LookupFailure` used across Tau components.
pub struct LookupFailure {
    pub issue_id: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Public struct `ReferenceValidation` used across Tau components.
pub struct ReferenceValidation {
    pub validated: ValidatedReferences,
    pub not_found: Vec<String>,
    pub lookup_failures: Vec<LookupFailure>,
}

/// Looks up each unique candidate once and keeps the ones the tracker knows.
///
/// Not-found candidates are dropped silently. Other lookup errors are logged
/// and recorded without stopping the remaining lookups.
pub async fn validate_issue_references(
    tracker: &dyn TrackerClient,
    candidates: &[String],
) -> ReferenceValidation {
    let mut checked = HashSet::new();
    let mut validated = Vec::new();
    let mut not_found = Vec::new();
    let mut lookup_failures = Vec::new();

    for candidate in candidates {
        if !checked.insert(candidate.as_str()) {
            continue;
        }
        match tracker.get_issue(candidate).await {
            Ok(_) => validated.push(candidate.clone()),
            Err(error) if error.is_not_found() => {
                tracing::debug!(issue_id = %candidate, "ignoring unknown tracker issue");
                not_found.push(candidate.clone());
            }
            Err(error) => {
                tracing::error!(
                    issue_id = %candidate,
                    error = %error,
                    "failed to get tracker issue"
                );
                lookup_failures.push(LookupFailure {
                    issue_id: candidate.clone(),
                    error: error.to_string(),
                });
            }
        }
    }

    ReferenceValidation {
        validated: ValidatedReferences::new(validated),
        not_found,
        lookup_failures,
    }
}
