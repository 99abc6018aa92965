use serde::{Deserialize, Serialize};
use serde_json::Value;
use tau_jira_link::RepoRef;

#[derive(Debug, Clone, Deserialize, Serialize)]
/// Public struct `GithubUser` used across Tau components.
pub struct GithubUser {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
/// Public struct `GithubRepository` used across Tau components.
pub struct GithubRepository {
    pub name: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub owner: GithubUser,
}

impl GithubRepository {
    pub fn repo_ref(&self) -> RepoRef {
        RepoRef::new(self.owner.login.clone(), self.name.clone())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
/// Public struct `GithubIssue` used across Tau components.
pub struct GithubIssue {
    pub number: u64,
    #[serde(default)]
    pub title: String,
    pub body: Option<String>,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub pull_request: Option<Value>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
/// Public struct `GithubIssueComment` used across Tau components.
pub struct GithubIssueComment {
    pub id: u64,
    pub body: Option<String>,
    #[serde(default)]
    pub html_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
/// Public struct `GithubPullRequest` used across Tau components.
pub struct GithubPullRequest {
    pub number: u64,
    #[serde(default)]
    pub title: String,
    pub body: Option<String>,
    #[serde(default)]
    pub html_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
/// Public struct `GithubReview` used across Tau components.
pub struct GithubReview {
    pub id: u64,
    pub body: Option<String>,
    #[serde(default)]
    pub html_url: String,
}
