use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Public struct `TrackerIssue` used across Tau components.
pub struct TrackerIssue {
    pub id: String,
    pub key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Public struct `RemoteLinkIcon` used across Tau components.
pub struct RemoteLinkIcon {
    #[serde(rename = "url16x16", default, skip_serializing_if = "Option::is_none")]
    pub url_16x16: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Public struct `RemoteLinkObject` used across Tau components.
pub struct RemoteLinkObject {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<RemoteLinkIcon>,
}

/// A tracker-side pointer from an issue to an external URL.
///
/// Mirrors the Jira remote link wire shape. Only `object` is populated when
/// creating links; the other fields are filled in by the tracker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteLink {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,
    #[serde(default)]
    pub object: RemoteLinkObject,
}

impl RemoteLink {
    pub fn target_url(&self) -> &str {
        &self.object.url
    }
}
