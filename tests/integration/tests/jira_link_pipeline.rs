use std::sync::Arc;

use httpmock::prelude::*;
use serde_json::{json, Value};
use tau_github_issues::{discussion_event_from_webhook, GithubApiClient, GithubClientConfig};
use tau_jira::{JiraApiClient, JiraAuth, JiraClientConfig};
use tau_jira_link::{
    AnnotationOutcome, BackLinkStatus, DiscussionClient, JiraLinker, LinkRunStatus, TrackerClient,
};

struct Harness {
    github: MockServer,
    jira: MockServer,
}

impl Harness {
    fn start() -> Self {
        Self {
            github: MockServer::start(),
            jira: MockServer::start(),
        }
    }

    fn linker(&self) -> JiraLinker {
        let tracker = JiraApiClient::new(JiraClientConfig {
            base_url: self.jira.base_url(),
            auth: JiraAuth::Basic {
                username: "bot".to_string(),
                password: "secret".to_string(),
            },
            request_timeout_ms: 5_000,
            retry_max_attempts: 2,
            retry_base_delay_ms: 5,
        })
        .expect("jira client");
        let discussion = GithubApiClient::new(GithubClientConfig {
            api_base: self.github.base_url(),
            token: "ghp_test".to_string(),
            request_timeout_ms: 5_000,
            retry_max_attempts: 2,
            retry_base_delay_ms: 5,
        })
        .expect("github client");
        JiraLinker::new(
            Arc::new(tracker) as Arc<dyn TrackerClient>,
            Arc::new(discussion) as Arc<dyn DiscussionClient>,
        )
    }

    fn browse(&self, key: &str) -> String {
        format!("[{key}]({}/browse/{key})", self.jira.base_url())
    }
}

fn repository() -> Value {
    json!({ "name": "repo", "full_name": "owner/repo", "owner": { "login": "owner" } })
}

fn comment_webhook(body: &str) -> Value {
    json!({
        "action": "created",
        "issue": {
            "number": 42,
            "title": "Improve linker",
            "body": "",
            "html_url": "https://github.com/owner/repo/pull/42",
            "pull_request": { "url": "https://api.github.com/repos/owner/repo/pulls/42" }
        },
        "comment": {
            "id": 77,
            "body": body,
            "html_url": "https://github.com/owner/repo/pull/42#issuecomment-77"
        },
        "repository": repository()
    })
}

#[tokio::test]
async fn integration_comment_webhook_links_validated_issues_both_ways() {
    let harness = Harness::start();
    let abc = harness.jira.mock(|when, then| {
        when.method(GET)
            .path("/rest/api/2/issue/ABC-123")
            .header("authorization", "Basic Ym90OnNlY3JldA==");
        then.status(200)
            .json_body(json!({ "id": "10001", "key": "ABC-123" }));
    });
    let xyz = harness.jira.mock(|when, then| {
        when.method(GET).path("/rest/api/2/issue/XYZ-9");
        then.status(200)
            .json_body(json!({ "id": "10002", "key": "XYZ-9" }));
    });
    let missing = harness.jira.mock(|when, then| {
        when.method(GET).path("/rest/api/2/issue/QWE-1");
        then.status(404)
            .json_body(json!({ "errorMessages": ["Issue does not exist"] }));
    });
    let abc_links = harness.jira.mock(|when, then| {
        when.method(GET).path("/rest/api/2/issue/ABC-123/remotelink");
        then.status(200).json_body(json!([]));
    });
    let xyz_links = harness.jira.mock(|when, then| {
        when.method(GET).path("/rest/api/2/issue/XYZ-9/remotelink");
        then.status(200).json_body(json!([]));
    });
    let expected_link = json!({
        "globalId": "https://github.com/owner/repo/pull/42",
        "object": {
            "url": "https://github.com/owner/repo/pull/42",
            "title": "owner/repo#42: Improve linker",
            "icon": {
                "url16x16": "https://github.com/favicon.ico",
                "title": "GitHub"
            }
        }
    });
    let abc_create = harness.jira.mock(|when, then| {
        when.method(POST)
            .path("/rest/api/2/issue/ABC-123/remotelink")
            .json_body(expected_link.clone());
        then.status(201).json_body(json!({ "id": 1 }));
    });
    let xyz_create = harness.jira.mock(|when, then| {
        when.method(POST)
            .path("/rest/api/2/issue/XYZ-9/remotelink")
            .json_body(expected_link.clone());
        then.status(201).json_body(json!({ "id": 2 }));
    });
    let expected_body = format!(
        "Fixes {} and see {} but not QWE-1",
        harness.browse("ABC-123"),
        harness.browse("XYZ-9")
    );
    let edit = harness.github.mock(|when, then| {
        when.method(PATCH)
            .path("/repos/owner/repo/issues/comments/77")
            .header("authorization", "Bearer ghp_test")
            .json_body(json!({ "body": expected_body }));
        then.status(200)
            .json_body(json!({ "id": 77, "body": expected_body }));
    });

    let event = discussion_event_from_webhook(
        "issue_comment",
        &comment_webhook("Fixes ABC-123 and see XYZ-9 but not QWE-1"),
    )
    .expect("parse")
    .expect("event");
    let report = harness.linker().handle_event(&event).await;

    assert_eq!(report.status, LinkRunStatus::Processed);
    assert_eq!(report.validated, vec!["ABC-123", "XYZ-9"]);
    assert_eq!(report.not_found, vec!["QWE-1"]);
    assert_eq!(report.annotation, AnnotationOutcome::CommentEdited);
    assert_eq!(report.failure_count(), 0);
    assert!(report
        .back_links
        .iter()
        .all(|link| link.status == BackLinkStatus::Created));
    abc.assert_calls(1);
    xyz.assert_calls(1);
    missing.assert_calls(1);
    abc_links.assert_calls(1);
    xyz_links.assert_calls(1);
    abc_create.assert_calls(1);
    xyz_create.assert_calls(1);
    edit.assert_calls(1);
}

#[tokio::test]
async fn integration_pull_request_edit_skips_existing_links_and_linked_body() {
    let harness = Harness::start();
    let linked_body = format!("Implements {}", harness.browse("ABC-1"));
    let _issue = harness.jira.mock(|when, then| {
        when.method(GET).path("/rest/api/2/issue/ABC-1");
        then.status(200)
            .json_body(json!({ "id": "1", "key": "ABC-1" }));
    });
    let _links = harness.jira.mock(|when, then| {
        when.method(GET).path("/rest/api/2/issue/ABC-1/remotelink");
        then.status(200).json_body(json!([{
            "id": 5,
            "object": { "url": "https://github.com/owner/repo/pull/8", "title": "existing" }
        }]));
    });
    let create = harness.jira.mock(|when, then| {
        when.method(POST).path("/rest/api/2/issue/ABC-1/remotelink");
        then.status(201).json_body(json!({ "id": 6 }));
    });
    let thread = harness.github.mock(|when, then| {
        when.method(GET).path("/repos/owner/repo/issues/8");
        then.status(200)
            .json_body(json!({ "number": 8, "title": "Wire ABC-1", "body": linked_body }));
    });
    let edit = harness.github.mock(|when, then| {
        when.method(PATCH).path("/repos/owner/repo/issues/8");
        then.status(200).json_body(json!({ "number": 8 }));
    });

    let payload = json!({
        "action": "edited",
        "pull_request": {
            "number": 8,
            "title": "Wire ABC-1",
            "body": linked_body,
            "html_url": "https://github.com/owner/repo/pull/8"
        },
        "repository": repository()
    });
    let event = discussion_event_from_webhook("pull_request", &payload)
        .expect("parse")
        .expect("event");
    let report = harness.linker().handle_event(&event).await;

    assert_eq!(report.status, LinkRunStatus::Processed);
    assert_eq!(report.annotation, AnnotationOutcome::Unchanged);
    assert_eq!(report.back_links.len(), 1);
    assert_eq!(report.back_links[0].status, BackLinkStatus::AlreadyLinked);
    create.assert_calls(0);
    thread.assert_calls(0);
    edit.assert_calls(0);
}

#[tokio::test]
async fn integration_review_event_annotates_thread_body_and_reports_jira_outage() {
    let harness = Harness::start();
    let _issue = harness.jira.mock(|when, then| {
        when.method(GET).path("/rest/api/2/issue/ABC-7");
        then.status(200)
            .json_body(json!({ "id": "7", "key": "ABC-7" }));
    });
    let outage = harness.jira.mock(|when, then| {
        when.method(GET).path("/rest/api/2/issue/ABC-7/remotelink");
        then.status(503).body("maintenance");
    });
    let thread = harness.github.mock(|when, then| {
        when.method(GET).path("/repos/owner/repo/issues/5");
        then.status(200)
            .json_body(json!({ "number": 5, "title": "Review me", "body": "Part of ABC-7" }));
    });
    let expected_body = format!("Part of {}", harness.browse("ABC-7"));
    let edit = harness.github.mock(|when, then| {
        when.method(PATCH)
            .path("/repos/owner/repo/issues/5")
            .json_body(json!({ "body": expected_body }));
        then.status(200).json_body(json!({ "number": 5 }));
    });

    let payload = json!({
        "action": "submitted",
        "review": {
            "id": 900,
            "body": "Looks right for ABC-7",
            "html_url": "https://github.com/owner/repo/pull/5#pullrequestreview-900"
        },
        "pull_request": {
            "number": 5,
            "title": "Review me",
            "body": "Part of ABC-7",
            "html_url": "https://github.com/owner/repo/pull/5"
        },
        "repository": repository()
    });
    let event = discussion_event_from_webhook("pull_request_review", &payload)
        .expect("parse")
        .expect("event");
    let report = harness.linker().handle_event(&event).await;

    assert_eq!(report.annotation, AnnotationOutcome::ThreadBodyEdited);
    assert_eq!(report.failure_count(), 1);
    assert!(report.back_links[0].is_failure());
    outage.assert_calls(2);
    thread.assert_calls(1);
    edit.assert_calls(1);
}
