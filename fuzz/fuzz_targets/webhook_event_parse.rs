#![no_main]

use libfuzzer_sys::fuzz_target;
use tau_github_issues::discussion_event_from_webhook;

const EVENT_NAMES: [&str; 5] = [
    "issue_comment",
    "issues",
    "pull_request",
    "pull_request_review",
    "push",
];

fuzz_target!(|data: &[u8]| {
    let Some((selector, rest)) = data.split_first() else {
        return;
    };
    let Ok(payload) = serde_json::from_slice::<serde_json::Value>(rest) else {
        return;
    };
    let event_name = EVENT_NAMES[usize::from(*selector) % EVENT_NAMES.len()];

    if let Ok(Some(event)) = discussion_event_from_webhook(event_name, &payload) {
        assert!(!event.repo.full_name().is_empty());
    }
});
