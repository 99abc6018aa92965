#![no_main]

use std::borrow::Cow;

use libfuzzer_sys::fuzz_target;
use tau_jira_link::{extract_issue_references, insert_issue_links};

const BASE_URL: &str = "https://issues.example.com";

fuzz_target!(|data: &[u8]| {
    let raw = String::from_utf8_lossy(data);
    let (body, title) = raw.split_once('\n').unwrap_or((raw.as_ref(), ""));

    let references = extract_issue_references(body, title);
    for reference in &references {
        let (project, number) = reference.split_once('-').expect("reference has a dash");
        assert!(!project.is_empty() && project.chars().all(|c| c.is_ascii_alphabetic()));
        assert!(!number.is_empty() && number.chars().all(|c| c.is_ascii_digit()));
    }

    let annotated = insert_issue_links(body, &references, BASE_URL);
    if let Cow::Owned(ref rewritten) = annotated {
        assert!(rewritten.contains("/browse/"));
    }
    let again = insert_issue_links(annotated.as_ref(), &references, BASE_URL);
    assert!(
        matches!(again, Cow::Borrowed(_)),
        "annotating annotated text must be a no-op"
    );
});
