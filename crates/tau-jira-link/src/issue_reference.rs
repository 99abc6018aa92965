use std::sync::OnceLock;

use regex::Regex;

const ISSUE_REFERENCE_PATTERN: &str = r"(?-u:\b)[a-zA-Z]+-[0-9]+(?-u:\b)";

fn issue_reference_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(ISSUE_REFERENCE_PATTERN).expect("valid issue reference regex")
    })
}

/// Collects candidate issue keys from the body, then from the title.
///
/// Duplicates are kept and document order is preserved.
pub fn extract_issue_references(body: &str, title: &str) -> Vec<String> {
    let regex = issue_reference_regex();
    regex
        .find_iter(body)
        .chain(regex.find_iter(title))
        .map(|candidate| candidate.as_str().to_string())
        .collect()
}
