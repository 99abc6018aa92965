use std::borrow::Cow;

/// Wraps tokens that mention a validated issue key in a tracker browse link.
///
/// A token starting with `[` counts as already linked and is left alone. This
/// is an approximation: broken or partial markdown links are not repaired.
/// When any token is rewritten the text is re-joined with single spaces, so
/// tabs, newlines, and repeated spaces collapse. When nothing is rewritten
/// the input is returned borrowed and untouched.
pub fn insert_issue_links<'a, S>(text: &'a str, validated: &[S], base_url: &str) -> Cow<'a, str>
where
    S: AsRef<str>,
{
    let mut did_replace = false;
    let words = text
        .split_whitespace()
        .map(|word| {
            if word.starts_with('[') || !mentions_any(word, validated) {
                return Cow::Borrowed(word);
            }
            did_replace = true;
            Cow::Owned(format!("[{word}]({base_url}/browse/{word})"))
        })
        .collect::<Vec<_>>();

    if !did_replace {
        return Cow::Borrowed(text);
    }
    Cow::Owned(words.join(" "))
}

fn mentions_any<S: AsRef<str>>(word: &str, validated: &[S]) -> bool {
    validated
        .iter()
        .any(|issue_id| word.contains(issue_id.as_ref()))
}
