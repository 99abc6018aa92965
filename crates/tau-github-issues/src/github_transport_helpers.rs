use std::time::Duration;

use reqwest::header::{HeaderMap, RETRY_AFTER};

const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

pub(crate) fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let raw = headers.get(RETRY_AFTER)?.to_str().ok()?;
    let seconds = raw.trim().parse::<u64>().ok()?;
    Some(Duration::from_secs(seconds))
}

/// GitHub signals primary rate limits with 403 and an exhausted quota header.
pub(crate) fn is_rate_limited(status: u16, headers: &HeaderMap) -> bool {
    if status == 429 {
        return true;
    }
    status == 403
        && headers
            .get("x-ratelimit-remaining")
            .and_then(|value| value.to_str().ok())
            .is_some_and(|remaining| remaining.trim() == "0")
}

pub(crate) fn is_retryable_github_response(status: u16, headers: &HeaderMap) -> bool {
    status >= 500 || is_rate_limited(status, headers)
}

pub(crate) fn is_retryable_transport_error(error: &reqwest::Error) -> bool {
    error.is_timeout() || error.is_connect() || error.is_request()
}

pub(crate) fn retry_delay(
    base_delay_ms: u64,
    attempt: usize,
    retry_after: Option<Duration>,
) -> Duration {
    if let Some(delay) = retry_after {
        return delay
            .max(Duration::from_millis(base_delay_ms))
            .min(MAX_RETRY_DELAY);
    }
    let exponent = attempt.saturating_sub(1).min(10) as u32;
    let scaled = base_delay_ms.saturating_mul(2_u64.saturating_pow(exponent));
    Duration::from_millis(scaled).min(MAX_RETRY_DELAY)
}

pub(crate) fn truncate_for_error(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut truncated = text.chars().take(max_chars).collect::<String>();
    truncated.push_str("...");
    truncated
}
