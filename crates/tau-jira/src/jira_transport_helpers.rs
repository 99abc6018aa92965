use std::time::Duration;

use chrono::{DateTime, Utc};

const MAX_RETRY_DELAY_MS: u64 = 30_000;

pub(crate) fn is_retryable_jira_status(status: u16) -> bool {
    status == 429 || status >= 500
}

pub(crate) fn is_retryable_transport_error(error: &reqwest::Error) -> bool {
    error.is_timeout() || error.is_connect() || error.is_request()
}

/// A rejected create may only be replayed when Jira cannot have stored it.
pub(crate) fn is_replayable_create_status(status: u16) -> bool {
    status == 429
}

pub(crate) fn is_replayable_create_transport_error(error: &reqwest::Error) -> bool {
    error.is_connect()
}

/// Reads `Retry-After` as either delay seconds or an HTTP date.
pub(crate) fn parse_retry_after_ms(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    let raw = headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(seconds) = raw.parse::<u64>() {
        return Some(seconds.saturating_mul(1000));
    }

    let retry_at = DateTime::parse_from_rfc2822(raw).ok()?.with_timezone(&Utc);
    let delay_ms = retry_at.signed_duration_since(Utc::now()).num_milliseconds();
    if delay_ms <= 0 {
        return Some(0);
    }
    u64::try_from(delay_ms).ok()
}

pub(crate) fn retry_delay(
    base_delay_ms: u64,
    attempt: usize,
    retry_after_ms: Option<u64>,
) -> Duration {
    let exponent = attempt.saturating_sub(1).min(10) as u32;
    let backoff_ms = base_delay_ms
        .saturating_mul(2_u64.saturating_pow(exponent))
        .min(MAX_RETRY_DELAY_MS);
    let floor_ms = retry_after_ms.unwrap_or(0).min(MAX_RETRY_DELAY_MS);
    Duration::from_millis(backoff_ms.max(floor_ms))
}

pub(crate) fn truncate_for_error(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut truncated = text.chars().take(max_chars).collect::<String>();
    truncated.push_str("...");
    truncated
}
