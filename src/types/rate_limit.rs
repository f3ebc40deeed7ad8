//! Gateway rate-limit metadata

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request id header set by the gateway.
pub const REQUEST_ID_HEADER: &str = "x-rapidapi-request-id";
/// Generic request id header used by some upstreams.
pub const FALLBACK_REQUEST_ID_HEADER: &str = "x-request-id";
pub const DATE_HEADER: &str = "date";
pub const REMAINING_HEADER: &str = "x-ratelimit-requests-remaining";
pub const RESET_HEADER: &str = "x-ratelimit-requests-reset";
pub const LIMIT_HEADER: &str = "x-ratelimit-requests-limit";

/// Quota counters reported by the gateway on every response.
///
/// Extraction is best effort: missing or malformed headers fall back to
/// empty/zero values instead of failing the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimit {
    pub id: String,
    /// Response date, epoch milliseconds.
    pub date: i64,
    pub remaining: i64,
    pub reset: i64,
    pub limit: i64,
}

impl RateLimit {
    /// Parse rate-limit headers. Lookup is case-insensitive.
    pub fn from_headers(headers: &BTreeMap<String, String>) -> Self {
        Self::from_headers_at(headers, Utc::now().timestamp_millis())
    }

    /// Like [`from_headers`](Self::from_headers) with an explicit fallback date.
    pub fn from_headers_at(headers: &BTreeMap<String, String>, now_ms: i64) -> Self {
        let id = header(headers, REQUEST_ID_HEADER)
            .or_else(|| header(headers, FALLBACK_REQUEST_ID_HEADER))
            .unwrap_or_default()
            .to_string();

        let date = header(headers, DATE_HEADER)
            .and_then(|value| DateTime::parse_from_rfc2822(value.trim()).ok())
            .map(|date| date.timestamp_millis())
            .unwrap_or(now_ms);

        Self {
            id,
            date,
            remaining: integer(headers, REMAINING_HEADER),
            reset: integer(headers, RESET_HEADER),
            limit: integer(headers, LIMIT_HEADER),
        }
    }
}

/// Case-insensitive header lookup.
fn header<'a>(headers: &'a BTreeMap<String, String>, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

fn integer(headers: &BTreeMap<String, String>, name: &str) -> i64 {
    header(headers, name)
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(0)
}
