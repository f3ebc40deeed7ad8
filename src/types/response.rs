//! Response envelope types

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::rate_limit::RateLimit;
use super::request::RequestDescriptor;
use crate::Result;

/// The request as it was dispatched: the descriptor plus the resolved base URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestMetadata {
    #[serde(flatten)]
    pub descriptor: RequestDescriptor,
    pub base_url: String,
}

/// Cache counters at the time the envelope was produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheMetrics {
    pub hits: i64,
    pub misses: i64,
}

/// Everything returned for one request; cached as a unit.
///
/// Envelopes are cached by value: the caller owns the returned copy and
/// mutating it never touches the stored entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub status: u16,
    /// Response body. Non-JSON bodies are kept as a JSON string.
    pub data: Value,
    /// Response headers, names lower-cased.
    pub headers: BTreeMap<String, String>,
    pub duration_ms: u64,
    pub request: RequestMetadata,
    pub from_cache: bool,
    pub cache_metrics: CacheMetrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<RateLimit>,
}

impl ResponseEnvelope {
    /// Deserialize the body into a typed value.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.data.clone())?)
    }

    /// Look up a response header by name, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
