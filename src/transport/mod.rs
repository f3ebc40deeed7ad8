//! Transport seam.
//!
//! The client never talks to the network itself: it resolves a
//! [`TransportRequest`] and hands it to a [`Transport`]. The default
//! [`ReqwestTransport`] issues real HTTP calls; tests and alternative
//! stacks inject their own implementation through the builder.
//!
//! # Failure contract
//!
//! A transport must distinguish "the upstream answered with a failure"
//! from "no answer at all". The former is a [`TransportError`] carrying a
//! [`TransportResponse`] (non-2xx status), the latter carries none
//! (connection refused, DNS, timeout). Error normalization relies on it.

mod http;

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::BoxError;
use crate::logging::REDACTED;
use crate::types::Method;

pub use http::ReqwestTransport;

/// Header carrying the gateway host.
pub const HOST_HEADER: &str = "x-rapidapi-host";
/// Header carrying the API key.
pub const KEY_HEADER: &str = "x-rapidapi-key";

/// Fully resolved request handed to the transport.
#[derive(Clone, PartialEq)]
pub struct TransportRequest {
    pub method: Method,
    /// Request URI, relative to `base_url` unless absolute.
    pub url: String,
    pub base_url: String,
    pub params: Option<BTreeMap<String, Value>>,
    pub body: Option<Value>,
    /// Authentication and content headers.
    pub headers: BTreeMap<String, String>,
}

impl TransportRequest {
    /// Absolute URL: `url` if it already is one, otherwise `base_url` + `url`.
    pub fn full_url(&self) -> String {
        if self.url.starts_with("http://") || self.url.starts_with("https://") {
            return self.url.clone();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.url.trim_start_matches('/')
        )
    }

    /// Query parameters flattened to string pairs.
    ///
    /// Strings are sent verbatim, nulls are dropped, arrays repeat the name
    /// once per element, anything else is JSON-encoded.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for (name, value) in self.params.iter().flatten() {
            match value {
                Value::Null => {}
                Value::Array(items) => {
                    for item in items {
                        if let Some(text) = query_value(item) {
                            pairs.push((name.clone(), text));
                        }
                    }
                }
                other => {
                    if let Some(text) = query_value(other) {
                        pairs.push((name.clone(), text));
                    }
                }
            }
        }
        pairs
    }
}

fn query_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

impl fmt::Debug for TransportRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: BTreeMap<&str, &str> = self
            .headers
            .iter()
            .map(|(name, value)| {
                if name.eq_ignore_ascii_case(KEY_HEADER) {
                    (name.as_str(), REDACTED)
                } else {
                    (name.as_str(), value.as_str())
                }
            })
            .collect();
        f.debug_struct("TransportRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("base_url", &self.base_url)
            .field("params", &self.params)
            .field("body", &self.body)
            .field("headers", &headers)
            .finish()
    }
}

/// What the upstream sent back.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    /// Header names lower-cased.
    pub headers: BTreeMap<String, String>,
    /// JSON body; non-JSON bodies arrive as a JSON string, empty ones as null.
    pub body: Value,
}

/// Transport failure, with the upstream response when there was one.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
    response: Option<TransportResponse>,
    source: Option<BoxError>,
}

impl TransportError {
    /// Failure without a response (network error, timeout).
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            response: None,
            source: None,
        }
    }

    /// The upstream answered with a failure status.
    pub fn with_response(message: impl Into<String>, response: TransportResponse) -> Self {
        Self {
            message: message.into(),
            response: Some(response),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn response(&self) -> Option<&TransportResponse> {
        self.response.as_ref()
    }
}

/// Executes resolved requests.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Transport name for logging/debugging.
    fn name(&self) -> &str;

    /// Perform the call. Non-2xx answers are errors carrying the response.
    async fn execute(
        &self,
        request: TransportRequest,
    ) -> std::result::Result<TransportResponse, TransportError>;
}
