//! Request description types

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{RapidApiError, Result};

/// HTTP verbs accepted by the gateway client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "get",
            Method::Post => "post",
            Method::Put => "put",
            Method::Patch => "patch",
            Method::Delete => "delete",
        }
    }

    /// Whether the verb is cached when the request gives no override.
    pub fn is_cacheable_by_default(&self) -> bool {
        matches!(self, Method::Get)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = RapidApiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(Method::Get),
            "post" => Ok(Method::Post),
            "put" => Ok(Method::Put),
            "patch" => Ok(Method::Patch),
            "delete" => Ok(Method::Delete),
            other => Err(RapidApiError::Validation(format!(
                "unsupported method '{other}'"
            ))),
        }
    }
}

/// Description of one outgoing call.
///
/// Built with the chained setters and passed by reference to
/// [`RapidApiClient::request()`](crate::RapidApiClient::request):
///
/// ```rust
/// # use rapidapi_client::RequestDescriptor;
/// # use std::time::Duration;
/// let request = RequestDescriptor::get("/current.json")
///     .param("q", "Boston")
///     .ttl(Duration::from_secs(60));
/// assert!(request.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestDescriptor {
    #[serde(default)]
    pub method: Method,
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<BTreeMap<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    /// Explicit caching override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache: Option<bool>,
    /// Explicit cache key; replaces the derived one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_key: Option<String>,
    /// Entry lifetime in milliseconds. Unset means the store default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl_ms: Option<u64>,
}

impl RequestDescriptor {
    pub fn new(method: Method, uri: impl Into<String>) -> Self {
        Self {
            method,
            uri: uri.into(),
            ..Self::default()
        }
    }

    pub fn get(uri: impl Into<String>) -> Self {
        Self::new(Method::Get, uri)
    }

    pub fn post(uri: impl Into<String>) -> Self {
        Self::new(Method::Post, uri)
    }

    pub fn put(uri: impl Into<String>) -> Self {
        Self::new(Method::Put, uri)
    }

    pub fn patch(uri: impl Into<String>) -> Self {
        Self::new(Method::Patch, uri)
    }

    pub fn delete(uri: impl Into<String>) -> Self {
        Self::new(Method::Delete, uri)
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Add a single query parameter.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn params(mut self, params: BTreeMap<String, Value>) -> Self {
        self.params = Some(params);
        self
    }

    pub fn payload(mut self, payload: impl Into<Value>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    pub fn cache(mut self, enabled: bool) -> Self {
        self.cache = Some(enabled);
        self
    }

    pub fn cache_key(mut self, key: impl Into<String>) -> Self {
        self.cache_key = Some(key.into());
        self
    }

    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl_ms = Some(u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Requested entry lifetime.
    pub fn ttl_duration(&self) -> Option<Duration> {
        self.ttl_ms.map(Duration::from_millis)
    }

    /// Check the descriptor before anything is dispatched.
    pub fn validate(&self) -> Result<()> {
        if self.uri.is_empty() {
            return Err(RapidApiError::Validation("request URI is required".into()));
        }
        if matches!(self.cache_key.as_deref(), Some("")) {
            return Err(RapidApiError::Validation(
                "cache key must not be empty".into(),
            ));
        }
        if self.ttl_ms == Some(0) {
            return Err(RapidApiError::Validation("ttl must be positive".into()));
        }
        Ok(())
    }

    /// Whether this request participates in caching.
    ///
    /// An explicit `cache` flag wins. Otherwise supplying a `cache_key`
    /// opts in. Otherwise only GET is cached.
    pub fn should_cache(&self) -> bool {
        if let Some(enabled) = self.cache {
            return enabled;
        }
        if self.cache_key.is_some() {
            return true;
        }
        self.method.is_cacheable_by_default()
    }
}
