//! Error types and failure normalization.
//!
//! Every failure surfaced by [`RapidApiClient::request()`](crate::RapidApiClient::request)
//! after validation is a [`ClientError`]. Callers branch on
//! [`ClientError::status()`] rather than on error subtypes: a status means
//! the upstream answered with a failure, no status means the call never
//! produced a response (network error, timeout, cache backend failure).

use serde_json::Value;

use crate::transport::TransportError;
use crate::types::Method;

/// Boxed error used as the cause of a [`ClientError`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Message used when the failure did not come from the transport.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "unexpected client error";

/// Client error types
#[derive(Debug, thiserror::Error)]
pub enum RapidApiError {
    /// Malformed request descriptor or construction parameters.
    #[error("validation error: {0}")]
    Validation(String),

    /// Request failed after dispatch (with or without an upstream response).
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("configuration error: {0}")]
    Configuration(String),

    /// Cache backend failure.
    #[error("cache error: {0}")]
    Cache(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RapidApiError {
    /// Upstream status code, when the error carries a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            RapidApiError::Client(err) => err.status(),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, RapidApiError::Validation(_))
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, RapidApiError>;

/// Where a failed request was headed; attached to every [`ClientError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub method: Method,
    pub url: String,
}

impl RequestContext {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
        }
    }
}

/// A request that failed after it was dispatched.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ClientError {
    message: String,
    status: Option<u16>,
    method: Method,
    url: String,
    data: Option<Value>,
    source: Option<BoxError>,
}

impl ClientError {
    /// Create an error without a response attached.
    pub fn new(message: impl Into<String>, context: &RequestContext) -> Self {
        Self {
            message: message.into(),
            status: None,
            method: context.method,
            url: context.url.clone(),
            data: None,
            source: None,
        }
    }

    /// Attach the upstream status and response body.
    pub fn with_response(mut self, status: u16, data: Value) -> Self {
        self.status = Some(status);
        self.data = Some(data);
        self
    }

    /// Attach the original failure as the cause.
    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Map an arbitrary failure into the client taxonomy.
    ///
    /// A [`TransportError`] that carries a response becomes
    /// `"request failed with status {status}"` with the status and body
    /// attached. A transport error without a response keeps its own message.
    /// Anything else gets [`UNEXPECTED_ERROR_MESSAGE`]. The original error is
    /// always kept as the source.
    pub fn normalize(error: impl Into<BoxError>, context: &RequestContext) -> Self {
        let error = error.into();
        match error.downcast::<TransportError>() {
            Ok(transport) => {
                let transport = *transport;
                let received = transport.response().map(|r| (r.status, r.body.clone()));
                match received {
                    Some((status, data)) => {
                        Self::new(format!("request failed with status {status}"), context)
                            .with_response(status, data)
                            .with_source(transport)
                    }
                    None => Self::new(transport.to_string(), context).with_source(transport),
                }
            }
            Err(other) => Self::new(UNEXPECTED_ERROR_MESSAGE, context).with_source(other),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Upstream status code; `None` when no response was received.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Upstream response body, when a response was received.
    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// Whether the upstream answered at all.
    pub fn has_response(&self) -> bool {
        self.status.is_some()
    }
}
