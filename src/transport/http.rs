//! reqwest-backed transport.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::{Transport, TransportError, TransportRequest, TransportResponse};
use crate::types::Method;
use crate::{RapidApiError, Result};

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP transport over a shared [`reqwest::Client`].
#[derive(Clone)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    /// Transport with the default 30s timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(crate::version::user_agent())
            .build()
            .map_err(|e| {
                RapidApiError::Configuration(format!("failed to build HTTP client: {e}"))
            })?;
        Ok(Self { http })
    }

    /// Wrap an existing client (shared connection pool, custom TLS, proxies).
    pub fn with_client(http: Client) -> Self {
        Self { http }
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

/// Decode a body: JSON when it parses, a JSON string otherwise, null when empty.
fn decode_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

#[async_trait]
impl Transport for ReqwestTransport {
    fn name(&self) -> &str {
        "reqwest"
    }

    async fn execute(
        &self,
        request: TransportRequest,
    ) -> std::result::Result<TransportResponse, TransportError> {
        let url = request.full_url();
        debug!(method = %request.method, %url, "dispatching request");

        let mut builder = self
            .http
            .request(to_reqwest_method(request.method), &url)
            .query(&request.query_pairs());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::new(e.to_string()).with_source(e))?;

        let status = response.status();
        let headers: BTreeMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_ascii_lowercase(), value.to_string()))
            })
            .collect();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| TransportError::new(e.to_string()).with_source(e))?;

        let received = TransportResponse {
            status: status.as_u16(),
            headers,
            body: decode_body(&bytes),
        };

        if status.is_success() {
            Ok(received)
        } else {
            Err(TransportError::with_response(
                format!("upstream responded with status {}", status.as_u16()),
                received,
            ))
        }
    }
}
