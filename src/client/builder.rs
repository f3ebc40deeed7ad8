//! Builder for configuring client instances

use std::sync::Arc;
use std::time::Duration;

use super::RapidApiClient;
use crate::cache::{CacheConfig, CacheKeyBuilder, CacheStore, MokaCacheStore};
use crate::logging::{EventLogger, TracingLogger};
use crate::metrics::{InMemoryMetricsTracker, MetricsTracker};
use crate::transport::{ReqwestTransport, Transport};
use crate::types::ClientIdentity;
use crate::{RapidApiError, Result};

/// Builder for [`RapidApiClient`].
///
/// Host and API key are required. Every collaborator is optional and
/// defaults to the in-crate implementation: [`ReqwestTransport`],
/// [`TracingLogger`], [`MokaCacheStore`] and [`InMemoryMetricsTracker`].
///
/// ```rust,no_run
/// # use rapidapi_client::RapidApiClient;
/// # fn main() -> rapidapi_client::Result<()> {
/// let client = RapidApiClient::builder()
///     .host("weatherapi-com.p.rapidapi.com")
///     .api_key("your-key")
///     .build()?;
/// assert_eq!(client.base_url(), "https://weatherapi-com.p.rapidapi.com");
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct RapidApiClientBuilder {
    host: Option<String>,
    api_key: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    cache_config: CacheConfig,
    transport: Option<Arc<dyn Transport>>,
    logger: Option<Arc<dyn EventLogger>>,
    cache: Option<Arc<dyn CacheStore>>,
    metrics: Option<Arc<dyn MetricsTracker>>,
}

impl RapidApiClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gateway host, sent as `X-RapidAPI-Host`.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// API key, sent as `X-RapidAPI-Key`.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Override the base URL (default: `https://{host}`).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Timeout for the default transport. Ignored with a custom transport.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Configure the default in-memory cache. Ignored with a custom cache.
    pub fn cache_config(mut self, config: CacheConfig) -> Self {
        self.cache_config = config;
        self
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn logger(mut self, logger: Arc<dyn EventLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn cache(mut self, cache: Arc<dyn CacheStore>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn metrics(mut self, metrics: Arc<dyn MetricsTracker>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Validate the parameters and build the client.
    pub fn build(self) -> Result<RapidApiClient> {
        let host = required(self.host, "RapidAPI host is required")?;
        let api_key = required(self.api_key, "RapidAPI key is required")?;

        let base_url = match self.base_url {
            Some(url) => {
                reqwest::Url::parse(&url).map_err(|e| {
                    RapidApiError::Validation(format!("base URL must be a valid URL: {e}"))
                })?;
                url
            }
            None => format!("https://{host}"),
        };

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(match self.timeout {
                Some(timeout) => ReqwestTransport::with_timeout(timeout)?,
                None => ReqwestTransport::new()?,
            }),
        };

        let identity = ClientIdentity::new(host, api_key);
        let keys = CacheKeyBuilder::for_identity(&identity);

        Ok(RapidApiClient {
            keys,
            base_url,
            transport,
            logger: self.logger.unwrap_or_else(|| Arc::new(TracingLogger)),
            cache: self
                .cache
                .unwrap_or_else(|| Arc::new(MokaCacheStore::new(&self.cache_config))),
            metrics: self
                .metrics
                .unwrap_or_else(|| Arc::new(InMemoryMetricsTracker::new())),
            identity,
        })
    }
}

fn required(value: Option<String>, message: &str) -> Result<String> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(RapidApiError::Validation(message.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_host_is_rejected() {
        let err = RapidApiClientBuilder::new().api_key("k").build().unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("host"));
    }

    #[test]
    fn blank_key_is_rejected() {
        let err = RapidApiClientBuilder::new()
            .host("h")
            .api_key("  ")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("key"));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = RapidApiClientBuilder::new()
            .host("h")
            .api_key("k")
            .base_url("not a url")
            .build()
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn base_url_defaults_to_host() {
        let client = RapidApiClientBuilder::new()
            .host("weather.p.rapidapi.com")
            .api_key("k")
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "https://weather.p.rapidapi.com");
    }

    #[test]
    fn explicit_base_url_is_kept() {
        let client = RapidApiClientBuilder::new()
            .host("h")
            .api_key("k")
            .base_url("https://example.com")
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "https://example.com");
    }

    #[test]
    fn debug_hides_key() {
        let client = RapidApiClientBuilder::new()
            .host("h")
            .api_key("top-secret")
            .build()
            .unwrap();
        assert!(!format!("{client:?}").contains("top-secret"));
    }
}
