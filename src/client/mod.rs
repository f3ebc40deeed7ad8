//! The caching gateway client.
//!
//! [`RapidApiClient::request()`] composes the pieces of the crate around a
//! single call:
//!
//! 1. validate the [`RequestDescriptor`]
//! 2. decide whether the call is cached ([`RequestDescriptor::should_cache`])
//!    and resolve its key (explicit `cache_key` wins over the derived one)
//! 3. on a cache hit return a copy of the stored envelope; the transport is
//!    never invoked
//! 4. otherwise dispatch through the [`Transport`], build the
//!    [`ResponseEnvelope`] and store it when caching applies
//! 5. normalize any failure into a [`ClientError`]
//!
//! # Concurrency
//!
//! There is no single-flight coordination: two concurrent calls with the
//! same key may both miss, both hit the upstream and both store (last write
//! wins). Backends that need at-most-once fetches per key must provide it
//! themselves.

mod builder;

pub use builder::RapidApiClientBuilder;

use std::sync::Arc;
use std::time::Instant;

use serde_json::{Map, Value};

use crate::cache::{CacheKeyBuilder, CacheStore};
use crate::error::{BoxError, ClientError, RequestContext};
use crate::logging::{EventLogger, LogEvent, LogRecord};
use crate::metrics::{MetricName, MetricsSnapshot, MetricsTracker};
use crate::telemetry;
use crate::transport::{HOST_HEADER, KEY_HEADER, Transport, TransportRequest};
use crate::types::{
    CacheMetrics, ClientIdentity, Method, RateLimit, RequestDescriptor, RequestMetadata,
    ResponseEnvelope,
};
use crate::Result;

/// Client for one RapidAPI host.
///
/// Cheap to share behind an `Arc`; every collaborator is itself shared.
pub struct RapidApiClient {
    identity: ClientIdentity,
    base_url: String,
    keys: CacheKeyBuilder,
    transport: Arc<dyn Transport>,
    logger: Arc<dyn EventLogger>,
    cache: Arc<dyn CacheStore>,
    metrics: Arc<dyn MetricsTracker>,
}

impl RapidApiClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> RapidApiClientBuilder {
        RapidApiClientBuilder::new()
    }

    pub fn identity(&self) -> &ClientIdentity {
        &self.identity
    }

    /// Base URL every relative URI is resolved against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn metrics(&self) -> &dyn MetricsTracker {
        self.metrics.as_ref()
    }

    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn cache(&self) -> &dyn CacheStore {
        self.cache.as_ref()
    }

    /// The key `descriptor` is (or would be) cached under.
    pub fn cache_key_for(&self, descriptor: &RequestDescriptor) -> String {
        descriptor
            .cache_key
            .clone()
            .unwrap_or_else(|| self.keys.build_key(descriptor, &self.base_url))
    }

    /// Drop the cached response for `descriptor`. Returns whether one existed.
    pub async fn evict(&self, descriptor: &RequestDescriptor) -> Result<bool> {
        self.cache.delete(&self.cache_key_for(descriptor)).await
    }

    /// Perform a request, serving it from cache when allowed.
    ///
    /// Fails with [`RapidApiError::Validation`](crate::RapidApiError::Validation)
    /// before anything is dispatched if the descriptor is malformed; every
    /// later failure is a [`RapidApiError::Client`](crate::RapidApiError::Client).
    /// A failed request never populates the cache.
    pub async fn request(&self, descriptor: &RequestDescriptor) -> Result<ResponseEnvelope> {
        descriptor.validate()?;

        let metadata = RequestMetadata {
            descriptor: descriptor.clone(),
            base_url: self.base_url.clone(),
        };
        let fields = request_fields(&metadata);
        self.log(LogEvent::RequestStart, fields.clone());
        self.metrics.record_requests_total();

        let started = Instant::now();
        match self.cached_or_fetch(descriptor, metadata, &fields).await {
            Ok(envelope) => {
                self.metrics.record_requests_succeed();
                self.emit_request(descriptor.method, "ok");
                Ok(envelope)
            }
            Err(error) => {
                self.metrics.record_requests_failed();
                self.emit_request(descriptor.method, "error");

                let mut failure = fields;
                failure.insert("duration_ms".into(), elapsed_ms(started).into());
                failure.insert("error".into(), error.to_string().into());
                self.log(LogEvent::RequestFailure, failure);

                let context = RequestContext::new(descriptor.method, descriptor.uri.clone());
                Err(ClientError::normalize(error, &context).into())
            }
        }
    }

    async fn cached_or_fetch(
        &self,
        descriptor: &RequestDescriptor,
        metadata: RequestMetadata,
        fields: &Map<String, Value>,
    ) -> std::result::Result<ResponseEnvelope, BoxError> {
        let cache_key = descriptor
            .should_cache()
            .then(|| self.cache_key_for(descriptor));

        match &cache_key {
            Some(key) => {
                if let Some(cached) = self.cache.get(key).await? {
                    self.metrics.record_cache_hit();
                    ::metrics::counter!(telemetry::CACHE_HITS_TOTAL, "host" => self.host_label())
                        .increment(1);
                    self.log(LogEvent::CacheHit, with_field(fields, "cache_key", key.as_str()));
                    return Ok(ResponseEnvelope {
                        from_cache: true,
                        cache_metrics: self.cache_metrics(),
                        ..cached
                    });
                }

                self.metrics.record_cache_miss();
                ::metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "host" => self.host_label())
                    .increment(1);
                self.log(LogEvent::CacheMiss, with_field(fields, "cache_key", key.as_str()));
            }
            None => self.log(LogEvent::CacheSkip, fields.clone()),
        }

        let started = Instant::now();
        let response = self
            .transport
            .execute(self.transport_request(descriptor))
            .await?;
        let elapsed = started.elapsed();
        ::metrics::histogram!(
            telemetry::REQUEST_DURATION_SECONDS,
            "host" => self.host_label(),
            "method" => descriptor.method.as_str()
        )
        .record(elapsed.as_secs_f64());

        let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        let envelope = ResponseEnvelope {
            status: response.status,
            rate_limit: Some(RateLimit::from_headers(&response.headers)),
            data: response.body,
            headers: response.headers,
            duration_ms,
            request: metadata,
            from_cache: false,
            cache_metrics: self.cache_metrics(),
        };

        let mut success = fields.clone();
        success.insert("status".into(), envelope.status.into());
        success.insert("duration_ms".into(), duration_ms.into());
        self.log(LogEvent::RequestSuccess, success);

        if let Some(key) = cache_key {
            self.cache
                .set(&key, envelope.clone(), descriptor.ttl_duration())
                .await?;

            let mut stored = with_field(fields, "cache_key", key.as_str());
            stored.insert("ttl_ms".into(), descriptor.ttl_ms.into());
            self.log(LogEvent::CacheStore, stored);
        }

        Ok(envelope)
    }

    fn transport_request(&self, descriptor: &RequestDescriptor) -> TransportRequest {
        TransportRequest {
            method: descriptor.method,
            url: descriptor.uri.clone(),
            base_url: self.base_url.clone(),
            params: descriptor.params.clone(),
            body: descriptor.payload.clone().filter(|payload| !payload.is_null()),
            headers: [
                (HOST_HEADER.to_string(), self.identity.host().to_string()),
                (KEY_HEADER.to_string(), self.identity.api_key().to_string()),
                ("content-type".to_string(), "application/json".to_string()),
            ]
            .into_iter()
            .collect(),
        }
    }

    fn cache_metrics(&self) -> CacheMetrics {
        CacheMetrics {
            hits: self.metrics.get(MetricName::CacheHit),
            misses: self.metrics.get(MetricName::CacheMiss),
        }
    }

    fn log(&self, event: LogEvent, fields: Map<String, Value>) {
        self.logger.log(&LogRecord::new(event, fields));
    }

    fn host_label(&self) -> String {
        self.identity.host().to_string()
    }

    fn emit_request(&self, method: Method, status: &'static str) {
        ::metrics::counter!(
            telemetry::REQUESTS_TOTAL,
            "host" => self.host_label(),
            "method" => method.as_str(),
            "status" => status
        )
        .increment(1);
    }
}

impl std::fmt::Debug for RapidApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RapidApiClient")
            .field("identity", &self.identity)
            .field("base_url", &self.base_url)
            .field("transport", &self.transport.name())
            .field("cache", &self.cache.name())
            .finish()
    }
}

/// Log fields describing the request: the descriptor plus the base URL.
fn request_fields(metadata: &RequestMetadata) -> Map<String, Value> {
    match serde_json::to_value(metadata) {
        Ok(Value::Object(fields)) => fields,
        _ => Map::new(),
    }
}

fn with_field(fields: &Map<String, Value>, name: &str, value: &str) -> Map<String, Value> {
    let mut fields = fields.clone();
    fields.insert(name.to_string(), Value::from(value));
    fields
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
