//! rapidapi-client - caching, metrics-instrumented client for RapidAPI
//!
//! A facade over a single RapidAPI host: every call is authenticated with
//! the `X-RapidAPI-Host` / `X-RapidAPI-Key` headers, idempotent reads are
//! cached by a deterministic request key, and each client instance keeps
//! its own hit/miss and request-outcome counters.
//!
//! # Example
//!
//! ```rust,no_run
//! use rapidapi_client::{RapidApiClient, RequestDescriptor};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> rapidapi_client::Result<()> {
//!     let client = RapidApiClient::builder()
//!         .host("weatherapi-com.p.rapidapi.com")
//!         .api_key("your-key")
//!         .build()?;
//!
//!     let request = RequestDescriptor::get("/current.json")
//!         .param("q", "Boston")
//!         .ttl(Duration::from_secs(300));
//!
//!     let first = client.request(&request).await?;
//!     let second = client.request(&request).await?;
//!     assert!(!first.from_cache);
//!     assert!(second.from_cache);
//!
//!     println!("{} requests remaining", second.rate_limit.unwrap_or_default().remaining);
//!     Ok(())
//! }
//! ```
//!
//! # Caching rules
//!
//! - an explicit `cache(bool)` always wins
//! - otherwise supplying a `cache_key` opts in
//! - otherwise only GET is cached
//!
//! A cache hit never reaches the transport, and failed requests never
//! populate the cache.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod telemetry;
pub mod transport;
pub mod types;
mod version;

// Re-export main types at crate root
pub use client::{RapidApiClient, RapidApiClientBuilder};
pub use error::{ClientError, RapidApiError, Result};
pub use metrics::{InMemoryMetricsTracker, MetricName, MetricsSnapshot, MetricsTracker};
pub use types::{
    CacheMetrics, ClientIdentity, Method, RateLimit, RequestDescriptor, RequestMetadata,
    ResponseEnvelope,
};
pub use version::{BUILD_TIMESTAMP, PKG_VERSION, TARGET_TRIPLE, version_string};
