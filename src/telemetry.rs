//! Telemetry metric name constants.
//!
//! Metric names emitted through the `metrics` facade. Consumers install
//! their own recorder (e.g. prometheus, statsd); without a recorder
//! installed, all metric calls are no-ops. These mirror the per-client
//! counters in [`MetricsTracker`](crate::metrics::MetricsTracker) but are
//! process-wide.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `rapidapi_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `host`: gateway host the client talks to
//! - `method`: request verb ("get", "post", ...)
//! - `status`: outcome: "ok" or "error"

/// Total requests handled by a client, cache hits included.
///
/// Labels: `host`, `method`, `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "rapidapi_requests_total";

/// Upstream request duration in seconds (cache hits are not recorded).
///
/// Labels: `host`, `method`.
pub const REQUEST_DURATION_SECONDS: &str = "rapidapi_request_duration_seconds";

/// Total cache hits.
///
/// Labels: `host`.
pub const CACHE_HITS_TOTAL: &str = "rapidapi_cache_hits_total";

/// Total cache misses.
///
/// Labels: `host`.
pub const CACHE_MISSES_TOTAL: &str = "rapidapi_cache_misses_total";
