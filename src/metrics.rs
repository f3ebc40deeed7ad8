//! Per-client request and cache counters.
//!
//! [`MetricsTracker`] is owned by a client instance and reports what that
//! instance did; it is independent of the process-wide `metrics` facade
//! emission described in [`telemetry`](crate::telemetry).

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

use serde::{Deserialize, Serialize};

/// Recognized counter names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricName {
    CacheHit,
    CacheMiss,
    RequestsTotal,
    RequestsSucceed,
    RequestsFailed,
}

impl MetricName {
    pub const ALL: [MetricName; 5] = [
        MetricName::CacheHit,
        MetricName::CacheMiss,
        MetricName::RequestsTotal,
        MetricName::RequestsSucceed,
        MetricName::RequestsFailed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::CacheHit => "cache_hit",
            MetricName::CacheMiss => "cache_miss",
            MetricName::RequestsTotal => "requests_total",
            MetricName::RequestsSucceed => "requests_succeed",
            MetricName::RequestsFailed => "requests_failed",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counter values keyed by metric name. Always contains every [`MetricName`].
pub type MetricsSnapshot = BTreeMap<MetricName, i64>;

/// Counter store injected into the client.
///
/// Implementations must be safe to share across tasks. Counters that were
/// never touched read as 0, and [`snapshot()`](Self::snapshot) lists every
/// recognized name.
pub trait MetricsTracker: Send + Sync {
    fn increment(&self, name: MetricName, amount: i64);

    fn decrement(&self, name: MetricName, amount: i64);

    fn get(&self, name: MetricName) -> i64;

    fn snapshot(&self) -> MetricsSnapshot {
        MetricName::ALL
            .iter()
            .map(|name| (*name, self.get(*name)))
            .collect()
    }

    fn record_cache_hit(&self) {
        self.increment(MetricName::CacheHit, 1);
    }

    fn record_cache_miss(&self) {
        self.increment(MetricName::CacheMiss, 1);
    }

    fn record_requests_total(&self) {
        self.increment(MetricName::RequestsTotal, 1);
    }

    fn record_requests_succeed(&self) {
        self.increment(MetricName::RequestsSucceed, 1);
    }

    fn record_requests_failed(&self) {
        self.increment(MetricName::RequestsFailed, 1);
    }
}

/// Lock-free in-memory tracker; the default.
#[derive(Debug, Default)]
pub struct InMemoryMetricsTracker {
    counters: [AtomicI64; 5],
}

impl InMemoryMetricsTracker {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MetricsTracker for InMemoryMetricsTracker {
    fn increment(&self, name: MetricName, amount: i64) {
        self.counters[name.index()].fetch_add(amount, Ordering::Relaxed);
    }

    fn decrement(&self, name: MetricName, amount: i64) {
        self.counters[name.index()].fetch_sub(amount, Ordering::Relaxed);
    }

    fn get(&self, name: MetricName) -> i64 {
        self.counters[name.index()].load(Ordering::Relaxed)
    }
}
