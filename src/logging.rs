//! Structured lifecycle logging with credential redaction.
//!
//! The client emits one [`LogRecord`] at each lifecycle point (see
//! [`LogEvent`]) to an injected [`EventLogger`]. Redaction happens when a
//! record is constructed, so no logger implementation can observe the API
//! key: any field whose name ends in the credential field name (ignoring
//! case, `_` and `-`) is replaced with [`REDACTED`], at any depth.

use std::fmt;

use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Placeholder written in place of credential values.
pub const REDACTED: &str = "[REDACTED]";

/// Credential field name, normalized (lower-case, no separators).
const CREDENTIAL_FIELD: &str = "rapidapikey";

/// Severity of a lifecycle record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Warn,
}

/// Lifecycle points at which the client logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogEvent {
    RequestStart,
    CacheHit,
    CacheMiss,
    CacheSkip,
    CacheStore,
    RequestSuccess,
    RequestFailure,
}

impl LogEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogEvent::RequestStart => "rapidapi.request.start",
            LogEvent::CacheHit => "rapidapi.cache.hit",
            LogEvent::CacheMiss => "rapidapi.cache.miss",
            LogEvent::CacheSkip => "rapidapi.cache.skip",
            LogEvent::CacheStore => "rapidapi.cache.store",
            LogEvent::RequestSuccess => "rapidapi.request.success",
            LogEvent::RequestFailure => "rapidapi.request.failure",
        }
    }

    /// Failures are warnings; everything else is debug.
    pub fn level(&self) -> LogLevel {
        match self {
            LogEvent::RequestFailure => LogLevel::Warn,
            _ => LogLevel::Debug,
        }
    }
}

impl fmt::Display for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One structured log record. Fields are redacted on construction.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    level: LogLevel,
    event: LogEvent,
    fields: Map<String, Value>,
}

impl LogRecord {
    pub fn new(event: LogEvent, mut fields: Map<String, Value>) -> Self {
        redact_map(&mut fields);
        Self {
            level: event.level(),
            event,
            fields,
        }
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn event(&self) -> LogEvent {
        self.event
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

/// Sink for lifecycle records.
pub trait EventLogger: Send + Sync {
    fn log(&self, record: &LogRecord);
}

/// Default logger: forwards records to `tracing`.
///
/// Silent unless the application installs a subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl EventLogger for TracingLogger {
    fn log(&self, record: &LogRecord) {
        let fields = Value::Object(record.fields.clone());
        match record.level {
            LogLevel::Debug => debug!(event = record.event.as_str(), %fields),
            LogLevel::Warn => warn!(event = record.event.as_str(), %fields),
        }
    }
}

fn is_credential_field(name: &str) -> bool {
    let normalized: String = name
        .chars()
        .filter(|c| *c != '_' && *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect();
    normalized.ends_with(CREDENTIAL_FIELD)
}

fn redact_map(fields: &mut Map<String, Value>) {
    for (name, value) in fields.iter_mut() {
        if is_credential_field(name) {
            *value = Value::String(REDACTED.to_string());
        } else {
            redact_value(value);
        }
    }
}

fn redact_value(value: &mut Value) {
    match value {
        Value::Object(members) => redact_map(members),
        Value::Array(items) => items.iter_mut().for_each(redact_value),
        _ => {}
    }
}

/// Redact credential fields in an arbitrary JSON value.
pub fn redact(mut value: Value) -> Value {
    redact_value(&mut value);
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn top_level_credential_is_redacted() {
        let record = LogRecord::new(
            LogEvent::RequestStart,
            fields(json!({"rapid_api_key": "secret", "uri": "/x"})),
        );
        assert_eq!(record.fields()["rapid_api_key"], REDACTED);
        assert_eq!(record.fields()["uri"], "/x");
    }

    #[test]
    fn nested_and_suffixed_credentials_are_redacted() {
        let record = LogRecord::new(
            LogEvent::CacheMiss,
            fields(json!({
                "client": {"rapidApiKey": "secret", "host": "h"},
                "headers": [{"X-RapidAPI-Key": "secret"}],
                "upstream_rapid_api_key": "secret",
            })),
        );
        let rendered = Value::Object(record.fields().clone()).to_string();
        assert!(!rendered.contains("secret"));
        assert_eq!(record.fields()["client"]["host"], "h");
    }

    #[test]
    fn fingerprint_field_is_not_redacted() {
        let value = redact(json!({"rapid_api_key_fingerprint": "abc"}));
        assert_eq!(value["rapid_api_key_fingerprint"], "abc");
    }

    #[test]
    fn failure_is_warn_level() {
        assert_eq!(LogEvent::RequestFailure.level(), LogLevel::Warn);
        assert_eq!(LogEvent::CacheHit.level(), LogLevel::Debug);
        assert_eq!(LogEvent::CacheStore.as_str(), "rapidapi.cache.store");
    }

    #[test]
    fn tracing_logger_without_subscriber_is_noop() {
        TracingLogger.log(&LogRecord::new(LogEvent::RequestStart, Map::new()));
    }
}
