//! Cache key derivation.
//!
//! A key is the hex SHA-256 of a canonical object built from the request:
//!
//! ```text
//! { method, uri, base_url, params, payload, metadata }
//! ```
//!
//! The digest is computed structurally over the JSON value rather than over
//! its serialized text: object members are visited in sorted key order, so
//! two descriptors that differ only in map insertion order produce the same
//! key. Every value is prefixed with a type tag, so `"1"` and `1` differ.
//!
//! Keys are stable across processes and builds, which makes them safe to
//! use with shared or persistent [`CacheStore`](super::CacheStore) backends.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::types::{ClientIdentity, RequestDescriptor};

/// Serialized payloads longer than this are replaced by their hash.
pub const MAX_CACHE_KEY_PAYLOAD_LENGTH: usize = 2048;

/// Metadata field holding the identity namespace.
const NAMESPACE_FIELD: &str = "namespace";

/// Derives cache keys for one client identity.
///
/// Pure: the same inputs always give the same key.
#[derive(Debug, Clone, Default)]
pub struct CacheKeyBuilder {
    metadata: BTreeMap<String, Value>,
}

impl CacheKeyBuilder {
    /// A builder with no identity metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// A builder scoped to [`ClientIdentity::namespace()`].
    pub fn for_identity(identity: &ClientIdentity) -> Self {
        Self::new().metadata(NAMESPACE_FIELD, identity.namespace())
    }

    /// Add a metadata field that takes part in every key.
    pub fn metadata(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(name.into(), value.into());
        self
    }

    /// Derive the key for `descriptor` sent against `base_url`.
    pub fn build_key(&self, descriptor: &RequestDescriptor, base_url: &str) -> String {
        let mut canonical = Map::new();
        canonical.insert("method".into(), Value::from(descriptor.method.as_str()));
        canonical.insert("uri".into(), Value::from(descriptor.uri.as_str()));
        canonical.insert("base_url".into(), Value::from(base_url));
        if let Some(params) = &descriptor.params {
            let params = params
                .iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect();
            canonical.insert("params".into(), Value::Object(params));
        }
        if let Some(payload) = serialize_payload(descriptor.payload.as_ref()) {
            canonical.insert("payload".into(), Value::String(payload));
        }
        let metadata = self
            .metadata
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        canonical.insert("metadata".into(), Value::Object(metadata));

        structural_hash(&Value::Object(canonical))
    }
}

/// Payload text as it enters the key.
///
/// Absent or null payloads are omitted; strings are used verbatim; anything
/// else is JSON-encoded. Results over [`MAX_CACHE_KEY_PAYLOAD_LENGTH`]
/// characters are replaced by their SHA-256 digest.
pub fn serialize_payload(payload: Option<&Value>) -> Option<String> {
    let raw = match payload? {
        Value::Null => return None,
        Value::String(text) => text.clone(),
        other => serde_json::to_string(other).unwrap_or_else(|_| other.to_string()),
    };

    if raw.chars().count() <= MAX_CACHE_KEY_PAYLOAD_LENGTH {
        Some(raw)
    } else {
        Some(sha256_hex(raw.as_bytes()))
    }
}

/// Order-independent digest of a JSON value.
pub fn structural_hash(value: &Value) -> String {
    let mut hasher = Sha256::new();
    feed(&mut hasher, value);
    to_hex(&hasher.finalize())
}

pub(crate) fn sha256_hex(bytes: &[u8]) -> String {
    to_hex(&Sha256::digest(bytes))
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn feed_str(hasher: &mut Sha256, text: &str) {
    hasher.update((text.len() as u64).to_le_bytes());
    hasher.update(text.as_bytes());
}

fn feed(hasher: &mut Sha256, value: &Value) {
    match value {
        Value::Null => hasher.update(b"n"),
        Value::Bool(flag) => hasher.update(if *flag { b"t" } else { b"f" }),
        Value::Number(number) => {
            hasher.update(b"d");
            feed_str(hasher, &number.to_string());
        }
        Value::String(text) => {
            hasher.update(b"s");
            feed_str(hasher, text);
        }
        Value::Array(items) => {
            hasher.update(b"a");
            hasher.update((items.len() as u64).to_le_bytes());
            for item in items {
                feed(hasher, item);
            }
        }
        Value::Object(members) => {
            hasher.update(b"o");
            hasher.update((members.len() as u64).to_le_bytes());
            let mut sorted: Vec<_> = members.iter().collect();
            sorted.sort_by(|(a, _), (b, _)| a.cmp(b));
            for (name, member) in sorted {
                feed_str(hasher, name);
                feed(hasher, member);
            }
        }
    }
}
