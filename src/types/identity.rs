//! Client identity (gateway host + API key)

use std::fmt;

use crate::cache::key::sha256_hex;

/// The (host, API key) pair a client authenticates with.
///
/// The key is only ever exposed through [`api_key()`](Self::api_key) for the
/// transport headers. `Debug` output and the cache namespace carry a
/// SHA-256 fingerprint instead.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    host: String,
    api_key: String,
}

impl ClientIdentity {
    pub fn new(host: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            api_key: api_key.into(),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Hex SHA-256 of the API key.
    pub fn fingerprint(&self) -> String {
        sha256_hex(self.api_key.as_bytes())
    }

    /// Cache namespace for this identity: `{host}:{fingerprint}`.
    pub fn namespace(&self) -> String {
        format!("{}:{}", self.host, self.fingerprint())
    }
}

impl fmt::Debug for ClientIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientIdentity")
            .field("host", &self.host)
            .field("api_key", &crate::logging::REDACTED)
            .finish()
    }
}
