//! Caching subsystem.
//!
//! - [`key`]: deterministic, order-independent cache keys derived from a
//!   [`RequestDescriptor`](crate::RequestDescriptor) and the client identity.
//! - [`store`]: the [`CacheStore`] backend contract and the default
//!   in-memory [`MokaCacheStore`] with per-entry TTL.
//!
//! The cache-or-fetch decision itself lives in the client; see
//! [`RequestDescriptor::should_cache()`](crate::RequestDescriptor::should_cache).

pub mod key;
pub mod store;

pub use key::{CacheKeyBuilder, MAX_CACHE_KEY_PAYLOAD_LENGTH};
pub use store::{CacheConfig, CacheStore, MokaCacheStore};
