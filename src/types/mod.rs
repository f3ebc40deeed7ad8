//! Public types for the client API.

mod identity;
mod rate_limit;
mod request;
mod response;

pub use identity::ClientIdentity;
pub use rate_limit::{
    DATE_HEADER, FALLBACK_REQUEST_ID_HEADER, LIMIT_HEADER, REMAINING_HEADER, REQUEST_ID_HEADER,
    RESET_HEADER, RateLimit,
};
pub use request::{Method, RequestDescriptor};
pub use response::{CacheMetrics, RequestMetadata, ResponseEnvelope};
