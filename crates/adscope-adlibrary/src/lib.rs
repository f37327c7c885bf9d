//! HTTP client for the external ad-library API.
//!
//! Wraps `reqwest` with outbound rate limiting (hourly cap + minimum
//! inter-request spacing), a per-error-class retry policy, cursor-driven
//! pagination, and typed response deserialization.

pub mod client;
pub mod error;
pub mod rate_limit;
pub mod retry;
pub mod types;

pub use client::{AdLibraryClient, ClientConfig};
pub use error::AdLibraryError;
pub use rate_limit::{RateLimitStatus, RateLimiter};
pub use retry::{Backoff, RetryPolicy};
pub use types::{ActiveStatus, BoundRange, RawAdRecord, SearchOutcome, SearchParams};
