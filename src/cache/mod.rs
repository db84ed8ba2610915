//! Named cache regions for request/response pairs.
//!
//! # Data Flow
//! ```text
//! incoming request
//!     → key.rs (method + absolute URL)
//!     → policy.rs (GET only, no extension-internal URLs, complete responses)
//!     → store.rs (open region by name, put / match)
//! ```
//!
//! # Design Decisions
//! - One shared storage, regions created on first open
//! - No TTL, no size bound, no eviction; entries live until deleted
//! - Regions are DashMap-backed so concurrent handlers need no extra locking

pub mod key;
pub mod policy;
pub mod store;

pub use key::{absolute_url, RequestKey};
pub use policy::{strip_conditional, CachePolicy};
pub use store::{CacheRegion, CacheStorage, CachedResponse};
