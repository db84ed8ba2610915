//! Network access and the network-first strategy.
//!
//! # Data Flow
//! ```text
//! buffered request
//!     → network_first.rs (derive cache key, try the network)
//!         ok  → upstream response returned, clone stored by a detached task
//!         err → cache lookup → cached response, or synthesized offline response
//!     → upstream.rs (hyper client against the configured origin)
//! ```
//!
//! # Design Decisions
//! - `Fetcher` is the network seam; tests substitute an in-memory network
//! - Any fetch error counts as "offline", including timeouts and body reads
//! - No retries, no partial responses

pub mod network_first;
pub mod upstream;

use axum::body::Bytes;
use axum::http::{Request, Response};
use std::future::Future;
use std::time::Duration;

pub use network_first::{NetworkFirst, Served};
pub use upstream::UpstreamFetcher;

/// Error returned when the network cannot produce a response.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("invalid upstream origin {0:?}")]
    InvalidOrigin(String),
    #[error("invalid request URI: {0}")]
    InvalidUri(#[from] axum::http::uri::InvalidUriParts),
    #[error("upstream request failed: {0}")]
    Request(#[from] hyper_util::client::legacy::Error),
    #[error("failed to read upstream body: {0}")]
    Body(#[source] axum::Error),
    #[error("upstream did not respond within {0:?}")]
    Timeout(Duration),
}

/// The network boundary: turn a request into a fully buffered response.
pub trait Fetcher: Send + Sync + 'static {
    fn fetch(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>, FetchError>> + Send;
}
