//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing span)
//!     → request body buffered
//!     → fetch::NetworkFirst (network, then cache, then offline response)
//!     → Send to client
//! ```

pub mod request;
pub mod server;

pub use request::{request_id, MakeRequestUuid, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
