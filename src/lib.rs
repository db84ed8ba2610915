//! Timer application helpers: a network-first caching proxy, the running
//! timers title, and duration/text formatting.

pub mod cache;
pub mod config;
pub mod fetch;
pub mod format;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod timer;
pub mod title;

pub use cache::CacheStorage;
pub use config::schema::ProxyConfig;
pub use fetch::NetworkFirst;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
