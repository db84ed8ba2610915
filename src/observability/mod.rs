//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! proxy handler / cache writes produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout (fmt layer, filtered by RUST_LOG or config)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every request span
//! - Metric updates go through the `metrics` facade; without an installed
//!   recorder they are no-ops

pub mod logging;
pub mod metrics;
