//! Metrics collection and exposition.
//!
//! # Metrics
//! - `timer_proxy_requests_total` (counter): requests by method, status, served-from
//! - `timer_proxy_request_duration_seconds` (histogram): latency by served-from
//! - `timer_proxy_cache_writes_total` (counter): background cache writes by region
//! - `timer_proxy_cache_entries` (gauge): entries per region

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Must be called from within a tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), metrics_exporter_prometheus::BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record a completed proxied request.
pub fn record_request(method: &str, status: u16, served: &'static str, start: Instant) {
    counter!(
        "timer_proxy_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "served" => served
    )
    .increment(1);
    histogram!("timer_proxy_request_duration_seconds", "served" => served)
        .record(start.elapsed().as_secs_f64());
}

/// Record a cache write and the region's resulting size.
pub fn record_cache_write(region: &str, entries: usize) {
    counter!("timer_proxy_cache_writes_total", "region" => region.to_string()).increment(1);
    gauge!("timer_proxy_cache_entries", "region" => region.to_string()).set(entries as f64);
}
