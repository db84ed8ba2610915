//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the caching proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Origin that serves the timer application.
    pub upstream: UpstreamConfig,

    /// Cache region and admission settings.
    pub cache: CacheConfig,

    /// Response used when both network and cache fail.
    pub offline: OfflineConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Upstream origin configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Origin URL, scheme and authority only (e.g., "http://127.0.0.1:3000").
    pub origin: String,

    /// Largest response body buffered from the origin.
    pub max_body_bytes: usize,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            origin: "http://127.0.0.1:3000".to_string(),
            max_body_bytes: 10 * 1024 * 1024, // 10MB
        }
    }
}

/// Cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Name of the single cache region.
    pub name: String,

    /// URLs containing any of these markers are never cached.
    pub excluded_markers: Vec<String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            name: "timer".to_string(),
            excluded_markers: vec!["chrome-extension".to_string()],
        }
    }
}

/// Response synthesized when the network fails and nothing is cached.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OfflineConfig {
    /// HTTP status code.
    pub status: u16,

    /// Plain text body.
    pub body: String,
}

impl Default for OfflineConfig {
    fn default() -> Self {
        Self {
            status: 504,
            body: "Offline and no cached response available".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upstream request timeout in seconds. Unset means wait indefinitely.
    pub request_secs: Option<u64>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
