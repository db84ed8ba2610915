//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, status codes, addresses)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a socket address")]
    BindAddress(String),
    #[error("upstream.origin {0:?}: {1}")]
    Origin(String, &'static str),
    #[error("upstream.max_body_bytes must be greater than zero")]
    MaxBodyBytes,
    #[error("cache.name must not be empty")]
    CacheName,
    #[error("offline.status {0} is not a 4xx or 5xx status code")]
    OfflineStatus(u16),
    #[error("timeouts.request_secs must be greater than zero")]
    RequestTimeout,
    #[error("observability.metrics_address {0:?} is not a socket address")]
    MetricsAddress(String),
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if let Err(reason) = check_origin(&config.upstream.origin) {
        errors.push(ValidationError::Origin(config.upstream.origin.clone(), reason));
    }

    if config.upstream.max_body_bytes == 0 {
        errors.push(ValidationError::MaxBodyBytes);
    }

    if config.cache.name.trim().is_empty() {
        errors.push(ValidationError::CacheName);
    }

    if !(400..=599).contains(&config.offline.status) {
        errors.push(ValidationError::OfflineStatus(config.offline.status));
    }

    if config.timeouts.request_secs == Some(0) {
        errors.push(ValidationError::RequestTimeout);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_origin(origin: &str) -> Result<(), &'static str> {
    let url = Url::parse(origin).map_err(|_| "not a valid URL")?;
    if url.scheme() != "http" {
        return Err("only http origins are supported");
    }
    if url.host_str().is_none() {
        return Err("missing host");
    }
    if url.path() != "/" || url.query().is_some() {
        return Err("must not contain a path or query");
    }
    Ok(())
}
