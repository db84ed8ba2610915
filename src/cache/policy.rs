//! Which requests and responses may be stored.

use axum::http::{header, HeaderMap, HeaderName, Method, Response, StatusCode};

use crate::cache::key::RequestKey;
use crate::config::CacheConfig;

/// Request headers that make the origin answer with a 304 or a partial body.
const CONDITIONAL_HEADERS: [HeaderName; 6] = [
    header::IF_NONE_MATCH,
    header::IF_MODIFIED_SINCE,
    header::IF_MATCH,
    header::IF_UNMODIFIED_SINCE,
    header::IF_RANGE,
    header::RANGE,
];

/// Remove validators and ranges so the origin sends a full response.
pub fn strip_conditional(headers: &mut HeaderMap) {
    for name in CONDITIONAL_HEADERS.iter() {
        headers.remove(name);
    }
}

/// Admission rule for the cache: GET requests whose URL carries none of the
/// excluded markers, answered with a complete response.
#[derive(Debug, Clone)]
pub struct CachePolicy {
    excluded_markers: Vec<String>,
}

impl CachePolicy {
    pub fn new(excluded_markers: Vec<String>) -> Self {
        Self { excluded_markers }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.excluded_markers.clone())
    }

    pub fn is_cacheable(&self, key: &RequestKey) -> bool {
        *key.method() == Method::GET
            && !self
                .excluded_markers
                .iter()
                .any(|marker| key.url().contains(marker.as_str()))
    }

    /// Whether a response may replace the stored entry.
    ///
    /// 206 and 304 carry no complete body, and `Vary: *` never matches again.
    pub fn is_storable<B>(&self, response: &Response<B>) -> bool {
        let status = response.status();
        if status == StatusCode::PARTIAL_CONTENT || status == StatusCode::NOT_MODIFIED {
            return false;
        }
        !response
            .headers()
            .get_all(header::VARY)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(','))
            .any(|v| v.trim() == "*")
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::from_config(&CacheConfig::default())
    }
}
