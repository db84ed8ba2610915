//! Cache storage and regions.

use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, Response, StatusCode},
};
use dashmap::DashMap;
use std::sync::Arc;

use crate::cache::key::RequestKey;
use crate::observability::metrics;

/// A captured response: status, headers and fully buffered body.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl CachedResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Capture a copy of a buffered response.
    pub fn from_response(response: &Response<Bytes>) -> Self {
        Self::new(response.status(), response.headers().clone(), response.body().clone())
    }

    /// Rebuild a response to send to the client.
    pub fn into_response(self) -> Response<Body> {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

/// A single named region of request/response pairs.
///
/// Cloning yields another handle onto the same entries.
#[derive(Debug, Clone)]
pub struct CacheRegion {
    name: Arc<str>,
    entries: Arc<DashMap<RequestKey, CachedResponse>>,
}

impl CacheRegion {
    fn new(name: &str) -> Self {
        Self {
            name: Arc::from(name),
            entries: Arc::new(DashMap::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Store `response` under `key`, replacing any earlier entry.
    pub fn put(&self, key: RequestKey, response: CachedResponse) {
        tracing::trace!(region = %self.name, key = %key, "Cache put");
        self.entries.insert(key, response);
        metrics::record_cache_write(&self.name, self.entries.len());
    }

    /// Look up a previously stored response.
    pub fn match_request(&self, key: &RequestKey) -> Option<CachedResponse> {
        self.entries.get(key).map(|r| r.value().clone())
    }

    pub fn delete(&self, key: &RequestKey) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn keys(&self) -> Vec<RequestKey> {
        self.entries.iter().map(|r| r.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

/// All cache regions, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct CacheStorage {
    regions: Arc<DashMap<String, CacheRegion>>,
}

impl CacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the region called `name`, creating it if needed.
    pub fn open(&self, name: &str) -> CacheRegion {
        if let Some(region) = self.regions.get(name) {
            return region.value().clone();
        }
        self.regions
            .entry(name.to_string())
            .or_insert_with(|| {
                tracing::debug!(region = name, "Cache region created");
                CacheRegion::new(name)
            })
            .value()
            .clone()
    }

    pub fn has(&self, name: &str) -> bool {
        self.regions.contains_key(name)
    }

    /// Drop a region and all of its entries.
    pub fn delete(&self, name: &str) -> bool {
        self.regions.remove(name).is_some()
    }

    pub fn names(&self) -> Vec<String> {
        self.regions.iter().map(|r| r.key().clone()).collect()
    }
}
