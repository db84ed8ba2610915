//! Request identity used as the cache key.

use axum::http::{header, HeaderMap, Method, Request, Uri};
use std::fmt;

/// Identity of a request: method plus absolute URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey {
    method: Method,
    url: String,
}

impl RequestKey {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
        }
    }

    /// Build the key for an incoming request.
    pub fn from_request<B>(req: &Request<B>) -> Self {
        Self::new(req.method().clone(), absolute_url(req.uri(), req.headers()))
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

/// Absolute URL of a request target.
///
/// Absolute-form targets are used as-is. Origin-form targets are resolved
/// against the `Host` header.
pub fn absolute_url(uri: &Uri, headers: &HeaderMap) -> String {
    if uri.scheme().is_some() && uri.authority().is_some() {
        return uri.to_string();
    }

    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .or_else(|| uri.authority().map(|a| a.as_str()))
        .unwrap_or("localhost");
    let path = uri.path_and_query().map(|p| p.as_str()).unwrap_or("/");

    format!("http://{}{}", host, path)
}
