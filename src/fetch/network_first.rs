//! Network-first caching strategy.
//!
//! Every request goes to the network. Successful GET responses are copied
//! into the named cache region by a detached task, so delivery never waits on
//! the write. When the network fails the region is consulted instead.
//!
//! Cacheable requests are forwarded without validators or ranges, so the
//! origin answers with a full body that is safe to store.

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderValue, Request, Response, StatusCode};

use crate::cache::{strip_conditional, CachePolicy, CacheStorage, CachedResponse, RequestKey};
use crate::config::{CacheConfig, OfflineConfig};
use crate::fetch::Fetcher;

/// Where a response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Served {
    /// Live response from the network.
    Network,
    /// Stored response after a network failure.
    Cache,
    /// Network failed and nothing was stored.
    Offline,
}

impl Served {
    pub fn as_str(&self) -> &'static str {
        match self {
            Served::Network => "network",
            Served::Cache => "cache",
            Served::Offline => "offline",
        }
    }
}

/// Network-first handler over a single named cache region.
pub struct NetworkFirst<F> {
    fetcher: F,
    storage: CacheStorage,
    cache_name: String,
    policy: CachePolicy,
    offline: OfflineConfig,
}

impl<F: Fetcher> NetworkFirst<F> {
    pub fn new(fetcher: F, storage: CacheStorage, cache: &CacheConfig, offline: &OfflineConfig) -> Self {
        Self {
            fetcher,
            storage,
            cache_name: cache.name.clone(),
            policy: CachePolicy::from_config(cache),
            offline: offline.clone(),
        }
    }

    pub fn storage(&self) -> &CacheStorage {
        &self.storage
    }

    /// Answer a request, preferring the network.
    pub async fn handle(&self, mut request: Request<Bytes>) -> (Served, Response<Body>) {
        let key = RequestKey::from_request(&request);
        let cacheable = self.policy.is_cacheable(&key);
        if cacheable {
            strip_conditional(request.headers_mut());
        }

        match self.fetcher.fetch(request).await {
            Ok(response) => {
                let region = self.storage.open(&self.cache_name);
                if cacheable && self.policy.is_storable(&response) {
                    let entry = CachedResponse::from_response(&response);
                    tokio::spawn(async move {
                        region.put(key, entry);
                    });
                }
                let (parts, body) = response.into_parts();
                (Served::Network, Response::from_parts(parts, Body::from(body)))
            }
            Err(e) => {
                let region = self.storage.open(&self.cache_name);
                match region.match_request(&key) {
                    Some(cached) => {
                        tracing::info!(key = %key, error = %e, "Network failed, serving from cache");
                        (Served::Cache, cached.into_response())
                    }
                    None => {
                        tracing::warn!(key = %key, error = %e, "Network failed and no cached response");
                        (Served::Offline, self.offline_response())
                    }
                }
            }
        }
    }

    fn offline_response(&self) -> Response<Body> {
        let mut response = Response::new(Body::from(self.offline.body.clone()));
        *response.status_mut() =
            StatusCode::from_u16(self.offline.status).unwrap_or(StatusCode::GATEWAY_TIMEOUT);
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheRegion;
    use crate::fetch::FetchError;
    use axum::http::Method;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    /// In-memory network that echoes the request line while online.
    #[derive(Clone, Default)]
    struct MockNetwork {
        offline: Arc<AtomicBool>,
        version: Arc<AtomicUsize>,
    }

    impl MockNetwork {
        fn go_offline(&self) {
            self.offline.store(true, Ordering::SeqCst);
        }
    }

    impl Fetcher for MockNetwork {
        async fn fetch(&self, request: Request<Bytes>) -> Result<Response<Bytes>, FetchError> {
            if self.offline.load(Ordering::SeqCst) {
                return Err(FetchError::Timeout(Duration::from_secs(1)));
            }
            if request.headers().contains_key(header::IF_NONE_MATCH) {
                return Ok(Response::builder()
                    .status(StatusCode::NOT_MODIFIED)
                    .body(Bytes::new())
                    .unwrap());
            }
            let version = self.version.fetch_add(1, Ordering::SeqCst);
            let body = format!("{} {} v{}", request.method(), request.uri().path(), version);
            let status = if request.uri().path() == "/partial" {
                StatusCode::PARTIAL_CONTENT
            } else {
                StatusCode::OK
            };
            Ok(Response::builder()
                .status(status)
                .header(header::CONTENT_TYPE, "text/plain")
                .body(Bytes::from(body))
                .unwrap())
        }
    }

    fn proxy(network: MockNetwork) -> NetworkFirst<MockNetwork> {
        NetworkFirst::new(
            network,
            CacheStorage::new(),
            &CacheConfig::default(),
            &OfflineConfig::default(),
        )
    }

    fn request(method: Method, uri: &str) -> Request<Bytes> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("Host", "timer.local")
            .body(Bytes::new())
            .unwrap()
    }

    async fn body_text(response: Response<Body>) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    /// The cache write is detached; give it a chance to land.
    async fn settle(region: &CacheRegion, key: &RequestKey) -> Option<CachedResponse> {
        for _ in 0..100 {
            if let Some(found) = region.match_request(key) {
                return Some(found);
            }
            tokio::task::yield_now().await;
        }
        None
    }

    #[tokio::test]
    async fn test_successful_get_is_cached() {
        let proxy = proxy(MockNetwork::default());

        let (served, response) = proxy.handle(request(Method::GET, "/index.html")).await;
        assert_eq!(served, Served::Network);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "GET /index.html v0");

        let region = proxy.storage().open("timer");
        let key = RequestKey::new(Method::GET, "http://timer.local/index.html");
        let cached = settle(&region, &key).await.expect("entry should be cached");
        assert_eq!(cached.status, StatusCode::OK);
        assert_eq!(cached.headers[header::CONTENT_TYPE], "text/plain");
        assert_eq!(cached.body, Bytes::from_static(b"GET /index.html v0"));
    }

    #[tokio::test]
    async fn test_post_is_never_cached() {
        let proxy = proxy(MockNetwork::default());

        let (served, _) = proxy.handle(request(Method::POST, "/api/timers")).await;
        assert_eq!(served, Served::Network);

        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert!(proxy.storage().open("timer").is_empty());
    }

    #[tokio::test]
    async fn test_extension_urls_are_not_cached() {
        let proxy = proxy(MockNetwork::default());

        let (served, _) = proxy
            .handle(request(Method::GET, "chrome-extension://abcdef/inject.js"))
            .await;
        assert_eq!(served, Served::Network);

        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert!(proxy.storage().open("timer").is_empty());
    }

    #[tokio::test]
    async fn test_network_failure_serves_cached_response() {
        let network = MockNetwork::default();
        let proxy = proxy(network.clone());
        let key = RequestKey::new(Method::GET, "http://timer.local/app.js");

        proxy.handle(request(Method::GET, "/app.js")).await;
        settle(&proxy.storage().open("timer"), &key).await.unwrap();

        network.go_offline();

        let (served, response) = proxy.handle(request(Method::GET, "/app.js")).await;
        assert_eq!(served, Served::Cache);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "GET /app.js v0");
    }

    #[tokio::test]
    async fn test_latest_network_response_wins() {
        let network = MockNetwork::default();
        let proxy = proxy(network.clone());
        let region = proxy.storage().open("timer");
        let key = RequestKey::new(Method::GET, "http://timer.local/");

        proxy.handle(request(Method::GET, "/")).await;
        settle(&region, &key).await.unwrap();
        proxy.handle(request(Method::GET, "/")).await;
        for _ in 0..100 {
            if region.match_request(&key).map(|c| c.body) == Some(Bytes::from_static(b"GET / v1")) {
                break;
            }
            tokio::task::yield_now().await;
        }

        network.go_offline();
        let (_, response) = proxy.handle(request(Method::GET, "/")).await;
        assert_eq!(body_text(response).await, "GET / v1");
    }

    #[tokio::test]
    async fn test_revalidation_keeps_full_entry() {
        let network = MockNetwork::default();
        let proxy = proxy(network.clone());
        let region = proxy.storage().open("timer");
        let key = RequestKey::new(Method::GET, "http://timer.local/app.js");

        proxy.handle(request(Method::GET, "/app.js")).await;
        settle(&region, &key).await.unwrap();

        let mut revalidate = request(Method::GET, "/app.js");
        revalidate
            .headers_mut()
            .insert(header::IF_NONE_MATCH, HeaderValue::from_static("\"v0\""));
        let (served, response) = proxy.handle(revalidate).await;
        assert_eq!(served, Served::Network);
        assert_eq!(response.status(), StatusCode::OK);

        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        network.go_offline();

        let (served, response) = proxy.handle(request(Method::GET, "/app.js")).await;
        assert_eq!(served, Served::Cache);
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.starts_with("GET /app.js v"));
    }

    #[tokio::test]
    async fn test_partial_response_is_not_stored() {
        let proxy = proxy(MockNetwork::default());

        let (served, response) = proxy.handle(request(Method::GET, "/partial")).await;
        assert_eq!(served, Served::Network);
        assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);

        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert!(proxy.storage().open("timer").is_empty());
    }

    #[tokio::test]
    async fn test_network_and_cache_miss_is_offline() {
        let network = MockNetwork::default();
        network.go_offline();
        let proxy = proxy(network);

        let (served, response) = proxy.handle(request(Method::GET, "/never-seen")).await;
        assert_eq!(served, Served::Offline);
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(body_text(response).await, OfflineConfig::default().body);
    }

    #[tokio::test]
    async fn test_post_falls_back_to_offline_even_with_cached_get() {
        let network = MockNetwork::default();
        let proxy = proxy(network.clone());
        let key = RequestKey::new(Method::GET, "http://timer.local/api");

        proxy.handle(request(Method::GET, "/api")).await;
        settle(&proxy.storage().open("timer"), &key).await.unwrap();
        network.go_offline();

        let (served, _) = proxy.handle(request(Method::POST, "/api")).await;
        assert_eq!(served, Served::Offline);
    }

    #[tokio::test]
    async fn test_custom_cache_name_and_offline_status() {
        let network = MockNetwork::default();
        let cache = CacheConfig {
            name: "timer-v2".into(),
            ..CacheConfig::default()
        };
        let offline = OfflineConfig {
            status: 503,
            body: "down".into(),
        };
        let proxy = NetworkFirst::new(network.clone(), CacheStorage::new(), &cache, &offline);
        let key = RequestKey::new(Method::GET, "http://timer.local/");

        proxy.handle(request(Method::GET, "/")).await;
        assert!(settle(&proxy.storage().open("timer-v2"), &key).await.is_some());
        assert!(proxy.storage().open("timer").is_empty());

        network.go_offline();
        let (_, response) = proxy.handle(request(Method::GET, "/missing")).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
