//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the catch-all proxy handler
//! - Wire up middleware (request ID, tracing)
//! - Buffer request bodies and hand requests to the network-first strategy
//! - Record per-request metrics

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::cache::CacheStorage;
use crate::config::ProxyConfig;
use crate::fetch::{FetchError, NetworkFirst, UpstreamFetcher};
use crate::http::request::{request_id, MakeRequestUuid, X_REQUEST_ID};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub proxy: Arc<NetworkFirst<UpstreamFetcher>>,
    pub max_body_bytes: usize,
}

/// HTTP server for the caching proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with a fresh cache storage.
    pub fn new(config: ProxyConfig) -> Result<Self, FetchError> {
        Self::with_storage(config, CacheStorage::new())
    }

    /// Create a new HTTP server over an existing cache storage, so callers can
    /// inspect or pre-seed the cache.
    pub fn with_storage(config: ProxyConfig, storage: CacheStorage) -> Result<Self, FetchError> {
        let fetcher = UpstreamFetcher::new(&config.upstream, &config.timeouts)?;
        let proxy = NetworkFirst::new(fetcher, storage, &config.cache, &config.offline);

        let state = AppState {
            proxy: Arc::new(proxy),
            max_body_bytes: config.upstream.max_body_bytes,
        };

        let router = Self::build_router(state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/", any(proxy_handler))
            .route("/{*path}", any(proxy_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
                    .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                        tracing::info_span!(
                            "request",
                            request_id = %request_id(request),
                            method = %request.method(),
                            uri = %request.uri(),
                        )
                    }))
                    .layer(PropagateRequestIdLayer::new(X_REQUEST_ID)),
            )
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: Shutdown,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            origin = %self.config.upstream.origin,
            cache = %self.config.cache.name,
            "HTTP server starting"
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move { shutdown.wait().await })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Catch-all handler: buffer the body and answer network-first.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();

    let (parts, body) = request.into_parts();
    let body = match axum::body::to_bytes(body, state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected request body");
            metrics::record_request(&method, 413, "rejected", start);
            return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
        }
    };

    let (served, response) = state.proxy.handle(Request::from_parts(parts, body)).await;
    let status = response.status();

    tracing::debug!(served = served.as_str(), status = %status, "Request served");
    metrics::record_request(&method, status.as_u16(), served.as_str(), start);

    response
}
