//! Hyper-backed fetcher for the configured origin.

use axum::body::{Body, Bytes};
use axum::http::{
    header::{self, HeaderMap, HeaderName},
    uri::{Authority, PathAndQuery, Scheme},
    Request, Response, Uri,
};
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use std::time::Duration;

use crate::config::{TimeoutConfig, UpstreamConfig};
use crate::fetch::{FetchError, Fetcher};

/// Headers that apply to a single connection and must not be forwarded.
const HOP_BY_HOP: [HeaderName; 6] = [
    header::CONNECTION,
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
];

/// Remove hop-by-hop headers, including any named by `Connection`.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let named: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in named.iter().chain(HOP_BY_HOP.iter()) {
        headers.remove(name);
    }
    headers.remove("keep-alive");
    headers.remove(header::UPGRADE);
}

/// Forwards requests to the origin and buffers the whole response.
#[derive(Clone)]
pub struct UpstreamFetcher {
    client: Client<HttpConnector, Body>,
    authority: Authority,
    max_body_bytes: usize,
    timeout: Option<Duration>,
}

impl UpstreamFetcher {
    pub fn new(upstream: &UpstreamConfig, timeouts: &TimeoutConfig) -> Result<Self, FetchError> {
        let invalid = || FetchError::InvalidOrigin(upstream.origin.clone());
        let origin: Uri = upstream.origin.parse().map_err(|_| invalid())?;
        if origin.scheme() != Some(&Scheme::HTTP) {
            return Err(invalid());
        }
        let authority = origin.authority().cloned().ok_or_else(invalid)?;

        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        Ok(Self {
            client,
            authority,
            max_body_bytes: upstream.max_body_bytes,
            timeout: timeouts.request_secs.map(Duration::from_secs),
        })
    }

    /// Point the request at the origin, keeping its path and query.
    fn rewrite(&self, uri: Uri) -> Result<Uri, FetchError> {
        let mut parts = uri.into_parts();
        parts.scheme = Some(Scheme::HTTP);
        parts.authority = Some(self.authority.clone());
        if parts.path_and_query.is_none() {
            parts.path_and_query = Some(PathAndQuery::from_static("/"));
        }
        Ok(Uri::from_parts(parts)?)
    }

    async fn send(&self, request: Request<Bytes>) -> Result<Response<Bytes>, FetchError> {
        let (mut parts, body) = request.into_parts();
        parts.uri = self.rewrite(parts.uri)?;
        strip_hop_by_hop(&mut parts.headers);

        let response = self
            .client
            .request(Request::from_parts(parts, Body::from(body)))
            .await?;

        self.buffer(response).await
    }

    async fn buffer(&self, response: Response<Incoming>) -> Result<Response<Bytes>, FetchError> {
        let (mut parts, body) = response.into_parts();
        let body = axum::body::to_bytes(Body::new(body), self.max_body_bytes)
            .await
            .map_err(FetchError::Body)?;
        strip_hop_by_hop(&mut parts.headers);
        Ok(Response::from_parts(parts, body))
    }
}

impl Fetcher for UpstreamFetcher {
    async fn fetch(&self, request: Request<Bytes>) -> Result<Response<Bytes>, FetchError> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.send(request))
                .await
                .map_err(|_| FetchError::Timeout(limit))?,
            None => self.send(request).await,
        }
    }
}
