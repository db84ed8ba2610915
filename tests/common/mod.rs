//! Shared utilities for integration testing.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use timer_proxy::config::ProxyConfig;
use timer_proxy::http::HttpServer;
use timer_proxy::{CacheStorage, Shutdown};

/// What the mock origin saw of a request.
pub struct BackendRequest {
    pub method: String,
    pub path: String,
    head: String,
}

impl BackendRequest {
    /// Case-insensitive check for a request header.
    #[allow(dead_code)]
    pub fn has_header(&self, name: &str) -> bool {
        let prefix = format!("{}:", name.to_ascii_lowercase());
        self.head
            .lines()
            .skip(1)
            .any(|line| line.to_ascii_lowercase().starts_with(&prefix))
    }
}

/// Start a programmable mock origin on an ephemeral port.
///
/// Returning `None` from the handler drops the connection without a
/// response, which the proxy sees as a network failure.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(BackendRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Option<(u16, String)>> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let mut buf = vec![0u8; 8192];
                        let n = socket.read(&mut buf).await.unwrap_or(0);
                        let head = String::from_utf8_lossy(&buf[..n]).to_string();
                        let mut request_line = head.lines().next().unwrap_or("").split_whitespace();
                        let method = request_line.next().unwrap_or("").to_string();
                        let path = request_line.next().unwrap_or("").to_string();

                        let request = BackendRequest { method, path, head };
                        let Some((status, body)) = f(request).await else {
                            drop(socket);
                            return;
                        };
                        let status_text = match status {
                            200 => "200 OK",
                            304 => "304 Not Modified",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// A running proxy and the handles a test needs to poke at it.
pub struct TestProxy {
    pub addr: SocketAddr,
    pub storage: CacheStorage,
    pub shutdown: Shutdown,
}

impl TestProxy {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start the proxy in front of `origin`.
pub async fn start_proxy(origin: SocketAddr, tweak: impl FnOnce(&mut ProxyConfig)) -> TestProxy {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let mut config = ProxyConfig::default();
    config.listener.bind_address = addr.to_string();
    config.upstream.origin = format!("http://{}", origin);
    tweak(&mut config);

    let storage = CacheStorage::new();
    let server = HttpServer::with_storage(config, storage.clone()).unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.clone();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestProxy {
        addr,
        storage,
        shutdown,
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// Wait for the detached cache write to land.
#[allow(dead_code)]
pub async fn wait_for_entries(storage: &CacheStorage, name: &str, count: usize) -> bool {
    for _ in 0..100 {
        if storage.open(name).len() >= count {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}
