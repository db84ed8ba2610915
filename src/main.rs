//! Network-first caching proxy for the timer application.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request       ┌──────────────────────────────────────────────┐
//!     ─────────────────────┼─▶ http server ──▶ fetch::NetworkFirst ───────┼──▶ Origin
//!                          │   (request id,        │          ▲           │
//!                          │    tracing)            │ miss     │ put       │
//!     Client Response      │                        ▼          │ (detached)│
//!     ◀────────────────────┼── network | cache | offline ◀── cache region │
//!                          └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use timer_proxy::config::{load_config, ProxyConfig};
use timer_proxy::http::HttpServer;
use timer_proxy::lifecycle::Shutdown;
use timer_proxy::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "timer-proxy")]
#[command(about = "Network-first caching proxy for the timer application", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };

    logging::init_logging(&config.observability.log_level);

    tracing::info!("timer-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        origin = %config.upstream.origin,
        cache = %config.cache.name,
        request_timeout_secs = ?config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        metrics::init_metrics(config.observability.metrics_address.parse()?)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();
    let server = HttpServer::new(config)?;

    server.run(listener, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
