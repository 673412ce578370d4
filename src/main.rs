//! relay-proxy: Forwarding HTTP Proxy
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌────────────────────────────────────────────────┐
//!                    │                 RELAY PROXY                     │
//!                    │                                                 │
//!   Client Request   │  ┌─────────┐   ┌──────────┐   ┌─────────────┐  │
//!   ─────────────────┼─▶│  http   │──▶│  target  │──▶│   header    │  │
//!                    │  │ server  │   │ resolver │   │  sanitizer  │  │
//!                    │  └─────────┘   └──────────┘   └──────┬──────┘  │
//!                    │                                      │         │
//!                    │                                      ▼         │
//!                    │                     ┌──────────────────────┐   │      Destination
//!                    │                     │    relay executor     │──┼────▶ (optionally via
//!                    │                     │  (bounded, no retry)  │   │      upstream proxy)
//!                    │                     └──────────┬───────────┘   │
//!   Client Response  │  ┌──────────┐                  │               │
//!   ◀────────────────┼──│ response │◀─────────────────┘               │
//!                    │  │  writer  │  (stream or JSON echo)           │
//!                    │  └──────────┘                                  │
//!                    │                                                 │
//!                    │  cross-cutting: config · tracing · metrics      │
//!                    └────────────────────────────────────────────────┘
//! ```

use std::path::Path;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use relay_proxy::config::loader::load_config;
use relay_proxy::HttpServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "relay_proxy=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("relay-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    // Load configuration: optional TOML file path as the first argument,
    // environment overrides on top, validated before anything binds.
    let config_path = std::env::args().nth(1);
    let config = load_config(config_path.as_deref().map(Path::new))?;

    tracing::info!(
        mode = ?config.mode,
        bind_address = %config.bind_address(),
        relay_timeout_secs = config.relay_timeout_secs(),
        upstream_proxy = config.upstream_proxy.is_some(),
        "Configuration loaded"
    );

    // Metrics exporter on its own listener
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => relay_proxy::observability::metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // Bind TCP listener
    let listener = TcpListener::bind(config.bind_address()).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        "Listening for connections"
    );

    // Create and run HTTP server
    let server = HttpServer::new(config)?;
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
