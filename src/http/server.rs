//! HTTP server setup and request handling.
//!
//! # Responsibilities
//! - Create the Axum router for the configured relay mode
//! - Wire up middleware (tracing)
//! - Dispatch requests through the relay core
//! - Convert relay outcomes into client responses
//!
//! # Design Decisions
//! - The mode decides the route shape at startup; handlers never branch
//!   on request content to pick a policy
//! - Handlers hold no mutable state; everything shared is read-only
//!   behind Arc

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{Method, Request},
    response::Response,
    routing::{any, get},
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::loader::ConfigError;
use crate::config::schema::{RelayConfig, RelayMode};
use crate::http::request::correlation_id;
use crate::http::response;
use crate::observability::metrics;
use crate::relay::{headers, target, RelayExecutor};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    pub executor: Arc<RelayExecutor>,
}

/// HTTP server for the relay proxy.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// Builds the process-wide relay executor; in path-target mode this
    /// is where incomplete upstream proxy configuration becomes fatal.
    pub fn new(config: RelayConfig) -> Result<Self, ConfigError> {
        let executor = Arc::new(RelayExecutor::from_config(&config)?);
        let state = AppState {
            config: Arc::new(config.clone()),
            executor,
        };
        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router for the configured mode.
    fn build_router(config: &RelayConfig, state: AppState) -> Router {
        let router = match config.mode {
            RelayMode::QueryAction | RelayMode::QueryUrl => {
                Router::new().route("/proxy", get(query_handler))
            }
            RelayMode::PathTarget => Router::new()
                .route("/{*path}", any(path_handler))
                .route("/", any(path_handler)),
        };
        router
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            mode = ?self.config.mode,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}

/// Handler for the query modes: resolve the target from query parameters,
/// relay with the outbound GET, echo the upstream JSON.
async fn query_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let request_id = correlation_id(&request);

    let target_url = match target::resolve_target(state.config.mode, request.uri()) {
        Ok(target_url) => target_url,
        Err(e) => {
            tracing::warn!(
                request_id = %request_id,
                error = %e,
                "Rejecting request with incomplete parameters"
            );
            return finish(Method::GET, response::failure_response(state.config.mode, &e), start);
        }
    };

    tracing::debug!(request_id = %request_id, target = %target_url, "Relaying request");

    let mut outbound_headers = headers::sanitize(request.headers());
    // The outbound client negotiates its own encoding so the echo sees
    // decoded bytes.
    outbound_headers.remove(axum::http::header::ACCEPT_ENCODING);

    let outcome = state
        .executor
        .execute(Method::GET, &target_url, outbound_headers, None)
        .await;

    let outward = match outcome {
        Ok(upstream) if upstream.status().is_success() => response::json_echo(upstream).await,
        Ok(upstream) => {
            let status = upstream.status();
            tracing::warn!(
                request_id = %request_id,
                target = %target_url,
                status = %status,
                "Upstream returned an error status"
            );
            response::failure_response(
                state.config.mode,
                &crate::error::RelayError::Upstream(format!("status {status}")),
            )
        }
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                method = %Method::GET,
                target = %target_url,
                error = %e,
                "Relay failed"
            );
            response::failure_response(state.config.mode, &e)
        }
    };

    finish(Method::GET, outward, start)
}

/// Handler for path-target mode: the request path is the destination URL;
/// the upstream response is streamed back verbatim.
async fn path_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let request_id = correlation_id(&request);
    let method = request.method().clone();

    let target_url = match target::resolve_target(state.config.mode, request.uri()) {
        Ok(target_url) => target_url,
        Err(e) => {
            tracing::warn!(
                request_id = %request_id,
                error = %e,
                "Rejecting request with empty target path"
            );
            return finish(method, response::failure_response(state.config.mode, &e), start);
        }
    };

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        target = %target_url,
        "Relaying request through upstream proxy"
    );

    let (parts, body) = request.into_parts();
    let outbound_headers = headers::sanitize(&parts.headers);
    let outbound_body = if matches!(method, Method::GET | Method::HEAD) {
        None
    } else {
        Some(reqwest::Body::wrap_stream(body.into_data_stream()))
    };

    let outward = match state
        .executor
        .execute(method.clone(), &target_url, outbound_headers, outbound_body)
        .await
    {
        Ok(upstream) => {
            tracing::debug!(
                request_id = %request_id,
                status = %upstream.status(),
                "Streaming upstream response"
            );
            response::stream_upstream(upstream)
        }
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                method = %method,
                target = %target_url,
                error = %e,
                "Relay failed"
            );
            response::failure_response(state.config.mode, &e)
        }
    };

    finish(method, outward, start)
}

/// Record metrics for a finished relay and hand the response back.
fn finish(method: Method, outward: Response, start: Instant) -> Response {
    metrics::record_relay(method.as_str(), outward.status().as_u16(), start);
    outward
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::UpstreamProxyConfig;

    #[test]
    fn server_builds_for_query_modes() {
        for mode in [RelayMode::QueryAction, RelayMode::QueryUrl] {
            let config = RelayConfig {
                mode,
                ..RelayConfig::default()
            };
            assert!(HttpServer::new(config).is_ok());
        }
    }

    #[test]
    fn path_target_without_proxy_is_fatal() {
        let config = RelayConfig {
            mode: RelayMode::PathTarget,
            ..RelayConfig::default()
        };
        assert!(HttpServer::new(config).is_err());
    }

    #[test]
    fn path_target_with_proxy_builds() {
        let mut config = RelayConfig {
            mode: RelayMode::PathTarget,
            ..RelayConfig::default()
        };
        config.upstream_proxy = Some(UpstreamProxyConfig {
            url: "http://proxy.example.net:3128".to_string(),
            username: "relay".to_string(),
            password: "secret".to_string(),
        });
        assert!(HttpServer::new(config).is_ok());
    }
}
