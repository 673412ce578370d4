//! Response writing and error mapping.
//!
//! # Responsibilities
//! - Stream upstream responses back verbatim (path-target mode)
//! - Materialize upstream bodies and echo them as JSON (query modes)
//! - Map relay failures to outward status codes
//!
//! # Design Decisions
//! - Streaming pipes the body chunk by chunk; back-pressure from the
//!   client propagates to the upstream read through the stream
//! - Failure bodies are short and generic; the real cause is logged, not
//!   sent to the caller

use axum::body::Body;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;

use crate::config::schema::RelayMode;
use crate::error::RelayError;
use crate::relay::headers;

const GENERIC_FAILURE: &str = "Failed to reach the upstream server.";

/// Relay the upstream response verbatim: status, sanitized headers, and a
/// body piped incrementally without buffering.
pub fn stream_upstream(upstream: reqwest::Response) -> Response {
    let status = upstream.status();
    let sanitized = headers::sanitize(upstream.headers());

    let mut builder = Response::builder().status(status);
    if let Some(target) = builder.headers_mut() {
        *target = sanitized;
    }
    builder
        .body(Body::from_stream(upstream.bytes_stream()))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

/// Materialize a 2xx upstream body and echo it as JSON.
///
/// Non-JSON bodies become a JSON string, matching what the destination
/// panel returns for plain-text replies.
pub async fn json_echo(upstream: reqwest::Response) -> Response {
    match upstream.text().await {
        Ok(text) => {
            let value = serde_json::from_str::<Value>(&text).unwrap_or(Value::String(text));
            Json(value).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to read upstream body");
            (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAILURE).into_response()
        }
    }
}

/// Map a relay failure to its outward response for the given mode.
///
/// Only path-target mode distinguishes timeouts (504); the query modes
/// flatten every relay failure to 500.
pub fn failure_response(mode: RelayMode, error: &RelayError) -> Response {
    match error {
        RelayError::MissingParameter(message) => {
            (StatusCode::BAD_REQUEST, *message).into_response()
        }
        RelayError::Timeout(_) if mode == RelayMode::PathTarget => {
            (StatusCode::GATEWAY_TIMEOUT, "Gateway Timeout").into_response()
        }
        RelayError::Timeout(_) | RelayError::Connect(_) | RelayError::Upstream(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAILURE).into_response()
        }
    }
}
