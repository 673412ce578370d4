//! Request correlation.
//!
//! # Responsibilities
//! - Attach a correlation ID to every handled request, as early as
//!   possible, so one relay can be followed across log lines
//!
//! # Design Decisions
//! - An inbound `x-request-id` is trusted and reused; otherwise a fresh
//!   UUID is generated

use axum::body::Body;
use axum::http::Request;
use uuid::Uuid;

/// Correlation ID for log lines: the inbound `x-request-id` when present,
/// a fresh UUID v4 otherwise.
pub fn correlation_id(request: &Request<Body>) -> String {
    request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}
