//! Relay error definitions.

use thiserror::Error;

/// Errors produced while resolving or executing a relay.
///
/// Per-request errors only; they are converted to an outward status at the
/// handler boundary and never crash the process. Startup problems live in
/// [`crate::config::loader::ConfigError`].
#[derive(Debug, Error)]
pub enum RelayError {
    /// Caller omitted a required query parameter or target path.
    #[error("{0}")]
    MissingParameter(&'static str),

    /// No response headers arrived within the configured bound.
    #[error("upstream request timed out after {0} seconds")]
    Timeout(u64),

    /// Connection or DNS failure before any upstream response.
    #[error("upstream connection failed: {0}")]
    Connect(String),

    /// Any other outbound failure, including malformed target URLs.
    #[error("upstream request failed: {0}")]
    Upstream(String),
}
