//! Forwarding HTTP Relay Proxy Library
//!
//! Accepts inbound requests, reconstructs the destination URL (from query
//! parameters or the request path, depending on the configured mode),
//! optionally relays through a credentialed upstream proxy, and pipes the
//! response back to the caller.

pub mod config;
pub mod error;
pub mod http;
pub mod observability;
pub mod relay;

pub use config::schema::{RelayConfig, RelayMode};
pub use error::RelayError;
pub use http::HttpServer;
