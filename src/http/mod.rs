//! HTTP surface of the relay proxy.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → server.rs (Axum setup, mode routing, correlation ID)
//!     → relay core (resolve target, sanitize headers, execute)
//!     → response.rs (stream or materialize, map failures)
//!     → client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use server::HttpServer;
