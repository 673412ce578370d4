//! Relay core subsystem.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → target.rs (derive destination URL per configured mode)
//!     → headers.rs (strip hop-by-hop fields)
//!     → executor.rs (bounded outbound call, optionally via upstream.rs)
//!     → http/response.rs (stream or materialize the result)
//! ```
//!
//! # Design Decisions
//! - Target resolution and header sanitization are pure functions
//! - The executor owns the only process-wide shared state (the client)
//! - No retries: a failed relay is reported once and the request ends

pub mod executor;
pub mod headers;
pub mod target;
pub mod upstream;

pub use executor::RelayExecutor;
