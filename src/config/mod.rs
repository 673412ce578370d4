//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (environment overrides: PORT, RELAY_MODE, PROXY_*)
//!     → validation.rs (semantic checks)
//!     → RelayConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload path
//! - All fields have defaults so a bare environment is enough to run
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::RelayConfig;
pub use schema::RelayMode;
pub use schema::UpstreamProxyConfig;
