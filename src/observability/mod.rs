//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! handlers produce:
//!     → tracing events (structured log lines with correlation IDs)
//!     → metrics.rs (counters, histograms)
//!
//! consumers:
//!     → log aggregation (stdout)
//!     → metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Logging is initialized in main; this module only owns metrics
//! - Metric updates are cheap (atomic increments), safe on the hot path

pub mod metrics;
