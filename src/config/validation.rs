//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the upstream proxy trio is complete when the mode needs it
//! - Validate value ranges and address/URL syntax
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before the config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::RelayConfig;

/// A single semantic validation failure.
#[derive(Debug)]
pub struct ValidationError {
    /// Configuration field the failure refers to.
    pub field: &'static str,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate semantic constraints, collecting every failure.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Some(addr) = &config.listener.bind_address {
        if addr.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError {
                field: "listener.bind_address",
                message: format!("'{addr}' is not a valid socket address"),
            });
        }
    }

    if config.timeouts.request_secs == Some(0) {
        errors.push(ValidationError {
            field: "timeouts.request_secs",
            message: "must be greater than zero".to_string(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError {
            field: "observability.metrics_address",
            message: format!(
                "'{}' is not a valid socket address",
                config.observability.metrics_address
            ),
        });
    }

    match &config.upstream_proxy {
        Some(proxy) => {
            for (field, value) in [
                ("upstream_proxy.url", &proxy.url),
                ("upstream_proxy.username", &proxy.username),
                ("upstream_proxy.password", &proxy.password),
            ] {
                if value.is_empty() {
                    errors.push(ValidationError {
                        field,
                        message: "is required".to_string(),
                    });
                }
            }
            if !proxy.url.is_empty() {
                match url::Url::parse(&proxy.url) {
                    Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => {}
                    Ok(parsed) => errors.push(ValidationError {
                        field: "upstream_proxy.url",
                        message: format!("unsupported scheme '{}'", parsed.scheme()),
                    }),
                    Err(e) => errors.push(ValidationError {
                        field: "upstream_proxy.url",
                        message: format!("failed to parse: {e}"),
                    }),
                }
            }
        }
        None if config.mode.uses_upstream_proxy() => {
            errors.push(ValidationError {
                field: "upstream_proxy",
                message:
                    "required in path-target mode (set PROXY_URL, PROXY_USERNAME and PROXY_PASSWORD)"
                        .to_string(),
            });
        }
        None => {}
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
