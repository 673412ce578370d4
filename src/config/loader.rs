//! Configuration loading from disk and environment.
//!
//! Configuration is read exactly once at startup: an optional TOML file,
//! then environment overrides, then semantic validation. Nothing re-reads
//! the environment after that.

use std::fs;
use std::path::Path;

use crate::config::schema::{RelayConfig, UpstreamProxyConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Env { name: &'static str, value: String },
    Validation(Vec<ValidationError>),
    Client(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Env { name, value } => {
                write!(f, "Invalid value '{}' for {}", value, name)
            }
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
            ConfigError::Client(e) => write!(f, "Failed to build outbound client: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration.
///
/// `path` points at an optional TOML file; environment variables override
/// its values. A missing file path means environment + defaults only.
pub fn load_config(path: Option<&Path>) -> Result<RelayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
            toml::from_str(&content).map_err(ConfigError::Parse)?
        }
        None => RelayConfig::default(),
    };

    apply_env_overrides(&mut config)?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply environment overrides onto a parsed configuration.
///
/// Recognized variables: `RELAY_MODE`, `PORT`, `RELAY_TIMEOUT_SECS`,
/// `PROXY_URL`, `PROXY_USERNAME`, `PROXY_PASSWORD`.
fn apply_env_overrides(config: &mut RelayConfig) -> Result<(), ConfigError> {
    if let Ok(value) = std::env::var("RELAY_MODE") {
        config.mode = value.parse().map_err(|_| ConfigError::Env {
            name: "RELAY_MODE",
            value,
        })?;
    }

    if let Ok(value) = std::env::var("PORT") {
        let port: u16 = value.parse().map_err(|_| ConfigError::Env {
            name: "PORT",
            value,
        })?;
        config.listener.bind_address = Some(format!("0.0.0.0:{port}"));
    }

    if let Ok(value) = std::env::var("RELAY_TIMEOUT_SECS") {
        let secs: u64 = value.parse().map_err(|_| ConfigError::Env {
            name: "RELAY_TIMEOUT_SECS",
            value,
        })?;
        config.timeouts.request_secs = Some(secs);
    }

    // The proxy credentials form a trio; a partial set is merged here and
    // rejected by validation, so the operator sees every missing field.
    let url = std::env::var("PROXY_URL").ok();
    let username = std::env::var("PROXY_USERNAME").ok();
    let password = std::env::var("PROXY_PASSWORD").ok();
    if url.is_some() || username.is_some() || password.is_some() {
        let existing = config.upstream_proxy.take().unwrap_or_default();
        config.upstream_proxy = Some(UpstreamProxyConfig {
            url: url.unwrap_or(existing.url),
            username: username.unwrap_or(existing.username),
            password: password.unwrap_or(existing.password),
        });
    }

    Ok(())
}
