//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay
//! proxy. All types derive Serde traits for deserialization from config
//! files; environment overrides are applied by the loader.

use serde::{Deserialize, Serialize};

/// Root configuration for the relay proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// How target URLs are derived from inbound requests.
    pub mode: RelayMode,

    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Upstream proxy that path-target mode relays through.
    pub upstream_proxy: Option<UpstreamProxyConfig>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl RelayConfig {
    /// Address the listener binds to.
    ///
    /// Falls back to all interfaces on the mode's default port.
    pub fn bind_address(&self) -> String {
        self.listener
            .bind_address
            .clone()
            .unwrap_or_else(|| format!("0.0.0.0:{}", self.mode.default_port()))
    }

    /// Bound on the outbound connect+response-headers phase, in seconds.
    pub fn relay_timeout_secs(&self) -> u64 {
        self.timeouts
            .request_secs
            .unwrap_or(self.mode.default_timeout_secs())
    }
}

/// Relay mode selecting the target-resolution policy.
///
/// Exactly one mode is active per process; the choice is made at startup,
/// never per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum RelayMode {
    /// `GET /proxy?url=..&password=..&action=..`; the three parameters are
    /// concatenated into the target URL and the upstream JSON is echoed.
    #[default]
    QueryAction,

    /// `GET /proxy?url=..`; the parameter is the target URL and the
    /// upstream JSON is echoed.
    QueryUrl,

    /// Any method; the request path (leading `/` stripped) is the target
    /// URL and the upstream response is streamed back verbatim through
    /// the configured upstream proxy.
    PathTarget,
}

impl RelayMode {
    /// Default listening port for this mode.
    pub fn default_port(self) -> u16 {
        match self {
            RelayMode::QueryAction | RelayMode::QueryUrl => 3000,
            RelayMode::PathTarget => 8080,
        }
    }

    /// Default bound on the outbound connect+response-headers phase.
    ///
    /// Path-target mode streams larger payloads and gets a wider bound.
    pub fn default_timeout_secs(self) -> u64 {
        match self {
            RelayMode::QueryAction | RelayMode::QueryUrl => 10,
            RelayMode::PathTarget => 60,
        }
    }

    /// Whether outbound calls go through the upstream proxy agent.
    pub fn uses_upstream_proxy(self) -> bool {
        matches!(self, RelayMode::PathTarget)
    }
}

impl std::str::FromStr for RelayMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "query-action" => Ok(RelayMode::QueryAction),
            "query-url" => Ok(RelayMode::QueryUrl),
            "path-target" => Ok(RelayMode::PathTarget),
            _ => Err(()),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000"). When unset, the mode's
    /// default port is used on all interfaces.
    pub bind_address: Option<String>,
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Override for the outbound call bound in seconds. When unset, the
    /// mode's default applies.
    pub request_secs: Option<u64>,
}

/// Credentialed upstream proxy configuration.
///
/// All three fields are required together; partial sets are rejected at
/// startup.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct UpstreamProxyConfig {
    /// Proxy base URL (e.g., "http://proxy.example.net:3128").
    pub url: String,

    /// Proxy username.
    pub username: String,

    /// Proxy password.
    pub password: String,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_mode_defaults() {
        let config = RelayConfig::default();
        assert_eq!(config.mode, RelayMode::QueryAction);
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
        assert_eq!(config.relay_timeout_secs(), 10);
    }

    #[test]
    fn path_target_defaults_differ() {
        let config = RelayConfig {
            mode: RelayMode::PathTarget,
            ..RelayConfig::default()
        };
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.relay_timeout_secs(), 60);
    }

    #[test]
    fn explicit_settings_override_mode_defaults() {
        let mut config = RelayConfig::default();
        config.listener.bind_address = Some("127.0.0.1:9999".to_string());
        config.timeouts.request_secs = Some(3);
        assert_eq!(config.bind_address(), "127.0.0.1:9999");
        assert_eq!(config.relay_timeout_secs(), 3);
    }

    #[test]
    fn mode_parses_from_kebab_case() {
        let toml = r#"
mode = "path-target"

[upstream_proxy]
url = "http://proxy.example.net:3128"
username = "u"
password = "p"
"#;
        let config: RelayConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.mode, RelayMode::PathTarget);
        assert!(config.upstream_proxy.is_some());

        assert_eq!("query-url".parse(), Ok(RelayMode::QueryUrl));
        assert!("streaming".parse::<RelayMode>().is_err());
    }
}
