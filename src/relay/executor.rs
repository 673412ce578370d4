//! Outbound relay execution.
//!
//! # Responsibilities
//! - Own the process-wide outbound HTTP client
//! - Bound the connect+response-headers phase with a timeout
//! - Map transport failures to the relay error taxonomy
//!
//! # Design Decisions
//! - Response statuses never become errors; callers decide what a given
//!   1xx-5xx means for their write mode
//! - The bound does not cover body streaming: once headers have arrived,
//!   long downloads continue past it
//! - Dropping the in-flight future on timeout closes the partially-open
//!   outbound connection

use std::time::Duration;

use axum::http::{HeaderMap, Method};

use crate::config::loader::ConfigError;
use crate::config::schema::RelayConfig;
use crate::error::RelayError;
use crate::relay::upstream::UpstreamProxy;

/// Browser identity presented to destinations by the query modes.
///
/// Carried over from the deployment this replaces; the destination panel
/// rejects non-browser agents. An inbound `user-agent` header still wins.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/114.0.0.0 Safari/537.36";

/// Executes outbound calls with a shared client and a fixed bound.
pub struct RelayExecutor {
    client: reqwest::Client,
    timeout: Duration,
}

impl RelayExecutor {
    /// Build the shared executor from validated configuration.
    ///
    /// In path-target mode the upstream proxy agent is attached for HTTP
    /// and HTTPS targets alike; the query modes call destinations
    /// directly and ignore any ambient proxy environment.
    pub fn from_config(config: &RelayConfig) -> Result<Self, ConfigError> {
        let mut builder = reqwest::Client::builder();

        if config.mode.uses_upstream_proxy() {
            let proxy_config = config.upstream_proxy.as_ref().ok_or_else(|| {
                ConfigError::Client("upstream proxy configuration missing".to_string())
            })?;
            let agent = UpstreamProxy::from_config(proxy_config)?;
            builder = builder.proxy(agent.to_proxy()?);
        } else {
            builder = builder.user_agent(BROWSER_USER_AGENT).no_proxy();
        }

        let client = builder
            .build()
            .map_err(|e| ConfigError::Client(e.to_string()))?;

        Ok(Self {
            client,
            timeout: Duration::from_secs(config.relay_timeout_secs()),
        })
    }

    /// Execute one outbound call.
    ///
    /// Any HTTP status is `Ok`; errors are transport-level only. A
    /// malformed target URL surfaces here as [`RelayError::Upstream`].
    pub async fn execute(
        &self,
        method: Method,
        target: &str,
        headers: HeaderMap,
        body: Option<reqwest::Body>,
    ) -> Result<reqwest::Response, RelayError> {
        let mut request = self.client.request(method, target).headers(headers);
        if let Some(body) = body {
            request = request.body(body);
        }

        match tokio::time::timeout(self.timeout, request.send()).await {
            Err(_) => Err(RelayError::Timeout(self.timeout.as_secs())),
            Ok(Err(e)) if e.is_timeout() => Err(RelayError::Timeout(self.timeout.as_secs())),
            Ok(Err(e)) if e.is_connect() => Err(RelayError::Connect(e.to_string())),
            Ok(Err(e)) => Err(RelayError::Upstream(e.to_string())),
            Ok(Ok(response)) => Ok(response),
        }
    }

    /// The configured bound in seconds.
    pub fn timeout_secs(&self) -> u64 {
        self.timeout.as_secs()
    }
}
