//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use std::net::{AddrParseError, SocketAddr};

use serde::{Deserialize, Serialize};

/// Root configuration for the rewriting proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address, body limit).
    pub listener: ListenerConfig,

    /// Outbound fetch settings.
    pub upstream: UpstreamConfig,

    /// Inbound request timeouts.
    pub timeouts: TimeoutConfig,

    /// Markup rewriting settings.
    pub rewrite: RewriteConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,

    /// Maximum accepted request body (the `/open` form post).
    pub max_body_bytes: usize,
}

impl ListenerConfig {
    /// Replace the port of `bind_address`, keeping its host.
    pub fn override_port(&mut self, port: u16) -> Result<(), AddrParseError> {
        let mut addr: SocketAddr = self.bind_address.parse()?;
        addr.set_port(port);
        self.bind_address = addr.to_string();
        Ok(())
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            max_body_bytes: 64 * 1024,
        }
    }
}

/// Outbound fetch configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// User-Agent sent when the caller did not provide one.
    pub user_agent: String,

    /// Deadline for response headers, and for reading a body that gets rewritten.
    pub timeout_secs: u64,

    /// TCP/TLS connect timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Redirects followed before giving up.
    pub max_redirects: usize,

    /// Report upstream 5xx as a fetch failure (502) instead of relaying it.
    pub fail_on_server_error: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("rewriting-proxy/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
            max_redirects: 10,
            fail_on_server_error: false,
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Time allowed until response headers are produced, in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 60 }
    }
}

/// Markup rewriting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RewriteConfig {
    /// Inject the status banner into rewritten documents.
    pub banner: bool,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self { banner: true }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
