//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the forwarder.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Stream directory on the upstream host.
pub const DEFAULT_BASE_URL: &str = "https://dlhd.dad/stream/";

/// Fixed flags appended to every upstream request.
pub const DEFAULT_QUERY: &str = "disableads=1&no-reload=1&autoplay=1";

pub const DEFAULT_USER_AGENT: &str = "Vercel Serverless Proxy (Node.js)";

/// Root configuration for the forwarder.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ForwarderConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// Where and how streams are fetched.
    pub upstream: UpstreamConfig,

    /// What is done to the upstream response before it reaches the client.
    pub response: ResponseConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl ForwarderConfig {
    /// The reloadable part of the configuration.
    pub fn forwarding(&self) -> ForwardingSettings {
        ForwardingSettings {
            upstream: self.upstream.clone(),
            response: self.response.clone(),
        }
    }
}

/// Settings consulted on every request. Swapped atomically on reload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForwardingSettings {
    pub upstream: UpstreamConfig,
    pub response: ResponseConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Optional TLS configuration.
    pub tls: Option<TlsConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            tls: None,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// Upstream request configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Directory holding the `stream-<id>.php` documents.
    pub base_url: String,

    /// Query string appended verbatim to the target URL.
    pub query: String,

    /// `Referer` sent upstream. Falls back to `base_url` when unset.
    pub referer: Option<String>,

    /// `User-Agent` sent upstream.
    pub user_agent: String,
}

impl UpstreamConfig {
    pub fn referer(&self) -> &str {
        self.referer.as_deref().unwrap_or(&self.base_url)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            query: DEFAULT_QUERY.to_string(),
            referer: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Response rewriting configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ResponseConfig {
    /// When set, replaces whatever `Content-Type` upstream sent.
    pub force_content_type: Option<String>,

    /// Upstream response headers that never reach the client.
    pub strip_headers: Vec<String>,
}

impl Default for ResponseConfig {
    fn default() -> Self {
        Self {
            force_content_type: None,
            strip_headers: vec![
                "x-frame-options".to_string(),
                "content-security-policy".to_string(),
                "content-security-policy-report-only".to_string(),
            ],
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
