//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name of the consent cookie when none is configured.
pub const DEFAULT_CONSENT_TOKEN: &str = "cookie_limiter";

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Cookie consent policy.
    pub policy: CookieLimiterConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
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

/// Cookie limiter configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CookieLimiterConfig {
    /// Name of the cookie recording the client's decision.
    pub consent_token: String,

    /// Cookies kept even without consent. The consent token is always added.
    pub white_list: Vec<String>,

    /// Expiry for the consent cookie (RFC 3339). Reserved, not used by the policy.
    pub expires: Option<DateTime<Utc>>,
}

impl Default for CookieLimiterConfig {
    fn default() -> Self {
        Self {
            consent_token: DEFAULT_CONSENT_TOKEN.to_string(),
            white_list: Vec::new(),
            expires: None,
        }
    }
}
