//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the order gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, body limit).
    pub listener: ListenerConfig,

    /// Default upstream order endpoint and call policy.
    pub upstream: UpstreamConfig,

    /// Login credentials and session cookie settings.
    pub auth: AuthConfig,

    /// Product/user lookup fixtures.
    pub catalog: CatalogConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl GatewayConfig {
    /// Apply process environment overrides on top of file values.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base) = lookup(ENV_API_BASE_URL).filter(|v| !v.trim().is_empty()) {
            self.upstream.base_url = Some(base);
        }
        if let Some(path) = lookup(ENV_API_PATH).filter(|v| !v.trim().is_empty()) {
            self.upstream.path = path;
        }
        if let Some(bind) = lookup(ENV_BIND).filter(|v| !v.trim().is_empty()) {
            self.listener.bind_address = bind;
        }
    }
}

pub const ENV_API_BASE_URL: &str = "API_BASE_URL";
pub const ENV_API_PATH: &str = "API_PATH";
pub const ENV_BIND: &str = "ORDER_GATEWAY_BIND";

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum inbound request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_body_bytes: 1024 * 1024,
        }
    }
}

/// Upstream order endpoint and per-call policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the default upstream (e.g., an API gateway stage URL).
    pub base_url: Option<String>,

    /// Path joined onto `base_url` when a request carries no `url`.
    pub path: String,

    /// Deadline for a single call attempt in milliseconds.
    pub timeout_ms: u64,

    /// Retries after the first attempt (total attempts = retries + 1).
    pub retries: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Honor HTTP(S)_PROXY environment variables for upstream calls.
    pub use_system_proxy: bool,
}

impl UpstreamConfig {
    /// The destination used for bare-payload requests.
    ///
    /// Joins with URL reference semantics, so an absolute `path` replaces
    /// whatever path the base URL carries.
    pub fn resolve_default_destination(&self) -> Option<String> {
        let base = self.base_url.as_deref()?;
        let base = url::Url::parse(base).ok()?;
        base.join(&self.path).ok().map(String::from)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            path: "/order".to_string(),
            timeout_ms: 20_000,
            retries: 2,
            base_delay_ms: 400,
            use_system_proxy: true,
        }
    }
}

/// Login credentials and session cookie settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    pub username: String,
    pub password: String,

    /// Name of the session cookie.
    pub cookie_name: String,

    /// Value written into the session cookie on login.
    pub cookie_value: String,

    /// Session cookie lifetime in seconds.
    pub max_age_secs: u64,

    /// Mark the cookie `Secure` (enable behind TLS).
    pub secure_cookie: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            // WARNING: This is a placeholder! Change this in production.
            password: "CHANGE_ME_IN_PRODUCTION".to_string(),
            cookie_name: "auth".to_string(),
            cookie_value: "ok".to_string(),
            max_age_secs: 60 * 60 * 24,
            secure_cookie: false,
        }
    }
}

/// Catalog fixture files (JSON arrays of rows).
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CatalogConfig {
    pub products_file: Option<String>,
    pub users_file: Option<String>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
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

    /// Pretty for development, JSON for log aggregation.
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
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
