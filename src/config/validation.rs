//! Configuration validation.
//!
//! Semantic checks only; serde handles syntax. All errors are collected so an
//! operator sees every problem in one run.

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::GatewayConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("upstream.base_url '{0}' is not an absolute http(s) URL")]
    InvalidBaseUrl(String),

    #[error("upstream.path '{0}' must start with '/'")]
    InvalidPath(String),

    #[error("upstream.timeout_ms must be greater than zero")]
    ZeroTimeout,

    #[error("{field} '{value}' is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },
}

pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Some(base) = &config.upstream.base_url {
        let valid = url::Url::parse(base)
            .map(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
            .unwrap_or(false);
        if !valid {
            errors.push(ValidationError::InvalidBaseUrl(base.clone()));
        }
    }

    if !config.upstream.path.starts_with('/') {
        errors.push(ValidationError::InvalidPath(config.upstream.path.clone()));
    }

    if config.upstream.timeout_ms == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
