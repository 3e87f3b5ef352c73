//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and value ranges (timeouts > 0, redirect bound)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::ProxyConfig;

/// Upper bound accepted for `upstream.max_redirects`.
pub const MAX_REDIRECTS: usize = 20;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Check `config`, collecting every problem found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("`{}` is not a socket address", config.listener.bind_address),
        ));
    }
    if config.listener.max_body_bytes == 0 {
        errors.push(ValidationError::new("listener.max_body_bytes", "must be greater than 0"));
    }

    if config.upstream.user_agent.trim().is_empty() {
        errors.push(ValidationError::new("upstream.user_agent", "must not be empty"));
    }
    if config.upstream.timeout_secs == 0 {
        errors.push(ValidationError::new("upstream.timeout_secs", "must be greater than 0"));
    }
    if config.upstream.connect_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "upstream.connect_timeout_secs",
            "must be greater than 0",
        ));
    }
    if config.upstream.max_redirects > MAX_REDIRECTS {
        errors.push(ValidationError::new(
            "upstream.max_redirects",
            format!("must be at most {MAX_REDIRECTS}"),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("`{}` is not one of {}", config.observability.log_level, LOG_LEVELS.join(", ")),
        ));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("`{}` is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
