//! Configuration validation.
//!
//! Serde handles syntax; this module checks values that parse but cannot
//! work (bad URLs, header names reqwest would reject, unknown log levels).
//! All problems are reported at once, not just the first.

use reqwest::header::HeaderName;
use thiserror::Error;
use url::Url;

use crate::config::schema::ClientConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("api.base_url '{value}' is not a valid URL: {reason}")]
    InvalidBaseUrl { value: String, reason: String },

    #[error("api.base_url scheme must be http or https, got '{0}'")]
    UnsupportedScheme(String),

    #[error("api.address_header '{0}' is not a valid HTTP header name")]
    InvalidHeaderName(String),

    #[error("observability.log_level '{0}' is not one of trace, debug, info, warn, error")]
    UnknownLogLevel(String),

    #[error("signer.private_key_env must not be empty")]
    EmptyKeyEnv,
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.api.base_url) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                errors.push(ValidationError::UnsupportedScheme(url.scheme().to_string()));
            }
        }
        Err(e) => errors.push(ValidationError::InvalidBaseUrl {
            value: config.api.base_url.clone(),
            reason: e.to_string(),
        }),
    }

    if HeaderName::from_bytes(config.api.address_header.as_bytes()).is_err() {
        errors.push(ValidationError::InvalidHeaderName(
            config.api.address_header.clone(),
        ));
    }

    if !LOG_LEVELS.contains(&config.observability.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if config.signer.private_key_env.trim().is_empty() {
        errors.push(ValidationError::EmptyKeyEnv);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
