//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and endpoint URLs
//! - Check that the selected mode has the sinks it needs
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{AppConfig, Mode, TransportKind};

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field}: invalid URL '{value}'")]
    InvalidUrl { field: &'static str, value: String },

    #[error("{field}: required when {reason}")]
    Missing { field: &'static str, reason: &'static str },

    #[error("{field}: must be greater than zero")]
    Zero { field: &'static str },

    #[error("{field}: must not be empty")]
    Empty { field: &'static str },
}

/// Validate a deserialized configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero { field: "timeouts.request_secs" });
    }
    if config.timeouts.shutdown_flush_secs == 0 {
        errors.push(ValidationError::Zero { field: "timeouts.shutdown_flush_secs" });
    }

    if config.deployment.appname.trim().is_empty() {
        errors.push(ValidationError::Empty { field: "deployment.appname" });
    }

    let stream = &config.logging.stream;
    if let Some(endpoint) = &stream.endpoint {
        check_url(&mut errors, "logging.stream.endpoint", endpoint);
    }
    if config.logging.transport == TransportKind::Stream {
        if stream.endpoint.is_none() {
            errors.push(ValidationError::Missing {
                field: "logging.stream.endpoint",
                reason: "logging.transport is \"stream\"",
            });
        }
        if stream.batch_size == 0 {
            errors.push(ValidationError::Zero { field: "logging.stream.batch_size" });
        }
        if stream.buffer_size == 0 {
            errors.push(ValidationError::Zero { field: "logging.stream.buffer_size" });
        }
        if stream.flush_interval_ms == 0 {
            errors.push(ValidationError::Zero { field: "logging.stream.flush_interval_ms" });
        }
        if stream.request_timeout_ms == 0 {
            errors.push(ValidationError::Zero { field: "logging.stream.request_timeout_ms" });
        }
        if stream.stream_name.trim().is_empty() {
            errors.push(ValidationError::Empty { field: "logging.stream.stream_name" });
        }
    }

    if let Some(endpoint) = &config.events.endpoint {
        check_url(&mut errors, "events.endpoint", endpoint);
    }
    if let Some(endpoint) = &config.traffic.endpoint {
        check_url(&mut errors, "traffic.endpoint", endpoint);
    }

    if config.mode == Mode::Instrumented {
        if config.events.endpoint.is_none() {
            errors.push(ValidationError::Missing {
                field: "events.endpoint",
                reason: "mode is \"instrumented\"",
            });
        }
        if config.traffic.endpoint.is_none() {
            errors.push(ValidationError::Missing {
                field: "traffic.endpoint",
                reason: "mode is \"instrumented\"",
            });
        }
        if config.traffic.metric_name.trim().is_empty() {
            errors.push(ValidationError::Empty { field: "traffic.metric_name" });
        }
        if config.traffic.namespace.trim().is_empty() {
            errors.push(ValidationError::Empty { field: "traffic.namespace" });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    match url::Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        _ => errors.push(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_instrumented_requires_both_endpoints() {
        let mut config = AppConfig::default();
        config.mode = Mode::Instrumented;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| matches!(
            e,
            ValidationError::Missing { field: "events.endpoint", .. }
        )));
        assert!(errors.iter().any(|e| matches!(
            e,
            ValidationError::Missing { field: "traffic.endpoint", .. }
        )));
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = AppConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.timeouts.request_secs = 0;
        config.deployment.appname = "  ".into();
        config.events.endpoint = Some("ftp://events".into());
        config.logging.transport = TransportKind::Stream;
        config.logging.stream.batch_size = 0;
        config.logging.stream.request_timeout_ms = 0;
        config.timeouts.shutdown_flush_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: "not-an-address".into(),
        }));
        assert!(errors.contains(&ValidationError::Zero { field: "timeouts.request_secs" }));
        assert!(errors.contains(&ValidationError::Empty { field: "deployment.appname" }));
        assert!(errors.contains(&ValidationError::InvalidUrl {
            field: "events.endpoint",
            value: "ftp://events".into(),
        }));
        assert!(errors.contains(&ValidationError::Zero { field: "logging.stream.batch_size" }));
        assert!(errors.contains(&ValidationError::Zero {
            field: "logging.stream.request_timeout_ms"
        }));
        assert!(errors.contains(&ValidationError::Zero { field: "timeouts.shutdown_flush_secs" }));
        assert!(errors.iter().any(|e| matches!(
            e,
            ValidationError::Missing { field: "logging.stream.endpoint", .. }
        )));
    }

    #[test]
    fn test_metrics_address_only_checked_when_enabled() {
        let mut config = AppConfig::default();
        config.observability.metrics_address = "bogus".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }
}
