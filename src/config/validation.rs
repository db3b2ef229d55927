//! Configuration validation.
//!
//! Semantic checks run before the server starts. All violations are
//! collected rather than stopping at the first one.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::RelayConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must be greater than zero")]
    ZeroTimeout { field: &'static str },

    #[error("connect timeout ({connect_secs}s) exceeds upstream timeout ({upstream_secs}s)")]
    ConnectExceedsUpstream { connect_secs: u64, upstream_secs: u64 },

    #[error("bind address {0} is not a loopback address")]
    NonLoopbackBind(SocketAddr),

    #[error("unknown log level '{0}'")]
    UnknownLogLevel(String),
}

/// Error returned when a configuration is rejected.
#[derive(Debug, Error)]
#[error("invalid configuration: {}", join(.0))]
pub struct ConfigError(pub Vec<ValidationError>);

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Validate a configuration, returning every violation found.
pub fn validate_config(config: &RelayConfig) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    let bind_address = config.listener.bind_address;
    if !bind_address.ip().is_loopback() {
        errors.push(ValidationError::NonLoopbackBind(bind_address));
    }

    let timeouts = &config.timeouts;

    if timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroTimeout { field: "connect timeout" });
    }
    if timeouts.upstream_secs == 0 {
        errors.push(ValidationError::ZeroTimeout { field: "upstream timeout" });
    }
    if timeouts.connect_secs > timeouts.upstream_secs && timeouts.upstream_secs > 0 {
        errors.push(ValidationError::ConnectExceedsUpstream {
            connect_secs: timeouts.connect_secs,
            upstream_secs: timeouts.upstream_secs,
        });
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError(errors))
    }
}
