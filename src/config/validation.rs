//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (interval and timeout > 0)
//! - Check that the listener address and every target URL parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ExporterConfig → Result<(), Vec<ValidationError>>
//! - Interval overrides below the minimum are not errors; they fall back to
//!   the default when the target is parsed

use std::net::SocketAddr;
use std::time::Duration;

use url::Url;

use crate::config::schema::ExporterConfig;
use crate::probe::Target;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("probe.interval_secs must be at least 1")]
    ZeroInterval,

    #[error("probe.timeout_secs must be at least 1")]
    ZeroTimeout,

    #[error("listener.bind_address {0:?} is not a socket address")]
    InvalidBindAddress(String),

    #[error("target {target:?} is not a valid http(s) URL: {reason}")]
    InvalidTarget { target: String, reason: String },
}

/// Validate a configuration.
pub fn validate_config(config: &ExporterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.probe.interval_secs == 0 {
        errors.push(ValidationError::ZeroInterval);
    }
    if config.probe.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    for raw in &config.targets {
        if let Err(reason) = check_target(raw) {
            errors.push(ValidationError::InvalidTarget {
                target: raw.clone(),
                reason,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_target(raw: &str) -> Result<(), String> {
    let target = Target::parse(raw, Duration::ZERO);
    let url = Url::parse(target.url()).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!("unsupported scheme {other:?}")),
    }
}
