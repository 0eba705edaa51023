//! Configuration validation.
//!
//! Semantic checks serde cannot express. Returns every problem found, not
//! just the first.

use thiserror::Error;

use crate::config::schema::LivenessConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.host must not be empty")]
    EmptyHost,
    #[error("listener.request_timeout_secs must be greater than 0")]
    ZeroRequestTimeout,
    #[error("probe.interval_ms must be greater than 0")]
    ZeroProbeInterval,
    #[error("probe.max_attempts must be greater than 0")]
    ZeroProbeAttempts,
    #[error("probe.connect_timeout_ms must be greater than 0")]
    ZeroConnectTimeout,
}

pub fn validate_config(config: &LivenessConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.host.trim().is_empty() {
        errors.push(ValidationError::EmptyHost);
    }
    if config.listener.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }
    if config.probe.interval_ms == 0 {
        errors.push(ValidationError::ZeroProbeInterval);
    }
    if config.probe.max_attempts == 0 {
        errors.push(ValidationError::ZeroProbeAttempts);
    }
    if config.probe.connect_timeout_ms == 0 {
        errors.push(ValidationError::ZeroConnectTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
