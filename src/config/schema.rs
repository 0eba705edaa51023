//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files. Every
//! field has a default so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::net::ProbePolicy;

/// Root configuration for the liveness server.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LivenessConfig {
    /// Label reported in every status response.
    pub label: String,

    /// Listener configuration (bind address, request timeout).
    pub listener: ListenerConfig,

    /// Readiness/teardown probe policy.
    pub probe: ProbeConfig,

    /// Diagnostics endpoints.
    pub diagnostics: DiagnosticsConfig,

    /// Logging settings.
    pub logging: LoggingConfig,
}

impl Default for LivenessConfig {
    fn default() -> Self {
        Self {
            label: "blue".to_string(),
            listener: ListenerConfig::default(),
            probe: ProbeConfig::default(),
            diagnostics: DiagnosticsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Host or IP to bind (e.g., "0.0.0.0").
    pub host: String,

    /// Port to bind; `0` lets the OS pick one.
    pub port: u16,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 7701,
            request_timeout_secs: 10,
        }
    }
}

/// Probe policy for start and stop confirmation.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Delay between probes in milliseconds.
    pub interval_ms: u64,

    /// Probes before giving up.
    pub max_attempts: u32,

    /// Bound on a single connect attempt in milliseconds.
    pub connect_timeout_ms: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        let policy = ProbePolicy::default();
        Self {
            interval_ms: policy.interval.as_millis() as u64,
            max_attempts: policy.max_attempts,
            connect_timeout_ms: policy.connect_timeout.as_millis() as u64,
        }
    }
}

impl ProbeConfig {
    pub fn policy(&self) -> ProbePolicy {
        ProbePolicy {
            interval: Duration::from_millis(self.interval_ms),
            max_attempts: self.max_attempts,
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
        }
    }
}

/// Diagnostics endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Serve `/debug/status`.
    pub enabled: bool,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive; `RUST_LOG` takes precedence.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "liveness_server=info,tower_http=info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LivenessConfig::default();
        assert_eq!(config.label, "blue");
        assert_eq!(config.listener.host, "0.0.0.0");
        assert_eq!(config.listener.port, 7701);
        assert!(config.diagnostics.enabled);

        let policy = config.probe.policy();
        assert_eq!(policy.interval, Duration::from_millis(500));
        assert_eq!(policy.max_attempts, 40);
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config: LivenessConfig = toml::from_str("").unwrap();
        assert_eq!(config.label, "blue");
        assert_eq!(config.listener.port, 7701);
        assert_eq!(config.probe.max_attempts, 40);
    }

    #[test]
    fn test_partial_toml() {
        let config: LivenessConfig = toml::from_str(
            r#"
            label = "green"

            [listener]
            port = 9000

            [probe]
            interval_ms = 50
            "#,
        )
        .unwrap();
        assert_eq!(config.label, "green");
        assert_eq!(config.listener.port, 9000);
        assert_eq!(config.listener.host, "0.0.0.0");
        assert_eq!(config.probe.interval_ms, 50);
        assert_eq!(config.probe.max_attempts, 40);
    }
}
