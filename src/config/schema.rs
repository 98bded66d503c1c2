//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the exporter.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ExporterConfig {
    /// Listener for `/metrics` and `/health`.
    pub listener: ListenerConfig,

    /// Probe scheduling and client settings.
    pub probe: ProbeConfig,

    /// Target URLs, each optionally suffixed with `#<seconds>`.
    pub targets: Vec<String>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
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

/// Probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ProbeConfig {
    /// Default polling interval in seconds.
    pub interval_secs: u64,

    /// Request timeout in seconds, covering the body download.
    pub timeout_secs: u64,

    /// Location label attached to every metric.
    pub location: String,

    /// Verify TLS certificates of probed targets.
    pub verify_tls: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            interval_secs: 15,
            timeout_secs: 120,
            location: "default".to_string(),
            verify_tls: false,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
