//! Probe outcomes.

use std::time::Duration;

/// A successful download measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measurement {
    /// Time from sending the request to reading the last body byte.
    pub duration: Duration,
    /// Body size in bytes. Always non-zero.
    pub size: u64,
}

/// Why a probe did not produce a measurement.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProbeError {
    /// Connect, TLS, timeout or body read failure.
    #[error("transport error: {0}")]
    Transport(String),
    /// The exchange succeeded but the body was empty.
    #[error("empty response body")]
    EmptyResult,
    /// Shutdown interrupted the probe.
    #[error("probe aborted by shutdown")]
    Abort,
}

impl ProbeError {
    /// Stable label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ProbeError::Transport(_) => "transport-error",
            ProbeError::EmptyResult => "empty-result",
            ProbeError::Abort => "abort",
        }
    }
}

/// Outcome of a single probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    /// HTTP status code, if a response was received.
    pub code: Option<u16>,
    /// Measurement on success, classified error otherwise.
    pub outcome: Result<Measurement, ProbeError>,
}

impl ProbeResult {
    pub fn success(code: u16, measurement: Measurement) -> Self {
        Self {
            code: Some(code),
            outcome: Ok(measurement),
        }
    }

    pub fn failure(code: Option<u16>, error: ProbeError) -> Self {
        Self {
            code,
            outcome: Err(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn measurement(&self) -> Option<&Measurement> {
        self.outcome.as_ref().ok()
    }

    pub fn error(&self) -> Option<&ProbeError> {
        self.outcome.as_ref().err()
    }
}
