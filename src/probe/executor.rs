//! Probe execution.
//!
//! # Responsibilities
//! - Issue one GET per probe with a hard client-side timeout
//! - Time the exchange from request start to the last body byte
//! - Read the body on a separate task so shutdown can abandon it
//! - Classify the outcome (measurement, transport error, empty body, abort)

use std::time::{Duration, Instant};

use reqwest::{header, redirect, Client, ClientBuilder, Response};

use crate::lifecycle::ShutdownSignal;
use crate::probe::result::{Measurement, ProbeError, ProbeResult};
use crate::probe::target::Target;

/// Runs probes against targets using a shared HTTP client.
#[derive(Debug, Clone)]
pub struct ProbeExecutor {
    client: Client,
}

impl ProbeExecutor {
    /// Build an executor with the given request timeout.
    ///
    /// When `verify_tls` is false, invalid or self-signed certificates are
    /// accepted.
    pub fn new(timeout: Duration, verify_tls: bool) -> Result<Self, reqwest::Error> {
        let client = Self::client_builder(timeout, verify_tls).build()?;
        Ok(Self::with_client(client))
    }

    /// Client settings used by [`ProbeExecutor::new`].
    pub fn client_builder(timeout: Duration, verify_tls: bool) -> ClientBuilder {
        Client::builder()
            .timeout(timeout)
            .redirect(redirect::Policy::none())
            .danger_accept_invalid_certs(!verify_tls)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
    }

    /// Wrap an existing client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Probe `target` once.
    ///
    /// Returns [`ProbeError::Abort`] as soon as `cancel` fires, without
    /// waiting for the in-flight request.
    pub async fn execute(&self, target: &Target, cancel: &mut ShutdownSignal) -> ProbeResult {
        tracing::debug!(url = %target, "Starting probe");

        let started = Instant::now();
        let request = self
            .client
            .get(target.url())
            .header(header::CACHE_CONTROL, "no-cache")
            .send();

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!(url = %target, "Probe aborted before response");
                return ProbeResult::failure(None, ProbeError::Abort);
            }
            sent = request => match sent {
                Ok(response) => response,
                Err(e) => {
                    tracing::warn!(url = %target, error = %e, "Probe request failed");
                    return ProbeResult::failure(None, ProbeError::Transport(e.to_string()));
                }
            },
        };

        let code = response.status().as_u16();
        let mut body = tokio::spawn(read_body(response));

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                // Dropping the response closes the connection
                body.abort();
                tracing::info!(url = %target, code, "Probe aborted during body read");
                ProbeResult::failure(Some(code), ProbeError::Abort)
            }
            joined = &mut body => match joined {
                Ok(Ok(0)) => {
                    tracing::warn!(url = %target, code, "Probe returned an empty body");
                    ProbeResult::failure(Some(code), ProbeError::EmptyResult)
                }
                Ok(Ok(size)) => {
                    let duration = started.elapsed();
                    tracing::info!(
                        url = %target,
                        code,
                        size,
                        duration_ms = duration.as_millis() as u64,
                        "Probe finished"
                    );
                    ProbeResult::success(code, Measurement { duration, size })
                }
                Ok(Err(e)) => {
                    tracing::warn!(url = %target, code, error = %e, "Probe body read failed");
                    ProbeResult::failure(Some(code), ProbeError::Transport(e.to_string()))
                }
                Err(e) => {
                    tracing::error!(url = %target, code, error = %e, "Body read task failed");
                    ProbeResult::failure(Some(code), ProbeError::Transport(e.to_string()))
                }
            },
        }
    }
}

/// Read the body to completion, counting bytes without buffering them.
async fn read_body(mut response: Response) -> Result<u64, reqwest::Error> {
    let mut size = 0u64;
    while let Some(chunk) = response.chunk().await? {
        size += chunk.len() as u64;
    }
    Ok(size)
}
