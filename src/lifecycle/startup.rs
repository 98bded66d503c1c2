//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the probe client from configuration
//! - Bind the listener before any job starts
//! - Spawn one job and one metrics drain per target
//! - Serve until shutdown, then run the scheduler barrier

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use metrics_exporter_prometheus::BuildError;
use tokio::net::TcpListener;

use crate::config::ExporterConfig;
use crate::http::HttpServer;
use crate::lifecycle::signals;
use crate::observability::metrics::{self, MetricsSink};
use crate::probe::{ProbeExecutor, Target};
use crate::scheduler::{Scheduler, ShutdownReport};

/// Fatal errors of the exporter process.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to install metrics recorder: {0}")]
    Metrics(#[from] BuildError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },

    #[error("HTTP server error: {0}")]
    Serve(std::io::Error),
}

/// Run the exporter until SIGINT or SIGTERM.
pub async fn run(config: ExporterConfig) -> Result<ShutdownReport, StartupError> {
    let sink = MetricsSink::global(metrics::init_metrics()?);
    run_with(config, sink, signals::wait_for_signal()).await
}

/// Run the exporter until `shutdown` resolves.
///
/// Probe results are recorded into `sink` and `/metrics` renders its handle.
pub async fn run_with<F>(
    config: ExporterConfig,
    sink: MetricsSink,
    shutdown: F,
) -> Result<ShutdownReport, StartupError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let executor = ProbeExecutor::new(
        Duration::from_secs(config.probe.timeout_secs),
        config.probe.verify_tls,
    )?;

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: config.listener.bind_address.clone(),
            source,
        })?;

    let default_interval = Duration::from_secs(config.probe.interval_secs);
    let location: Arc<str> = Arc::from(config.probe.location.as_str());

    let mut scheduler = Scheduler::new(executor);
    let mut drains = Vec::with_capacity(config.targets.len());
    for raw in &config.targets {
        let target = Target::parse(raw, default_interval);
        let url = target.url().to_string();
        let results = scheduler.spawn(target);
        drains.push(tokio::spawn(metrics::drain_results(
            results,
            sink.clone(),
            url,
            location.clone(),
        )));
    }

    for job in scheduler.jobs() {
        tracing::debug!(
            url = %job.target(),
            interval_secs = job.target().interval().as_secs(),
            "Job scheduled"
        );
    }

    if scheduler.is_empty() {
        tracing::warn!("No targets configured, serving empty metrics");
    }
    tracing::info!(
        targets = scheduler.len(),
        location = %location,
        timeout_secs = config.probe.timeout_secs,
        verify_tls = config.probe.verify_tls,
        "Scheduler started"
    );

    let served = HttpServer::new(sink.handle()).run(listener, shutdown).await;

    let report = scheduler.shutdown().await;
    // Jobs closed their streams before acknowledging
    join_all(drains).await;
    tracing::info!(
        acknowledged = report.acknowledged,
        lost = report.lost,
        "Scheduler stopped"
    );

    served.map_err(StartupError::Serve)?;
    Ok(report)
}
