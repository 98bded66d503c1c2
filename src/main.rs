//! URL Probe Exporter
//!
//! Periodically downloads every configured URL and exposes the results for
//! Prometheus.
//!
//! # Architecture Overview
//!
//! ```text
//!   config ──▶ scheduler ──spawn──▶ job (one per target) ──GET──▶ target URL
//!                  │                  │   ▲
//!            cancellation             │   └── probe executor
//!                  │               results
//!   signals ───────┘                  ▼
//!                               metrics sink ──▶ /metrics ◀── Prometheus
//!                                                /health
//! ```

use clap::Parser;

use url_probe_exporter::config::Args;
use url_probe_exporter::lifecycle::startup;
use url_probe_exporter::observability::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Args::parse().into_config()?;

    logging::init_logging(&config.observability.log_level);

    tracing::info!("url-probe-exporter v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        interval_secs = config.probe.interval_secs,
        timeout_secs = config.probe.timeout_secs,
        targets = config.targets.len(),
        "Configuration loaded"
    );

    let report = startup::run(config).await?;
    if report.lost > 0 {
        tracing::error!(lost = report.lost, "Shutdown finished with lost jobs");
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
