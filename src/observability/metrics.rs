//! Metrics collection and exposition.
//!
//! # Metrics
//! - `url_download_size_bytes_total` (counter): bytes downloaded by url, code, location
//! - `url_download_duration_seconds` (histogram): download time by url, code, location
//! - `url_download_error_total` (counter): failed probes by url, location
//!
//! # Design Decisions
//! - Only successful probes feed size and duration
//! - Every failure kind counts as one error; the kind itself is only logged
//! - Duration buckets match the Prometheus client defaults
//! - Drains record through a [`MetricsSink`], so the recorder that is rendered
//!   is always the one being written to

use std::sync::Arc;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{
    BuildError, Matcher, PrometheusBuilder, PrometheusHandle, PrometheusRecorder,
};

use crate::probe::ProbeResult;
use crate::scheduler::ResultStream;

pub const DOWNLOAD_ERROR_TOTAL: &str = "url_download_error_total";
pub const DOWNLOAD_SIZE_BYTES_TOTAL: &str = "url_download_size_bytes_total";
pub const DOWNLOAD_DURATION_SECONDS: &str = "url_download_duration_seconds";

/// Default Prometheus histogram buckets.
pub const DEFAULT_BUCKETS: [f64; 11] = [
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Exporter settings shared by the installed and test recorders.
pub fn builder() -> Result<PrometheusBuilder, BuildError> {
    PrometheusBuilder::new().set_buckets_for_metric(
        Matcher::Full(DOWNLOAD_DURATION_SECONDS.to_string()),
        &DEFAULT_BUCKETS,
    )
}

/// Install the global recorder and return the handle used to render it.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = builder()?.install_recorder()?;
    describe_metrics();
    tracing::info!("Prometheus recorder installed");
    Ok(handle)
}

/// Register help text for the exported metrics.
pub fn describe_metrics() {
    describe_counter!(DOWNLOAD_ERROR_TOTAL, "Download error total");
    describe_counter!(DOWNLOAD_SIZE_BYTES_TOTAL, "Download size total");
    describe_histogram!(DOWNLOAD_DURATION_SECONDS, "Download Duration");
}

/// Record one probe result.
pub fn record_probe(url: &str, location: &str, result: &ProbeResult) {
    match result.measurement() {
        Some(measurement) => {
            let code = result.code.unwrap_or_default().to_string();
            counter!(
                DOWNLOAD_SIZE_BYTES_TOTAL,
                "url" => url.to_owned(),
                "code" => code.clone(),
                "location" => location.to_owned()
            )
            .increment(measurement.size);
            histogram!(
                DOWNLOAD_DURATION_SECONDS,
                "url" => url.to_owned(),
                "code" => code,
                "location" => location.to_owned()
            )
            .record(measurement.duration.as_secs_f64());
        }
        None => {
            counter!(
                DOWNLOAD_ERROR_TOTAL,
                "url" => url.to_owned(),
                "location" => location.to_owned()
            )
            .increment(1);
        }
    }
}

/// Recorder that job results go to, together with the handle that renders it.
#[derive(Clone)]
pub struct MetricsSink {
    // `None` records through the globally installed recorder
    recorder: Option<Arc<PrometheusRecorder>>,
    handle: PrometheusHandle,
}

impl MetricsSink {
    /// Sink backed by the recorder installed with [`init_metrics`].
    pub fn global(handle: PrometheusHandle) -> Self {
        Self {
            recorder: None,
            handle,
        }
    }

    /// Sink backed by a recorder that is never installed globally.
    pub fn local(recorder: PrometheusRecorder) -> Self {
        let handle = recorder.handle();
        metrics::with_local_recorder(&recorder, describe_metrics);
        Self {
            recorder: Some(Arc::new(recorder)),
            handle,
        }
    }

    pub fn handle(&self) -> PrometheusHandle {
        self.handle.clone()
    }

    /// Record one result into this sink.
    pub fn record(&self, url: &str, location: &str, result: &ProbeResult) {
        match &self.recorder {
            Some(recorder) => metrics::with_local_recorder(recorder.as_ref(), || {
                record_probe(url, location, result)
            }),
            None => record_probe(url, location, result),
        }
    }
}

/// Record every result of one job until its stream closes.
pub async fn drain_results(
    mut results: ResultStream,
    sink: MetricsSink,
    url: String,
    location: Arc<str>,
) {
    while let Some(result) = results.recv().await {
        if let Some(error) = result.error() {
            tracing::debug!(url = %url, kind = error.kind(), "Recording probe failure");
        }
        sink.record(&url, &location, &result);
    }
    tracing::debug!(url = %url, "Result stream closed");
}
