//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router (`/metrics`, `/health`)
//! - Wire up request tracing
//! - Serve until the shutdown future resolves

use std::future::Future;

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::get,
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Content type of the Prometheus text exposition format.
pub const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub metrics: PrometheusHandle,
}

/// HTTP server exposing metrics and liveness.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(metrics: PrometheusHandle) -> Self {
        let router = Self::build_router(AppState { metrics });
        Self { router }
    }

    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/metrics", get(metrics_handler))
            .route("/health", get(health_handler))
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// The router, for serving it elsewhere or driving it in tests.
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Run the server until `shutdown` resolves.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
        state.metrics.render(),
    )
}

async fn health_handler() -> &'static str {
    "OK"
}
