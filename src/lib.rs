//! URL probe exporter library.
//!
//! Probes a set of URLs, each on its own schedule, and exports download
//! size, duration and error counts as Prometheus metrics.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod probe;
pub mod scheduler;

pub use config::schema::ExporterConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use probe::{ProbeExecutor, ProbeResult, Target};
pub use scheduler::Scheduler;
