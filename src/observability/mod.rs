//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Jobs produce:
//!     → ResultStream per target
//!     → metrics.rs (counters + histogram, keyed by url/code/location)
//!     → /metrics endpoint (Prometheus scrape)
//!
//! All subsystems produce:
//!     → logging.rs (structured log events)
//! ```

pub mod logging;
pub mod metrics;
