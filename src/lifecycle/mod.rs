//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Install metrics recorder → Build probe client → Bind listener
//!     → Spawn one job per target → Serve /metrics and /health
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop HTTP server → Broadcast cancellation
//!     → Wait for every job to acknowledge → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The listener is bound before jobs start, so a bind failure probes nothing
//! - Shutdown never waits for a probe timeout; in-flight probes are aborted

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{Shutdown, ShutdownSignal};
