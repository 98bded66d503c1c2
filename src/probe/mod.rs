//! Probing subsystem.
//!
//! # Data Flow
//! ```text
//! Raw target string ("https://example.com/#30")
//!     → target.rs (strip interval suffix, pick effective interval)
//!     → executor.rs (GET + cancellable body read)
//!     → result.rs (ProbeResult: measurement or classified error)
//! ```
//!
//! # Design Decisions
//! - A probe is exactly one attempt; retries are not attempted
//! - Redirects are reported, never followed
//! - Shutdown interrupts an in-flight probe instead of waiting for its timeout

pub mod executor;
pub mod result;
pub mod target;

pub use executor::ProbeExecutor;
pub use result::{Measurement, ProbeError, ProbeResult};
pub use target::{Target, MIN_INTERVAL_SECS};
