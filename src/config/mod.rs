//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → args.rs (command-line flags override file values)
//!     → validation.rs (semantic checks)
//!     → ExporterConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; targets never change while running
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod args;
pub mod loader;
pub mod schema;
pub mod validation;

pub use args::Args;
pub use loader::{read_config, ConfigError};
pub use schema::{ExporterConfig, ListenerConfig, ObservabilityConfig, ProbeConfig};
