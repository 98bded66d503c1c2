//! HTTP exposition subsystem.
//!
//! # Data Flow
//! ```text
//! Scraper / load balancer
//!     → server.rs (Axum router, trace layer)
//!     → /metrics: render Prometheus handle
//!     → /health:  static "OK"
//! ```

pub mod server;

pub use server::HttpServer;
