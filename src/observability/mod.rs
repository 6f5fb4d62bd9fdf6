//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (process tracing subscriber)
//!     → metrics.rs (local counters, histograms)
//!
//! Consumers:
//!     → stdout (text or JSON)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Process diagnostics use `tracing` directly
//! - Application records go through `crate::telemetry::Logger`
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
