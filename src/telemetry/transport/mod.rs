//! Log transports.
//!
//! A transport receives already-enriched records. `send` must never block
//! the caller; delivery problems stay inside the transport.

pub mod console;
pub mod stream;

use async_trait::async_trait;

use crate::telemetry::logger::LogRecord;

pub use console::ConsoleTransport;
pub use stream::StreamTransport;

/// Destination for enriched log records.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Short name for diagnostics.
    fn name(&self) -> &'static str;

    /// Hand off one record without waiting for delivery.
    fn send(&self, record: LogRecord);

    /// Wait until previously sent records have left the process.
    async fn flush(&self) {}
}
