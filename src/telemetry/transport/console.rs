//! Console transport.
//!
//! Records are re-emitted as `tracing` events so that the process subscriber
//! prefixes them with a timestamp and renders them as text or JSON.

use serde_json::Value;
use tracing::Level;

use crate::telemetry::logger::LogRecord;
use crate::telemetry::transport::Transport;

/// `tracing` target for application records.
pub const TARGET: &str = "helloworld::app";

#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleTransport;

impl ConsoleTransport {
    pub fn new() -> Self {
        Self
    }
}

impl Transport for ConsoleTransport {
    fn name(&self) -> &'static str {
        "console"
    }

    fn send(&self, record: LogRecord) {
        let meta = Value::Object(record.fields).to_string();
        let message = record.message;

        match record.level {
            Level::ERROR => tracing::error!(target: TARGET, meta = %meta, "{message}"),
            Level::WARN => tracing::warn!(target: TARGET, meta = %meta, "{message}"),
            Level::INFO => tracing::info!(target: TARGET, meta = %meta, "{message}"),
            Level::DEBUG => tracing::debug!(target: TARGET, meta = %meta, "{message}"),
            Level::TRACE => tracing::trace!(target: TARGET, meta = %meta, "{message}"),
        }
    }
}
