//! In-process sinks.
//!
//! These keep everything they receive in memory. They back embedded use of
//! the service and the test suites, and can be told to fail every
//! submission to exercise the error paths.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;
use tracing::Level;

use crate::telemetry::error::SinkError;
use crate::telemetry::events::{EventBus, EventEntry, PutEventsAck};
use crate::telemetry::logger::LogRecord;
use crate::telemetry::traffic::{MetricAck, MetricDatum, MetricsSink};
use crate::telemetry::transport::Transport;

/// Log transport that keeps records in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all records received so far.
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().expect("memory transport poisoned").clone()
    }

    /// Records at exactly `level`.
    pub fn at_level(&self, level: Level) -> Vec<LogRecord> {
        self.records()
            .into_iter()
            .filter(|r| r.level == level)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().expect("memory transport poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Transport for MemoryTransport {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn send(&self, record: LogRecord) {
        self.records
            .lock()
            .expect("memory transport poisoned")
            .push(record);
    }
}

/// Event bus that records every submission.
#[derive(Debug, Clone, Default)]
pub struct RecordingEventBus {
    entries: Arc<Mutex<Vec<EventEntry>>>,
    failure: Option<String>,
}

impl RecordingEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// A bus that records submissions and then rejects them with `detail`.
    pub fn failing(detail: impl Into<String>) -> Self {
        Self {
            entries: Arc::default(),
            failure: Some(detail.into()),
        }
    }

    /// Every entry submitted, successful or not.
    pub fn entries(&self) -> Vec<EventEntry> {
        self.entries.lock().expect("event bus poisoned").clone()
    }
}

#[async_trait]
impl EventBus for RecordingEventBus {
    async fn put_events(&self, entries: Vec<EventEntry>) -> Result<PutEventsAck, SinkError> {
        let count = entries.len();
        self.entries
            .lock()
            .expect("event bus poisoned")
            .extend(entries);

        if let Some(detail) = &self.failure {
            return Err(SinkError::Unavailable(detail.clone()));
        }

        Ok(PutEventsAck {
            entries: (0..count)
                .map(|_| json!({ "EventId": uuid::Uuid::new_v4().to_string() }))
                .collect(),
            failed_entry_count: 0,
        })
    }
}

/// Metrics sink that records every submission.
#[derive(Debug, Clone, Default)]
pub struct RecordingMetricsSink {
    samples: Arc<Mutex<Vec<(String, MetricDatum)>>>,
    failure: Option<String>,
}

impl RecordingMetricsSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that records submissions and then rejects them with `detail`.
    pub fn failing(detail: impl Into<String>) -> Self {
        Self {
            samples: Arc::default(),
            failure: Some(detail.into()),
        }
    }

    /// Every `(namespace, sample)` submitted, successful or not.
    pub fn samples(&self) -> Vec<(String, MetricDatum)> {
        self.samples.lock().expect("metrics sink poisoned").clone()
    }
}

#[async_trait]
impl MetricsSink for RecordingMetricsSink {
    async fn put_metric_data(
        &self,
        namespace: &str,
        data: Vec<MetricDatum>,
    ) -> Result<MetricAck, SinkError> {
        self.samples
            .lock()
            .expect("metrics sink poisoned")
            .extend(data.into_iter().map(|d| (namespace.to_string(), d)));

        if let Some(detail) = &self.failure {
            return Err(SinkError::Unavailable(detail.clone()));
        }

        Ok(MetricAck(json!({
            "ResponseMetadata": { "RequestId": uuid::Uuid::new_v4().to_string() }
        })))
    }
}
