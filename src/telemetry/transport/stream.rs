//! Streaming transport to a managed log-delivery sink.
//!
//! Records are queued on a bounded channel and shipped in batches by a
//! background task, either when a batch fills up or on a fixed interval.
//! A full queue drops the record. Failed or timed-out deliveries are
//! reported through `tracing` and discarded; there is no retry.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::oneshot;
use tokio::time::{interval_at, timeout, MissedTickBehavior};

use crate::config::StreamConfig;
use crate::observability::metrics;
use crate::telemetry::error::TelemetryError;
use crate::telemetry::logger::LogRecord;
use crate::telemetry::sink::post_json;
use crate::telemetry::transport::Transport;

enum Command {
    Record(Value),
    Flush(oneshot::Sender<()>),
}

/// Batching log transport.
pub struct StreamTransport {
    tx: mpsc::Sender<Command>,
    dropped: Arc<AtomicU64>,
}

/// Wire body of one delivery batch.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct PutRecordBatch<'a> {
    delivery_stream_name: &'a str,
    records: Vec<StreamRecord>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct StreamRecord {
    data: String,
}

struct Worker {
    client: reqwest::Client,
    endpoint: String,
    stream_name: String,
    batch_size: usize,
    flush_interval: Duration,
    request_timeout: Duration,
}

impl StreamTransport {
    /// Start the background shipper. Must be called within a Tokio runtime.
    pub fn new(config: &StreamConfig) -> Result<Self, TelemetryError> {
        let endpoint = config
            .endpoint
            .clone()
            .ok_or(TelemetryError::MissingEndpoint("logging.stream.endpoint"))?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms.max(1)))
            .build()?;
        Ok(Self::with_client(client, endpoint, config))
    }

    /// Start the background shipper with a caller-supplied HTTP client.
    pub fn with_client(client: reqwest::Client, endpoint: String, config: &StreamConfig) -> Self {
        let (tx, rx) = mpsc::channel(config.buffer_size.max(1));

        let worker = Worker {
            client,
            endpoint,
            stream_name: config.stream_name.clone(),
            batch_size: config.batch_size.max(1),
            flush_interval: Duration::from_millis(config.flush_interval_ms.max(1)),
            request_timeout: Duration::from_millis(config.request_timeout_ms.max(1)),
        };
        tracing::info!(
            endpoint = %worker.endpoint,
            stream = %worker.stream_name,
            batch_size = worker.batch_size,
            "Log stream transport started"
        );
        tokio::spawn(worker.run(rx));

        Self {
            tx,
            dropped: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Records dropped because the queue was full or the shipper was gone.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Transport for StreamTransport {
    fn name(&self) -> &'static str {
        "stream"
    }

    fn send(&self, record: LogRecord) {
        match self.tx.try_send(Command::Record(record.to_json())) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) | Err(TrySendError::Closed(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                metrics::record_log_dropped();
            }
        }
    }

    async fn flush(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.tx.send(Command::Flush(ack_tx)).await.is_ok() {
            let _ = ack_rx.await;
        }
    }
}

impl Worker {
    async fn run(self, mut rx: mpsc::Receiver<Command>) {
        let mut batch: Vec<Value> = Vec::with_capacity(self.batch_size);
        let mut ticker = interval_at(
            tokio::time::Instant::now() + self.flush_interval,
            self.flush_interval,
        );
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                command = rx.recv() => match command {
                    Some(Command::Record(entry)) => {
                        batch.push(entry);
                        if batch.len() >= self.batch_size {
                            self.ship(&mut batch).await;
                        }
                    }
                    Some(Command::Flush(ack)) => {
                        self.ship(&mut batch).await;
                        let _ = ack.send(());
                    }
                    None => {
                        self.ship(&mut batch).await;
                        break;
                    }
                },
                _ = ticker.tick() => {
                    self.ship(&mut batch).await;
                }
            }
        }

        tracing::debug!(stream = %self.stream_name, "Log stream transport stopped");
    }

    async fn ship(&self, batch: &mut Vec<Value>) {
        if batch.is_empty() {
            return;
        }

        let start = Instant::now();
        let count = batch.len();
        let body = PutRecordBatch {
            delivery_stream_name: &self.stream_name,
            records: batch
                .drain(..)
                .map(|entry| StreamRecord {
                    data: format!("{entry}\n"),
                })
                .collect(),
        };

        // The shipper is a single task, so a silent sink must not stall it.
        let delivery = timeout(
            self.request_timeout,
            post_json(&self.client, &self.endpoint, &body),
        )
        .await;
        match delivery {
            Ok(Ok(_)) => {
                tracing::debug!(count, stream = %self.stream_name, "Flushed log batch");
                metrics::record_log_flush(start, count, "success");
            }
            Ok(Err(e)) => {
                tracing::error!(
                    count,
                    stream = %self.stream_name,
                    error = %e,
                    "Log batch delivery failed"
                );
                metrics::record_log_flush(start, count, "failure");
            }
            Err(_) => {
                tracing::error!(
                    count,
                    stream = %self.stream_name,
                    timeout_ms = self.request_timeout.as_millis() as u64,
                    "Log batch delivery timed out"
                );
                metrics::record_log_flush(start, count, "timeout");
            }
        }
    }
}
