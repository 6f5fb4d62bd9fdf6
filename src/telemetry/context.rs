//! The telemetry context and the per-request fan-out.
//!
//! One [`Telemetry`] is built at startup and shared by every request. For
//! each request, [`Telemetry::record_access`] spawns two detached tasks:
//! one submits the access event, the other the page-view sample. Each task
//! logs its own outcome and nothing else observes it.

use std::sync::Arc;

use serde_json::json;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::config::{AppConfig, Deployment, Mode, TransportKind};
use crate::http::RequestMetadata;
use crate::observability::metrics;
use crate::telemetry::error::{PublishError, SinkError, TelemetryError};
use crate::telemetry::events::{EventBus, EventEntry, HttpEventBus};
use crate::telemetry::logger::Logger;
use crate::telemetry::traffic::{HttpMetricsSink, MetricDatum, MetricsSink};
use crate::telemetry::transport::{ConsoleTransport, StreamTransport, Transport};

/// Fixed tags stamped onto published events and samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishSettings {
    pub source: String,
    pub detail_type: String,
    pub namespace: String,
    pub metric_name: String,
}

impl PublishSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            source: config.events.source.clone(),
            detail_type: config.events.detail_type.clone(),
            namespace: config.traffic.namespace.clone(),
            metric_name: config.traffic.metric_name.clone(),
        }
    }
}

impl Default for PublishSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

struct Publishers {
    events: Arc<dyn EventBus>,
    traffic: Arc<dyn MetricsSink>,
    settings: PublishSettings,
}

/// Logger plus event and metric clients, constructed once per process.
pub struct Telemetry {
    logger: Logger,
    publishers: Option<Arc<Publishers>>,
}

/// Handles of the two submissions spawned for one request.
#[derive(Debug)]
pub struct AccessTasks {
    pub event: JoinHandle<()>,
    pub metric: JoinHandle<()>,
}

impl AccessTasks {
    /// Wait for both submissions to finish, including their outcome logs.
    pub async fn join(self) {
        let _ = self.event.await;
        let _ = self.metric.await;
    }
}

impl Telemetry {
    /// Logger only; requests trigger no submissions.
    pub fn basic(logger: Logger) -> Self {
        Self {
            logger,
            publishers: None,
        }
    }

    /// Logger plus event and metric publishers.
    pub fn instrumented(
        logger: Logger,
        events: Arc<dyn EventBus>,
        traffic: Arc<dyn MetricsSink>,
        settings: PublishSettings,
    ) -> Self {
        Self {
            logger,
            publishers: Some(Arc::new(Publishers {
                events,
                traffic,
                settings,
            })),
        }
    }

    /// Build the context described by a validated configuration.
    ///
    /// Must be called within a Tokio runtime when the stream transport is
    /// selected.
    pub fn from_config(config: &AppConfig) -> Result<Self, TelemetryError> {
        let deployment = Deployment::from_config(config);
        let transport: Arc<dyn Transport> = match config.logging.transport {
            TransportKind::Console => Arc::new(ConsoleTransport::new()),
            TransportKind::Stream => Arc::new(StreamTransport::new(&config.logging.stream)?),
        };
        let logger = Logger::new(deployment, transport);

        match config.mode {
            Mode::Basic => Ok(Self::basic(logger)),
            Mode::Instrumented => {
                let events_endpoint = config
                    .events
                    .endpoint
                    .clone()
                    .ok_or(TelemetryError::MissingEndpoint("events.endpoint"))?;
                let traffic_endpoint = config
                    .traffic
                    .endpoint
                    .clone()
                    .ok_or(TelemetryError::MissingEndpoint("traffic.endpoint"))?;

                let client = reqwest::Client::builder().build()?;
                Ok(Self::instrumented(
                    logger,
                    Arc::new(HttpEventBus::new(client.clone(), events_endpoint)),
                    Arc::new(HttpMetricsSink::new(client, traffic_endpoint)),
                    PublishSettings::from_config(config),
                ))
            }
        }
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn is_instrumented(&self) -> bool {
        self.publishers.is_some()
    }

    /// Fan out one request's telemetry without waiting for it.
    ///
    /// Returns `None` in basic mode. Dropping the handles detaches the tasks.
    pub fn record_access(&self, metadata: RequestMetadata) -> Option<AccessTasks> {
        let publishers = self.publishers.as_ref()?;
        let request_id = Uuid::new_v4();

        let event = tokio::spawn(publish_event(
            self.logger.clone(),
            Arc::clone(publishers),
            metadata,
            request_id,
        ));
        let metric = tokio::spawn(publish_metric(
            self.logger.clone(),
            Arc::clone(publishers),
            request_id,
        ));

        Some(AccessTasks { event, metric })
    }
}

async fn publish_event(
    logger: Logger,
    publishers: Arc<Publishers>,
    metadata: RequestMetadata,
    request_id: Uuid,
) {
    let settings = &publishers.settings;
    let outcome = match EventEntry::access(&metadata, &settings.source, &settings.detail_type) {
        Ok(entry) => publishers.events.put_events(vec![entry]).await,
        Err(e) => Err(SinkError::Encode(e)),
    }
    .map_err(PublishError::EventSubmit);

    match outcome {
        Ok(ack) => {
            metrics::record_submission("event", "success");
            logger.info(
                "created event",
                json!({
                    "entries": ack.entries,
                    "failed_entry_count": ack.failed_entry_count,
                    "request_id": request_id,
                }),
            );
        }
        Err(e) => {
            metrics::record_submission(e.kind(), "failure");
            logger.error(
                "an error occurred when creating an event",
                json!({ "error": e.to_string(), "request_id": request_id }),
            );
        }
    }
}

async fn publish_metric(logger: Logger, publishers: Arc<Publishers>, request_id: Uuid) {
    let settings = &publishers.settings;
    let datum = MetricDatum::page_view(&settings.metric_name, &logger.deployment().version);

    let outcome = publishers
        .traffic
        .put_metric_data(&settings.namespace, vec![datum])
        .await
        .map_err(PublishError::MetricSubmit);

    match outcome {
        Ok(ack) => {
            metrics::record_submission("metric", "success");
            let data = serde_json::to_string(&ack).unwrap_or_default();
            logger.info(
                "created metric",
                json!({ "data": data, "request_id": request_id }),
            );
        }
        Err(e) => {
            metrics::record_submission(e.kind(), "failure");
            logger.error(
                "an error occurred when creating a metric",
                json!({ "error": e.to_string(), "request_id": request_id }),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::memory::{MemoryTransport, RecordingEventBus, RecordingMetricsSink};
    use axum::http::{HeaderMap, HeaderValue};
    use tracing::Level;

    fn deployment() -> Deployment {
        Deployment {
            version: "7.1.0".into(),
            hostname: "ip-172-31-0-9".into(),
            appname: "helloworld".into(),
        }
    }

    fn instrumented(
        events: RecordingEventBus,
        traffic: RecordingMetricsSink,
    ) -> (Telemetry, MemoryTransport) {
        let transport = MemoryTransport::new();
        let logger = Logger::new(deployment(), Arc::new(transport.clone()));
        let telemetry = Telemetry::instrumented(
            logger,
            Arc::new(events),
            Arc::new(traffic),
            PublishSettings::default(),
        );
        (telemetry, transport)
    }

    fn metadata() -> RequestMetadata {
        let mut headers = HeaderMap::new();
        headers.insert("x-test", HeaderValue::from_static("1"));
        headers.insert("host", HeaderValue::from_static("localhost:3000"));
        RequestMetadata::capture(&headers)
    }

    #[tokio::test]
    async fn test_basic_mode_spawns_nothing() {
        let transport = MemoryTransport::new();
        let telemetry = Telemetry::basic(Logger::new(deployment(), Arc::new(transport.clone())));

        assert!(!telemetry.is_instrumented());
        assert!(telemetry.record_access(metadata()).is_none());
        assert!(transport.is_empty());
    }

    #[tokio::test]
    async fn test_successful_fan_out() {
        let events = RecordingEventBus::new();
        let traffic = RecordingMetricsSink::new();
        let (telemetry, transport) = instrumented(events.clone(), traffic.clone());

        telemetry.record_access(metadata()).unwrap().join().await;

        let entries = events.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].source, "helloworld.app");
        let detail: serde_json::Value = serde_json::from_str(&entries[0].detail).unwrap();
        assert_eq!(detail["x-test"], "1");
        assert_eq!(detail["host"], "localhost:3000");

        let samples = traffic.samples();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].0, "Helloworld/traffic");
        assert_eq!(samples[0].1.metric_name, "page_viewwed");
        assert_eq!(samples[0].1.value, 1.0);
        assert_eq!(samples[0].1.dimension("Version"), Some("7.1.0"));

        let infos = transport.at_level(Level::INFO);
        assert_eq!(infos.len(), 2);
        let event_log = infos.iter().find(|r| r.message == "created event").unwrap();
        assert_eq!(event_log.field("entries").unwrap().as_array().unwrap().len(), 1);
        let metric_log = infos.iter().find(|r| r.message == "created metric").unwrap();
        assert!(metric_log.str_field("data").unwrap().contains("RequestId"));
        assert_eq!(event_log.field("request_id"), metric_log.field("request_id"));
        assert!(transport.at_level(Level::ERROR).is_empty());
    }

    #[tokio::test]
    async fn test_failures_log_one_error_each() {
        let events = RecordingEventBus::failing("bus down");
        let traffic = RecordingMetricsSink::failing("throttled");
        let (telemetry, transport) = instrumented(events.clone(), traffic.clone());

        telemetry.record_access(metadata()).unwrap().join().await;

        assert_eq!(events.entries().len(), 1);
        assert_eq!(traffic.samples().len(), 1);

        let errors = transport.at_level(Level::ERROR);
        assert_eq!(errors.len(), 2);
        assert_eq!(transport.len(), 2);

        let event_err = errors
            .iter()
            .find(|r| r.message == "an error occurred when creating an event")
            .unwrap();
        assert!(event_err.str_field("error").unwrap().contains("bus down"));
        let metric_err = errors
            .iter()
            .find(|r| r.message == "an error occurred when creating a metric")
            .unwrap();
        assert!(metric_err.str_field("error").unwrap().contains("throttled"));

        for record in &errors {
            assert_eq!(record.str_field("version"), Some("7.1.0"));
            assert_eq!(record.str_field("hostname"), Some("ip-172-31-0-9"));
            assert_eq!(record.str_field("appname"), Some("helloworld"));
        }
    }

    #[tokio::test]
    async fn test_one_failure_does_not_affect_the_other() {
        let events = RecordingEventBus::failing("bus down");
        let traffic = RecordingMetricsSink::new();
        let (telemetry, transport) = instrumented(events, traffic);

        telemetry.record_access(metadata()).unwrap().join().await;

        assert_eq!(transport.at_level(Level::ERROR).len(), 1);
        let infos = transport.at_level(Level::INFO);
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].message, "created metric");
    }

    #[tokio::test]
    async fn test_from_config_basic_uses_console() {
        let telemetry = Telemetry::from_config(&AppConfig::default()).unwrap();
        assert!(!telemetry.is_instrumented());
        assert_eq!(telemetry.logger().transport_name(), "console");
    }

    #[tokio::test]
    async fn test_from_config_instrumented_needs_endpoints() {
        let mut config = AppConfig::default();
        config.mode = Mode::Instrumented;
        assert!(matches!(
            Telemetry::from_config(&config),
            Err(TelemetryError::MissingEndpoint("events.endpoint"))
        ));

        config.events.endpoint = Some("http://127.0.0.1:1/events".into());
        config.traffic.endpoint = Some("http://127.0.0.1:1/metrics".into());
        let telemetry = Telemetry::from_config(&config).unwrap();
        assert!(telemetry.is_instrumented());
    }
}
