//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the hello world service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Which variant of the service to run.
    pub mode: Mode,

    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Deployment identity attached to every log record.
    pub deployment: DeploymentConfig,

    /// Structured logger transport settings.
    pub logging: LoggingConfig,

    /// Access event publisher settings.
    pub events: EventsConfig,

    /// Traffic metric publisher settings.
    pub traffic: TrafficConfig,

    /// Process observability settings.
    pub observability: ObservabilityConfig,
}

/// Service variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// HTTP server plus console logger.
    #[default]
    Basic,
    /// HTTP server plus structured logger, event and metric publishers.
    Instrumented,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,

    /// Upper bound on the final log flush during shutdown, in seconds.
    pub shutdown_flush_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            shutdown_flush_secs: 10,
        }
    }
}

/// Deployment identity.
///
/// `version` and `hostname` are normally left unset here and come from the
/// `HELLOWORLD_VERSION` and `HOSTNAME` environment variables.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DeploymentConfig {
    /// Deployment version string.
    pub version: Option<String>,

    /// Host identifier.
    pub hostname: Option<String>,

    /// Fixed application name.
    pub appname: String,
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            version: None,
            hostname: None,
            appname: "helloworld".to_string(),
        }
    }
}

/// Log transport selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Timestamped text through the process subscriber.
    #[default]
    Console,
    /// Batched delivery to a managed log stream.
    Stream,
}

/// Structured logger configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// Where log records are forwarded.
    pub transport: TransportKind,

    /// Streaming transport settings (used when `transport = "stream"`).
    pub stream: StreamConfig,
}

/// Streaming log transport configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Log delivery endpoint URL.
    pub endpoint: Option<String>,

    /// Delivery stream name.
    pub stream_name: String,

    /// Records per batch before an eager flush.
    pub batch_size: usize,

    /// Periodic flush interval in milliseconds.
    pub flush_interval_ms: u64,

    /// Queue capacity; records beyond it are dropped.
    pub buffer_size: usize,

    /// Per-batch delivery timeout in milliseconds.
    pub request_timeout_ms: u64,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            stream_name: "FirehoseLogs".to_string(),
            batch_size: 500,
            flush_interval_ms: 1000,
            buffer_size: 10_000,
            request_timeout_ms: 5000,
        }
    }
}

/// Access event publisher configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Event bus endpoint URL.
    pub endpoint: Option<String>,

    /// Source tag on every access event.
    pub source: String,

    /// Detail type tag on every access event.
    pub detail_type: String,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            source: "helloworld.app".to_string(),
            // Kept verbatim for compatibility with existing event rules.
            detail_type: "hellworld application access request".to_string(),
        }
    }
}

/// Traffic metric publisher configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TrafficConfig {
    /// Metrics sink endpoint URL.
    pub endpoint: Option<String>,

    /// Metric namespace.
    pub namespace: String,

    /// Metric name.
    pub metric_name: String,
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            namespace: "Helloworld/traffic".to_string(),
            // Existing dashboards key on this spelling.
            metric_name: "page_viewwed".to_string(),
        }
    }
}

/// Process observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit process logs as JSON instead of text.
    pub json_format: bool,

    /// Enable the Prometheus scrape endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_format: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
