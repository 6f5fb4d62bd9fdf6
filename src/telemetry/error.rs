//! Telemetry error definitions.

use thiserror::Error;

/// Failure reported by an outbound sink.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Connection or protocol failure talking to the sink.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The sink answered with a non-success status.
    #[error("sink returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Request or acknowledgement could not be (de)serialized.
    #[error("encoding error: {0}")]
    Encode(#[from] serde_json::Error),

    /// The sink refused the submission outright.
    #[error("sink unavailable: {0}")]
    Unavailable(String),
}

/// The two observable telemetry failure kinds.
///
/// Both are terminal for their submission: logged once, never retried.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("event submission failed: {0}")]
    EventSubmit(#[source] SinkError),

    #[error("metric submission failed: {0}")]
    MetricSubmit(#[source] SinkError),
}

impl PublishError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            PublishError::EventSubmit(_) => "event",
            PublishError::MetricSubmit(_) => "metric",
        }
    }
}

/// Errors constructing the telemetry context.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("missing endpoint: {0}")]
    MissingEndpoint(&'static str),
}
