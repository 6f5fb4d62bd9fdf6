//! Traffic metric publishing.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::telemetry::error::SinkError;
use crate::telemetry::sink::post_json;

/// Unit attached to page-view samples.
pub const UNIT_NONE: &str = "None";

/// Name of the single dimension on page-view samples.
pub const VERSION_DIMENSION: &str = "Version";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Dimension {
    pub name: String,
    pub value: String,
}

/// One numeric sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MetricDatum {
    pub metric_name: String,
    pub dimensions: Vec<Dimension>,
    pub unit: String,
    pub value: f64,
}

impl MetricDatum {
    /// A single page view, tagged with the deployment version.
    pub fn page_view(metric_name: &str, version: &str) -> Self {
        Self {
            metric_name: metric_name.to_string(),
            dimensions: vec![Dimension {
                name: VERSION_DIMENSION.to_string(),
                value: version.to_string(),
            }],
            unit: UNIT_NONE.to_string(),
            value: 1.0,
        }
    }

    /// Value of a dimension by name.
    pub fn dimension(&self, name: &str) -> Option<&str> {
        self.dimensions
            .iter()
            .find(|d| d.name == name)
            .map(|d| d.value.as_str())
    }
}

/// Metrics sink acknowledgement, kept as the raw response document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricAck(pub Value);

impl Default for MetricAck {
    fn default() -> Self {
        Self(Value::Object(Map::new()))
    }
}

/// External metrics sink.
#[async_trait]
pub trait MetricsSink: Send + Sync {
    async fn put_metric_data(
        &self,
        namespace: &str,
        data: Vec<MetricDatum>,
    ) -> Result<MetricAck, SinkError>;
}

/// Metrics sink reached over HTTP with a JSON body.
#[derive(Debug, Clone)]
pub struct HttpMetricsSink {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpMetricsSink {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl MetricsSink for HttpMetricsSink {
    async fn put_metric_data(
        &self,
        namespace: &str,
        data: Vec<MetricDatum>,
    ) -> Result<MetricAck, SinkError> {
        let body = json!({ "Namespace": namespace, "MetricData": data });
        let text = post_json(&self.client, &self.endpoint, &body).await?;

        if text.trim().is_empty() {
            return Ok(MetricAck::default());
        }
        Ok(MetricAck(serde_json::from_str(&text)?))
    }
}
