//! Access event publishing.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::http::RequestMetadata;
use crate::telemetry::error::SinkError;
use crate::telemetry::sink::post_json;

/// One entry submitted to the event bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EventEntry {
    /// Serialized event payload.
    pub detail: String,
    pub detail_type: String,
    pub source: String,
}

impl EventEntry {
    /// Build the access event for one request.
    pub fn access(
        metadata: &RequestMetadata,
        source: &str,
        detail_type: &str,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            detail: metadata.to_json()?,
            detail_type: detail_type.to_string(),
            source: source.to_string(),
        })
    }
}

/// Event bus acknowledgement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PutEventsAck {
    pub entries: Vec<Value>,
    pub failed_entry_count: u32,
}

/// External event bus.
#[async_trait]
pub trait EventBus: Send + Sync {
    async fn put_events(&self, entries: Vec<EventEntry>) -> Result<PutEventsAck, SinkError>;
}

/// Event bus reached over HTTP with a JSON body.
#[derive(Debug, Clone)]
pub struct HttpEventBus {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpEventBus {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl EventBus for HttpEventBus {
    async fn put_events(&self, entries: Vec<EventEntry>) -> Result<PutEventsAck, SinkError> {
        let body = json!({ "Entries": entries });
        let text = post_json(&self.client, &self.endpoint, &body).await?;

        if text.trim().is_empty() {
            return Ok(PutEventsAck::default());
        }
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue};

    #[test]
    fn test_access_entry_wire_shape() {
        let mut headers = HeaderMap::new();
        headers.insert("x-test", HeaderValue::from_static("1"));
        let metadata = RequestMetadata::capture(&headers);

        let entry =
            EventEntry::access(&metadata, "helloworld.app", "hellworld application access request")
                .unwrap();
        let value = serde_json::to_value(&entry).unwrap();

        assert_eq!(value["Source"], "helloworld.app");
        assert_eq!(value["DetailType"], "hellworld application access request");
        assert_eq!(value["Detail"], r#"{"x-test":"1"}"#);
    }

    #[test]
    fn test_ack_tolerates_missing_fields() {
        let ack: PutEventsAck = serde_json::from_str(r#"{"Entries":[{"EventId":"e-1"}]}"#).unwrap();
        assert_eq!(ack.failed_entry_count, 0);
        assert_eq!(ack.entries[0]["EventId"], "e-1");
    }
}
