//! Structured logger with deployment enrichment.
//!
//! Every record passes through [`Logger::log`], which stamps `version`,
//! `hostname` and `appname` onto the record's fields before handing it to
//! the transport. There is exactly one enrichment rule and no way to skip it.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

pub use tracing::Level;

use crate::config::Deployment;
use crate::telemetry::transport::Transport;

/// Lower-case name of a level, as written on the wire.
pub const fn level_str(level: Level) -> &'static str {
    match level {
        Level::TRACE => "trace",
        Level::DEBUG => "debug",
        Level::INFO => "info",
        Level::WARN => "warn",
        Level::ERROR => "error",
    }
}

/// A single enriched log record.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub level: Level,
    pub message: String,
    pub fields: Map<String, Value>,
}

impl LogRecord {
    /// Look up a field by name.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Look up a string field by name.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Flattened JSON form shipped to the log stream.
    pub fn to_json(&self) -> Value {
        let mut object = self.fields.clone();
        object.insert(
            "timestamp".into(),
            Value::String(self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        object.insert("level".into(), Value::String(level_str(self.level).into()));
        object.insert("message".into(), Value::String(self.message.clone()));
        Value::Object(object)
    }
}

/// Process-wide structured logger. Cheap to clone.
#[derive(Clone)]
pub struct Logger {
    inner: Arc<Inner>,
}

struct Inner {
    deployment: Deployment,
    transport: Arc<dyn Transport>,
}

impl Logger {
    pub fn new(deployment: Deployment, transport: Arc<dyn Transport>) -> Self {
        Self {
            inner: Arc::new(Inner {
                deployment,
                transport,
            }),
        }
    }

    /// The identity stamped onto every record.
    pub fn deployment(&self) -> &Deployment {
        &self.inner.deployment
    }

    /// Name of the active transport.
    pub fn transport_name(&self) -> &'static str {
        self.inner.transport.name()
    }

    /// Enrich and forward one record.
    ///
    /// `fields` is normally a JSON object. `null` means no fields; any other
    /// value is kept under a `meta` key.
    pub fn log(&self, level: Level, message: impl Into<String>, fields: Value) {
        let mut fields = match fields {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("meta".into(), other);
                map
            }
        };
        self.enrich(&mut fields);

        self.inner.transport.send(LogRecord {
            timestamp: Utc::now(),
            level,
            message: message.into(),
            fields,
        });
    }

    fn enrich(&self, fields: &mut Map<String, Value>) {
        let deployment = &self.inner.deployment;
        fields.insert("version".into(), Value::String(deployment.version.clone()));
        fields.insert("hostname".into(), Value::String(deployment.hostname.clone()));
        fields.insert("appname".into(), Value::String(deployment.appname.clone()));
    }

    pub fn error(&self, message: impl Into<String>, fields: Value) {
        self.log(Level::ERROR, message, fields);
    }

    pub fn warn(&self, message: impl Into<String>, fields: Value) {
        self.log(Level::WARN, message, fields);
    }

    pub fn info(&self, message: impl Into<String>, fields: Value) {
        self.log(Level::INFO, message, fields);
    }

    pub fn debug(&self, message: impl Into<String>, fields: Value) {
        self.log(Level::DEBUG, message, fields);
    }

    /// Wait until everything logged so far has been handed to the sink.
    pub async fn flush(&self) {
        self.inner.transport.flush().await;
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("deployment", &self.inner.deployment)
            .field("transport", &self.inner.transport.name())
            .finish()
    }
}
