//! Telemetry subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP handler
//!     → context.rs (record_access: spawn two detached tasks)
//!         → events.rs (access event → EventBus)
//!         → traffic.rs (page-view sample → MetricsSink)
//!     → each task logs its outcome through logger.rs
//!
//! logger.rs (enrich with version/hostname/appname)
//!     → transport/console.rs (timestamped text via tracing)
//!     → transport/stream.rs (batched delivery to a log stream)
//!     → memory.rs (in-process, for embedding and tests)
//! ```
//!
//! # Design Decisions
//! - One explicitly constructed context, no global singletons
//! - Submissions are never retried and never affect the response
//! - Sinks sit behind traits; HTTP/JSON and in-memory implementations ship

pub mod context;
pub mod error;
pub mod events;
pub mod logger;
pub mod memory;
pub(crate) mod sink;
pub mod traffic;
pub mod transport;

pub use context::{AccessTasks, PublishSettings, Telemetry};
pub use error::{PublishError, SinkError, TelemetryError};
pub use events::{EventBus, EventEntry, HttpEventBus, PutEventsAck};
pub use logger::{Level, LogRecord, Logger};
pub use memory::{MemoryTransport, RecordingEventBus, RecordingMetricsSink};
pub use traffic::{Dimension, HttpMetricsSink, MetricAck, MetricDatum, MetricsSink};
pub use transport::{ConsoleTransport, StreamTransport, Transport};
