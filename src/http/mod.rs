//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, tracing and timeout layers)
//!     → request.rs (capture headers as request metadata)
//!     → telemetry fan-out (detached, see crate::telemetry)
//!     → response.rs (fixed 200 text/plain body)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::RequestMetadata;
pub use server::{AppState, HttpServer};
