//! Hello World HTTP service with structured logging and request telemetry.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod telemetry;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use telemetry::Telemetry;
