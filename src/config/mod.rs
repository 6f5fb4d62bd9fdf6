//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → env.rs (HELLOWORLD_VERSION / HOSTNAME overlay)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → Deployment identity resolved once for the logger
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod env;
pub mod loader;
pub mod schema;
pub mod validation;

pub use env::Deployment;
pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    AppConfig, DeploymentConfig, EventsConfig, ListenerConfig, LoggingConfig, Mode,
    ObservabilityConfig, StreamConfig, TimeoutConfig, TrafficConfig, TransportKind,
};
pub use validation::ValidationError;
