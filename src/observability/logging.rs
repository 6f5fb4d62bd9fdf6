//! Process log subscriber.
//!
//! # Responsibilities
//! - Initialize the `tracing` subscriber once at startup
//! - Pick text or JSON output from config
//! - Honour `RUST_LOG` over the configured level
//!
//! Application records from the console transport flow through this
//! subscriber too, under the `helloworld::app` target.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::ObservabilityConfig;

/// Filter directives used when `RUST_LOG` is unset.
pub fn default_directives(log_level: &str) -> String {
    format!("helloworld={log_level},tower_http={log_level}")
}

/// Install the global subscriber. Later calls are ignored.
pub fn init_logging(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.log_level)));

    let layer = if config.json_format {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init();
}
