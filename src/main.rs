//! Hello World service.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request          ┌────────────────────────────────────────────┐
//!     ────────────────────────┼─▶ http::server ──▶ response "Hello World" ─┼──▶ Client
//!                             │        │                                   │
//!                             │        ▼ (detached tasks)                  │
//!                             │   telemetry::context                       │
//!                             │     ├─▶ events  ──▶ event bus              │
//!                             │     └─▶ traffic ──▶ metrics sink           │
//!                             │        │                                   │
//!                             │        ▼                                   │
//!                             │   telemetry::logger (enrich)               │
//!                             │     └─▶ console | log stream               │
//!                             └────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use helloworld::config::load_config;
use helloworld::lifecycle::{signals, startup, Shutdown};
use helloworld::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "helloworld")]
#[command(about = "Hello World HTTP service with request telemetry", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "HELLOWORLD_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // No subscriber exists yet, so config errors go straight to stderr.
    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("helloworld: {e}");
            std::process::exit(1);
        }
    };
    init_logging(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        mode = ?config.mode,
        bind_address = %config.listener.bind_address,
        "helloworld starting"
    );

    let shutdown = Arc::new(Shutdown::new());
    signals::spawn_signal_listener(shutdown.clone());

    if let Err(e) = startup::run(config, &shutdown).await {
        tracing::error!(error = %e, "helloworld failed");
        std::process::exit(1);
    }

    tracing::info!("Shutdown complete");
}
