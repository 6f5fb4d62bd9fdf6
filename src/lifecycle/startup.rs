//! Startup orchestration.
//!
//! Order: metrics exporter, telemetry context, listener, server. Any error
//! before the server starts is fatal. After the server stops the logger is
//! flushed so buffered records reach the log stream, bounded by
//! `timeouts.shutdown_flush_secs`.

use std::net::SocketAddr;
use std::time::Duration;

use serde_json::json;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{AppConfig, ConfigError};
use crate::http::HttpServer;
use crate::lifecycle::shutdown::Shutdown;
use crate::observability::metrics;
use crate::telemetry::{Telemetry, TelemetryError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),

    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),

    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Start every subsystem and serve until `shutdown` fires.
pub async fn run(config: AppConfig, shutdown: &Shutdown) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|_| StartupError::MetricsAddress(config.observability.metrics_address.clone()))?;
        metrics::init_metrics(addr)?;
    }

    let telemetry = Telemetry::from_config(&config)?;
    let logger = telemetry.logger().clone();

    let address = config.listener.bind_address.clone();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })?;
    let local_addr = listener
        .local_addr()
        .map_err(StartupError::Serve)?;

    tracing::info!(
        address = %local_addr,
        mode = ?config.mode,
        transport = logger.transport_name(),
        "Listening for connections"
    );

    let flush_timeout = Duration::from_secs(config.timeouts.shutdown_flush_secs);
    let server = HttpServer::new(config, telemetry);
    let shutdown_rx = shutdown.subscribe();
    if shutdown.is_triggered() {
        tracing::info!("Shutdown requested during startup");
        return Ok(());
    }
    logger.info("Server running", json!({ "address": local_addr.to_string() }));

    let result = server
        .run(listener, shutdown_rx)
        .await
        .map_err(StartupError::Serve);

    if tokio::time::timeout(flush_timeout, logger.flush()).await.is_err() {
        tracing::warn!(
            timeout_secs = flush_timeout.as_secs(),
            "Log flush did not finish before shutdown"
        );
    }
    result
}
