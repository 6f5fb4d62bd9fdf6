//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the catch-all fallback handler
//! - Wire up middleware (tracing, request timeout)
//! - Bind server to listener
//! - Trigger the telemetry fan-out for every request

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{HeaderMap, Method},
    response::Response,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::http::request::RequestMetadata;
use crate::http::response;
use crate::observability::metrics;
use crate::telemetry::Telemetry;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub telemetry: Arc<Telemetry>,
}

/// HTTP server for the hello world service.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and telemetry.
    pub fn new(config: AppConfig, telemetry: Telemetry) -> Self {
        let state = AppState {
            telemetry: Arc::new(telemetry),
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn build_router(config: &AppConfig, state: AppState) -> Router {
        // Every request target, including asterisk-form (`OPTIONS *`).
        Router::new()
            .fallback(hello_handler)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http())
    }

    /// A clone of the router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until the shutdown channel fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            mode = ?self.config.mode,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

/// Catch-all handler.
/// Answers immediately; telemetry runs on detached tasks.
async fn hello_handler(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
) -> Response {
    metrics::record_request(&method);

    let metadata = RequestMetadata::capture(&headers);
    // Outcomes are only observed through the logger.
    let _ = state.telemetry.record_access(metadata);

    response::hello_world()
}
