//! Shared utilities for integration and load testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{extract::State, http::StatusCode, Json, Router};
use serde_json::Value;
use tokio::net::TcpListener;

use helloworld::config::{AppConfig, Deployment};
use helloworld::http::HttpServer;
use helloworld::lifecycle::Shutdown;
use helloworld::telemetry::{
    Logger, MemoryTransport, PublishSettings, RecordingEventBus, RecordingMetricsSink, Telemetry,
};

/// A mock sink endpoint that records every JSON body posted to it.
pub struct Collector {
    pub addr: SocketAddr,
    bodies: Arc<Mutex<Vec<Value>>>,
}

impl Collector {
    pub fn url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    pub fn bodies(&self) -> Vec<Value> {
        self.bodies.lock().unwrap().clone()
    }
}

#[derive(Clone)]
struct CollectorState {
    bodies: Arc<Mutex<Vec<Value>>>,
    status: StatusCode,
    reply: &'static str,
}

async fn collect(
    State(state): State<CollectorState>,
    Json(body): Json<Value>,
) -> (StatusCode, &'static str) {
    state.bodies.lock().unwrap().push(body);
    (state.status, state.reply)
}

/// Start a collector that answers every POST with `status` and `reply`.
pub async fn start_collector(status: u16, reply: &'static str) -> Collector {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let bodies = Arc::new(Mutex::new(Vec::new()));

    let state = CollectorState {
        bodies: bodies.clone(),
        status: StatusCode::from_u16(status).unwrap(),
        reply,
    };
    let app = Router::new().fallback(collect).with_state(state);

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Collector { addr, bodies }
}

/// A sink that accepts connections and never answers them.
pub async fn start_silent_sink() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    format!("http://{addr}/")
}

/// HTTP client that never goes through a proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

pub fn deployment(version: &str) -> Deployment {
    Deployment {
        version: version.to_string(),
        hostname: "test-host".to_string(),
        appname: "helloworld".to_string(),
    }
}

/// Sinks and log capture behind an instrumented telemetry context.
pub struct Harness {
    pub events: RecordingEventBus,
    pub traffic: RecordingMetricsSink,
    pub logs: MemoryTransport,
}

impl Harness {
    pub fn new(events: RecordingEventBus, traffic: RecordingMetricsSink) -> Self {
        Self {
            events,
            traffic,
            logs: MemoryTransport::new(),
        }
    }

    pub fn telemetry(&self, version: &str) -> Telemetry {
        let logger = Logger::new(deployment(version), Arc::new(self.logs.clone()));
        Telemetry::instrumented(
            logger,
            Arc::new(self.events.clone()),
            Arc::new(self.traffic.clone()),
            PublishSettings::default(),
        )
    }
}

/// Serve `telemetry` on an ephemeral port.
pub async fn start_service(telemetry: Telemetry) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(AppConfig::default(), telemetry);
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// Poll `check` until it holds or five seconds pass.
pub async fn wait_until<F>(check: F) -> bool
where
    F: Fn() -> bool,
{
    for _ in 0..500 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    check()
}
