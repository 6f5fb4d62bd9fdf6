//! Startup and graceful shutdown.

use std::time::Duration;

use helloworld::config::{parse_config, AppConfig, Mode, TransportKind};
use helloworld::lifecycle::{startup, Shutdown};

mod common;

#[tokio::test]
async fn test_run_stops_on_shutdown() {
    let mut config = AppConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();

    let shutdown = std::sync::Arc::new(Shutdown::new());
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        trigger.trigger();
    });

    let result = tokio::time::timeout(Duration::from_secs(5), startup::run(config, &shutdown))
        .await
        .expect("server did not stop");
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_run_returns_immediately_if_already_shut_down() {
    let mut config = AppConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();

    let shutdown = Shutdown::new();
    shutdown.trigger();

    let result = tokio::time::timeout(Duration::from_secs(5), startup::run(config, &shutdown))
        .await
        .expect("server did not stop");
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_bind_failure_is_reported() {
    let taken = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let mut config = AppConfig::default();
    config.listener.bind_address = taken.local_addr().unwrap().to_string();

    let err = startup::run(config, &Shutdown::new()).await.unwrap_err();
    assert!(matches!(err, startup::StartupError::Bind { .. }));
}

#[tokio::test]
async fn test_instrumented_config_starts_with_http_sinks() {
    let config = parse_config(
        r#"
        mode = "instrumented"

        [listener]
        bind_address = "127.0.0.1:0"

        [events]
        endpoint = "http://127.0.0.1:9/events"

        [traffic]
        endpoint = "http://127.0.0.1:9/metrics"
        "#,
    )
    .unwrap();
    assert_eq!(config.mode, Mode::Instrumented);

    let shutdown = Shutdown::new();
    shutdown.trigger();
    assert!(startup::run(config, &shutdown).await.is_ok());
}

#[tokio::test]
async fn test_shutdown_flush_is_bounded() {
    let mut config = AppConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.logging.transport = TransportKind::Stream;
    config.logging.stream.endpoint = Some(common::start_silent_sink().await);
    config.logging.stream.request_timeout_ms = 60_000;
    config.timeouts.shutdown_flush_secs = 1;

    let shutdown = std::sync::Arc::new(Shutdown::new());
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        trigger.trigger();
    });

    let result = tokio::time::timeout(Duration::from_secs(5), startup::run(config, &shutdown))
        .await
        .expect("shutdown waited on the log stream");
    assert!(result.is_ok());
}
