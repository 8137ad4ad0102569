// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::config::FakeConfigLoader;
use crate::coordinator::{CoordinatorStep, FakeCoordinatorFactory};
use crate::resource::FakeResourceClient;
use std::sync::{Arc, Mutex};
use tender_core::ServerConfig;
use tracing_subscriber::fmt::MakeWriter;

/// A writer that captures log output for testing
#[derive(Clone, Default)]
struct CapturedLogs {
    logs: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    fn new() -> Self {
        Self::default()
    }

    fn contents(&self) -> String {
        let logs = self.logs.lock().unwrap();
        String::from_utf8_lossy(&logs).to_string()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.logs.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run a test with captured tracing output
fn with_tracing<F, Fut>(f: F) -> (String, Fut::Output)
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future,
{
    let logs = CapturedLogs::new();
    let logs_clone = logs.clone();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_writer(logs_clone)
        .with_ansi(false)
        .without_time()
        .finish();

    let result = tracing::subscriber::with_default(subscriber, || {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(f())
    });

    (logs.contents(), result)
}

// =============================================================================
// Precondition validation tests
// =============================================================================

#[tokio::test]
async fn traced_factory_rejects_missing_artifact() {
    let fake = FakeCoordinatorFactory::new();
    let traced = TracedCoordinatorFactory::new(fake.clone());

    let result = traced
        .create(Path::new("/nonexistent/tender/config.toml"))
        .await;

    let err = result.err().unwrap();
    assert!(
        err.to_string()
            .contains("configuration artifact does not exist"),
        "Expected error about artifact, got: {}",
        err
    );
    // The inner factory is never reached
    assert_eq!(fake.create_count(), 0);
}

#[tokio::test]
async fn traced_coordinator_passes_calls_through() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "").unwrap();

    let fake = FakeCoordinatorFactory::new();
    let traced = TracedCoordinatorFactory::new(fake.clone());

    let service = traced.create(&path).await.unwrap();
    service.setup().await.unwrap();
    service.close().await.unwrap();

    assert_eq!(fake.setup_count(), 1);
    assert!(fake.was_closed(service.inner().instance()));
}

// =============================================================================
// Tracing output verification tests
// =============================================================================

#[test]
fn traced_setup_logs_entry_and_completion() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "").unwrap();

    let (logs, result) = with_tracing(|| async {
        let traced = TracedCoordinatorFactory::new(FakeCoordinatorFactory::new());
        let service = traced.create(&path).await?;
        service.setup().await
    });

    assert!(result.is_ok(), "setup should succeed: {:?}", result);
    assert!(
        logs.contains("coordinator.create"),
        "Should log span name. Logs:\n{}",
        logs
    );
    assert!(
        logs.contains("coordinator.setup"),
        "Should log setup span. Logs:\n{}",
        logs
    );
    assert!(
        logs.contains("setup complete"),
        "Should log completion. Logs:\n{}",
        logs
    );
    assert!(
        logs.contains("elapsed_ms"),
        "Should log timing. Logs:\n{}",
        logs
    );
}

#[test]
fn traced_setup_logs_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "").unwrap();

    let (logs, result) = with_tracing(|| async {
        let fake = FakeCoordinatorFactory::new();
        fake.fail_on(
            CoordinatorStep::Setup,
            CoordinatorError::ConnectionRefused("127.0.0.1:7000".to_string()),
        );
        let service = TracedCoordinatorFactory::new(fake).create(&path).await?;
        service.setup().await
    });

    assert!(result.is_err());
    assert!(
        logs.contains("setup failed") && logs.contains("connection refused"),
        "Should log failure with error. Logs:\n{}",
        logs
    );
}

#[test]
fn traced_close_failure_logs_warning() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "").unwrap();

    let (logs, _) = with_tracing(|| async {
        let fake = FakeCoordinatorFactory::new();
        fake.fail_on(
            CoordinatorStep::Close,
            CoordinatorError::CloseFailed("already gone".to_string()),
        );
        let service = TracedCoordinatorFactory::new(fake)
            .create(&path)
            .await
            .unwrap();
        service.close().await
    });

    assert!(
        logs.contains("WARN") && logs.contains("close failed"),
        "Close failure should be a warning. Logs:\n{}",
        logs
    );
}

#[test]
fn traced_config_loader_logs_server_count() {
    let (logs, result) = with_tracing(|| async {
        let config = CoordinatorConfig::new()
            .with_server("a", ServerConfig::new("srv-a"))
            .with_server("b", ServerConfig::new("srv-b"));
        let traced = TracedConfigLoader::new(FakeConfigLoader::new(config));
        traced.load(Path::new("base.toml")).await
    });

    assert!(result.is_ok());
    assert!(
        logs.contains("config.load") && logs.contains("servers=2"),
        "Should log load span and server count. Logs:\n{}",
        logs
    );
}

#[test]
fn traced_resource_connect_logs_failure_as_warning() {
    let (logs, result) = with_tracing(|| async {
        let fake = FakeResourceClient::new();
        fake.fail_connect("search");
        let traced = TracedResourceClient::new(fake);
        traced
            .connect(&Resource::new("search", ServerConfig::new("srv")))
            .await
    });

    assert!(result.is_err());
    assert!(
        logs.contains("resource.connect") && logs.contains("search"),
        "Should log span with resource name. Logs:\n{}",
        logs
    );
    assert!(
        logs.contains("connect failed"),
        "Should log connect failure. Logs:\n{}",
        logs
    );
}
