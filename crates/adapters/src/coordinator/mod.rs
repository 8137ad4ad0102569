// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coordinator service adapters

mod noop;

pub use noop::{NoOpCoordinator, NoOpCoordinatorFactory};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{CoordinatorCall, CoordinatorStep, FakeCoordinator, FakeCoordinatorFactory};

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Component name to status text, as reported by a health check
pub type HealthMap = BTreeMap<String, String>;

/// Errors from coordinator service operations
#[derive(Debug, Clone, Error)]
pub enum CoordinatorError {
    #[error("failed to create coordinator: {0}")]
    CreateFailed(String),
    #[error("connection refused: {0}")]
    ConnectionRefused(String),
    #[error("setup failed: {0}")]
    SetupFailed(String),
    #[error("bootstrap failed: {0}")]
    BootstrapFailed(String),
    #[error("cleanup failed: {0}")]
    CleanupFailed(String),
    #[error("close failed: {0}")]
    CloseFailed(String),
    #[error("health check failed: {0}")]
    HealthCheckFailed(String),
}

/// The orchestration service whose lifecycle is managed
///
/// Once published, a service is shared by many concurrent callers, so every
/// operation takes `&self`.
#[async_trait]
pub trait CoordinatorService: Send + Sync + 'static {
    /// Bring the service up; may be long-running
    async fn setup(&self) -> Result<(), CoordinatorError>;

    /// Create the baseline agents the service needs before first use
    async fn create_baseline_agents(&self) -> Result<(), CoordinatorError>;

    /// Release resource-level state held by the service (sessions, agents)
    async fn cleanup_resources(&self) -> Result<(), CoordinatorError>;

    /// Shut the service down
    async fn close(&self) -> Result<(), CoordinatorError>;

    /// Report per-component health
    async fn check_health(&self) -> Result<HealthMap, CoordinatorError>;
}

/// Constructs coordinator services from a configuration artifact
#[async_trait]
pub trait CoordinatorFactory: Clone + Send + Sync + 'static {
    type Service: CoordinatorService;

    /// Construct a service reading its configuration from `config_path`
    async fn create(&self, config_path: &Path) -> Result<Self::Service, CoordinatorError>;
}
