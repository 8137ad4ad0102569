// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op coordinator for running without an orchestration engine.

use super::{CoordinatorError, CoordinatorFactory, CoordinatorService, HealthMap};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Factory producing [`NoOpCoordinator`]s.
///
/// Used when the daemon only keeps resources warm, or in minimal deployments.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpCoordinatorFactory;

impl NoOpCoordinatorFactory {
    pub fn new() -> Self {
        Self
    }
}

/// Coordinator that accepts every call and does nothing
#[derive(Debug)]
pub struct NoOpCoordinator {
    config_path: PathBuf,
}

impl NoOpCoordinator {
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }
}

#[async_trait]
impl CoordinatorFactory for NoOpCoordinatorFactory {
    type Service = NoOpCoordinator;

    async fn create(&self, config_path: &Path) -> Result<NoOpCoordinator, CoordinatorError> {
        Ok(NoOpCoordinator {
            config_path: config_path.to_path_buf(),
        })
    }
}

#[async_trait]
impl CoordinatorService for NoOpCoordinator {
    async fn setup(&self) -> Result<(), CoordinatorError> {
        Ok(())
    }

    async fn create_baseline_agents(&self) -> Result<(), CoordinatorError> {
        Ok(())
    }

    async fn cleanup_resources(&self) -> Result<(), CoordinatorError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), CoordinatorError> {
        Ok(())
    }

    async fn check_health(&self) -> Result<HealthMap, CoordinatorError> {
        let mut health = HealthMap::new();
        health.insert("coordinator".to_string(), "noop".to_string());
        Ok(health)
    }
}
