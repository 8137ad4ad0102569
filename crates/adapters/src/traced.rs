// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::config::{ConfigError, ConfigLoader};
use crate::coordinator::{CoordinatorError, CoordinatorFactory, CoordinatorService, HealthMap};
use crate::resource::{ResourceClient, ResourceError};
use async_trait::async_trait;
use std::path::Path;
use std::time::Instant;
use tender_core::{CoordinatorConfig, Resource};
use tracing::Instrument;

/// Wrapper that adds tracing to any CoordinatorFactory
#[derive(Clone)]
pub struct TracedCoordinatorFactory<F> {
    inner: F,
}

impl<F> TracedCoordinatorFactory<F> {
    pub fn new(inner: F) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<F: CoordinatorFactory> CoordinatorFactory for TracedCoordinatorFactory<F> {
    type Service = TracedCoordinator<F::Service>;

    async fn create(&self, config_path: &Path) -> Result<Self::Service, CoordinatorError> {
        let span = tracing::info_span!("coordinator.create", config = %config_path.display());
        async {
            // Precondition: the configuration artifact must have been written
            if !config_path.exists() {
                tracing::error!("configuration artifact does not exist");
                return Err(CoordinatorError::CreateFailed(format!(
                    "configuration artifact does not exist: {}",
                    config_path.display()
                )));
            }

            let start = Instant::now();
            let result = self.inner.create(config_path).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(_) => tracing::info!(elapsed_ms, "coordinator constructed"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "construction failed"),
            }

            result.map(TracedCoordinator::new)
        }
        .instrument(span)
        .await
    }
}

/// Wrapper that adds tracing to any CoordinatorService
pub struct TracedCoordinator<S> {
    inner: S,
}

impl<S> TracedCoordinator<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: CoordinatorService> CoordinatorService for TracedCoordinator<S> {
    async fn setup(&self) -> Result<(), CoordinatorError> {
        let span = tracing::info_span!("coordinator.setup");
        async {
            tracing::info!("starting");
            let start = Instant::now();
            let result = self.inner.setup().await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(()) => tracing::info!(elapsed_ms, "setup complete"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "setup failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn create_baseline_agents(&self) -> Result<(), CoordinatorError> {
        let span = tracing::info_span!("coordinator.bootstrap");
        async {
            let result = self.inner.create_baseline_agents().await;
            match &result {
                Ok(()) => tracing::info!("baseline agents created"),
                Err(e) => tracing::error!(error = %e, "bootstrap failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn cleanup_resources(&self) -> Result<(), CoordinatorError> {
        let span = tracing::info_span!("coordinator.cleanup");
        async {
            let result = self.inner.cleanup_resources().await;
            // Cleanup failing is tolerated by teardown
            match &result {
                Ok(()) => tracing::debug!("resources cleaned up"),
                Err(e) => tracing::warn!(error = %e, "cleanup failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn close(&self) -> Result<(), CoordinatorError> {
        let span = tracing::info_span!("coordinator.close");
        async {
            let result = self.inner.close().await;
            match &result {
                Ok(()) => tracing::info!("closed"),
                Err(e) => tracing::warn!(error = %e, "close failed (may be expected)"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn check_health(&self) -> Result<HealthMap, CoordinatorError> {
        let result = self.inner.check_health().await;
        tracing::trace!(components = ?result.as_ref().ok().map(|h| h.len()), "health checked");
        result
    }
}

/// Wrapper that adds tracing to any ConfigLoader
#[derive(Clone)]
pub struct TracedConfigLoader<L> {
    inner: L,
}

impl<L> TracedConfigLoader<L> {
    pub fn new(inner: L) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<L: ConfigLoader> ConfigLoader for TracedConfigLoader<L> {
    async fn load(&self, base: &Path) -> Result<CoordinatorConfig, ConfigError> {
        let span = tracing::info_span!("config.load", base = %base.display());
        async {
            let result = self.inner.load(base).await;
            match &result {
                Ok(config) => tracing::info!(servers = config.servers.len(), "loaded"),
                Err(e) => tracing::error!(error = %e, "load failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn enrich(&self, config: CoordinatorConfig) -> Result<CoordinatorConfig, ConfigError> {
        let span = tracing::info_span!("config.enrich");
        async {
            let result = self.inner.enrich(config).await;
            match &result {
                Ok(config) => tracing::debug!(
                    accessible_paths = config.accessible_paths.len(),
                    has_user = config.user_id.is_some(),
                    "enriched"
                ),
                Err(e) => tracing::error!(error = %e, "enrich failed"),
            }
            result
        }
        .instrument(span)
        .await
    }
}

/// Wrapper that adds tracing to any ResourceClient
#[derive(Clone)]
pub struct TracedResourceClient<R> {
    inner: R,
}

impl<R> TracedResourceClient<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<R: ResourceClient> ResourceClient for TracedResourceClient<R> {
    type Session = R::Session;

    async fn connect(&self, resource: &Resource) -> Result<R::Session, ResourceError> {
        let span = tracing::info_span!("resource.connect", name = %resource.name);
        async {
            tracing::debug!(command = %resource.server.command, "connecting");
            let start = Instant::now();
            let result = self.inner.connect(resource).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(_) => tracing::info!(elapsed_ms, "connected"),
                Err(e) => tracing::warn!(elapsed_ms, error = %e, "connect failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn probe(&self, session: &R::Session) -> Result<Vec<String>, ResourceError> {
        let result = self.inner.probe(session).await;
        match &result {
            Ok(ops) => tracing::debug!(operations = ops.len(), "probed"),
            Err(e) => tracing::warn!(error = %e, "probe failed"),
        }
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
