// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coordinator construction task
//!
//! Construction runs as its own tokio task so that a force reset can abort
//! it. The guard owns the task's cleanup: whatever way the task ends, the
//! restart flag is cleared and an outcome is published to waiters.

use crate::artifact;
use crate::error::LifecycleError;
use crate::manager::Shared;
use crate::state::{InitOutcome, LifecycleState};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tender_adapters::{ConfigLoader, CoordinatorFactory, CoordinatorService, ResourceClient};
use tokio::sync::watch;
use tracing::Instrument;

pub(crate) struct InitGuard<F, L, R>
where
    F: CoordinatorFactory,
    L: ConfigLoader,
    R: ResourceClient,
{
    shared: Arc<Shared<F, L, R>>,
    task_id: u64,
    outcome: watch::Sender<Option<InitOutcome>>,
    /// Artifact written by this task, removed on every failed exit
    artifact: Option<PathBuf>,
    finished: bool,
}

impl<F, L, R> InitGuard<F, L, R>
where
    F: CoordinatorFactory,
    L: ConfigLoader,
    R: ResourceClient,
{
    pub fn new(
        shared: Arc<Shared<F, L, R>>,
        task_id: u64,
        outcome: watch::Sender<Option<InitOutcome>>,
    ) -> Self {
        Self {
            shared,
            task_id,
            outcome,
            artifact: None,
            finished: false,
        }
    }

    pub async fn run(mut self) -> Result<(), LifecycleError> {
        let span = tracing::info_span!("initialize", task_id = self.task_id);
        let start = Instant::now();

        let result = self.construct().instrument(span.clone()).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(()) => {
                tracing::info!(parent: &span, elapsed_ms, "coordinator ready");
                self.finish(InitOutcome::Ready);
                Ok(())
            }
            Err(LifecycleError::Cancelled) => {
                tracing::info!(parent: &span, elapsed_ms, "initialization superseded");
                self.roll_back().instrument(span).await;
                self.finish(InitOutcome::Cancelled);
                Err(LifecycleError::Cancelled)
            }
            Err(e) => {
                tracing::error!(parent: &span, elapsed_ms, error = %e, "initialization failed");
                self.roll_back().instrument(span).await;
                self.finish(InitOutcome::Failed(e.to_string()));
                Err(e)
            }
        }
    }

    async fn construct(&mut self) -> Result<(), LifecycleError> {
        let shared = Arc::clone(&self.shared);
        let settings = &shared.settings;

        let config = shared.loader.load(&settings.base_config).await?;
        let config = shared.loader.enrich(config).await?;
        let resources = config.resources();

        let path = artifact::artifact_path(&settings.transient_dir);
        self.artifact = Some(path.clone());
        artifact::write_artifact(&path, &config).await?;
        if !self.with_slot(|state| state.transient_config_path = Some(path.clone())) {
            return Err(LifecycleError::Cancelled);
        }

        let service = Arc::new(shared.factory.create(&path).await?);
        if !self.with_slot(|state| state.staged = Some(Arc::clone(&service))) {
            close_quietly(service.as_ref()).await;
            return Err(LifecycleError::Cancelled);
        }

        service.setup().await?;
        service.create_baseline_agents().await?;

        let mut state = shared.lock();
        if !state.owns(self.task_id) {
            return Err(LifecycleError::Cancelled);
        }
        let Some(service) = state.staged.take() else {
            return Err(LifecycleError::NotAvailable);
        };
        state.coordinator = Some(service);
        state.initialized = true;
        state.task = None;
        shared.set_restart(&mut state, false);

        if settings.warming.enabled {
            shared.warmer.start(resources, settings.warming.clone());
        }
        Ok(())
    }

    /// Undo a failed construction, then release the restart flag
    async fn roll_back(&mut self) {
        let shared = Arc::clone(&self.shared);
        let staged = {
            let mut state = shared.lock();
            if state.owns(self.task_id) {
                state.coordinator = None;
                state.initialized = false;
                state.transient_config_path = None;
                state.staged.take()
            } else {
                None
            }
        };

        if let Some(service) = staged {
            close_quietly(service.as_ref()).await;
        }
        if let Some(path) = self.artifact.take() {
            artifact::remove_artifact(&path).await;
        }

        let mut state = shared.lock();
        if state.owns(self.task_id) {
            state.task = None;
            shared.set_restart(&mut state, false);
        }
    }

    /// Apply `update` only while this task still owns the state
    fn with_slot(&self, update: impl FnOnce(&mut LifecycleState<F::Service>)) -> bool {
        let mut state = self.shared.lock();
        if state.owns(self.task_id) {
            update(&mut state);
            true
        } else {
            false
        }
    }

    fn finish(&mut self, outcome: InitOutcome) {
        self.finished = true;
        self.outcome.send_replace(Some(outcome));
    }
}

impl<F, L, R> Drop for InitGuard<F, L, R>
where
    F: CoordinatorFactory,
    L: ConfigLoader,
    R: ResourceClient,
{
    fn drop(&mut self) {
        if self.finished {
            return;
        }

        let outcome = if std::thread::panicking() {
            InitOutcome::Failed("initialization panicked".to_string())
        } else {
            InitOutcome::Cancelled
        };

        if let Some(path) = self.artifact.take() {
            artifact::remove_artifact_sync(&path);
        }
        {
            let mut state = self.shared.lock();
            if state.owns(self.task_id) {
                if state.staged.take().is_some() {
                    tracing::warn!(
                        task_id = self.task_id,
                        "discarding coordinator that was never set up"
                    );
                }
                state.coordinator = None;
                state.initialized = false;
                state.transient_config_path = None;
                state.task = None;
                self.shared.set_restart(&mut state, false);
            }
        }

        tracing::debug!(task_id = self.task_id, ?outcome, "initialization ended early");
        self.outcome.send_replace(Some(outcome));
    }
}

/// Close a service, logging instead of failing
pub(crate) async fn close_quietly<S: CoordinatorService>(service: &S) {
    if let Err(e) = service.close().await {
        tracing::warn!(error = %e, "failed to close coordinator");
    }
}
