// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coordinator teardown

use crate::artifact;
use crate::init::close_quietly;
use crate::manager::LifecycleManager;
use tender_adapters::{ConfigLoader, CoordinatorFactory, CoordinatorService, ResourceClient};

impl<F, L, R> LifecycleManager<F, L, R>
where
    F: CoordinatorFactory,
    L: ConfigLoader,
    R: ResourceClient,
{
    /// Tear the coordinator down and return to a clean state
    ///
    /// Idempotent and infallible: safe when never initialized, already torn
    /// down, or mid-failure. An in-flight initialization is aborted without
    /// waiting for it.
    pub async fn tear_down(&self) {
        let (task, coordinator, staged, path) = {
            let mut state = self.shared.lock();
            let taken = (
                state.task.take(),
                state.coordinator.take(),
                state.staged.take(),
                state.transient_config_path.take(),
            );
            state.initialized = false;
            self.shared.set_restart(&mut state, false);
            // Under the state lock, so a commit cannot start a new cycle after this
            self.shared.warmer.stop();
            taken
        };

        if let Some(task) = task {
            task.abort.abort();
            tracing::info!(task_id = task.id, "aborted in-flight initialization");
        }

        if let Some(coordinator) = coordinator {
            if let Err(e) = coordinator.cleanup_resources().await {
                tracing::warn!(error = %e, "coordinator resource cleanup failed");
            }
            close_quietly(coordinator.as_ref()).await;
            tracing::info!("coordinator torn down");
        }
        if let Some(staged) = staged {
            close_quietly(staged.as_ref()).await;
        }
        if let Some(path) = path {
            artifact::remove_artifact(&path).await;
        }
    }
}

#[cfg(test)]
#[path = "teardown_tests.rs"]
mod tests;
