// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coordinator lifecycle manager
//!
//! One manager owns one coordinator service. All lifecycle state sits behind
//! a single lock that is never held across an await; the restart flag is
//! mirrored into a watch channel so waiters can sleep on it.

use crate::error::LifecycleError;
use crate::init::InitGuard;
use crate::state::{InitTask, LifecycleSnapshot, LifecycleState};
use crate::warmer::ResourceWarmer;
use std::sync::{Arc, Mutex, MutexGuard};
use tender_adapters::{
    ConfigLoader, CoordinatorFactory, CoordinatorService, HealthMap, ResourceClient,
};
use tender_core::{LifecycleSettings, WarmingStatus};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Collaborators the manager drives
pub struct LifecycleDeps<F, L, R> {
    pub factory: F,
    pub loader: L,
    pub resources: R,
}

/// Brings the coordinator service up and down under concurrent callers
pub struct LifecycleManager<F, L, R>
where
    F: CoordinatorFactory,
    L: ConfigLoader,
    R: ResourceClient,
{
    pub(crate) shared: Arc<Shared<F, L, R>>,
}

impl<F, L, R> Clone for LifecycleManager<F, L, R>
where
    F: CoordinatorFactory,
    L: ConfigLoader,
    R: ResourceClient,
{
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

pub(crate) struct Shared<F, L, R>
where
    F: CoordinatorFactory,
    R: ResourceClient,
{
    pub factory: F,
    pub loader: L,
    pub settings: LifecycleSettings,
    pub warmer: ResourceWarmer<R>,
    state: Mutex<LifecycleState<F::Service>>,
    restart: watch::Sender<bool>,
}

impl<F, L, R> Shared<F, L, R>
where
    F: CoordinatorFactory,
    R: ResourceClient,
{
    pub fn lock(&self) -> MutexGuard<'_, LifecycleState<F::Service>> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Set the restart flag; callers hold the state lock
    pub fn set_restart(&self, state: &mut LifecycleState<F::Service>, busy: bool) {
        state.restart_in_progress = busy;
        self.restart.send_replace(busy);
    }

    pub fn restart_watch(&self) -> watch::Receiver<bool> {
        self.restart.subscribe()
    }
}

enum Decision {
    Done,
    AwaitRestart,
    Join(JoinHandle<Result<(), LifecycleError>>),
}

impl<F, L, R> LifecycleManager<F, L, R>
where
    F: CoordinatorFactory,
    L: ConfigLoader,
    R: ResourceClient,
{
    pub fn new(deps: LifecycleDeps<F, L, R>, settings: LifecycleSettings) -> Self {
        let (restart, _) = watch::channel(false);
        Self {
            shared: Arc::new(Shared {
                factory: deps.factory,
                loader: deps.loader,
                settings,
                warmer: ResourceWarmer::new(deps.resources),
                state: Mutex::new(LifecycleState::default()),
                restart,
            }),
        }
    }

    pub fn settings(&self) -> &LifecycleSettings {
        &self.shared.settings
    }

    /// Construct and set up the coordinator unless that is already done or
    /// underway
    ///
    /// Only the caller that starts construction observes its error. Callers
    /// arriving during a restart wait for it to finish (bounded by the
    /// restart wait ceiling) and return without starting a second one.
    pub async fn initialize(&self) -> Result<(), LifecycleError> {
        let decision = {
            let mut state = self.shared.lock();
            if state.restart_in_progress {
                Decision::AwaitRestart
            } else if state.initialized || state.has_unresolved_task() {
                Decision::Done
            } else {
                Decision::Join(self.spawn_initialization(&mut state))
            }
        };

        match decision {
            Decision::Done => Ok(()),
            Decision::AwaitRestart => {
                self.await_restart().await;
                Ok(())
            }
            Decision::Join(handle) => match handle.await {
                Ok(result) => result,
                Err(e) if e.is_cancelled() => Err(LifecycleError::Cancelled),
                Err(e) => Err(LifecycleError::TaskPanicked(e.to_string())),
            },
        }
    }

    /// Get the coordinator, initializing it first if needed
    pub async fn get_coordinator(&self) -> Result<Arc<F::Service>, LifecycleError> {
        if let Some(coordinator) = self.coordinator() {
            return Ok(coordinator);
        }
        self.initialize().await?;
        self.coordinator().ok_or(LifecycleError::NotAvailable)
    }

    /// The published coordinator, without triggering construction
    pub fn coordinator(&self) -> Option<Arc<F::Service>> {
        let state = self.shared.lock();
        if state.initialized {
            state.coordinator.clone()
        } else {
            None
        }
    }

    pub fn is_restart_in_progress(&self) -> bool {
        self.shared.lock().restart_in_progress
    }

    pub fn snapshot(&self) -> LifecycleSnapshot {
        self.shared.lock().snapshot()
    }

    /// Health of the published coordinator
    pub async fn health(&self) -> Result<HealthMap, LifecycleError> {
        let coordinator = self.coordinator().ok_or(LifecycleError::NotAvailable)?;
        Ok(coordinator.check_health().await?)
    }

    pub fn warming_status(&self) -> WarmingStatus {
        self.shared.warmer.status()
    }

    pub fn warmer(&self) -> &ResourceWarmer<R> {
        &self.shared.warmer
    }

    fn spawn_initialization(
        &self,
        state: &mut LifecycleState<F::Service>,
    ) -> JoinHandle<Result<(), LifecycleError>> {
        let task_id = state.next_task_id();
        let (outcome_tx, outcome_rx) = watch::channel(None);
        self.shared.set_restart(state, true);

        let guard = InitGuard::new(Arc::clone(&self.shared), task_id, outcome_tx);
        let handle = tokio::spawn(guard.run());
        state.task = Some(InitTask {
            id: task_id,
            abort: handle.abort_handle(),
            outcome: outcome_rx,
        });
        tracing::debug!(task_id, "initialization started");
        handle
    }

    /// Poll the restart flag until it clears or the ceiling passes
    async fn await_restart(&self) {
        let settings = &self.shared.settings;
        let deadline = Instant::now() + settings.restart_wait_ceiling;
        let mut restart = self.shared.restart_watch();

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                tracing::warn!(
                    ceiling = ?settings.restart_wait_ceiling,
                    "restart still in progress, giving up wait"
                );
                return;
            }
            let tick = match settings.restart_poll_interval {
                interval if interval.is_zero() => remaining,
                interval => remaining.min(interval),
            };
            let cleared = tokio::time::timeout(tick, restart.wait_for(|busy| !*busy))
                .await
                .is_ok();
            if cleared {
                return;
            }
            tracing::debug!("waiting for restart to finish");
        }
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
