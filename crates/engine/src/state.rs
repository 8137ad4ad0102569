// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lifecycle state guarded by the manager's lock

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::AbortHandle;

/// How an initialization task ended
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InitOutcome {
    Ready,
    Failed(String),
    Cancelled,
}

/// Handle to the in-flight initialization task
pub(crate) struct InitTask {
    pub id: u64,
    pub abort: AbortHandle,
    pub outcome: watch::Receiver<Option<InitOutcome>>,
}

impl InitTask {
    /// Whether the task has published its outcome
    pub fn is_resolved(&self) -> bool {
        self.outcome.borrow().is_some()
    }
}

/// Mutable lifecycle state
///
/// `coordinator` is only ever set together with `initialized`, and
/// `restart_in_progress` is true exactly while a construction, reset, or
/// rollback owns the state.
pub(crate) struct LifecycleState<S> {
    pub coordinator: Option<Arc<S>>,
    /// Constructed by the current task but not yet published
    pub staged: Option<Arc<S>>,
    pub initialized: bool,
    pub restart_in_progress: bool,
    pub task: Option<InitTask>,
    pub transient_config_path: Option<PathBuf>,
    next_task_id: u64,
}

impl<S> Default for LifecycleState<S> {
    fn default() -> Self {
        Self {
            coordinator: None,
            staged: None,
            initialized: false,
            restart_in_progress: false,
            task: None,
            transient_config_path: None,
            next_task_id: 0,
        }
    }
}

impl<S> LifecycleState<S> {
    pub fn next_task_id(&mut self) -> u64 {
        self.next_task_id += 1;
        self.next_task_id
    }

    /// Whether `task_id` still owns the initialization slot
    pub fn owns(&self, task_id: u64) -> bool {
        self.task.as_ref().is_some_and(|t| t.id == task_id)
    }

    pub fn has_unresolved_task(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_resolved())
    }

    pub fn is_ready(&self) -> bool {
        self.initialized && self.coordinator.is_some()
    }

    pub fn snapshot(&self) -> LifecycleSnapshot {
        LifecycleSnapshot {
            initialized: self.initialized,
            restart_in_progress: self.restart_in_progress,
            has_coordinator: self.coordinator.is_some(),
            initialization_in_flight: self.task.is_some(),
            transient_config_path: self.transient_config_path.clone(),
        }
    }
}

/// Point-in-time view of the lifecycle state
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LifecycleSnapshot {
    pub initialized: bool,
    pub restart_in_progress: bool,
    pub has_coordinator: bool,
    pub initialization_in_flight: bool,
    pub transient_config_path: Option<PathBuf>,
}
