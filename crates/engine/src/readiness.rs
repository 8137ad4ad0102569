// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Readiness waiting
//!
//! Three phases share one deadline: wait for the restart flag to clear, wait
//! for any in-flight initialization task, then check the final state. The
//! wait only observes; it never starts or cancels initialization.

use crate::manager::LifecycleManager;
use crate::state::InitOutcome;
use std::time::Duration;
use tender_adapters::{ConfigLoader, CoordinatorFactory, ResourceClient};
use tender_core::{ReadinessPhase, ReadinessReport, ReadinessStatus};
use tokio::sync::watch;
use tokio::time::Instant;

impl<F, L, R> LifecycleManager<F, L, R>
where
    F: CoordinatorFactory,
    L: ConfigLoader,
    R: ResourceClient,
{
    /// Wait until the coordinator is ready or the budget runs out
    ///
    /// `None` uses the configured readiness timeout. Timeouts are reported
    /// through the returned status, never as errors.
    pub async fn wait_until_ready(&self, timeout: Option<Duration>) -> ReadinessReport {
        let budget = timeout.unwrap_or(self.shared.settings.readiness_timeout);
        let start = Instant::now();
        let deadline = start + budget;
        let mut phases = Vec::new();

        let report = |status: ReadinessStatus, phases: Vec<ReadinessPhase>| {
            let report = ReadinessReport::new(status, start.elapsed(), phases);
            tracing::debug!(
                status = %report.status,
                elapsed_ms = report.elapsed.as_millis() as u64,
                "readiness wait finished"
            );
            report
        };

        // Phase 1: a restart may be about to publish a new task
        if self.is_restart_in_progress() {
            phases.push(ReadinessPhase::WaitingForRestartFlag);
            let mut restart = self.shared.restart_watch();
            let remaining = deadline.saturating_duration_since(Instant::now());
            let cleared = tokio::time::timeout(remaining, restart.wait_for(|busy| !*busy))
                .await
                .is_ok();
            if !cleared {
                return report(ReadinessStatus::TimeoutWaitingForRestartFlag, phases);
            }
        }

        // Phase 2: wait for an unresolved initialization task
        let (pending, ready) = {
            let state = self.shared.lock();
            let pending = state
                .task
                .as_ref()
                .filter(|t| !t.is_resolved())
                .map(|t| t.outcome.clone());
            (pending, state.is_ready())
        };
        let remaining = deadline.saturating_duration_since(Instant::now());
        // Also reported when no task exists, so a zero budget on a cold
        // manager reads as a timeout rather than a failure
        if remaining.is_zero() && !ready {
            return report(ReadinessStatus::TimeoutBeforeTaskWait, phases);
        }
        if let Some(outcome) = pending {
            phases.push(ReadinessPhase::WaitingForTask);
            match await_task(outcome, remaining).await {
                TaskWait::TimedOut => {
                    return report(ReadinessStatus::TimeoutWaitingForTask, phases)
                }
                TaskWait::Errored(error) => {
                    return report(ReadinessStatus::ErrorWaitingForTask, phases).with_error(error)
                }
                TaskWait::Settled => {}
            }
        }

        // Phase 3: one authoritative look at the state
        phases.push(ReadinessPhase::FinalCheck);
        let (initialized, has_coordinator) = {
            let state = self.shared.lock();
            (state.initialized, state.coordinator.is_some())
        };
        match (initialized, has_coordinator) {
            (true, true) => report(ReadinessStatus::Ready, phases),
            (false, false) => report(ReadinessStatus::NotInitialized, phases),
            (initialized, has_coordinator) => {
                report(ReadinessStatus::ErrorCheckingReadiness, phases).with_error(format!(
                    "inconsistent lifecycle state: initialized={}, coordinator present={}",
                    initialized, has_coordinator
                ))
            }
        }
    }
}

/// How waiting on an initialization task ended
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum TaskWait {
    /// Ready, or the task went away; the final check decides
    Settled,
    TimedOut,
    Errored(String),
}

/// Wait up to `remaining` for an initialization task to publish its outcome
pub(crate) async fn await_task(
    mut outcome: watch::Receiver<Option<InitOutcome>>,
    remaining: Duration,
) -> TaskWait {
    let waited = tokio::time::timeout(remaining, async {
        outcome
            .wait_for(Option::is_some)
            .await
            .map(|outcome| (*outcome).clone())
    })
    .await;

    match waited {
        Err(_) => TaskWait::TimedOut,
        Ok(Ok(Some(InitOutcome::Failed(error)))) => TaskWait::Errored(error),
        Ok(Ok(Some(InitOutcome::Cancelled))) => {
            TaskWait::Errored("initialization was cancelled".to_string())
        }
        Ok(_) => TaskWait::Settled,
    }
}

#[cfg(test)]
#[path = "readiness_tests.rs"]
mod tests;
