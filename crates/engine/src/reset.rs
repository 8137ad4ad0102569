// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Force reset of a stuck lifecycle

use crate::artifact;
use crate::init::close_quietly;
use crate::manager::LifecycleManager;
use serde::Serialize;
use tender_adapters::{ConfigLoader, CoordinatorFactory, ResourceClient};

/// Result of a force reset
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResetOutcome {
    pub success: bool,
    pub reason: String,
}

impl<F, L, R> LifecycleManager<F, L, R>
where
    F: CoordinatorFactory,
    L: ConfigLoader,
    R: ResourceClient,
{
    /// Cancel any in-flight initialization and reset to a clean slate
    ///
    /// Callers should only reach for this after a readiness wait timed out
    /// and the stuck threshold has passed. Never fails; an unconfirmed
    /// cancellation is reported through the outcome.
    pub async fn force_reset(&self) -> ResetOutcome {
        tracing::warn!("force reset requested");

        let (task, coordinator, staged, path) = {
            let mut state = self.shared.lock();
            self.shared.set_restart(&mut state, true);
            state.initialized = false;
            let taken = (
                state.task.take(),
                state.coordinator.take(),
                state.staged.take(),
                state.transient_config_path.take(),
            );
            // Under the state lock, so a commit cannot start a new cycle after this
            self.shared.warmer.stop();
            taken
        };

        let mut cancelled = None;
        if let Some(mut task) = task.filter(|t| !t.is_resolved()) {
            task.abort.abort();
            let wait = self.shared.settings.cancel_wait;
            let confirmed = tokio::time::timeout(wait, task.outcome.wait_for(Option::is_some))
                .await
                .is_ok();
            if confirmed {
                tracing::info!(task_id = task.id, "in-flight initialization cancelled");
            } else {
                tracing::warn!(
                    task_id = task.id,
                    ?wait,
                    "initialization did not confirm cancellation"
                );
            }
            cancelled = Some(confirmed);
        }

        for service in [coordinator, staged].into_iter().flatten() {
            close_quietly(service.as_ref()).await;
        }
        if let Some(path) = path {
            artifact::remove_artifact(&path).await;
        }

        {
            let mut state = self.shared.lock();
            state.coordinator = None;
            state.staged = None;
            state.initialized = false;
            state.task = None;
            state.transient_config_path = None;
            self.shared.set_restart(&mut state, false);
        }

        let outcome = match cancelled {
            None => ResetOutcome {
                success: true,
                reason: "state reset; no initialization was in flight".to_string(),
            },
            Some(true) => ResetOutcome {
                success: true,
                reason: "state reset; in-flight initialization cancelled".to_string(),
            },
            Some(false) => ResetOutcome {
                success: false,
                reason: format!(
                    "state reset, but initialization did not confirm cancellation within {:?}",
                    self.shared.settings.cancel_wait
                ),
            },
        };
        tracing::info!(success = outcome.success, reason = %outcome.reason, "force reset finished");
        outcome
    }
}

#[cfg(test)]
#[path = "reset_tests.rs"]
mod tests;
