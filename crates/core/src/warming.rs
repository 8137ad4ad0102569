// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resource warming state

use serde::Serialize;

/// Per-resource warming state
///
/// `Pending -> Warming -> {Warmed | Failed}`; terminal states are sticky for
/// the lifetime of a warming cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarmState {
    Pending,
    Warming,
    Warmed,
    Failed,
}

impl WarmState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Warmed | Self::Failed)
    }

    /// Apply a transition, ignoring ones that are not allowed
    pub fn transition(self, next: WarmState) -> WarmState {
        use WarmState::*;

        match (self, next) {
            (Pending, Warming) => Warming,
            (Warming, Warmed) | (Warming, Failed) => next,
            // An attempt that never started can still be written off
            (Pending, Failed) => Failed,
            _ => self,
        }
    }
}

/// Snapshot of a warming cycle, for observability only
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WarmingStatus {
    pub running: bool,
    pub completed: bool,
    pub total: usize,
    pub pending: usize,
    pub succeeded: Vec<String>,
    pub failed: Vec<String>,
}

impl WarmingStatus {
    pub fn succeeded_count(&self) -> usize {
        self.succeeded.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }
}

#[cfg(test)]
#[path = "warming_tests.rs"]
mod tests;
