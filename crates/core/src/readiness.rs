// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Readiness reports
//!
//! A readiness wait never fails for an ordinary timeout; the outcome is a
//! [`ReadinessReport`] whose status tells the caller what to do next.

use serde::Serialize;
use std::time::Duration;

/// Outcome of a readiness wait
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessStatus {
    Ready,
    TimeoutWaitingForRestartFlag,
    TimeoutWaitingForTask,
    TimeoutBeforeTaskWait,
    ErrorWaitingForTask,
    NotInitialized,
    ErrorCheckingReadiness,
}

/// What a caller should tell its own client
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessHint {
    /// The coordinator is usable
    None,
    /// Still initializing; retry later
    RetryLater,
    /// Initialization failed; an operator has to look at it
    ContactOperator,
}

impl ReadinessStatus {
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::TimeoutWaitingForRestartFlag
                | Self::TimeoutWaitingForTask
                | Self::TimeoutBeforeTaskWait
        )
    }

    pub fn hint(&self) -> ReadinessHint {
        match self {
            Self::Ready => ReadinessHint::None,
            Self::TimeoutWaitingForRestartFlag
            | Self::TimeoutWaitingForTask
            | Self::TimeoutBeforeTaskWait => ReadinessHint::RetryLater,
            Self::ErrorWaitingForTask | Self::NotInitialized | Self::ErrorCheckingReadiness => {
                ReadinessHint::ContactOperator
            }
        }
    }
}

impl std::fmt::Display for ReadinessStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Ready => "ready",
            Self::TimeoutWaitingForRestartFlag => "timeout_waiting_for_restart_flag",
            Self::TimeoutWaitingForTask => "timeout_waiting_for_task",
            Self::TimeoutBeforeTaskWait => "timeout_before_task_wait",
            Self::ErrorWaitingForTask => "error_waiting_for_task",
            Self::NotInitialized => "not_initialized",
            Self::ErrorCheckingReadiness => "error_checking_readiness",
        };
        write!(f, "{}", s)
    }
}

/// Phases of a readiness wait, in order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessPhase {
    WaitingForRestartFlag,
    WaitingForTask,
    FinalCheck,
}

impl std::fmt::Display for ReadinessPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WaitingForRestartFlag => write!(f, "waiting_for_restart_flag"),
            Self::WaitingForTask => write!(f, "waiting_for_task"),
            Self::FinalCheck => write!(f, "final_check"),
        }
    }
}

/// Result of waiting for the coordinator to become ready
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReadinessReport {
    pub ready: bool,
    pub status: ReadinessStatus,
    #[serde(with = "humantime_serde")]
    pub elapsed: Duration,
    /// Phases entered so far; the last one is where the wait ended
    pub phases: Vec<ReadinessPhase>,
    /// Error text for the error statuses
    pub error: Option<String>,
}

impl ReadinessReport {
    pub fn new(status: ReadinessStatus, elapsed: Duration, phases: Vec<ReadinessPhase>) -> Self {
        Self {
            ready: status == ReadinessStatus::Ready,
            status,
            elapsed,
            phases,
            error: None,
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    /// Whether this report justifies cancelling a stuck initialization
    ///
    /// Only timed-out waits that lasted at least `stuck_after` qualify, so a
    /// slow but healthy initialization is not aborted by a short probe.
    pub fn warrants_force_reset(&self, stuck_after: Duration) -> bool {
        !self.ready && self.status.is_timeout() && self.elapsed >= stuck_after
    }
}

#[cfg(test)]
#[path = "readiness_tests.rs"]
mod tests;
