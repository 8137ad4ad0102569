// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake coordinator factory for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{CoordinatorError, CoordinatorFactory, CoordinatorService, HealthMap};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

/// Coordinator operation that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoordinatorStep {
    Create,
    Setup,
    Bootstrap,
    Cleanup,
    Close,
    Health,
}

/// Recorded coordinator call
#[derive(Debug, Clone, PartialEq)]
pub enum CoordinatorCall {
    Create { instance: u64, config_path: PathBuf },
    Setup { instance: u64 },
    CreateBaselineAgents { instance: u64 },
    CleanupResources { instance: u64 },
    Close { instance: u64 },
    CheckHealth { instance: u64 },
}

#[derive(Default)]
struct FakeState {
    calls: Vec<CoordinatorCall>,
    failures: HashMap<CoordinatorStep, CoordinatorError>,
    setup_delay: Option<Duration>,
    next_instance: u64,
}

/// Fake coordinator factory for testing
///
/// Every service it creates shares one call log, so tests can count setups
/// across restarts.
#[derive(Clone)]
pub struct FakeCoordinatorFactory {
    state: Arc<Mutex<FakeState>>,
    // Open (true) unless a test is holding setup
    setup_gate: Arc<watch::Sender<bool>>,
}

impl Default for FakeCoordinatorFactory {
    fn default() -> Self {
        let (setup_gate, _) = watch::channel(true);
        Self {
            state: Arc::new(Mutex::new(FakeState::default())),
            setup_gate: Arc::new(setup_gate),
        }
    }
}

impl FakeCoordinatorFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<CoordinatorCall> {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .calls
            .clone()
    }

    /// Number of `setup()` invocations across all created services
    pub fn setup_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, CoordinatorCall::Setup { .. }))
            .count()
    }

    /// Number of services created
    pub fn create_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, CoordinatorCall::Create { .. }))
            .count()
    }

    /// Whether the given instance has been closed
    pub fn was_closed(&self, instance: u64) -> bool {
        self.calls()
            .iter()
            .any(|c| *c == CoordinatorCall::Close { instance })
    }

    /// Make a step fail until cleared
    pub fn fail_on(&self, step: CoordinatorStep, error: CoordinatorError) {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .failures
            .insert(step, error);
    }

    pub fn clear_failure(&self, step: CoordinatorStep) {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .failures
            .remove(&step);
    }

    /// Delay every `setup()` by `delay`
    pub fn set_setup_delay(&self, delay: Duration) {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .setup_delay = Some(delay);
    }

    /// Block `setup()` until [`release_setup`](Self::release_setup) is called
    pub fn hold_setup(&self) {
        self.setup_gate.send_replace(false);
    }

    pub fn release_setup(&self) {
        self.setup_gate.send_replace(true);
    }

    fn record(&self, call: CoordinatorCall) {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .calls
            .push(call);
    }

    fn failure(&self, step: CoordinatorStep) -> Option<CoordinatorError> {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .failures
            .get(&step)
            .cloned()
    }

    fn check(&self, step: CoordinatorStep) -> Result<(), CoordinatorError> {
        match self.failure(step) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Service created by [`FakeCoordinatorFactory`]
pub struct FakeCoordinator {
    instance: u64,
    factory: FakeCoordinatorFactory,
}

impl FakeCoordinator {
    pub fn instance(&self) -> u64 {
        self.instance
    }
}

#[async_trait]
impl CoordinatorFactory for FakeCoordinatorFactory {
    type Service = FakeCoordinator;

    async fn create(&self, config_path: &Path) -> Result<FakeCoordinator, CoordinatorError> {
        let instance = {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            state.next_instance += 1;
            let instance = state.next_instance;
            state.calls.push(CoordinatorCall::Create {
                instance,
                config_path: config_path.to_path_buf(),
            });
            instance
        };
        self.check(CoordinatorStep::Create)?;

        Ok(FakeCoordinator {
            instance,
            factory: self.clone(),
        })
    }
}

#[async_trait]
impl CoordinatorService for FakeCoordinator {
    async fn setup(&self) -> Result<(), CoordinatorError> {
        self.factory.record(CoordinatorCall::Setup {
            instance: self.instance,
        });

        let delay = self
            .factory
            .state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .setup_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut gate = self.factory.setup_gate.subscribe();
        let _ = gate.wait_for(|open| *open).await;

        self.factory.check(CoordinatorStep::Setup)
    }

    async fn create_baseline_agents(&self) -> Result<(), CoordinatorError> {
        self.factory.record(CoordinatorCall::CreateBaselineAgents {
            instance: self.instance,
        });
        self.factory.check(CoordinatorStep::Bootstrap)
    }

    async fn cleanup_resources(&self) -> Result<(), CoordinatorError> {
        self.factory.record(CoordinatorCall::CleanupResources {
            instance: self.instance,
        });
        self.factory.check(CoordinatorStep::Cleanup)
    }

    async fn close(&self) -> Result<(), CoordinatorError> {
        self.factory.record(CoordinatorCall::Close {
            instance: self.instance,
        });
        self.factory.check(CoordinatorStep::Close)
    }

    async fn check_health(&self) -> Result<HealthMap, CoordinatorError> {
        self.factory.record(CoordinatorCall::CheckHealth {
            instance: self.instance,
        });
        self.factory.check(CoordinatorStep::Health)?;

        let mut health = HealthMap::new();
        health.insert("coordinator".to_string(), "healthy".to_string());
        Ok(health)
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
