// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake resource client for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ResourceClient, ResourceError};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tender_core::Resource;

/// Recorded resource call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceCall {
    Connect { name: String },
    Probe { name: String },
}

#[derive(Default)]
struct FakeState {
    calls: Vec<ResourceCall>,
    connect_failures: HashSet<String>,
    probe_failures: HashSet<String>,
    delays: HashMap<String, Duration>,
    operations: Vec<String>,
}

/// Session handed out by [`FakeResourceClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeResourceSession {
    pub name: String,
}

/// Fake resource client for testing
#[derive(Clone, Default)]
pub struct FakeResourceClient {
    state: Arc<Mutex<FakeState>>,
}

impl FakeResourceClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `connect` fail for the named resource
    pub fn fail_connect(&self, name: impl Into<String>) {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .connect_failures
            .insert(name.into());
    }

    /// Make `probe` fail for the named resource
    pub fn fail_probe(&self, name: impl Into<String>) {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .probe_failures
            .insert(name.into());
    }

    /// Delay `connect` for the named resource
    pub fn set_delay(&self, name: impl Into<String>, delay: Duration) {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .delays
            .insert(name.into(), delay);
    }

    /// Operations reported by every successful probe
    pub fn set_operations(&self, operations: Vec<String>) {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .operations = operations;
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<ResourceCall> {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .calls
            .clone()
    }

    /// Names passed to `connect`, in call order
    pub fn connected(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ResourceCall::Connect { name } => Some(name),
                ResourceCall::Probe { .. } => None,
            })
            .collect()
    }
}

#[async_trait]
impl ResourceClient for FakeResourceClient {
    type Session = FakeResourceSession;

    async fn connect(&self, resource: &Resource) -> Result<FakeResourceSession, ResourceError> {
        let (delay, fails) = {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            state.calls.push(ResourceCall::Connect {
                name: resource.name.clone(),
            });
            (
                state.delays.get(&resource.name).copied(),
                state.connect_failures.contains(&resource.name),
            )
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if fails {
            return Err(ResourceError::ConnectFailed {
                name: resource.name.clone(),
                reason: "injected failure".to_string(),
            });
        }

        Ok(FakeResourceSession {
            name: resource.name.clone(),
        })
    }

    async fn probe(&self, session: &FakeResourceSession) -> Result<Vec<String>, ResourceError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.calls.push(ResourceCall::Probe {
            name: session.name.clone(),
        });
        if state.probe_failures.contains(&session.name) {
            return Err(ResourceError::ProbeFailed {
                name: session.name.clone(),
                reason: "injected failure".to_string(),
            });
        }
        Ok(state.operations.clone())
    }
}
