// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake configuration loader for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ConfigError, ConfigLoader};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tender_core::CoordinatorConfig;

/// Recorded loader call
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigCall {
    Load { base: PathBuf },
    Enrich,
}

#[derive(Default)]
struct FakeState {
    config: CoordinatorConfig,
    user_id: Option<String>,
    load_failure: Option<String>,
    calls: Vec<ConfigCall>,
}

/// Fake loader returning a fixed configuration
#[derive(Clone, Default)]
pub struct FakeConfigLoader {
    state: Arc<Mutex<FakeState>>,
}

impl FakeConfigLoader {
    pub fn new(config: CoordinatorConfig) -> Self {
        let loader = Self::default();
        loader.state.lock().unwrap_or_else(|e| e.into_inner()).config = config;
        loader
    }

    /// User id merged in by `enrich`
    pub fn set_user_id(&self, user_id: impl Into<String>) {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).user_id = Some(user_id.into());
    }

    /// Make `load` fail until cleared
    pub fn fail_load(&self, reason: impl Into<String>) {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .load_failure = Some(reason.into());
    }

    pub fn clear_failure(&self) {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .load_failure = None;
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<ConfigCall> {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .calls
            .clone()
    }
}

#[async_trait]
impl ConfigLoader for FakeConfigLoader {
    async fn load(&self, base: &Path) -> Result<CoordinatorConfig, ConfigError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.calls.push(ConfigCall::Load {
            base: base.to_path_buf(),
        });
        if let Some(reason) = &state.load_failure {
            return Err(ConfigError::Unavailable(reason.clone()));
        }
        Ok(state.config.clone())
    }

    async fn enrich(&self, config: CoordinatorConfig) -> Result<CoordinatorConfig, ConfigError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.calls.push(ConfigCall::Enrich);
        Ok(match &state.user_id {
            Some(id) => config.with_user_id(id.clone()),
            None => config,
        })
    }
}
