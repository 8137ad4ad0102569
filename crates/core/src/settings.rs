// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lifecycle settings
//!
//! Loaded from a TOML file with every field defaulted, then adjusted by
//! environment overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Overall readiness timeout override, in whole seconds
pub const ENV_READINESS_TIMEOUT: &str = "TENDER_READINESS_TIMEOUT_SECS";
/// Base coordinator config override
pub const ENV_BASE_CONFIG: &str = "TENDER_BASE_CONFIG";
/// Directory for transient configuration artifacts
pub const ENV_TRANSIENT_DIR: &str = "TENDER_TRANSIENT_DIR";
/// Path of the per-user settings file merged into the coordinator config
pub const ENV_USER_SETTINGS: &str = "TENDER_USER_SETTINGS";

/// Errors from loading settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid value for {name}: {value:?}")]
    InvalidEnv { name: &'static str, value: String },
    #[error("warming batch size must be at least 1")]
    ZeroBatchSize,
}

/// Settings governing the lifecycle manager
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleSettings {
    /// Base coordinator configuration handed to the config loader
    pub base_config: PathBuf,
    /// Default overall budget for `wait_until_ready`
    #[serde(with = "humantime_serde")]
    pub readiness_timeout: Duration,
    /// How long `initialize` waits for another caller's restart to finish
    #[serde(with = "humantime_serde")]
    pub restart_wait_ceiling: Duration,
    /// Re-check cadence (and "still waiting" log cadence) while blocked on a restart
    #[serde(with = "humantime_serde")]
    pub restart_poll_interval: Duration,
    /// How long `force_reset` waits for a cancelled task to confirm
    #[serde(with = "humantime_serde")]
    pub cancel_wait: Duration,
    /// Minimum elapsed wait before a timed-out report justifies a force reset
    #[serde(with = "humantime_serde")]
    pub stuck_after: Duration,
    /// Directory for transient configuration artifacts
    pub transient_dir: PathBuf,
    pub warming: WarmingOptions,
}

impl Default for LifecycleSettings {
    fn default() -> Self {
        Self {
            base_config: PathBuf::from("coordinator.toml"),
            readiness_timeout: Duration::from_secs(120),
            restart_wait_ceiling: Duration::from_secs(30),
            restart_poll_interval: Duration::from_secs(1),
            cancel_wait: Duration::from_secs(10),
            stuck_after: Duration::from_secs(30),
            transient_dir: std::env::temp_dir(),
            warming: WarmingOptions::default(),
        }
    }
}

/// Options for one resource warming cycle
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarmingOptions {
    pub enabled: bool,
    /// Resources warmed concurrently per batch
    pub batch_size: usize,
    /// Pause between consecutive batches
    #[serde(with = "humantime_serde")]
    pub inter_batch_delay: Duration,
    /// Upper bound on one connect-and-probe attempt
    #[serde(with = "humantime_serde")]
    pub attempt_timeout: Duration,
}

impl Default for WarmingOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            batch_size: 3,
            inter_batch_delay: Duration::from_secs(1),
            attempt_timeout: Duration::from_secs(30),
        }
    }
}

impl WarmingOptions {
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_inter_batch_delay(mut self, delay: Duration) -> Self {
        self.inter_batch_delay = delay;
        self
    }

    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

impl LifecycleSettings {
    /// Load settings from a file; a missing file yields defaults
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Apply environment overrides from the process environment
    pub fn apply_env(self) -> Result<Self, SettingsError> {
        self.apply_env_with(|name| std::env::var(name).ok())
    }

    /// Apply environment overrides resolved through `lookup`
    pub fn apply_env_with<F>(mut self, lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_READINESS_TIMEOUT) {
            let secs: u64 = raw.trim().parse().map_err(|_| SettingsError::InvalidEnv {
                name: ENV_READINESS_TIMEOUT,
                value: raw.clone(),
            })?;
            self.readiness_timeout = Duration::from_secs(secs);
        }
        if let Some(path) = lookup(ENV_BASE_CONFIG).filter(|p| !p.is_empty()) {
            self.base_config = PathBuf::from(path);
        }
        if let Some(dir) = lookup(ENV_TRANSIENT_DIR).filter(|d| !d.is_empty()) {
            self.transient_dir = PathBuf::from(dir);
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.warming.batch_size == 0 {
            return Err(SettingsError::ZeroBatchSize);
        }
        Ok(())
    }

    pub fn with_readiness_timeout(mut self, timeout: Duration) -> Self {
        self.readiness_timeout = timeout;
        self
    }

    pub fn with_restart_wait_ceiling(mut self, ceiling: Duration) -> Self {
        self.restart_wait_ceiling = ceiling;
        self
    }

    pub fn with_cancel_wait(mut self, wait: Duration) -> Self {
        self.cancel_wait = wait;
        self
    }

    pub fn with_transient_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.transient_dir = dir.into();
        self
    }

    pub fn with_base_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_config = path.into();
        self
    }

    pub fn with_warming(mut self, warming: WarmingOptions) -> Self {
        self.warming = warming;
        self
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
