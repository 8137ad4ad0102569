// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration loader adapters

mod file;

pub use file::TomlConfigLoader;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{ConfigCall, FakeConfigLoader};

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tender_core::CoordinatorConfig;
use thiserror::Error;

/// Errors from loading coordinator configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid user settings in {path}: {source}")]
    UserSettings {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("configuration unavailable: {0}")]
    Unavailable(String),
}

/// Produces the configuration document a coordinator is built from
#[async_trait]
pub trait ConfigLoader: Clone + Send + Sync + 'static {
    /// Resolve and load the base configuration
    async fn load(&self, base: &Path) -> Result<CoordinatorConfig, ConfigError>;

    /// Merge dynamically computed values (accessible paths, user identity)
    async fn enrich(&self, config: CoordinatorConfig) -> Result<CoordinatorConfig, ConfigError>;
}
