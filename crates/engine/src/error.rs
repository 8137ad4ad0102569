// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the lifecycle manager

use std::path::PathBuf;
use tender_adapters::{ConfigError, CoordinatorError};
use thiserror::Error;

/// Errors surfaced by initialization and coordinator access
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("coordinator error: {0}")]
    Coordinator(#[from] CoordinatorError),
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("failed to write configuration artifact {}: {source}", path.display())]
    Artifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("coordinator not available")]
    NotAvailable,
    #[error("initialization was cancelled")]
    Cancelled,
    #[error("initialization task failed: {0}")]
    TaskPanicked(String),
}
