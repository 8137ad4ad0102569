// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resource client adapters used for warming

mod process;

pub use process::{ProcessResourceClient, ProcessSession};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeResourceClient, FakeResourceSession, ResourceCall};

use async_trait::async_trait;
use tender_core::Resource;
use thiserror::Error;

/// Errors from resource sessions
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("failed to connect to {name}: {reason}")]
    ConnectFailed { name: String, reason: String },
    #[error("probe of {name} failed: {reason}")]
    ProbeFailed { name: String, reason: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Opens persistent sessions to sub-resources
#[async_trait]
pub trait ResourceClient: Clone + Send + Sync + 'static {
    type Session: Send + Sync + 'static;

    /// Establish a persistent session to the resource
    async fn connect(&self, resource: &Resource) -> Result<Self::Session, ResourceError>;

    /// Cheap capability probe: list the operations the resource offers
    async fn probe(&self, session: &Self::Session) -> Result<Vec<String>, ResourceError>;
}
