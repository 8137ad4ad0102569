// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for the collaborators the lifecycle manager drives

pub mod config;
pub mod coordinator;
pub mod resource;
pub mod traced;

pub use config::{ConfigError, ConfigLoader, TomlConfigLoader};
pub use coordinator::{
    CoordinatorError, CoordinatorFactory, CoordinatorService, HealthMap, NoOpCoordinator,
    NoOpCoordinatorFactory,
};
pub use resource::{ProcessResourceClient, ProcessSession, ResourceClient, ResourceError};
pub use traced::{
    TracedConfigLoader, TracedCoordinator, TracedCoordinatorFactory, TracedResourceClient,
};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use config::{ConfigCall, FakeConfigLoader};
#[cfg(any(test, feature = "test-support"))]
pub use coordinator::{CoordinatorCall, CoordinatorStep, FakeCoordinator, FakeCoordinatorFactory};
#[cfg(any(test, feature = "test-support"))]
pub use resource::{FakeResourceClient, FakeResourceSession, ResourceCall};
