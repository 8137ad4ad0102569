// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tender-core: shared types for the tender lifecycle coordinator
//!
//! This crate provides:
//! - Typed coordinator configuration and its builder
//! - Lifecycle settings (timeouts, warming options) with env overrides
//! - Readiness reports produced by the readiness waiter
//! - Warming state and status snapshots

pub mod config;
pub mod env;
pub mod readiness;
pub mod settings;
pub mod warming;

pub use config::{CoordinatorConfig, Resource, ServerConfig, UserSettings};
pub use env::substitute_env;
pub use readiness::{ReadinessHint, ReadinessPhase, ReadinessReport, ReadinessStatus};
pub use settings::{LifecycleSettings, SettingsError, WarmingOptions};
pub use warming::{WarmState, WarmingStatus};
