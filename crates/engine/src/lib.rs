// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Tender lifecycle engine
//!
//! Brings the coordinator service up at most once under concurrent callers,
//! reports readiness against a deadline, tears it down, force-resets a stuck
//! initialization, and warms sub-resources in the background.

mod artifact;
mod error;
mod init;
mod manager;
mod readiness;
mod reset;
mod state;
mod teardown;
mod warmer;

#[cfg(test)]
mod test_support;

pub use error::LifecycleError;
pub use manager::{LifecycleDeps, LifecycleManager};
pub use reset::ResetOutcome;
pub use state::{InitOutcome, LifecycleSnapshot};
pub use warmer::ResourceWarmer;
