// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fixtures shared by the engine tests

use crate::{LifecycleDeps, LifecycleManager};
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;
use tender_adapters::{
    CoordinatorCall, FakeConfigLoader, FakeCoordinatorFactory, FakeResourceClient,
};
use tender_core::{CoordinatorConfig, LifecycleSettings, WarmingOptions};

pub(crate) type TestManager =
    LifecycleManager<FakeCoordinatorFactory, FakeConfigLoader, FakeResourceClient>;

pub(crate) struct Harness {
    pub manager: TestManager,
    pub factory: FakeCoordinatorFactory,
    pub loader: FakeConfigLoader,
    pub resources: FakeResourceClient,
    pub dir: TempDir,
}

pub(crate) fn harness() -> Harness {
    harness_with(CoordinatorConfig::new(), |settings| settings)
}

pub(crate) fn harness_with(
    config: CoordinatorConfig,
    adjust: impl FnOnce(LifecycleSettings) -> LifecycleSettings,
) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let settings = adjust(
        LifecycleSettings::default()
            .with_transient_dir(dir.path())
            .with_warming(WarmingOptions::default().with_inter_batch_delay(Duration::ZERO)),
    );

    let factory = FakeCoordinatorFactory::new();
    let loader = FakeConfigLoader::new(config);
    let resources = FakeResourceClient::new();
    let manager = LifecycleManager::new(
        LifecycleDeps {
            factory: factory.clone(),
            loader: loader.clone(),
            resources: resources.clone(),
        },
        settings,
    );

    Harness {
        manager,
        factory,
        loader,
        resources,
        dir,
    }
}

impl Harness {
    /// Files currently in the transient directory
    pub fn artifacts(&self) -> Vec<PathBuf> {
        std::fs::read_dir(self.dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect()
    }

    /// Config path handed to the most recent `create`
    pub fn created_path(&self) -> Option<PathBuf> {
        self.factory
            .calls()
            .into_iter()
            .rev()
            .find_map(|call| match call {
                CoordinatorCall::Create { config_path, .. } => Some(config_path),
                _ => None,
            })
    }

    /// Wait until `setup()` has been entered `count` times
    pub async fn wait_for_setup(&self, count: usize) {
        for _ in 0..1000 {
            if self.factory.setup_count() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        panic!("setup was never reached");
    }
}
