// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn fake_records_lifecycle_calls() {
    let factory = FakeCoordinatorFactory::new();
    let service = factory.create(Path::new("/tmp/cfg.toml")).await.unwrap();

    service.setup().await.unwrap();
    service.create_baseline_agents().await.unwrap();
    service.close().await.unwrap();

    let instance = service.instance();
    assert_eq!(
        factory.calls(),
        vec![
            CoordinatorCall::Create {
                instance,
                config_path: PathBuf::from("/tmp/cfg.toml"),
            },
            CoordinatorCall::Setup { instance },
            CoordinatorCall::CreateBaselineAgents { instance },
            CoordinatorCall::Close { instance },
        ]
    );
    assert_eq!(factory.setup_count(), 1);
    assert!(factory.was_closed(instance));
}

#[tokio::test]
async fn fake_injects_failures_per_step() {
    let factory = FakeCoordinatorFactory::new();
    factory.fail_on(
        CoordinatorStep::Setup,
        CoordinatorError::ConnectionRefused("port 7000".to_string()),
    );
    let service = factory.create(Path::new("/tmp/cfg.toml")).await.unwrap();

    let err = service.setup().await.unwrap_err();
    assert!(matches!(err, CoordinatorError::ConnectionRefused(_)));

    factory.clear_failure(CoordinatorStep::Setup);
    assert!(service.setup().await.is_ok());
}

#[tokio::test]
async fn create_failure_still_records_call() {
    let factory = FakeCoordinatorFactory::new();
    factory.fail_on(
        CoordinatorStep::Create,
        CoordinatorError::CreateFailed("bad config".to_string()),
    );

    assert!(factory.create(Path::new("/tmp/cfg.toml")).await.is_err());
    assert_eq!(factory.create_count(), 1);
}

#[tokio::test]
async fn instances_are_numbered() {
    let factory = FakeCoordinatorFactory::new();
    let a = factory.create(Path::new("/a")).await.unwrap();
    let b = factory.create(Path::new("/b")).await.unwrap();
    assert_ne!(a.instance(), b.instance());
}

#[tokio::test]
async fn held_setup_completes_after_release() {
    let factory = FakeCoordinatorFactory::new();
    factory.hold_setup();
    let service = factory.create(Path::new("/tmp/cfg.toml")).await.unwrap();

    let pending = tokio::spawn(async move { service.setup().await });
    tokio::task::yield_now().await;
    assert!(!pending.is_finished());

    factory.release_setup();
    assert!(pending.await.unwrap().is_ok());
}
