// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tender_adapters::FakeResourceClient;
use tender_core::ServerConfig;

fn resources(names: &[&str]) -> Vec<Resource> {
    names
        .iter()
        .map(|name| Resource::new(*name, ServerConfig::new(format!("{}-server", name))))
        .collect()
}

fn options(batch_size: usize) -> WarmingOptions {
    WarmingOptions::default()
        .with_batch_size(batch_size)
        .with_inter_batch_delay(Duration::ZERO)
}

#[tokio::test]
async fn failures_are_isolated_per_resource() {
    let client = FakeResourceClient::new();
    client.fail_connect("r2");
    client.fail_probe("r4");
    let warmer = ResourceWarmer::new(client.clone());

    warmer.start(resources(&["r1", "r2", "r3", "r4", "r5"]), options(2));
    warmer.wait_idle().await;

    let status = warmer.status();
    assert_eq!(status.succeeded, vec!["r1", "r3", "r5"]);
    assert_eq!(status.failed, vec!["r2", "r4"]);
    assert!(status.completed);
    assert!(!status.running);
    assert_eq!(status.total, 5);
    assert_eq!(status.pending, 0);

    assert!(warmer.session("r1").is_some());
    assert!(warmer.session("r2").is_none());
    assert!(warmer.session("r4").is_none());
    assert!(warmer.failure("r2").unwrap().contains("injected failure"));
    assert!(warmer.failure("r1").is_none());
}

#[tokio::test(start_paused = true)]
async fn batches_run_in_order_with_delay_between() {
    let client = FakeResourceClient::new();
    let warmer = ResourceWarmer::new(client.clone());
    let opts = options(2).with_inter_batch_delay(Duration::from_secs(1));

    let start = tokio::time::Instant::now();
    warmer.start(resources(&["a", "b", "c", "d", "e"]), opts);
    warmer.wait_idle().await;

    let connected = client.connected();
    assert_eq!(connected.len(), 5);
    let mut first: Vec<_> = connected[..2].to_vec();
    first.sort();
    assert_eq!(first, vec!["a", "b"]);
    let mut second: Vec<_> = connected[2..4].to_vec();
    second.sort();
    assert_eq!(second, vec!["c", "d"]);
    assert_eq!(connected[4], "e");

    // Two gaps between three batches, none after the last
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_secs(2), "elapsed {:?}", elapsed);
    assert!(elapsed < Duration::from_secs(3), "elapsed {:?}", elapsed);
}

#[tokio::test(start_paused = true)]
async fn slow_resource_times_out_without_blocking_batch() {
    let client = FakeResourceClient::new();
    client.set_delay("slow", Duration::from_secs(60));
    let warmer = ResourceWarmer::new(client);

    warmer.start(
        resources(&["fast", "slow", "other"]),
        options(3).with_attempt_timeout(Duration::from_secs(5)),
    );
    warmer.wait_idle().await;

    let status = warmer.status();
    assert_eq!(status.succeeded, vec!["fast", "other"]);
    assert_eq!(status.failed, vec!["slow"]);
    assert!(warmer.failure("slow").unwrap().contains("timed out"));
}

#[tokio::test]
async fn duplicate_names_are_warmed_once() {
    let client = FakeResourceClient::new();
    let warmer = ResourceWarmer::new(client.clone());

    warmer.start(resources(&["a", "b", "a"]), options(3));
    warmer.wait_idle().await;

    assert_eq!(warmer.status().total, 2);
    assert_eq!(client.connected().len(), 2);
}

#[tokio::test]
async fn empty_cycle_completes_immediately() {
    let warmer = ResourceWarmer::new(FakeResourceClient::new());

    warmer.start(Vec::new(), options(3));
    warmer.wait_idle().await;

    let status = warmer.status();
    assert!(status.completed);
    assert!(!status.running);
    assert_eq!(status.total, 0);
}

#[tokio::test(start_paused = true)]
async fn stop_aborts_cycle_and_clears_sessions() {
    let client = FakeResourceClient::new();
    client.set_delay("slow", Duration::from_secs(60));
    let warmer = ResourceWarmer::new(client);

    warmer.start(resources(&["slow"]), options(1));
    tokio::task::yield_now().await;
    assert!(warmer.status().running);

    warmer.stop();
    warmer.wait_idle().await;

    assert_eq!(warmer.status(), WarmingStatus::default());
    assert!(warmer.session("slow").is_none());
}

#[tokio::test]
async fn restart_replaces_previous_cycle() {
    let client = FakeResourceClient::new();
    let warmer = ResourceWarmer::new(client);

    warmer.start(resources(&["old"]), options(1));
    warmer.wait_idle().await;
    warmer.start(resources(&["new"]), options(1));
    warmer.wait_idle().await;

    let status = warmer.status();
    assert_eq!(status.succeeded, vec!["new"]);
    assert!(warmer.session("old").is_none());
}
