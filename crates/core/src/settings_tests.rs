// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::collections::HashMap;

fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| map.get(name).cloned()
}

#[test]
fn defaults_match_documented_values() {
    let settings = LifecycleSettings::default();
    assert_eq!(settings.readiness_timeout, Duration::from_secs(120));
    assert_eq!(settings.restart_wait_ceiling, Duration::from_secs(30));
    assert_eq!(settings.stuck_after, Duration::from_secs(30));
    assert_eq!(settings.warming.batch_size, 3);
    assert!(settings.warming.enabled);
}

#[test]
fn parse_fills_missing_fields_with_defaults() {
    let settings = LifecycleSettings::parse(
        r#"
readiness_timeout = "45s"

[warming]
batch_size = 5
inter_batch_delay = "250ms"
"#,
    )
    .unwrap();

    assert_eq!(settings.readiness_timeout, Duration::from_secs(45));
    assert_eq!(settings.restart_wait_ceiling, Duration::from_secs(30));
    assert_eq!(settings.warming.batch_size, 5);
    assert_eq!(settings.warming.inter_batch_delay, Duration::from_millis(250));
    assert_eq!(settings.warming.attempt_timeout, Duration::from_secs(30));
}

#[test]
fn load_missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let settings = LifecycleSettings::load(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(settings, LifecycleSettings::default());
}

#[test]
fn load_reports_parse_errors_with_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tender.toml");
    std::fs::write(&path, "readiness_timeout = \"not a duration\"").unwrap();

    let err = LifecycleSettings::load(&path).unwrap_err();
    assert!(matches!(err, SettingsError::Parse { .. }));
    assert!(err.to_string().contains("tender.toml"));
}

#[test]
fn env_overrides_apply() {
    let settings = LifecycleSettings::default()
        .apply_env_with(env(&[
            (ENV_READINESS_TIMEOUT, "15"),
            (ENV_BASE_CONFIG, "/etc/tender/base.toml"),
            (ENV_TRANSIENT_DIR, "/var/tmp/tender"),
        ]))
        .unwrap();

    assert_eq!(settings.readiness_timeout, Duration::from_secs(15));
    assert_eq!(settings.base_config, PathBuf::from("/etc/tender/base.toml"));
    assert_eq!(settings.transient_dir, PathBuf::from("/var/tmp/tender"));
}

#[test]
fn invalid_timeout_env_is_rejected() {
    let err = LifecycleSettings::default()
        .apply_env_with(env(&[(ENV_READINESS_TIMEOUT, "soon")]))
        .unwrap_err();
    assert!(matches!(
        err,
        SettingsError::InvalidEnv { name: ENV_READINESS_TIMEOUT, .. }
    ));
}

#[test]
fn empty_path_overrides_are_ignored() {
    let settings = LifecycleSettings::default()
        .apply_env_with(env(&[(ENV_BASE_CONFIG, "")]))
        .unwrap();
    assert_eq!(settings.base_config, PathBuf::from("coordinator.toml"));
}

#[test]
fn zero_batch_size_fails_validation() {
    let settings = LifecycleSettings::default()
        .with_warming(WarmingOptions::default().with_batch_size(0));
    assert!(matches!(
        settings.validate(),
        Err(SettingsError::ZeroBatchSize)
    ));
}
