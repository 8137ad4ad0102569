// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tender_core::ServerConfig;

#[tokio::test]
async fn write_creates_directory_and_readable_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = artifact_path(&dir.path().join("nested"));
    let config = CoordinatorConfig::new()
        .with_user_id("u-1")
        .with_server("files", ServerConfig::new("files-server").with_args(["--root", "/data"]))
        .with_setting("model", "small");

    write_artifact(&path, &config).await.unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let parsed: CoordinatorConfig = toml::from_str(&content).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn artifact_paths_are_unique() {
    let dir = Path::new("/tmp");
    let a = artifact_path(dir);
    let b = artifact_path(dir);

    assert_ne!(a, b);
    assert!(a
        .file_name()
        .unwrap()
        .to_string_lossy()
        .starts_with("tender-coordinator-"));
    assert_eq!(a.extension().unwrap(), "toml");
}

#[tokio::test]
async fn remove_tolerates_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gone.toml");

    remove_artifact(&path).await;
    remove_artifact_sync(&path);

    std::fs::write(&path, "").unwrap();
    remove_artifact(&path).await;
    assert!(!path.exists());
}
