// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Transient configuration artifact handed to the coordinator factory

use crate::error::LifecycleError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tender_core::CoordinatorConfig;
use uuid::Uuid;

const PREFIX: &str = "tender-coordinator";

/// Fresh artifact path inside `dir`
pub(crate) fn artifact_path(dir: &Path) -> PathBuf {
    dir.join(format!("{}-{}.toml", PREFIX, Uuid::new_v4().simple()))
}

/// Serialize `config` to `path`, creating the directory if needed
pub(crate) async fn write_artifact(
    path: &Path,
    config: &CoordinatorConfig,
) -> Result<(), LifecycleError> {
    let content = toml::to_string_pretty(config)?;
    let artifact_err = |source| LifecycleError::Artifact {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(artifact_err)?;
    }
    tokio::fs::write(path, content).await.map_err(artifact_err)?;
    tracing::debug!(path = %path.display(), "wrote configuration artifact");
    Ok(())
}

/// Delete an artifact; a missing file is not an error
pub(crate) async fn remove_artifact(path: &Path) {
    log_removal(path, tokio::fs::remove_file(path).await);
}

/// Blocking variant for drop paths
pub(crate) fn remove_artifact_sync(path: &Path) {
    log_removal(path, std::fs::remove_file(path));
}

fn log_removal(path: &Path, result: std::io::Result<()>) {
    match result {
        Ok(()) => tracing::debug!(path = %path.display(), "removed configuration artifact"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to remove configuration artifact")
        }
    }
}

#[cfg(test)]
#[path = "artifact_tests.rs"]
mod tests;
