// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File-backed configuration loader

use super::{ConfigError, ConfigLoader};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tender_core::settings::ENV_USER_SETTINGS;
use tender_core::{substitute_env, CoordinatorConfig, UserSettings};

/// Loads the base configuration from a TOML file
///
/// `${VAR}` / `${VAR:-default}` patterns are expanded before parsing. The
/// enrich step merges the user settings file (if any) and drops accessible
/// paths that do not exist on this host.
#[derive(Clone, Debug, Default)]
pub struct TomlConfigLoader {
    user_settings: Option<PathBuf>,
}

impl TomlConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the user settings file named by `TENDER_USER_SETTINGS`
    pub fn from_env() -> Self {
        Self {
            user_settings: std::env::var(ENV_USER_SETTINGS)
                .ok()
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
        }
    }

    pub fn with_user_settings(mut self, path: impl Into<PathBuf>) -> Self {
        self.user_settings = Some(path.into());
        self
    }

    async fn read_user_settings(&self) -> Result<UserSettings, ConfigError> {
        let Some(path) = &self.user_settings else {
            return Ok(UserSettings::default());
        };
        if !path.exists() {
            tracing::debug!(path = %path.display(), "user settings file not found");
            return Ok(UserSettings::default());
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.clone(),
                source,
            })?;
        toml::from_str(&content).map_err(|source| ConfigError::UserSettings {
            path: path.clone(),
            source,
        })
    }
}

#[async_trait]
impl ConfigLoader for TomlConfigLoader {
    async fn load(&self, base: &Path) -> Result<CoordinatorConfig, ConfigError> {
        let content = tokio::fs::read_to_string(base)
            .await
            .map_err(|source| ConfigError::Io {
                path: base.to_path_buf(),
                source,
            })?;

        let expanded = substitute_env(&content);
        toml::from_str(&expanded).map_err(|source| ConfigError::Parse {
            path: base.to_path_buf(),
            source,
        })
    }

    async fn enrich(&self, config: CoordinatorConfig) -> Result<CoordinatorConfig, ConfigError> {
        let user = self.read_user_settings().await?;
        let mut config = config.merge_user_settings(&user);

        config.accessible_paths.retain(|path| {
            let exists = path.exists();
            if !exists {
                tracing::warn!(path = %path.display(), "dropping inaccessible path");
            }
            exists
        });

        Ok(config)
    }
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
