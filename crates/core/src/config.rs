// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed coordinator configuration
//!
//! The coordinator service consumes this document directly. Dynamic values
//! (accessible paths, user identity) are explicit fields rather than
//! positional command-line arguments patched into server definitions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Configuration document handed to the coordinator service
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    /// Filesystem roots the coordinator may expose to its servers
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accessible_paths: Vec<PathBuf>,
    /// Identifier of the user the coordinator acts for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Sub-resource servers keyed by name
    #[serde(default)]
    pub servers: BTreeMap<String, ServerConfig>,
    /// Opaque settings passed through to the coordinator untouched
    #[serde(default, skip_serializing_if = "toml::Table::is_empty")]
    pub settings: toml::Table,
}

/// How to launch one sub-resource server
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
}

fn default_enabled() -> bool {
    true
}

impl ServerConfig {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            env: BTreeMap::new(),
            enabled: true,
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// A named sub-resource to warm
#[derive(Clone, Debug, PartialEq)]
pub struct Resource {
    pub name: String,
    pub server: ServerConfig,
}

impl Resource {
    pub fn new(name: impl Into<String>, server: ServerConfig) -> Self {
        Self {
            name: name.into(),
            server,
        }
    }
}

impl CoordinatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_server(mut self, name: impl Into<String>, server: ServerConfig) -> Self {
        self.servers.insert(name.into(), server);
        self
    }

    /// Add accessible paths, skipping ones already present
    pub fn with_accessible_paths<I>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        for path in paths {
            if !self.accessible_paths.contains(&path) {
                self.accessible_paths.push(path);
            }
        }
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<toml::Value>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    /// Enabled servers as warmable resources, in name order
    pub fn resources(&self) -> Vec<Resource> {
        self.servers
            .iter()
            .filter(|(_, server)| server.enabled)
            .map(|(name, server)| Resource::new(name.clone(), server.clone()))
            .collect()
    }

    /// Merge user settings into this configuration
    ///
    /// Paths are appended (deduplicated); a user id from the settings
    /// replaces any id already present.
    pub fn merge_user_settings(self, user: &UserSettings) -> Self {
        let merged = self.with_accessible_paths(user.accessible_paths.iter().cloned());
        match &user.user_id {
            Some(id) => merged.with_user_id(id.clone()),
            None => merged,
        }
    }
}

/// Per-user values merged into the coordinator configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    #[serde(default)]
    pub accessible_paths: Vec<PathBuf>,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
