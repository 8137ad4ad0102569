// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Environment variable substitution for configuration text

use regex::Regex;
use std::sync::LazyLock;

// Regex pattern for ${VAR} and ${VAR:-default} - this is a constant valid pattern
// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
static ENV_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
        .expect("constant regex pattern is valid")
});

/// Expand `${VAR}` and `${VAR:-default}` patterns from the process environment
///
/// A variable that is unset (or empty, when a default is given) takes its
/// default. An unset variable without a default expands to the empty string.
pub fn substitute_env(text: &str) -> String {
    substitute_with(text, |name| std::env::var(name).ok())
}

/// Same as [`substitute_env`] but resolves names through `lookup`
pub fn substitute_with<F>(text: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    ENV_PATTERN
        .replace_all(text, |caps: &regex::Captures| {
            let name = &caps[1];
            let value = lookup(name);
            match caps.get(2) {
                Some(default) => value
                    .filter(|v| !v.is_empty())
                    .unwrap_or_else(|| default.as_str().to_string()),
                None => value.unwrap_or_else(|| {
                    tracing::debug!(name, "unset variable in configuration, using empty string");
                    String::new()
                }),
            }
        })
        .to_string()
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
