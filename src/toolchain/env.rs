//! Environment overlays for toolchain processes
//!
//! Cross-compilation is configured per command through an [`EnvOverlay`]
//! instead of mutating the environment of the rscharm process itself.

use std::collections::BTreeMap;
use std::process::Command;

use crate::error::{CharmError, Result};

/// Cargo's build target variable
pub const CARGO_BUILD_TARGET: &str = "CARGO_BUILD_TARGET";

/// Set or remove environment variables on one child process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverlay {
    // None removes the variable
    entries: BTreeMap<String, Option<String>>,
}

impl EnvOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overlay with `key` set to `value`
    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), Some(value.into()));
        self
    }

    /// Overlay with `key` removed from the child's environment
    #[must_use]
    pub fn remove(mut self, key: impl Into<String>) -> Self {
        self.entries.insert(key.into(), None);
        self
    }

    /// What the overlay says about `key`: `None` if it leaves it alone,
    /// `Some(None)` if it removes it.
    pub fn get(&self, key: &str) -> Option<Option<&str>> {
        self.entries.get(key).map(Option::as_deref)
    }

    /// The value `key` will have in the child process
    pub fn resolve(&self, key: &str) -> Option<String> {
        match self.get(key) {
            Some(value) => value.map(str::to_string),
            None => std::env::var(key).ok().filter(|v| !v.is_empty()),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// Apply the overlay to `cmd`
    pub fn apply(&self, cmd: &mut Command) {
        for (key, value) in self.iter() {
            match value {
                Some(value) => {
                    cmd.env(key, value);
                }
                None => {
                    cmd.env_remove(key);
                }
            }
        }
    }

    /// Overlay for building something that must run on the build host
    pub fn host() -> Self {
        Self::new().remove(CARGO_BUILD_TARGET)
    }
}

/// Platform the charm executable is built for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetPlatform {
    triple: String,
}

impl TargetPlatform {
    /// Juju machines are 64-bit Linux; musl gives a fully static binary
    pub const DEFAULT_TRIPLE: &'static str = "x86_64-unknown-linux-musl";

    pub fn new(triple: impl Into<String>) -> Result<Self> {
        let triple = triple.into();
        let parts: Vec<&str> = triple.split('-').collect();
        let valid = parts.len() >= 3
            && parts.iter().all(|part| {
                !part.is_empty()
                    && part
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
            });
        if !valid {
            return Err(CharmError::InvalidTarget { triple });
        }
        Ok(Self { triple })
    }

    pub fn triple(&self) -> &str {
        &self.triple
    }

    /// Architecture component, e.g. `x86_64`
    pub fn arch(&self) -> &str {
        self.triple.split('-').next().unwrap_or_default()
    }

    /// Operating system component, e.g. `linux`
    pub fn os(&self) -> &str {
        // arch-vendor-os[-env]
        self.triple.split('-').nth(2).unwrap_or_default()
    }

    /// Cargo's per-target rustflags variable for this triple
    pub fn rustflags_var(&self) -> String {
        format!(
            "CARGO_TARGET_{}_RUSTFLAGS",
            self.triple.to_ascii_uppercase().replace(['-', '.'], "_")
        )
    }

    /// Overlay selecting this target with static linking
    pub fn env_overlay(&self) -> EnvOverlay {
        EnvOverlay::new()
            .set(CARGO_BUILD_TARGET, self.triple.clone())
            .set(self.rustflags_var(), "-C target-feature=+crt-static")
    }
}

impl Default for TargetPlatform {
    fn default() -> Self {
        Self {
            triple: Self::DEFAULT_TRIPLE.to_string(),
        }
    }
}

impl std::fmt::Display for TargetPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.triple)
    }
}
