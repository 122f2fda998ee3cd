//! Configuration management for gatekeep
//!
//! Provides hierarchical configuration loading from multiple sources:
//! 1. Environment variables (GATEKEEP_* prefix, highest precedence)
//! 2. gatekeep.local.toml (gitignored, local overrides)
//! 3. gatekeep.toml (git-tracked, project config)
//! 4. ~/.config/gatekeep/config.toml (user defaults)
//! 5. Built-in defaults (lowest precedence)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

mod error;
mod loader;

pub use error::ConfigError;
pub use loader::ConfigLoader;

/// Main gatekeep configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatekeepConfig {
    pub registry: RegistryConfig,
    pub audit: AuditConfig,
}

/// How the rule registry is populated and how name collisions are handled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub on_duplicate: DuplicatePolicy,
    /// Register the built-in visibility and ownership rules at startup.
    pub builtin_rules: bool,
    /// Built-in rule names to leave out even when `builtin_rules` is set.
    pub disabled_builtins: Vec<String>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            on_duplicate: DuplicatePolicy::Reject,
            builtin_rules: true,
            disabled_builtins: Vec::new(),
        }
    }
}

/// What `register` does when the name is already taken.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Fail with a duplicate-rule error and keep the existing rule.
    #[default]
    Reject,
    /// Overwrite the existing rule.
    Replace,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Emit a debug event for every evaluation.
    pub log_evaluations: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            log_evaluations: true,
        }
    }
}

impl GatekeepConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        ConfigLoader::new().load()
    }

    /// Load configuration from specific project directory
    pub fn load_from_dir(project_dir: impl AsRef<Path>) -> Result<Self> {
        ConfigLoader::new().with_project_dir(project_dir).load()
    }

    /// Parse a single TOML document on top of the defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(ConfigError::SerializeError)
    }

    /// Create a configuration for tests: no built-ins, no audit noise
    pub fn empty() -> Self {
        Self {
            registry: RegistryConfig {
                builtin_rules: false,
                ..Default::default()
            },
            audit: AuditConfig {
                log_evaluations: false,
            },
        }
    }

    /// Check invariants the type system does not express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for name in &self.registry.disabled_builtins {
            if name.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "registry.disabled_builtins contains an empty rule name".to_string(),
                ));
            }
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "registry.disabled_builtins lists '{name}' more than once"
                )));
            }
        }
        Ok(())
    }
}
