//! Layered configuration loading
//!
//! A broken or invalid layer is an error. There is no fallback to defaults:
//! a project file that disables a grant rule must not be skipped silently.

use crate::GatekeepConfig;
use anyhow::{Context, Result};
use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use directories::ProjectDirs;
use std::env;
use std::path::{Path, PathBuf};

const DEFAULT_ENV_PREFIX: &str = "GATEKEEP";
const PROJECT_FILE: &str = "gatekeep.toml";
const LOCAL_FILE: &str = "gatekeep.local.toml";

/// Loads [`GatekeepConfig`] from defaults, files and the environment.
pub struct ConfigLoader {
    project_dir: PathBuf,
    env_prefix: String,
}

impl ConfigLoader {
    /// Loader rooted at the current directory, reading `GATEKEEP_*` variables.
    pub fn new() -> Self {
        Self {
            project_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
        }
    }

    /// Directory holding `gatekeep.toml` and `gatekeep.local.toml`.
    pub fn with_project_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.project_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Merges every layer, lowest precedence first, then validates.
    ///
    /// 1. Built-in defaults
    /// 2. `~/.config/gatekeep/config.toml`
    /// 3. `gatekeep.toml`
    /// 4. `gatekeep.local.toml`
    /// 5. `<PREFIX>_<SECTION>__<FIELD>` environment variables
    pub fn load(self) -> Result<GatekeepConfig> {
        let defaults = Config::try_from(&GatekeepConfig::default())
            .context("Failed to serialize built-in defaults")?;
        let mut builder = Config::builder().add_source(defaults);

        if let Some(user_file) = user_config_file() {
            builder = with_toml_layer(builder, &user_file);
        }
        builder = with_toml_layer(builder, &self.project_dir.join(PROJECT_FILE));
        builder = with_toml_layer(builder, &self.project_dir.join(LOCAL_FILE));

        // Field names contain `_`, so sections are split on `__`:
        // GATEKEEP_REGISTRY__ON_DUPLICATE=replace
        builder = builder.add_source(
            Environment::with_prefix(&self.env_prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: GatekeepConfig = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config
            .validate()
            .context("Configuration failed validation")?;

        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// `~/.config/gatekeep/config.toml`, or `None` without a home directory.
fn user_config_file() -> Option<PathBuf> {
    ProjectDirs::from("com", "Gatekeep", "gatekeep").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Adds `path` as a TOML layer when it exists. A file that exists but does
/// not parse fails the build.
fn with_toml_layer(
    builder: ConfigBuilder<DefaultState>,
    path: &Path,
) -> ConfigBuilder<DefaultState> {
    if !path.exists() {
        return builder;
    }
    builder.add_source(File::from(path).format(FileFormat::Toml).required(true))
}
