//! Configuration for the libris binaries.
//!
//! Loaded from `~/.config/libris/config.toml` when present. Every section
//! falls back to defaults for missing fields, and a couple of environment
//! variables override the file.

use std::path::{Path, PathBuf};

use libris_search::ClientConfig;
use serde::{Deserialize, Serialize};

use crate::error::{LibrisError, Result};

/// Overrides `client.endpoint`.
pub const ENV_ENDPOINT: &str = "LIBRIS_ENDPOINT";

/// Overrides `client.timeout_seconds`.
pub const ENV_TIMEOUT_SECS: &str = "LIBRIS_TIMEOUT_SECS";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibrisConfig {
    /// Catalog HTTP client settings.
    pub client: ClientConfig,
    /// One-shot command-line settings.
    pub cli: CliConfig,
    /// Interactive shell settings.
    pub shell: ShellConfig,
}

/// Settings for the `libris` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Maximum number of result lines printed.
    pub limit: usize,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self { limit: 5 }
    }
}

/// Settings for the `libris-shell` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Maximum number of result lines shown per search.
    pub limit: usize,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self { limit: 10 }
    }
}

impl LibrisConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| LibrisError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| LibrisError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `~/.config/libris/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config).join("libris").join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("libris")
                .join("config.toml")
        } else {
            PathBuf::from("/tmp/libris-config/config.toml")
        }
    }

    /// Resolve the configuration the binaries run with.
    ///
    /// An explicit `path` must exist. Without one, the default path is used
    /// if present and defaults otherwise. Environment overrides are applied
    /// last, then the result is validated.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit file is missing, any file is invalid,
    /// an override cannot be parsed, or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Self::default_config_path();
                if default_path.exists() {
                    tracing::debug!(path = %default_path.display(), "loading config");
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `LIBRIS_*` overrides looked up through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`LibrisError::Config`] if a timeout override is not a number.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(ENV_ENDPOINT) {
            self.client.endpoint = endpoint;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            self.client.timeout_seconds = raw.trim().parse().map_err(|_| {
                LibrisError::Config(format!("{ENV_TIMEOUT_SECS} must be a whole number, got {raw:?}"))
            })?;
        }
        Ok(())
    }

    /// Validates every section.
    ///
    /// # Errors
    ///
    /// Returns an error for a zero result limit or an invalid client section.
    pub fn validate(&self) -> Result<()> {
        if self.cli.limit == 0 {
            return Err(LibrisError::Config("cli.limit must be greater than 0".into()));
        }
        if self.shell.limit == 0 {
            return Err(LibrisError::Config(
                "shell.limit must be greater than 0".into(),
            ));
        }
        self.client.validate()?;
        Ok(())
    }
}
