//! Configuration management for tasklane.
//!
//! Loads configuration from ${TASKLANE_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::tasks::Category;

/// Returns the default config template with comments.
///
/// This is embedded from default_config.toml at compile time.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for tasklane configuration and data directories.
    //!
    //! TASKLANE_HOME resolution order:
    //! 1. TASKLANE_HOME environment variable (if set)
    //! 2. ~/.config/tasklane (default)
    //! 3. ./.tasklane when no home directory can be determined

    use std::path::PathBuf;

    /// Returns the tasklane home directory.
    pub fn tasklane_home() -> PathBuf {
        if let Ok(home) = std::env::var("TASKLANE_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".tasklane"),
            |h| h.join(".config").join("tasklane"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        tasklane_home().join("config.toml")
    }

    /// Returns the default data directory of the local platform.
    pub fn default_data_dir() -> PathBuf {
        tasklane_home().join("data")
    }

    /// Returns the directory log files are written to.
    pub fn logs_dir() -> PathBuf {
        tasklane_home().join("logs")
    }
}

/// Terminal UI preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// How long a notification stays visible, in milliseconds.
    pub toast_duration_ms: u64,
    /// Delay before leaving the register view after a successful registration.
    pub register_redirect_delay_ms: u64,
    /// Category preselected in the new-task draft.
    pub default_category: Category,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            toast_duration_ms: Config::DEFAULT_TOAST_DURATION_MS,
            register_redirect_delay_ms: Config::DEFAULT_REGISTER_REDIRECT_DELAY_MS,
            default_category: Category::default(),
        }
    }
}

impl UiConfig {
    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }

    pub fn register_redirect_delay(&self) -> Duration {
        Duration::from_millis(self.register_redirect_delay_ms)
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory for the local platform's files (accounts, session, documents).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Log filter directive (overridden by `TASKLANE_LOG`).
    pub log_level: String,

    /// Terminal UI preferences.
    pub ui: UiConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            log_level: Self::DEFAULT_LOG_LEVEL.to_string(),
            ui: UiConfig::default(),
        }
    }
}

impl Config {
    const DEFAULT_LOG_LEVEL: &str = "info";
    const DEFAULT_TOAST_DURATION_MS: u64 = 3000;
    const DEFAULT_REGISTER_REDIRECT_DELAY_MS: u64 = 2000;

    /// Loads configuration from the default config path.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Returns the effective data directory.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(paths::default_data_dir)
    }

    /// Creates a default config file at the given path.
    ///
    /// # Errors
    /// Returns an error if the file already exists or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to move {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;
        Ok(())
    }
}
