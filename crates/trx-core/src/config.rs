//! Configuration management for trx.
//!
//! Loads configuration from ${TRX_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Returns the default config template with comments.
///
/// This is embedded from default_config.toml at compile time.
/// To update, edit default_config.toml directly.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for trx configuration and data directories.
    //!
    //! TRX_HOME resolution order:
    //! 1. TRX_HOME environment variable (if set)
    //! 2. ~/.config/trx (default)

    use std::path::PathBuf;

    /// Returns the trx home directory.
    ///
    /// Checks TRX_HOME env var first, falls back to ~/.config/trx
    pub fn trx_home() -> PathBuf {
        if let Ok(home) = std::env::var("TRX_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("trx"))
            .expect("Could not determine home directory")
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        trx_home().join("config.toml")
    }

    /// Returns the directory for log files.
    pub fn logs_dir() -> PathBuf {
        trx_home().join("logs")
    }
}

/// Trace backend configuration.
///
/// The backend records a trace per assistant turn; with a server URL and an
/// experiment id the viewer can link each turn to its trace page. Both
/// fields are optional: an unset section simply means no trace links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TraceConfig {
    /// Base URL of the trace server (e.g. a tracking UI).
    pub server_url: Option<String>,
    /// Experiment the session's traces were logged under.
    pub experiment_id: Option<String>,
}

impl TraceConfig {
    /// Returns the effective server URL if set and non-empty.
    pub fn effective_server_url(&self) -> Option<&str> {
        self.server_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Viewer behavior configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Poll interval for `--follow` mode, in milliseconds.
    pub follow_poll_ms: u64,
    /// Show the assistant label line above each assistant message.
    pub show_model_info: bool,
    /// Label shown above assistant messages.
    pub assistant_label: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            follow_poll_ms: Config::DEFAULT_FOLLOW_POLL_MS,
            show_model_info: true,
            assistant_label: Config::DEFAULT_ASSISTANT_LABEL.to_string(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Trace link configuration.
    pub trace: TraceConfig,
    /// Viewer behavior.
    pub viewer: ViewerConfig,
}

impl Config {
    const DEFAULT_FOLLOW_POLL_MS: u64 = 500;
    const DEFAULT_ASSISTANT_LABEL: &str = "Assistant";

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Config::default())
        }
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
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
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}
