//! Configuration management for adiumcat
//!
//! Loads settings from TOML file at ~/.adiumcat/config.toml

use crate::error::{CoreError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable overriding `logs.root`
pub const LOG_ROOT_ENV: &str = "ADIUMCAT_LOG_ROOT";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Log store configuration
    #[serde(default)]
    pub logs: LogsConfig,
}

/// Where transcripts are read from
#[derive(Debug, Clone, Deserialize)]
pub struct LogsConfig {
    /// Adium user directory containing `Logs/`
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Directory entries that are never buddies or transcripts
    #[serde(default = "default_ignore")]
    pub ignore: Vec<String>,
}

fn default_root() -> PathBuf {
    PathBuf::from("~/Library/Application Support/Adium 2.0/Users/Default")
}

fn default_ignore() -> Vec<String> {
    vec![".DS_Store".to_string()]
}

impl Default for LogsConfig {
    fn default() -> Self {
        LogsConfig {
            root: default_root(),
            ignore: default_ignore(),
        }
    }
}

impl LogsConfig {
    /// Get the log root, expanding ~ if present
    pub fn root(&self) -> PathBuf {
        expand_path(&self.root)
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let expanded_path = expand_path(path.as_ref());

        if !expanded_path.exists() {
            return Err(CoreError::Config(format!(
                "Configuration file not found: {}",
                expanded_path.display()
            )));
        }

        let content = std::fs::read_to_string(&expanded_path)?;
        let config: Config = toml::from_str(&content)?;

        Ok(config)
    }

    /// Get the default configuration file path
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .map(|p| p.join(".adiumcat").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".adiumcat/config.toml"))
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        if let Ok(root) = std::env::var(LOG_ROOT_ENV) {
            if !root.is_empty() {
                self.logs.root = PathBuf::from(root);
            }
        }
    }

    /// Create a default configuration file at the given path
    pub fn create_default<P: AsRef<Path>>(path: P) -> Result<()> {
        let content = r#"# adiumcat configuration

[logs]
# Adium user directory; transcripts are read from its Logs/ folder
root = "~/Library/Application Support/Adium 2.0/Users/Default"

# Entries skipped when listing buddies and transcripts
ignore = [".DS_Store"]
"#;

        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;

        Ok(())
    }
}

/// Expand ~ to home directory in paths
pub fn expand_path(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}
