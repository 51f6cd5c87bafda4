//! Configuration module for Padsync.
//!
//! Provides typed configuration structs that map to the YAML configuration
//! file, with loading, validation, and defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for Padsync.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub sync: SyncConfig,
    pub remote: RemoteConfig,
    pub logging: LoggingConfig,
}

/// Synchronization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Root directory of the local project workspace.
    pub root: PathBuf,
    /// Seconds between periodic queue drains.
    pub poll_interval: u64,
}

/// Remote publish-server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL of the publish server, e.g. `https://publish.example.org`.
    pub host: String,
    /// Server-side id of the project being synced.
    pub project_id: u64,
    /// CSRF token attached to every mutating request.
    pub csrf_token: String,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            root: dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("/"))
                .join("projects"),
            poll_interval: 30,
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            project_id: 0,
            csrf_token: String::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading and validation
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/padsync/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("padsync")
            .join("config.yaml")
    }

    /// Validate the loaded configuration.
    ///
    /// Checks the constraints that would otherwise only fail deep inside
    /// the engine or the transport.
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.sync.root.is_absolute() {
            anyhow::bail!(
                "sync.root must be an absolute path, got {}",
                self.sync.root.display()
            );
        }
        if self.sync.poll_interval == 0 {
            anyhow::bail!("sync.poll_interval must be at least 1 second");
        }
        if self.remote.host.is_empty() {
            anyhow::bail!("remote.host is required");
        }
        if !matches!(
            self.logging.level.as_str(),
            "trace" | "debug" | "info" | "warn" | "error"
        ) {
            anyhow::bail!("logging.level must be one of trace/debug/info/warn/error");
        }
        Ok(())
    }
}
