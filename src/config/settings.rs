use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::Deserialize;

use crate::error::{ErrorContext, LhrError, Result};

/// Main lhr configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LhrConfig {
    pub history: HistoryConfig,
    pub restore: RestoreConfig,
    pub ui: UiConfig,
}

/// Where the editor keeps its local history
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// History store root (defaults to the editor's platform directory)
    pub path: Option<PathBuf>,
}

/// Restore behaviour
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RestoreConfig {
    /// Destination root (defaults to the current directory)
    pub destination: Option<PathBuf>,
    /// Worker threads for loading and copying (0 = available parallelism)
    pub jobs: usize,
    /// Leave destination files alone when they already match the snapshot
    pub skip_unchanged: bool,
}

/// UI and display configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Whether to show colored output
    pub colored: bool,
    /// Whether to show progress bars
    pub progress_bars: bool,
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for RestoreConfig {
    fn default() -> Self {
        Self {
            destination: None,
            jobs: 0,
            skip_unchanged: true,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            colored: std::env::var("NO_COLOR").is_err(),
            progress_bars: true,
            log_level: "warn".to_string(),
        }
    }
}

impl LhrConfig {
    /// Load configuration from file or fall back to defaults
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        if config_path.exists() {
            let content = fs::read_to_string(config_path)
                .with_io_context(|| format!("reading config file {}", config_path.display()))?;

            toml::from_str(&content).map_err(|e| LhrError::Config {
                message: format!("Invalid TOML: {}", e),
                path: Some(config_path.to_path_buf()),
            })
        } else {
            Ok(Self::default())
        }
    }

    /// Load the global configuration file.
    ///
    /// Defaults when the platform has no config directory or the file is
    /// absent; a file that exists but cannot be read or parsed is an error.
    pub fn load_global() -> Result<Self> {
        match Self::global_config_path() {
            Ok(path) => Self::load(path),
            Err(e) => {
                debug!("{}; using default settings", e);
                Ok(Self::default())
            }
        }
    }

    /// Get global configuration file path
    pub fn global_config_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("lhr").join("config.toml"))
            .ok_or_else(|| LhrError::Config {
                message: "no configuration directory on this platform".to_string(),
                path: None,
            })
    }

    /// History root from config, else the editor's default location
    pub fn history_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.history.path {
            return Ok(path.clone());
        }
        default_history_dir().ok_or_else(|| LhrError::Config {
            message: "cannot determine the default history directory; pass --history".to_string(),
            path: None,
        })
    }

    /// Worker count, resolving 0 to the machine's parallelism
    pub fn jobs(&self) -> usize {
        if self.restore.jobs > 0 {
            self.restore.jobs
        } else {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
        }
    }
}

/// The editor's local history store for the current platform.
///
/// Linux: `~/.config/Code/User/History`, macOS:
/// `~/Library/Application Support/Code/User/History`, Windows:
/// `%APPDATA%\Code\User\History`.
pub fn default_history_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("Code").join("User").join("History"))
}
