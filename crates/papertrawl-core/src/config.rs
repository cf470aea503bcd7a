//! Configuration management for papertrawl.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main harvester configuration.
///
/// This is loaded from `~/.config/papertrawl/config.toml` (or platform
/// equivalent). If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestConfig {
    /// Harvest behavior settings
    pub harvest: HarvestSection,
    /// HTTP transport settings
    pub http: HttpSection,
}

impl HarvestConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path, falling back to defaults
    /// if the file does not exist.
    pub fn load_from(config_path: &std::path::Path) -> ConfigResult<Self> {
        if config_path.exists() {
            tracing::debug!("Loading config from {}", config_path.display());
            let contents = fs::read_to_string(config_path)?;
            let config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `PAPERTRAWL_WORKERS`: Override the detail-fetch pool width
    /// - `PAPERTRAWL_TIMEOUT_SECS`: Override the per-request timeout
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_env();
        Ok(config)
    }

    /// Apply environment variable overrides to an already-loaded config.
    pub fn apply_env(&mut self) {
        if let Ok(val) = std::env::var("PAPERTRAWL_WORKERS") {
            if let Ok(workers) = val.parse() {
                self.harvest.workers = workers;
                tracing::debug!("Override harvest.workers from env: {}", workers);
            }
        }

        if let Ok(val) = std::env::var("PAPERTRAWL_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                self.http.timeout_secs = secs;
                tracing::debug!("Override http.timeout_secs from env: {}", secs);
            }
        }
    }

    /// Save configuration to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> ConfigResult<()> {
        let config_path = Self::config_path()?;
        let config_dir = config_path
            .parent()
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "config_path".to_string(),
                reason: "no parent directory".to_string(),
            })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", config_path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(config_path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/papertrawl/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("io", "papertrawl", "papertrawl").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Harvest behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestSection {
    /// URL of the proceedings listing page to enumerate
    pub listing_url: String,
    /// Base URL for resolving relative links found in the listing
    pub base_url: String,
    /// Number of concurrent detail-page fetches
    pub workers: usize,
    /// Destination path of the record store
    pub output: PathBuf,
}

impl Default for HarvestSection {
    fn default() -> Self {
        Self {
            listing_url: "https://openaccess.thecvf.com/CVPR2024?day=all".to_string(),
            base_url: "https://openaccess.thecvf.com".to_string(),
            workers: 10,
            output: PathBuf::from("papers.csv"),
        }
    }
}

/// HTTP transport settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSection {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// User-Agent header sent with every request
    pub user_agent: String,
    /// Maximum fetch attempts for transient failures (1 = no retry)
    pub max_attempts: u32,
}

impl Default for HttpSection {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
                .to_string(),
            max_attempts: 3,
        }
    }
}
