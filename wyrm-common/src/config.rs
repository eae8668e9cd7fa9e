//! Configuration loading and resolution
//!
//! Bootstrap configuration for wyrm services lives in a small TOML file.
//! The config file path is resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`WYRM_CONFIG`)
//! 3. Platform config directory (`<config_dir>/wyrm/config.toml`)
//! 4. Compiled defaults (fallback, no file)
//!
//! A missing config file is never fatal: a warning is logged and defaults
//! are used. A config file that exists but fails to parse is an error.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "WYRM_CONFIG";

/// Environment variable overriding the Open Library base URL
pub const OPEN_LIBRARY_URL_ENV: &str = "WYRM_OPEN_LIBRARY_URL";

/// Environment variable overriding the log level
pub const LOG_LEVEL_ENV: &str = "WYRM_LOG_LEVEL";

const DEFAULT_OPEN_LIBRARY_URL: &str = "https://openlibrary.org";
const DEFAULT_USER_AGENT: &str = concat!("wyrm/", env!("CARGO_PKG_VERSION"));

/// Bootstrap configuration loaded from TOML
///
/// Every field has a default, so an empty file is a valid config.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TomlConfig {
    /// Bibliographic API settings
    #[serde(default)]
    pub open_library: OpenLibraryConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Open Library client settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OpenLibraryConfig {
    /// API base URL, without trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// User-Agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Minimum spacing between requests (0 disables throttling)
    #[serde(default)]
    pub min_request_interval_ms: u64,

    /// Maximum number of search hits requested
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,
}

impl Default for OpenLibraryConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            min_request_interval_ms: 0,
            search_limit: default_search_limit(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_OPEN_LIBRARY_URL.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_search_limit() -> usize {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Resolves and loads the bootstrap configuration
pub struct ConfigResolver {
    cli_path: Option<PathBuf>,
}

impl ConfigResolver {
    /// Create a resolver, optionally seeded with a `--config` argument
    pub fn new(cli_path: Option<PathBuf>) -> Self {
        Self { cli_path }
    }

    /// Config file path to use, if any source names one
    pub fn config_path(&self) -> Option<PathBuf> {
        // Priority 1: Command-line argument
        if let Some(path) = &self.cli_path {
            return Some(path.clone());
        }

        // Priority 2: Environment variable
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            if !path.trim().is_empty() {
                return Some(PathBuf::from(path));
            }
        }

        // Priority 3: Platform config directory
        dirs::config_dir().map(|d| d.join("wyrm").join("config.toml"))
    }

    /// Load the configuration, falling back to defaults when no file exists
    ///
    /// Environment overrides are applied on top of whatever was loaded.
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match self.config_path() {
            Some(path) if path.exists() => {
                let config = load_toml_config(&path)?;
                info!("Loaded configuration from {}", path.display());
                config
            }
            Some(path) => {
                warn!(
                    "Config file not found at {}, using defaults",
                    path.display()
                );
                TomlConfig::default()
            }
            None => {
                warn!("Could not determine config directory, using defaults");
                TomlConfig::default()
            }
        };

        apply_env_overrides(&mut config);
        Ok(config)
    }
}

/// Apply `WYRM_*` environment overrides to a loaded config
pub fn apply_env_overrides(config: &mut TomlConfig) {
    if let Ok(url) = std::env::var(OPEN_LIBRARY_URL_ENV) {
        let url = url.trim().trim_end_matches('/');
        if !url.is_empty() {
            config.open_library.base_url = url.to_string();
        }
    }

    if let Ok(level) = std::env::var(LOG_LEVEL_ENV) {
        let level = level.trim();
        if !level.is_empty() {
            config.logging.level = level.to_string();
        }
    }
}

/// Read and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    let mut config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;

    config.open_library.base_url = config
        .open_library
        .base_url
        .trim_end_matches('/')
        .to_string();

    if config.open_library.timeout_secs == 0 {
        return Err(Error::Config(
            "open_library.timeout_secs must be greater than zero".to_string(),
        ));
    }

    Ok(config)
}

/// Write a config file atomically (temp file + rename)
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, content)?;
    std::fs::rename(&temp_path, path)?;

    Ok(())
}
