//! Bootstrap configuration
//!
//! Settings are resolved in priority order:
//! 1. Command-line arguments / environment variables (applied by the binary)
//! 2. TOML config file (`--config`, `$BKM_CONFIG_DIR/config.toml`, or the
//!    platform config dir)
//! 3. Compiled defaults
//!
//! A missing config file is not an error: a warning is logged and the
//! compiled defaults are used. A file that exists but does not parse is.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use crate::{Error, Result};

/// Application directory name under the platform config dir
pub const APP_DIR_NAME: &str = "bookminder";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TomlConfig {
    /// Listen address
    #[serde(default = "default_bind")]
    pub bind: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub session: SessionConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Session cookie and lifetime settings
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SessionConfig {
    /// Name of the session cookie
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Sessions unused for this long are discarded
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,

    /// Upper bound on live sessions; the least recently used is evicted
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    4567
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_cookie_name() -> String {
    "bkm_session".to_string()
}

fn default_idle_timeout_secs() -> u64 {
    12 * 60 * 60
}

fn default_max_sessions() -> usize {
    10_000
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            logging: LoggingConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            idle_timeout_secs: default_idle_timeout_secs(),
            max_sessions: default_max_sessions(),
        }
    }
}

/// Where a loaded configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Parsed from this file
    File(PathBuf),
    /// Compiled defaults; `missing` is the path that was looked for, if any
    Defaults { missing: Option<PathBuf> },
}

impl ConfigSource {
    pub fn is_defaults(&self) -> bool {
        matches!(self, ConfigSource::Defaults { .. })
    }

    /// Log the outcome of [`TomlConfig::load`]
    pub fn log(&self) {
        match self {
            ConfigSource::File(path) => {
                info!("Loaded configuration from {}", path.display());
            }
            ConfigSource::Defaults {
                missing: Some(path),
            } => {
                warn!(
                    "Config file not found at {}, using compiled defaults",
                    path.display()
                );
            }
            ConfigSource::Defaults { missing: None } => {
                warn!("Could not determine config directory, using compiled defaults");
            }
        }
    }
}

impl SessionConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

impl TomlConfig {
    /// Parse configuration text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: TomlConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file that must exist
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Load from `explicit` if given, else the platform default path
    ///
    /// Falls back to compiled defaults when no file is found. An explicitly
    /// named file that is missing is still not an error. Nothing is logged
    /// here: callers report the returned [`ConfigSource`] once tracing is up.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, ConfigSource)> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => default_config_path(),
        };

        match path {
            Some(path) if path.exists() => {
                let config = Self::from_file(&path)?;
                Ok((config, ConfigSource::File(path)))
            }
            missing => Ok((Self::default(), ConfigSource::Defaults { missing })),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.session.cookie_name.is_empty()
            || !self
                .session
                .cookie_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(Error::Config(format!(
                "Invalid session cookie name: {:?}",
                self.session.cookie_name
            )));
        }
        if self.session.idle_timeout_secs == 0 {
            return Err(Error::Config(
                "session.idle_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.session.max_sessions == 0 {
            return Err(Error::Config(
                "session.max_sessions must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Environment variable overriding the config directory
pub const CONFIG_DIR_ENV: &str = "BKM_CONFIG_DIR";

/// `config.toml` in `$BKM_CONFIG_DIR` if set, else `<config_dir>/bookminder/`
pub fn default_config_path() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
        return Some(PathBuf::from(dir).join("config.toml"));
    }
    dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join("config.toml"))
}
