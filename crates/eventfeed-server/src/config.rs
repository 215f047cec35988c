//! Configuration loading and typed config structures for the server.
//!
//! The configuration lives in `eventfeed-config.yaml` in the working
//! directory (or wherever `EVENTFEED_CONFIG` points). Every field has a
//! default, so a missing file or an empty one yields a working server on
//! `0.0.0.0:8999` storing events in `data.json`.
//!
//! Environment variables override the file after parsing:
//! - `EVENTFEED_HOST` overrides `server.host`
//! - `EVENTFEED_PORT` overrides `server.port`
//! - `EVENTFEED_DATA_PATH` overrides `storage.path`

use std::path::{Path, PathBuf};

use eventfeed_api::ServerConfig;
use serde::Deserialize;

/// Default config file name, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "eventfeed-config.yaml";

/// Environment variable naming an alternative config file.
pub const CONFIG_PATH_ENV: &str = "EVENTFEED_CONFIG";

/// Accepted values for `logging.level`.
const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// An environment override held an unusable value.
    #[error("invalid value for {name}: {message}")]
    Env {
        /// The variable name.
        name: &'static str,
        /// What was wrong with it.
        message: String,
    },

    /// A configured value is outside its accepted range.
    #[error("invalid {field}: {message}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// What was wrong with it.
        message: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level server configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EventfeedConfig {
    /// Bind address.
    #[serde(default)]
    pub server: ServerSection,

    /// Backing document settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl EventfeedConfig {
    /// Load configuration from the file named by `EVENTFEED_CONFIG`, or
    /// `eventfeed-config.yaml`. A missing file yields defaults.
    ///
    /// Returns the config and the path it was read from, if any.
    pub fn load() -> Result<(Self, Option<PathBuf>), ConfigError> {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from);

        if path.exists() {
            let config = Self::from_file(&path)?;
            Ok((config, Some(path)))
        } else {
            let mut config = Self::default();
            config.apply_env_overrides(|name| std::env::var(name).ok())?;
            config.validate()?;
            Ok((config, None))
        }
    }

    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML,
    /// [`ConfigError::Env`] if an override is malformed, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, then apply environment
    /// overrides.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config = Self::parse_yaml(yaml)?;
        config.apply_env_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string without consulting the
    /// environment.
    pub fn parse_yaml(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Apply overrides read through `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("EVENTFEED_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("EVENTFEED_PORT") {
            self.server.port = port.parse().map_err(|e| ConfigError::Env {
                name: "EVENTFEED_PORT",
                message: format!("{port:?}: {e}"),
            })?;
        }
        if let Some(path) = lookup("EVENTFEED_DATA_PATH") {
            self.storage.path = PathBuf::from(path);
        }
        Ok(())
    }

    /// Reject values that would only fail later, after startup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let level = self.logging.level.trim().to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::Invalid {
                field: "logging.level",
                message: format!(
                    "{:?} is not one of {}",
                    self.logging.level,
                    LOG_LEVELS.join(", ")
                ),
            });
        }
        Ok(())
    }

    /// The bind address as the API crate expects it.
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            host: self.server.host.clone(),
            port: self.server.port,
        }
    }
}

/// Bind address configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSection {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Backing document configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageConfig {
    /// Path of the JSON document.
    #[serde(default = "default_data_path")]
    pub path: PathBuf,

    /// Write an empty `{"feeds": []}` at startup if the document is absent.
    #[serde(default)]
    pub create_if_missing: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            create_if_missing: false,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
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

fn default_host() -> String {
    ServerConfig::default().host
}

fn default_port() -> u16 {
    ServerConfig::default().port
}

fn default_data_path() -> PathBuf {
    PathBuf::from("data.json")
}

fn default_log_level() -> String {
    String::from("info")
}
