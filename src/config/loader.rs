//! Configuration loader for jenkins-notify
//!
//! Loads settings from an optional TOML file plus environment variable
//! overrides, in that order of priority.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};

use crate::config::error::ConfigError;
use crate::config::settings::Settings;

/// Environment variable naming a configuration file
const CONFIG_FILE_ENV: &str = "JENKINS_NOTIFY_CONFIG_FILE";

/// Environment variable prefix for configuration overrides
const ENV_PREFIX: &str = "JENKINS_NOTIFY";

/// Separator for nested configuration keys in environment variables
const ENV_SEPARATOR: &str = "__";

/// Configuration loader
///
/// Sources, in order of priority:
/// 1. Built-in defaults
/// 2. The TOML file named by `JENKINS_NOTIFY_CONFIG_FILE` or passed to
///    [`ConfigLoader::with_file`] (optional)
/// 3. `JENKINS_NOTIFY_*` environment variables (highest priority), with
///    `__` separating nested keys, e.g. `JENKINS_NOTIFY_HTTP__CONNECT_TIMEOUT`
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config_file: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a loader, picking up `JENKINS_NOTIFY_CONFIG_FILE` when set
    pub fn new() -> Self {
        Self {
            config_file: std::env::var(CONFIG_FILE_ENV).ok().map(PathBuf::from),
        }
    }

    /// Create a loader reading the given configuration file
    pub fn with_file(path: impl Into<PathBuf>) -> Self {
        Self {
            config_file: Some(path.into()),
        }
    }

    /// Load and validate settings from all sources
    ///
    /// # Errors
    ///
    /// Returns an error if the configured file does not exist, if parsing
    /// fails, or if validation rejects the merged settings.
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let mut builder = Config::builder();

        if let Some(ref path) = self.config_file {
            builder = Self::add_file_source(builder, path)?;
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator(ENV_SEPARATOR)
                .ignore_empty(true)
                .try_parsing(true),
        );

        let settings: Settings = builder.build()?.try_deserialize().map_err(|e| {
            ConfigError::ParseError(format!("Failed to deserialize configuration: {}", e))
        })?;

        settings.validate()?;

        Ok(settings)
    }

    fn add_file_source(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
        path: &Path,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::file_not_found(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        Ok(builder.add_source(
            File::new(path.to_str().unwrap_or_default(), FileFormat::Toml).required(true),
        ))
    }
}
