//! Configuration settings structures for jenkins-notify
//!
//! This module defines the configuration structures that can be loaded
//! from a TOML file and environment variables.

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;

// ============================================================================
// Default value functions
// ============================================================================

fn default_connect_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("jenkins-notify/{}", env!("CARGO_PKG_VERSION"))
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

// ============================================================================
// HTTP Client Configuration
// ============================================================================

/// Configuration applied to every per-dispatch HTTP client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpClientConfig {
    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,

    /// Whole-request timeout in seconds
    ///
    /// Unset by default: callers own deadline policy by bounding their
    /// wait on the notification handle.
    #[serde(default)]
    pub request_timeout: Option<u64>,

    /// User-Agent header sent with notification requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: default_connect_timeout(),
            request_timeout: None,
            user_agent: default_user_agent(),
        }
    }
}

// ============================================================================
// Logger Configuration
// ============================================================================

/// Console logger configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Log level filter, any `EnvFilter` directive
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Colored output when attached to a terminal
    #[serde(default = "default_true")]
    pub colored: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            colored: default_true(),
        }
    }
}

// ============================================================================
// Root Settings
// ============================================================================

/// Root application settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Settings {
    /// HTTP client configuration
    #[serde(default)]
    pub http: HttpClientConfig,

    /// Logger configuration
    #[serde(default)]
    pub logger: LoggerConfig,
}

impl Settings {
    /// Validate the loaded settings
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::ValidationError` describing the first
    /// offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.connect_timeout == 0 {
            return Err(ConfigError::validation(
                "http.connect_timeout",
                "must be greater than zero",
            ));
        }
        if self.http.request_timeout == Some(0) {
            return Err(ConfigError::validation(
                "http.request_timeout",
                "must be greater than zero when set",
            ));
        }
        if self.logger.level.trim().is_empty() {
            return Err(ConfigError::validation("logger.level", "must not be empty"));
        }
        Ok(())
    }
}
