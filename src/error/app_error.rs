use thiserror::Error;

/// Application-wide error type that represents all possible errors in the
/// notification pipeline.
///
/// Transport failures and configuration defects travel through this enum.
/// Business-level rejections by Jenkins do not: those are reported as a
/// `NotificationResult` with `successful` set to false.
#[derive(Error, Debug)]
pub enum AppError {
    /// Validation error with field-specific details
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Configuration error with key information
    #[error("Configuration error: {key}")]
    Configuration {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// Transport-level HTTP failure (DNS, refused connection, TLS
    /// handshake, mid-stream I/O)
    #[error("HTTP request to '{url}' failed")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The dispatch was cancelled before a result was produced
    #[error("Notification dispatch was cancelled")]
    Cancelled,

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;
