//! Notification data models.
//!
//! This module provides the hook settings consulted before a dispatch and
//! the immutable result produced by one.

use serde::{Deserialize, Serialize};

/// Per-repository hook settings resolved through a `SettingsService`
///
/// Field meanings follow the repository hook form: the Jenkins base
/// address, the clone URL Jenkins matches jobs against, and whether to
/// accept any TLS certificate when the base address is secured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookSettings {
    /// Base URL of the Jenkins instance
    pub jenkins_base: String,
    /// Clone URL embedded in the notification
    pub clone_url: String,
    /// Accept any certificate chain and hostname for https targets
    #[serde(default)]
    pub ignore_certs: bool,
}

/// Result of a completed or failed notification dispatch
///
/// Created exactly once per dispatch and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationResult {
    /// Whether Jenkins accepted the notification
    pub successful: bool,
    /// The exact URL that was requested
    pub requested_url: String,
    /// Jenkins' response body behind a fixed label, or an error description
    pub message: String,
}

impl NotificationResult {
    /// Creates a failed result carrying an error description
    pub fn failure(requested_url: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            successful: false,
            requested_url: requested_url.into(),
            message: message.into(),
        }
    }
}
