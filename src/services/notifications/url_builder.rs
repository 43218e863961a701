//! Notification URL construction.

use url::form_urlencoded;

use crate::error::{AppError, AppResult};

/// Path of the notify-commit endpoint, relative to the Jenkins base URL
const NOTIFY_COMMIT_PATH: &str = "git/notifyCommit";

/// Builds the exact notify-commit URL for a Jenkins instance
///
/// Strips exactly one trailing slash from the base address, encodes the
/// clone URL with `application/x-www-form-urlencoded` rules (the
/// convention the Jenkins endpoint decodes, space becomes `+`), and
/// composes `{base}/git/notifyCommit?url={encoded}`.
///
/// Pure function of its inputs, no I/O.
///
/// # Arguments
/// * `jenkins_base` - Base URL of the Jenkins instance
/// * `clone_url` - Clone URL of the repository, embedded as the `url`
///   query parameter
///
/// # Errors
/// Returns `AppError::Configuration` when the base address is blank.
pub fn build_notify_url(jenkins_base: &str, clone_url: &str) -> AppResult<String> {
    if jenkins_base.trim().is_empty() {
        return Err(AppError::Configuration {
            key: "jenkins_base".to_string(),
            source: anyhow::anyhow!("Jenkins base URL is not set"),
        });
    }

    let base = jenkins_base.strip_suffix('/').unwrap_or(jenkins_base);
    let encoded: String = form_urlencoded::byte_serialize(clone_url.as_bytes()).collect();

    Ok(format!("{}/{}?url={}", base, NOTIFY_COMMIT_PATH, encoded))
}
