//! Asynchronous Jenkins notify-commit dispatch.
//!
//! Notifies a Jenkins instance that a source repository changed by
//! issuing the `git/notifyCommit` HTTP request without blocking the
//! caller, and classifies Jenkins' reply into a [`NotificationResult`].
//!
//! The [`Notifier`] gates each notification on per-repository hook
//! configuration resolved through a [`SettingsService`], then hands the
//! caller a [`NotificationHandle`] that resolves when the exchange
//! terminates. A gate miss is a silent no-op; a rejection by Jenkins is
//! a result with `successful` unset; a transport failure is an error on
//! the handle.

pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod services;

pub use error::{AppError, AppResult};
pub use models::{HookSettings, NotificationResult, Repository};
pub use services::notifications::{
    ClientTrustPolicy, DefaultHttpClientFactory, HttpClientFactory, NotificationHandle, Notifier,
};
pub use services::settings_service::{SettingsService, StaticSettingsService};
