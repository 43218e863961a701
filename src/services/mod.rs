//! Service layer.

pub mod notifications;
pub mod settings_service;

pub use notifications::{NotificationHandle, Notifier};
pub use settings_service::{SettingsService, StaticSettingsService};
