//! Hook settings lookup.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::models::{HookSettings, Repository};

/// Source of per-repository hook configuration
///
/// `None` from either method means the hook is not configured for that
/// repository; the notifier treats it as a silent skip, not an error.
#[async_trait]
pub trait SettingsService: Send + Sync {
    /// Whether the notification hook is enabled
    ///
    /// # Returns
    /// `Some(enabled)` when a hook record exists, `None` otherwise
    async fn hook_enabled(&self, repo: &Repository) -> Option<bool>;

    /// The hook settings stored for the repository
    ///
    /// # Returns
    /// `Some(settings)` when settings exist, `None` otherwise
    async fn hook_settings(&self, repo: &Repository) -> Option<HookSettings>;
}

#[derive(Debug, Clone)]
struct HookState {
    enabled: bool,
    settings: Option<HookSettings>,
}

/// Map-backed `SettingsService` for embedders and tests
#[derive(Debug, Clone, Default)]
pub struct StaticSettingsService {
    hooks: HashMap<Repository, HookState>,
}

impl StaticSettingsService {
    /// Creates an empty settings service
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a hook for a repository
    pub fn insert(&mut self, repo: Repository, enabled: bool, settings: Option<HookSettings>) {
        self.hooks.insert(repo, HookState { enabled, settings });
    }
}

#[async_trait]
impl SettingsService for StaticSettingsService {
    async fn hook_enabled(&self, repo: &Repository) -> Option<bool> {
        self.hooks.get(repo).map(|hook| hook.enabled)
    }

    async fn hook_settings(&self, repo: &Repository) -> Option<HookSettings> {
        self.hooks.get(repo).and_then(|hook| hook.settings.clone())
    }
}
