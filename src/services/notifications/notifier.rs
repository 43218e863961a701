//! Notification dispatch orchestration.

use std::sync::Arc;

use reqwest::Url;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use super::http_client::HttpClientFactory;
use super::response::{classify, collect_body};
use super::url_builder::build_notify_url;
use crate::error::{AppError, AppResult};
use crate::models::{NotificationResult, Repository};
use crate::services::settings_service::SettingsService;

/// Handle to an in-flight notification dispatch
///
/// Resolves to the dispatch outcome: `Ok` carries the classification
/// result (including rejections by Jenkins), `Err(AppError::Http)` a
/// transport failure, and `Err(AppError::Cancelled)` an aborted dispatch.
pub struct NotificationHandle {
    task: JoinHandle<AppResult<NotificationResult>>,
    requested_url: String,
}

impl NotificationHandle {
    /// The exact URL this dispatch requested
    pub fn requested_url(&self) -> &str {
        &self.requested_url
    }

    /// Whether the dispatch has terminated
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Cancels the dispatch
    ///
    /// No classification occurs after cancellation; the dispatch client
    /// is still released.
    pub fn abort(&self) {
        self.task.abort();
    }

    /// Waits for the dispatch to terminate
    ///
    /// Callers that own a deadline wrap this in `tokio::time::timeout`;
    /// the dispatcher itself applies no intrinsic timeout.
    pub async fn wait(self) -> AppResult<NotificationResult> {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(join_error) if join_error.is_cancelled() => Err(AppError::Cancelled),
            Err(join_error) => Err(AppError::Internal {
                source: anyhow::Error::new(join_error),
            }),
        }
    }
}

/// Sends notify-commit requests to a Jenkins instance
///
/// Each dispatch owns its own client and buffer; concurrent dispatches
/// share no mutable state.
pub struct Notifier {
    settings_service: Arc<dyn SettingsService>,
    client_factory: Arc<dyn HttpClientFactory>,
}

impl Notifier {
    /// Creates a new notifier
    ///
    /// # Arguments
    /// * `settings_service` - Source of per-repository hook configuration
    /// * `client_factory` - Factory producing one HTTP client per dispatch
    pub fn new(
        settings_service: Arc<dyn SettingsService>,
        client_factory: Arc<dyn HttpClientFactory>,
    ) -> Self {
        Self {
            settings_service,
            client_factory,
        }
    }

    /// Notifies Jenkins for the repository, if its hook allows it
    ///
    /// Returns `Ok(None)` with no network activity when no hook is
    /// configured, the hook is disabled, or settings are absent. Gating
    /// always precedes URL construction, so an unconfigured base address
    /// is never touched.
    pub async fn notify(&self, repo: &Repository) -> AppResult<Option<NotificationHandle>> {
        let Some(enabled) = self.settings_service.hook_enabled(repo).await else {
            debug!(repository = %repo.full_name(), "no notification hook configured, skipping");
            return Ok(None);
        };
        if !enabled {
            debug!(repository = %repo.full_name(), "notification hook disabled, skipping");
            return Ok(None);
        }
        let Some(settings) = self.settings_service.hook_settings(repo).await else {
            debug!(repository = %repo.full_name(), "notification hook has no settings, skipping");
            return Ok(None);
        };

        self.notify_with(
            repo,
            &settings.jenkins_base,
            settings.ignore_certs,
            &settings.clone_url,
        )
        .map(Some)
    }

    /// Notifies Jenkins using explicit settings, bypassing the hook gate
    ///
    /// The request starts immediately on the runtime; the calling task
    /// never blocks on network I/O.
    ///
    /// # Arguments
    /// * `repo` - Repository the notification is about, for log output
    /// * `jenkins_base` - Base URL of the Jenkins instance
    /// * `trust_all_certificates` - Accept any certificate for https targets
    /// * `clone_url` - Clone URL Jenkins matches jobs against
    ///
    /// # Errors
    /// Returns a configuration or validation error before any network
    /// attempt when the base address is blank or the composed URL does
    /// not parse.
    pub fn notify_with(
        &self,
        repo: &Repository,
        jenkins_base: &str,
        trust_all_certificates: bool,
        clone_url: &str,
    ) -> AppResult<NotificationHandle> {
        let requested_url = build_notify_url(jenkins_base, clone_url)?;
        let target = Url::parse(&requested_url).map_err(|e| AppError::Validation {
            field: "jenkins_base".to_string(),
            reason: format!("notification URL '{}' is invalid: {}", requested_url, e),
        })?;

        let requires_tls = target.scheme() == "https";
        let client = self
            .client_factory
            .client(requires_tls, trust_all_certificates)?;

        debug!(
            repository = %repo.full_name(),
            url = %requested_url,
            "dispatching Jenkins notification"
        );

        let task = tokio::spawn(dispatch(client, target, requested_url.clone()));

        Ok(NotificationHandle {
            task,
            requested_url,
        })
    }
}

/// Runs one HTTP exchange to completion
///
/// Owns the client for the whole exchange; it is dropped exactly once
/// when the task terminates, on every path including cancellation.
/// Transport failures resolve the task with `AppError::Http`; a body
/// that fails to decode becomes a failed `NotificationResult` instead.
async fn dispatch(
    client: reqwest::Client,
    target: Url,
    requested_url: String,
) -> AppResult<NotificationResult> {
    let response = client.get(target).send().await.map_err(|e| AppError::Http {
        url: requested_url.clone(),
        source: e,
    })?;

    let status = response.status();
    debug!(url = %requested_url, %status, "Jenkins responded");

    let body = collect_body(response).await.map_err(|e| AppError::Http {
        url: requested_url.clone(),
        source: e,
    })?;

    Ok(match String::from_utf8(body) {
        Ok(text) => classify(&requested_url, &text),
        Err(e) => {
            error!(url = %requested_url, error = %e, "failed to decode Jenkins response");
            NotificationResult::failure(&requested_url, e.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::Router;
    use axum::body::Body;
    use axum::http::Uri;
    use axum::routing::get;
    use tokio::net::TcpListener;

    use super::*;
    use crate::config::HttpClientConfig;
    use crate::models::HookSettings;
    use crate::services::notifications::http_client::DefaultHttpClientFactory;
    use crate::services::settings_service::StaticSettingsService;

    const CLONE_URL: &str = "http://some.git.host/scm/foo/bar.git";

    type SeenUri = Arc<Mutex<Option<String>>>;

    /// Mock Jenkins answering notify-commit with a fixed body, recording
    /// the request URI it saw.
    async fn start_jenkins(response_body: &'static str) -> (String, SeenUri) {
        let seen: SeenUri = Arc::new(Mutex::new(None));
        let seen_handler = seen.clone();

        let app = Router::new().route(
            "/git/notifyCommit",
            get(move |uri: Uri| {
                let seen = seen_handler.clone();
                async move {
                    *seen.lock().unwrap() = Some(uri.to_string());
                    response_body
                }
            }),
        );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}", addr), seen)
    }

    async fn serve(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn notifier(settings_service: StaticSettingsService) -> Notifier {
        Notifier::new(
            Arc::new(settings_service),
            Arc::new(DefaultHttpClientFactory::new(HttpClientConfig::default())),
        )
    }

    fn repo() -> Repository {
        Repository::new("foo", "bar")
    }

    fn hook_settings(jenkins_base: &str) -> HookSettings {
        HookSettings {
            jenkins_base: jenkins_base.to_string(),
            clone_url: CLONE_URL.to_string(),
            ignore_certs: false,
        }
    }

    #[tokio::test]
    async fn test_returns_none_when_hook_is_absent() {
        let notifier = notifier(StaticSettingsService::new());

        let handle = notifier.notify(&repo()).await.unwrap();
        assert!(handle.is_none());
    }

    #[tokio::test]
    async fn test_returns_none_when_hook_is_disabled() {
        let mut settings = StaticSettingsService::new();
        settings.insert(repo(), false, Some(hook_settings("http://localhost")));
        let notifier = notifier(settings);

        let handle = notifier.notify(&repo()).await.unwrap();
        assert!(handle.is_none());
    }

    #[tokio::test]
    async fn test_returns_none_when_settings_are_absent() {
        let mut settings = StaticSettingsService::new();
        settings.insert(repo(), true, None);
        let notifier = notifier(settings);

        let handle = notifier.notify(&repo()).await.unwrap();
        assert!(handle.is_none());
    }

    #[tokio::test]
    async fn test_scheduled_response_is_successful() {
        let (base, _seen) = start_jenkins("Scheduled build 123").await;

        let mut settings = StaticSettingsService::new();
        settings.insert(repo(), true, Some(hook_settings(&base)));
        let notifier = notifier(settings);

        let handle = notifier.notify(&repo()).await.unwrap().unwrap();
        assert!(!handle.is_finished());
        let result = handle.wait().await.unwrap();

        assert!(result.successful);
        assert_eq!(result.message, "Jenkins response: Scheduled build 123");
    }

    #[tokio::test]
    async fn test_requests_exact_path_with_trailing_slash_base() {
        let (base, seen) = start_jenkins("Scheduled build 123").await;

        let mut settings = StaticSettingsService::new();
        settings.insert(repo(), true, Some(hook_settings(&format!("{}/", base))));
        let notifier = notifier(settings);

        let handle = notifier.notify(&repo()).await.unwrap().unwrap();
        handle.wait().await.unwrap();

        assert_eq!(
            seen.lock().unwrap().as_deref(),
            Some("/git/notifyCommit?url=http%3A%2F%2Fsome.git.host%2Fscm%2Ffoo%2Fbar.git")
        );
    }

    #[tokio::test]
    async fn test_rejection_body_is_not_successful() {
        let (base, _seen) = start_jenkins("ERROR: unknown repo").await;
        let notifier = notifier(StaticSettingsService::new());

        let handle = notifier
            .notify_with(&repo(), &base, false, CLONE_URL)
            .unwrap();
        let result = handle.wait().await.unwrap();

        assert!(!result.successful);
        assert_eq!(result.message, "Jenkins response: ERROR: unknown repo");
    }

    #[tokio::test]
    async fn test_collects_chunked_body_larger_than_default_capacity() {
        // Streamed response: no content-length, body well past 4096 bytes.
        let app = Router::new().route(
            "/git/notifyCommit",
            get(|| async {
                let chunks = std::iter::once("Scheduled build ".to_string())
                    .chain((0..64).map(|_| "x".repeat(128)))
                    .map(Ok::<_, std::io::Error>);
                Body::from_stream(futures::stream::iter(chunks))
            }),
        );
        let base = serve(app).await;
        let notifier = notifier(StaticSettingsService::new());

        let handle = notifier
            .notify_with(&repo(), &base, false, CLONE_URL)
            .unwrap();
        let result = handle.wait().await.unwrap();

        assert!(result.successful);
        assert_eq!(
            result.message.len(),
            "Jenkins response: Scheduled build ".len() + 64 * 128
        );
    }

    #[tokio::test]
    async fn test_invalid_utf8_body_becomes_failed_result() {
        let app = Router::new().route(
            "/git/notifyCommit",
            get(|| async { vec![0xffu8, 0xfe, 0xfd] }),
        );
        let base = serve(app).await;
        let notifier = notifier(StaticSettingsService::new());

        let handle = notifier
            .notify_with(&repo(), &base, false, CLONE_URL)
            .unwrap();
        let result = handle.wait().await.unwrap();

        assert!(!result.successful);
        assert!(result.message.contains("utf-8"));
    }

    #[tokio::test]
    async fn test_transport_failure_resolves_the_handle_with_an_error() {
        // Bind then drop to get a port with nothing listening.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let notifier = notifier(StaticSettingsService::new());
        let handle = notifier
            .notify_with(&repo(), &base, false, CLONE_URL)
            .unwrap();

        assert!(matches!(
            handle.wait().await,
            Err(AppError::Http { .. })
        ));
    }

    #[tokio::test]
    async fn test_abort_resolves_the_handle_as_cancelled() {
        // Accept connections but never answer them.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            let mut open = Vec::new();
            loop {
                if let Ok((socket, _)) = listener.accept().await {
                    open.push(socket);
                }
            }
        });

        let notifier = notifier(StaticSettingsService::new());
        let handle = notifier
            .notify_with(&repo(), &base, false, CLONE_URL)
            .unwrap();

        handle.abort();
        assert!(matches!(handle.wait().await, Err(AppError::Cancelled)));
    }

    #[tokio::test]
    async fn test_blank_base_fails_before_any_network_attempt() {
        let notifier = notifier(StaticSettingsService::new());

        let result = notifier.notify_with(&repo(), "  ", false, CLONE_URL);
        assert!(matches!(result, Err(AppError::Configuration { .. })));
    }

    #[tokio::test]
    async fn test_unparseable_base_is_a_validation_error() {
        let notifier = notifier(StaticSettingsService::new());

        let result = notifier.notify_with(&repo(), "::not a url::", false, CLONE_URL);
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_handle_reports_the_requested_url() {
        let (base, _seen) = start_jenkins("Scheduled").await;
        let notifier = notifier(StaticSettingsService::new());

        let handle = notifier
            .notify_with(&repo(), &base, false, CLONE_URL)
            .unwrap();
        let expected = format!(
            "{}/git/notifyCommit?url=http%3A%2F%2Fsome.git.host%2Fscm%2Ffoo%2Fbar.git",
            base
        );

        assert_eq!(handle.requested_url(), expected);
        let result = handle.wait().await.unwrap();
        assert_eq!(result.requested_url, expected);
    }
}
