//! HTTP client construction for notification dispatch.
//!
//! Every dispatch gets a freshly built client configured for its trust
//! policy; the dispatcher owns the client for the lifetime of the
//! exchange and drops it when the exchange terminates.

use std::time::Duration;

use reqwest::Client;
use tracing::warn;

use crate::config::HttpClientConfig;
use crate::error::{AppError, AppResult};

/// TLS trust mode applied to a single dispatch client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientTrustPolicy {
    /// Standard certificate and hostname validation
    Default,
    /// Accept any certificate chain and hostname
    TrustAll,
}

impl ClientTrustPolicy {
    /// Selects the policy for one dispatch
    ///
    /// Trust-all applies only when the target is secured and the hook
    /// explicitly opted in.
    pub fn for_request(requires_tls: bool, trust_all_certificates: bool) -> Self {
        if requires_tls && trust_all_certificates {
            ClientTrustPolicy::TrustAll
        } else {
            ClientTrustPolicy::Default
        }
    }
}

/// Produces a ready-to-use HTTP client for one dispatch
///
/// Implementations return a freshly constructed client on every call and
/// hold no cross-call state.
pub trait HttpClientFactory: Send + Sync {
    /// Builds a client for the given trust requirements
    ///
    /// # Arguments
    /// * `requires_tls` - True when the target URL scheme is https
    /// * `trust_all_certificates` - True when the hook opted into
    ///   accepting any certificate
    fn client(&self, requires_tls: bool, trust_all_certificates: bool) -> AppResult<Client>;
}

/// `HttpClientFactory` backed by `reqwest` with configured timeouts
///
/// When construction of the trust-all client fails, the factory falls
/// back to a default-validation client instead of failing the dispatch;
/// the attempt then proceeds and may fail at the TLS handshake instead.
#[derive(Debug, Clone, Default)]
pub struct DefaultHttpClientFactory {
    config: HttpClientConfig,
}

impl DefaultHttpClientFactory {
    /// Creates a factory applying the given client configuration
    pub fn new(config: HttpClientConfig) -> Self {
        Self { config }
    }

    fn builder(&self) -> reqwest::ClientBuilder {
        let mut builder = Client::builder()
            .use_rustls_tls()
            .connect_timeout(Duration::from_secs(self.config.connect_timeout))
            .user_agent(self.config.user_agent.clone());

        if let Some(seconds) = self.config.request_timeout {
            builder = builder.timeout(Duration::from_secs(seconds));
        }

        builder
    }

    fn default_client(&self) -> AppResult<Client> {
        self.builder().build().map_err(|e| AppError::Internal {
            source: anyhow::Error::new(e).context("failed to build HTTP client"),
        })
    }

    fn trust_all_client(&self) -> reqwest::Result<Client> {
        self.builder().danger_accept_invalid_certs(true).build()
    }
}

impl HttpClientFactory for DefaultHttpClientFactory {
    fn client(&self, requires_tls: bool, trust_all_certificates: bool) -> AppResult<Client> {
        match ClientTrustPolicy::for_request(requires_tls, trust_all_certificates) {
            ClientTrustPolicy::TrustAll => match self.trust_all_client() {
                Ok(client) => Ok(client),
                Err(e) => {
                    warn!(
                        error = %e,
                        "failed to build trust-all client, falling back to default TLS validation"
                    );
                    self.default_client()
                }
            },
            ClientTrustPolicy::Default => self.default_client(),
        }
    }
}
