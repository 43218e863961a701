//! Jenkins notification dispatch.
//!
//! The core subsystem: notification URL construction, trust-policy
//! client acquisition, asynchronous dispatch, and response buffering and
//! classification.

mod http_client;
mod notifier;
mod response;
mod url_builder;

pub use http_client::{ClientTrustPolicy, DefaultHttpClientFactory, HttpClientFactory};
pub use notifier::{NotificationHandle, Notifier};
pub use response::{classify, collect_body};
pub use url_builder::build_notify_url;
