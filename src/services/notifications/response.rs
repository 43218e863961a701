//! Response collection and classification.

use futures::StreamExt;
use reqwest::Response;

use crate::models::NotificationResult;

/// Buffer capacity when the response announces no content length
const DEFAULT_BUFFER_CAPACITY: usize = 4096;

/// Upper bound on preallocation from an announced content length; the
/// buffer still grows to the actual body size
const MAX_PREALLOCATION: usize = 64 * 1024;

/// Body prefix Jenkins returns when the notification was accepted
const SUCCESS_PREFIX: &str = "Scheduled";

/// Fixed label prepended to the response body in the result message
const MESSAGE_LABEL: &str = "Jenkins response: ";

/// Streams a response body into a fully buffered byte vector
///
/// The buffer starts at the announced content length when one is present,
/// or at a 4096-byte default for chunked transfers of unknown length.
/// Chunks arrive in wire order; the buffer is written only here and read
/// only after the body is complete.
///
/// # Errors
/// Returns the underlying `reqwest::Error` on a mid-stream I/O failure.
pub async fn collect_body(response: Response) -> reqwest::Result<Vec<u8>> {
    let capacity = response
        .content_length()
        .map(|len| usize::try_from(len).unwrap_or(MAX_PREALLOCATION))
        .unwrap_or(DEFAULT_BUFFER_CAPACITY)
        .min(MAX_PREALLOCATION);

    let mut buffer = Vec::with_capacity(capacity);
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        buffer.extend_from_slice(&chunk?);
    }

    Ok(buffer)
}

/// Classifies a collected response body into a `NotificationResult`
///
/// Jenkins answers notify-commit with a plain-text body starting with
/// `Scheduled` when at least one job was triggered; anything else is a
/// rejection. The prefix match is case-sensitive with no trimming, and
/// the HTTP status is not consulted.
pub fn classify(requested_url: &str, body: &str) -> NotificationResult {
    NotificationResult {
        successful: body.starts_with(SUCCESS_PREFIX),
        requested_url: requested_url.to_string(),
        message: format!("{}{}", MESSAGE_LABEL, body),
    }
}
