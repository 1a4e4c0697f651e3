//! Shared HTTP plumbing for upstream calls.

use std::sync::LazyLock;

use serde::de::DeserializeOwned;

use crate::error::{ToolboxError, ToolboxResult};

/// Shared HTTP client for all upstream calls.
pub(crate) static HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(reqwest::Client::new);

/// Send a prepared request and return the response body as text.
///
/// The body is fetched as text first so a non-JSON upstream answer (HTML
/// error page, edge-proxy interstitial) surfaces as a parse failure with the
/// raw body still loggable, not as an opaque decode error.
pub(crate) async fn fetch_text(
    provider: &str,
    request: reqwest::RequestBuilder,
) -> ToolboxResult<String> {
    let response = request
        .send()
        .await
        .map_err(|e| ToolboxError::NetworkError(format!("Request failed: {e}")))?;

    log::debug!("[{provider}] response status: {}", response.status());
    response
        .text()
        .await
        .map_err(|e| ToolboxError::NetworkError(format!("Failed to read response body: {e}")))
}

/// Parse an upstream text body as JSON.
pub(crate) fn parse_json<T>(text: &str, provider: &str) -> ToolboxResult<T>
where
    T: DeserializeOwned,
{
    serde_json::from_str(text).map_err(|e| {
        log::warn!("[{provider}] non-structured upstream response: {e}");
        ToolboxError::ParseError(format!("Non-JSON response from {provider}"))
    })
}
