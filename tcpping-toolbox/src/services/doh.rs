//! DNS-over-HTTPS JSON client.
//!
//! Speaks the `application/dns-json` convention: GET with `name` and `type`
//! query parameters, answers in an `Answer` array. An absent array means no
//! records.

use serde::Deserialize;

use crate::error::{ToolboxError, ToolboxResult};
use crate::http::HTTP_CLIENT;
use crate::types::{DohAnswer, RecordType};

/// Default DoH resolver endpoint.
pub const DEFAULT_DOH_ENDPOINT: &str = "https://cloudflare-dns.com/dns-query";

#[derive(Deserialize)]
struct DohResponse {
    #[serde(rename = "Answer", default)]
    answer: Vec<DohAnswer>,
}

/// Issue one DoH query and return its answer list.
pub(crate) async fn query(
    endpoint: &str,
    name: &str,
    record_type: RecordType,
) -> ToolboxResult<Vec<DohAnswer>> {
    log::debug!("[doh] {record_type} {name}");
    let response = HTTP_CLIENT
        .get(endpoint)
        .query(&[("name", name), ("type", &record_type.to_string())])
        .header("accept", "application/dns-json")
        .send()
        .await
        .map_err(|e| ToolboxError::NetworkError(format!("DoH request failed: {e}")))?;

    let text = response
        .text()
        .await
        .map_err(|e| ToolboxError::NetworkError(format!("Failed to read DoH response: {e}")))?;

    let parsed: DohResponse = serde_json::from_str(&text)
        .map_err(|e| ToolboxError::ParseError(format!("Malformed DoH response: {e}")))?;
    Ok(parsed.answer)
}
