//! Resolvability check for generated hostnames.

use tokio::time::{timeout, Duration};

use crate::types::RecordType;

use super::doh;

/// Per-query timeout in seconds.
const QUERY_TIMEOUT_SECS: u64 = 5;

async fn has_records(endpoint: &str, hostname: &str, record_type: RecordType) -> bool {
    match timeout(
        Duration::from_secs(QUERY_TIMEOUT_SECS),
        doh::query(endpoint, hostname, record_type),
    )
    .await
    {
        Ok(Ok(answers)) => !answers.is_empty(),
        // Transport, parse, and timeout failures all read as "no records".
        Ok(Err(_)) | Err(_) => false,
    }
}

/// Whether a hostname currently resolves (has any A or AAAA record).
///
/// Both queries run concurrently and independently; either one returning
/// answers is enough.
pub async fn is_resolvable_at(endpoint: &str, hostname: &str) -> bool {
    let (has_a, has_aaaa) = tokio::join!(
        has_records(endpoint, hostname, RecordType::A),
        has_records(endpoint, hostname, RecordType::Aaaa),
    );
    has_a || has_aaaa
}

/// [`is_resolvable_at`] against the default DoH endpoint.
pub async fn is_resolvable(hostname: &str) -> bool {
    is_resolvable_at(doh::DEFAULT_DOH_ENDPOINT, hostname).await
}
