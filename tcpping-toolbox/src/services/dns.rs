//! DNS record inspection across the fixed record-type set.

use futures::future::join_all;
use tokio::time::{timeout, Duration};

use crate::types::{DnsRecordSet, RecordType};

use super::doh;

/// Per-record-type query timeout in seconds.
const QUERY_TIMEOUT_SECS: u64 = 5;

/// Fetch every record type for one hostname concurrently.
///
/// One query per type in [`RecordType::ALL`], all started at once, each with
/// its own timeout. A failed or timed-out query degrades to an empty list for
/// that type only; the returned map always carries all seven keys.
pub async fn dns_lookup_at(endpoint: &str, hostname: &str) -> DnsRecordSet {
    let futures: Vec<_> = RecordType::ALL
        .into_iter()
        .map(|record_type| async move {
            let result = timeout(
                Duration::from_secs(QUERY_TIMEOUT_SECS),
                doh::query(endpoint, hostname, record_type),
            )
            .await;

            let answers = match result {
                Ok(Ok(answers)) => answers,
                Ok(Err(e)) => {
                    log::warn!("[dns] {record_type} query for {hostname} failed: {e}");
                    vec![]
                }
                Err(_) => {
                    log::warn!(
                        "[dns] {record_type} query for {hostname} timed out ({QUERY_TIMEOUT_SECS}s)"
                    );
                    vec![]
                }
            };
            (record_type, answers)
        })
        .collect();

    join_all(futures).await.into_iter().collect()
}

/// Fetch every record type via the default DoH endpoint.
pub async fn dns_lookup(hostname: &str) -> DnsRecordSet {
    dns_lookup_at(doh::DEFAULT_DOH_ENDPOINT, hostname).await
}
