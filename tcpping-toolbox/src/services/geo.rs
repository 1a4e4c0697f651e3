//! Multi-provider geolocation aggregation.

use std::sync::Arc;

use futures::future::join_all;
use tokio::time::{timeout, Duration};

use crate::http::HTTP_CLIENT;
use crate::providers::{registry, GeoProvider};
use crate::types::{GeoLookupResult, GeoResult};

/// Per-provider call timeout in seconds.
const PROVIDER_TIMEOUT_SECS: u64 = 10;

/// Fan one address out to every provider in the roster and join.
///
/// All calls start at once; the aggregation completes only when every call
/// has settled. An adapter error or timeout is captured at the adapter
/// boundary as an `ok: false` entry and never delays or fails the others
/// beyond its own timeout.
pub async fn geo_lookup_with(
    providers: &[Arc<dyn GeoProvider>],
    address: &str,
) -> GeoLookupResult {
    lookup_with_timeout(
        providers,
        address,
        Duration::from_secs(PROVIDER_TIMEOUT_SECS),
    )
    .await
}

async fn lookup_with_timeout(
    providers: &[Arc<dyn GeoProvider>],
    address: &str,
    per_call: Duration,
) -> GeoLookupResult {
    let futures: Vec<_> = providers
        .iter()
        .map(|provider| {
            let provider = Arc::clone(provider);
            let address = address.to_string();
            async move {
                match timeout(per_call, provider.fetch(&HTTP_CLIENT, &address)).await {
                    Ok(Ok(result)) => result,
                    Ok(Err(e)) => {
                        log::warn!("[geo] {} lookup for {address} failed: {e}", provider.name());
                        GeoResult::failure(provider.name(), &address, e.to_string())
                    }
                    Err(_) => {
                        log::warn!("[geo] {} lookup for {address} timed out", provider.name());
                        GeoResult::failure(
                            provider.name(),
                            &address,
                            format!("Query timeout ({}s)", per_call.as_secs()),
                        )
                    }
                }
            }
        })
        .collect();

    let results = join_all(futures).await;
    GeoLookupResult {
        ok: true,
        ip: address.to_string(),
        results,
    }
}

/// Fan one address out to the static provider roster.
pub async fn geo_lookup(address: &str) -> GeoLookupResult {
    geo_lookup_with(registry(), address).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{ToolboxError, ToolboxResult};
    use async_trait::async_trait;

    struct FixedProvider {
        name: &'static str,
        outcome: ToolboxResult<()>,
    }

    #[async_trait]
    impl GeoProvider for FixedProvider {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn fetch(&self, _client: &reqwest::Client, ip: &str) -> ToolboxResult<GeoResult> {
            match &self.outcome {
                Ok(()) => Ok(GeoResult {
                    country_code: Some("US".to_string()),
                    ..GeoResult::ok(self.name, ip)
                }),
                Err(ToolboxError::UpstreamError(m)) => {
                    Err(ToolboxError::UpstreamError(m.clone()))
                }
                Err(_) => Err(ToolboxError::NetworkError("unreachable".to_string())),
            }
        }
    }

    struct SlowProvider;

    #[async_trait]
    impl GeoProvider for SlowProvider {
        fn name(&self) -> &'static str {
            "slow.example"
        }

        async fn fetch(&self, _client: &reqwest::Client, ip: &str) -> ToolboxResult<GeoResult> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(GeoResult::ok(self.name(), ip))
        }
    }

    #[tokio::test]
    async fn test_join_keeps_roster_order_and_isolates_failures() {
        let providers: Vec<Arc<dyn GeoProvider>> = vec![
            Arc::new(FixedProvider {
                name: "first.example",
                outcome: Ok(()),
            }),
            Arc::new(FixedProvider {
                name: "second.example",
                outcome: Err(ToolboxError::UpstreamError("quota exceeded".to_string())),
            }),
            Arc::new(FixedProvider {
                name: "third.example",
                outcome: Ok(()),
            }),
        ];

        let aggregate = geo_lookup_with(&providers, "8.8.8.8").await;
        assert!(aggregate.ok);
        assert_eq!(aggregate.ip, "8.8.8.8");
        assert_eq!(aggregate.results.len(), 3);
        assert_eq!(aggregate.results[0].provider, "first.example");
        assert!(aggregate.results[0].ok);
        assert!(!aggregate.results[1].ok);
        assert!(aggregate.results[1]
            .error
            .as_deref()
            .unwrap()
            .contains("quota exceeded"));
        assert!(aggregate.results[2].ok);
    }

    #[tokio::test]
    async fn test_timed_out_provider_does_not_block_the_rest() {
        let providers: Vec<Arc<dyn GeoProvider>> = vec![
            Arc::new(SlowProvider),
            Arc::new(FixedProvider {
                name: "fast.example",
                outcome: Ok(()),
            }),
        ];

        let aggregate =
            lookup_with_timeout(&providers, "1.1.1.1", Duration::from_millis(50)).await;
        assert_eq!(aggregate.results.len(), 2);
        let slow = &aggregate.results[0];
        assert!(!slow.ok);
        assert!(slow.error.as_deref().unwrap().contains("timeout"));
        assert!(aggregate.results[1].ok);
    }

    #[tokio::test]
    async fn test_identical_inputs_yield_identical_shapes() {
        let providers: Vec<Arc<dyn GeoProvider>> = vec![Arc::new(FixedProvider {
            name: "stable.example",
            outcome: Ok(()),
        })];

        let first = geo_lookup_with(&providers, "8.8.8.8").await;
        let second = geo_lookup_with(&providers, "8.8.8.8").await;
        assert_eq!(first.results[0].ok, second.results[0].ok);
        assert_eq!(first.results[0].country_code, second.results[0].country_code);
    }
}
