//! Stateless service façade exposing all diagnostic operations.
//!
//! Every method on [`DiagnosticsService`] is an async associated function —
//! no instance needed.

mod dns;
mod doh;
mod domain;
mod geo;

use crate::error::{ToolboxError, ToolboxResult};
use crate::types::{DnsRecordSet, GeoLookupResult};

pub use doh::DEFAULT_DOH_ENDPOINT;
pub use geo::geo_lookup_with;

/// Validate and normalize a lookup target.
///
/// Trims whitespace and rejects empty input before any upstream call.
fn validate_target(target: &str) -> ToolboxResult<&str> {
    let target = target.trim();
    if target.is_empty() {
        return Err(ToolboxError::ValidationError(
            "Host or address is required".to_string(),
        ));
    }
    Ok(target)
}

/// Entry point for all network diagnostic operations.
///
/// ```rust,no_run
/// use tcpping_toolbox::DiagnosticsService;
/// # async fn demo() -> tcpping_toolbox::ToolboxResult<()> {
/// let records = DiagnosticsService::dns_lookup("example.com", None).await?;
/// # Ok(())
/// # }
/// ```
pub struct DiagnosticsService;

impl DiagnosticsService {
    /// Geolocate one address across the whole provider roster.
    ///
    /// Returns one entry per provider; individual provider failures surface
    /// as `ok: false` entries, never as an aggregate error.
    pub async fn geo_lookup(address: &str) -> ToolboxResult<GeoLookupResult> {
        let address = validate_target(address)?;
        Ok(geo::geo_lookup(address).await)
    }

    /// Fetch all supported DNS record types for a hostname.
    ///
    /// Pass `None` for `endpoint` to use the default DoH resolver. Every
    /// record type is present in the result; failed queries come back as
    /// empty lists.
    pub async fn dns_lookup(
        hostname: &str,
        endpoint: Option<&str>,
    ) -> ToolboxResult<DnsRecordSet> {
        let hostname = validate_target(hostname)?;
        Ok(dns::dns_lookup_at(endpoint.unwrap_or(DEFAULT_DOH_ENDPOINT), hostname).await)
    }

    /// Whether a hostname currently resolves (any A or AAAA record).
    ///
    /// Pass `None` for `endpoint` to use the default DoH resolver.
    pub async fn is_resolvable(hostname: &str, endpoint: Option<&str>) -> ToolboxResult<bool> {
        let hostname = validate_target(hostname)?;
        Ok(domain::is_resolvable_at(endpoint.unwrap_or(DEFAULT_DOH_ENDPOINT), hostname).await)
    }
}
