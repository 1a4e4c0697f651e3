//! Geolocation provider adapters.
//!
//! Six independent upstreams share one contract but disagree on everything
//! else: endpoint, auth convention, error convention, and field names. Each
//! lives in its own module as an implementation of [`GeoProvider`], selected
//! through the static [`registry`]. Adapters normalize into
//! [`GeoResult`](crate::types::GeoResult) and map their upstream's own error
//! convention to an `Err`; the aggregator folds that into a per-provider
//! failure entry.

mod ipapi;
mod ipapi_co;
mod ipdata;
mod ipgeolocation;
mod ipinfoio;
mod ipwhois;

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;

use crate::error::ToolboxResult;
use crate::types::GeoResult;

pub use ipapi::IpApi;
pub use ipapi_co::IpApiCo;
pub use ipdata::IpData;
pub use ipgeolocation::IpGeolocation;
pub use ipinfoio::IpInfoIo;
pub use ipwhois::IpWhois;

/// One geolocation upstream.
#[async_trait]
pub trait GeoProvider: Send + Sync {
    /// Provider label, used in results and logs.
    fn name(&self) -> &'static str;

    /// Query this upstream for one address and normalize the answer.
    ///
    /// Upstream-reported failures, unparsable bodies, and transport errors
    /// all come back as `Err`; the caller owns turning that into a
    /// per-provider failure entry.
    async fn fetch(&self, client: &reqwest::Client, ip: &str) -> ToolboxResult<GeoResult>;
}

/// Fixed roster queried by every geolocation lookup.
static REGISTRY: LazyLock<Vec<Arc<dyn GeoProvider>>> = LazyLock::new(|| {
    vec![
        Arc::new(IpApi::new()),
        Arc::new(IpWhois::new()),
        Arc::new(IpGeolocation::new()),
        Arc::new(IpData::new()),
        Arc::new(IpApiCo::new()),
        Arc::new(IpInfoIo::new()),
    ]
});

/// The static provider roster, in aggregation order.
pub fn registry() -> &'static [Arc<dyn GeoProvider>] {
    &REGISTRY
}
