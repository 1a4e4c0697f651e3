//! ipgeolocation.io adapter.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{ToolboxError, ToolboxResult};
use crate::http::{fetch_text, parse_json};
use crate::types::GeoResult;

use super::GeoProvider;

const PROVIDER: &str = "ipgeolocation.io";
const DEFAULT_BASE_URL: &str = "https://api.ipgeolocation.io";
const API_KEY_ENV: &str = "IPGEOLOCATION_KEY";

/// Response structure from the ipgeolocation.io `ipgeo` endpoint.
///
/// Latitude and longitude arrive as decimal strings.
#[derive(Deserialize)]
struct IpGeolocationResponse {
    message: Option<String>,
    ip: Option<String>,
    city: Option<String>,
    state_prov: Option<String>,
    country_name: Option<String>,
    country_code2: Option<String>,
    continent_name: Option<String>,
    continent_code: Option<String>,
    latitude: Option<String>,
    longitude: Option<String>,
    isp: Option<String>,
    organization: Option<String>,
    time_zone: Option<IpGeolocationTimezone>,
    country_flag: Option<String>,
}

#[derive(Deserialize)]
struct IpGeolocationTimezone {
    name: Option<String>,
    current_time: Option<String>,
}

/// ipgeolocation.io signals failure through the presence of a `message` field.
pub struct IpGeolocation {
    base_url: String,
    api_key: String,
}

impl IpGeolocation {
    /// Build with the API key from the `IPGEOLOCATION_KEY` environment variable.
    pub fn new() -> Self {
        Self::with_key(std::env::var(API_KEY_ENV).unwrap_or_default())
    }

    pub fn with_key(api_key: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, api_key)
    }

    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

impl Default for IpGeolocation {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GeoProvider for IpGeolocation {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn fetch(&self, client: &reqwest::Client, ip: &str) -> ToolboxResult<GeoResult> {
        let url = format!("{}/ipgeo", self.base_url);
        let request = client
            .get(&url)
            .query(&[("apiKey", self.api_key.as_str()), ("ip", ip)]);
        let text = fetch_text(PROVIDER, request).await?;
        let data: IpGeolocationResponse = parse_json(&text, PROVIDER)?;

        if let Some(message) = data.message {
            return Err(ToolboxError::UpstreamError(message));
        }

        let (timezone, local_time) = data
            .time_zone
            .map_or((None, None), |tz| (tz.name, tz.current_time));

        Ok(GeoResult {
            city: data.city,
            region: data.state_prov,
            country: data.country_name,
            country_code: data.country_code2,
            continent: data.continent_name,
            continent_code: data.continent_code,
            latitude: data.latitude.and_then(|v| v.parse().ok()),
            longitude: data.longitude.and_then(|v| v.parse().ok()),
            isp: data.isp,
            organization: data.organization,
            timezone,
            local_time,
            flag: data.country_flag,
            ..GeoResult::ok(PROVIDER, data.ip.unwrap_or_else(|| ip.to_string()))
        })
    }
}
