//! ipinfo.io adapter (lite endpoint).

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{ToolboxError, ToolboxResult};
use crate::http::{fetch_text, parse_json};
use crate::types::GeoResult;

use super::GeoProvider;

const PROVIDER: &str = "ipinfo.io";
const DEFAULT_BASE_URL: &str = "https://api.ipinfo.io";
const API_TOKEN_ENV: &str = "IPINFO_TOKEN";

/// Response structure from the ipinfo.io lite endpoint.
///
/// The lite tier carries AS and country data only — no city, region, or
/// coordinates.
#[derive(Deserialize)]
struct IpInfoIoResponse {
    error: Option<serde_json::Value>,
    ip: Option<String>,
    country: Option<String>,
    country_code: Option<String>,
    continent: Option<String>,
    continent_code: Option<String>,
    asn: Option<String>,
    as_name: Option<String>,
    as_domain: Option<String>,
}

/// ipinfo.io signals failure through the presence of an `error` member.
pub struct IpInfoIo {
    base_url: String,
    api_token: String,
}

impl IpInfoIo {
    /// Build with the API token from the `IPINFO_TOKEN` environment variable.
    pub fn new() -> Self {
        Self::with_token(std::env::var(API_TOKEN_ENV).unwrap_or_default())
    }

    pub fn with_token(api_token: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, api_token)
    }

    pub fn with_base_url(base_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_token: api_token.into(),
        }
    }
}

impl Default for IpInfoIo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GeoProvider for IpInfoIo {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn fetch(&self, client: &reqwest::Client, ip: &str) -> ToolboxResult<GeoResult> {
        let url = format!("{}/lite/{ip}", self.base_url);
        let request = client.get(&url).query(&[("token", self.api_token.as_str())]);
        let text = fetch_text(PROVIDER, request).await?;
        let data: IpInfoIoResponse = parse_json(&text, PROVIDER)?;

        if let Some(error) = data.error {
            let message = error
                .as_str()
                .map_or_else(|| error.to_string(), str::to_string);
            return Err(ToolboxError::UpstreamError(message));
        }

        Ok(GeoResult {
            country: data.country,
            country_code: data.country_code,
            continent: data.continent,
            continent_code: data.continent_code,
            asn: data.asn,
            as_name: data.as_name,
            as_domain: data.as_domain,
            ..GeoResult::ok(PROVIDER, data.ip.unwrap_or_else(|| ip.to_string()))
        })
    }
}
