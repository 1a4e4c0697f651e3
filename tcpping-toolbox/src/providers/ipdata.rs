//! ipdata.co adapter.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{ToolboxError, ToolboxResult};
use crate::http::{fetch_text, parse_json};
use crate::types::GeoResult;

use super::GeoProvider;

const PROVIDER: &str = "ipdata.co";
const DEFAULT_BASE_URL: &str = "https://api.ipdata.co";
const API_KEY_ENV: &str = "IPDATA_KEY";

/// Response structure from the ipdata.co API.
#[derive(Deserialize)]
struct IpDataResponse {
    message: Option<String>,
    error: Option<String>,
    ip: Option<String>,
    city: Option<String>,
    region: Option<String>,
    country_name: Option<String>,
    country_code: Option<String>,
    continent_name: Option<String>,
    continent_code: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    asn: Option<IpDataAsn>,
    carrier: Option<IpDataCarrier>,
    time_zone: Option<IpDataTimezone>,
    flag: Option<String>,
}

#[derive(Deserialize)]
struct IpDataAsn {
    asn: Option<String>,
    name: Option<String>,
    domain: Option<String>,
}

#[derive(Deserialize)]
struct IpDataCarrier {
    name: Option<String>,
}

#[derive(Deserialize)]
struct IpDataTimezone {
    name: Option<String>,
    current_time: Option<String>,
}

/// ipdata.co signals failure through a top-level `message` or `error` field.
pub struct IpData {
    base_url: String,
    api_key: String,
}

impl IpData {
    /// Build with the API key from the `IPDATA_KEY` environment variable.
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

impl Default for IpData {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GeoProvider for IpData {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn fetch(&self, client: &reqwest::Client, ip: &str) -> ToolboxResult<GeoResult> {
        let url = format!("{}/{ip}", self.base_url);
        let request = client.get(&url).query(&[("api-key", self.api_key.as_str())]);
        let text = fetch_text(PROVIDER, request).await?;
        let data: IpDataResponse = parse_json(&text, PROVIDER)?;

        if data.error.is_some() || data.message.is_some() {
            return Err(ToolboxError::UpstreamError(
                data.error
                    .or(data.message)
                    .unwrap_or_else(|| "Lookup failed".to_string()),
            ));
        }

        let (asn, as_name, as_domain) = data.asn.map_or((None, None, None), |entry| {
            (entry.asn, entry.name, entry.domain)
        });
        let (timezone, local_time) = data
            .time_zone
            .map_or((None, None), |tz| (tz.name, tz.current_time));

        Ok(GeoResult {
            city: data.city,
            region: data.region,
            country: data.country_name,
            country_code: data.country_code,
            continent: data.continent_name,
            continent_code: data.continent_code,
            latitude: data.latitude,
            longitude: data.longitude,
            asn,
            organization: as_name.clone(),
            as_name,
            as_domain,
            isp: data.carrier.and_then(|c| c.name),
            timezone,
            local_time,
            flag: data.flag,
            ..GeoResult::ok(PROVIDER, data.ip.unwrap_or_else(|| ip.to_string()))
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::http::HTTP_CLIENT;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_success_normalizes_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/1.1.1.1"))
            .and(query_param("api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{
                    "ip": "1.1.1.1",
                    "city": "Sydney",
                    "region": "New South Wales",
                    "country_name": "Australia",
                    "country_code": "AU",
                    "continent_name": "Oceania",
                    "continent_code": "OC",
                    "latitude": -33.86,
                    "longitude": 151.2,
                    "asn": { "asn": "AS13335", "name": "Cloudflare, Inc.", "domain": "cloudflare.com" },
                    "carrier": { "name": "Cloudflare" },
                    "time_zone": { "name": "Australia/Sydney", "current_time": "2024-05-01T20:00:00+10:00" },
                    "flag": "https://ipdata.co/flags/au.png"
                }"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let provider = IpData::with_base_url(server.uri(), "test-key");
        let result = provider.fetch(&HTTP_CLIENT, "1.1.1.1").await.unwrap();
        assert!(result.ok);
        assert_eq!(result.asn.as_deref(), Some("AS13335"));
        assert_eq!(result.as_domain.as_deref(), Some("cloudflare.com"));
        assert_eq!(result.isp.as_deref(), Some("Cloudflare"));
        assert_eq!(result.organization.as_deref(), Some("Cloudflare, Inc."));
        assert_eq!(result.continent.as_deref(), Some("Oceania"));
    }

    #[tokio::test]
    async fn test_fetch_message_means_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_raw(
                r#"{ "message": "You have not provided a valid API Key." }"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let provider = IpData::with_base_url(server.uri(), "");
        let err = provider.fetch(&HTTP_CLIENT, "1.1.1.1").await.unwrap_err();
        assert!(matches!(err, ToolboxError::UpstreamError(_)));
    }
}
