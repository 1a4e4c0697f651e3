//! ip-api.com adapter.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{ToolboxError, ToolboxResult};
use crate::http::{fetch_text, parse_json};
use crate::types::GeoResult;

use super::GeoProvider;

const PROVIDER: &str = "ip-api.com";
// The free tier is HTTP-only; HTTPS requires a paid plan.
const DEFAULT_BASE_URL: &str = "http://ip-api.com";

/// Response structure from the ip-api.com JSON endpoint.
#[derive(Deserialize)]
struct IpApiResponse {
    status: Option<String>,
    message: Option<String>,
    query: Option<String>,
    city: Option<String>,
    #[serde(rename = "regionName")]
    region_name: Option<String>,
    country: Option<String>,
    #[serde(rename = "countryCode")]
    country_code: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    #[serde(rename = "as")]
    as_field: Option<String>,
    isp: Option<String>,
    org: Option<String>,
    timezone: Option<String>,
}

/// ip-api.com signals failure through `status != "success"` plus a `message`.
pub struct IpApi {
    base_url: String,
}

impl IpApi {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for IpApi {
    fn default() -> Self {
        Self::new()
    }
}

/// Split ip-api's combined `as` string ("AS15169 Google LLC") into number and name.
fn split_as_field(as_field: Option<String>) -> (Option<String>, Option<String>) {
    let Some(value) = as_field else {
        return (None, None);
    };
    let mut parts = value.split_whitespace();
    let asn = parts.next().map(str::to_string);
    let name = parts.collect::<Vec<_>>().join(" ");
    let as_name = if name.is_empty() { None } else { Some(name) };
    (asn, as_name)
}

#[async_trait]
impl GeoProvider for IpApi {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn fetch(&self, client: &reqwest::Client, ip: &str) -> ToolboxResult<GeoResult> {
        let url = format!("{}/json/{ip}", self.base_url);
        let text = fetch_text(PROVIDER, client.get(&url)).await?;
        let data: IpApiResponse = parse_json(&text, PROVIDER)?;

        if data.status.as_deref() != Some("success") {
            return Err(ToolboxError::UpstreamError(
                data.message.unwrap_or_else(|| "Lookup failed".to_string()),
            ));
        }

        let (asn, as_name) = split_as_field(data.as_field);
        Ok(GeoResult {
            city: data.city,
            region: data.region_name,
            country: data.country,
            country_code: data.country_code,
            latitude: data.lat,
            longitude: data.lon,
            asn,
            as_name,
            organization: data.org.or_else(|| data.isp.clone()),
            isp: data.isp,
            timezone: data.timezone,
            ..GeoResult::ok(PROVIDER, data.query.unwrap_or_else(|| ip.to_string()))
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::http::HTTP_CLIENT;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_split_as_field() {
        let (asn, as_name) = split_as_field(Some("AS15169 Google LLC".to_string()));
        assert_eq!(asn.as_deref(), Some("AS15169"));
        assert_eq!(as_name.as_deref(), Some("Google LLC"));

        let (asn, as_name) = split_as_field(None);
        assert!(asn.is_none());
        assert!(as_name.is_none());

        let (asn, as_name) = split_as_field(Some("AS64496".to_string()));
        assert_eq!(asn.as_deref(), Some("AS64496"));
        assert!(as_name.is_none());
    }

    #[tokio::test]
    async fn test_fetch_success_normalizes_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json/8.8.8.8"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{
                    "status": "success",
                    "query": "8.8.8.8",
                    "country": "United States",
                    "countryCode": "US",
                    "regionName": "Virginia",
                    "city": "Ashburn",
                    "lat": 39.03,
                    "lon": -77.5,
                    "isp": "Google LLC",
                    "org": "Google Public DNS",
                    "as": "AS15169 Google LLC",
                    "timezone": "America/New_York"
                }"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let provider = IpApi::with_base_url(server.uri());
        let result = provider.fetch(&HTTP_CLIENT, "8.8.8.8").await.unwrap();
        assert!(result.ok);
        assert_eq!(result.ip, "8.8.8.8");
        assert_eq!(result.region.as_deref(), Some("Virginia"));
        assert_eq!(result.asn.as_deref(), Some("AS15169"));
        assert_eq!(result.as_name.as_deref(), Some("Google LLC"));
        assert_eq!(result.organization.as_deref(), Some("Google Public DNS"));
        assert!(result.continent.is_none());
        assert!(result.local_time.is_none());
    }

    #[tokio::test]
    async fn test_fetch_upstream_failure_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{ "status": "fail", "message": "reserved range", "query": "10.0.0.1" }"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let provider = IpApi::with_base_url(server.uri());
        let err = provider.fetch(&HTTP_CLIENT, "10.0.0.1").await.unwrap_err();
        assert!(matches!(err, ToolboxError::UpstreamError(ref m) if m == "reserved range"));
    }

    #[tokio::test]
    async fn test_fetch_non_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("<html>blocked</html>", "text/html"))
            .mount(&server)
            .await;

        let provider = IpApi::with_base_url(server.uri());
        let err = provider.fetch(&HTTP_CLIENT, "8.8.8.8").await.unwrap_err();
        assert!(matches!(err, ToolboxError::ParseError(_)));
    }
}
