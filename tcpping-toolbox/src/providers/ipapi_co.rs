//! ipapi.co adapter.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{ToolboxError, ToolboxResult};
use crate::http::{fetch_text, parse_json};
use crate::types::GeoResult;

use super::GeoProvider;

const PROVIDER: &str = "ipapi.co";
const DEFAULT_BASE_URL: &str = "https://ipapi.co";

/// Response structure from the ipapi.co JSON endpoint.
#[derive(Deserialize)]
struct IpApiCoResponse {
    error: Option<bool>,
    reason: Option<String>,
    message: Option<String>,
    ip: Option<String>,
    city: Option<String>,
    region: Option<String>,
    country_name: Option<String>,
    country_code: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    timezone: Option<String>,
}

/// ipapi.co signals failure through an `error: true` flag with a `reason`.
pub struct IpApiCo {
    base_url: String,
}

impl IpApiCo {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for IpApiCo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GeoProvider for IpApiCo {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn fetch(&self, client: &reqwest::Client, ip: &str) -> ToolboxResult<GeoResult> {
        let url = format!("{}/{ip}/json/", self.base_url);
        let text = fetch_text(PROVIDER, client.get(&url)).await?;
        let data: IpApiCoResponse = parse_json(&text, PROVIDER)?;

        if data.error.unwrap_or(false) {
            return Err(ToolboxError::UpstreamError(
                data.reason
                    .or(data.message)
                    .unwrap_or_else(|| "Unknown ipapi.co error".to_string()),
            ));
        }

        Ok(GeoResult {
            city: data.city,
            region: data.region,
            country: data.country_name,
            country_code: data.country_code,
            latitude: data.latitude,
            longitude: data.longitude,
            timezone: data.timezone,
            ..GeoResult::ok(PROVIDER, data.ip.unwrap_or_else(|| ip.to_string()))
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

    #[tokio::test]
    async fn test_fetch_success_normalizes_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/8.8.4.4/json/"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{
                    "ip": "8.8.4.4",
                    "city": "Mountain View",
                    "region": "California",
                    "country_name": "United States",
                    "country_code": "US",
                    "latitude": 37.42,
                    "longitude": -122.08,
                    "timezone": "America/Los_Angeles"
                }"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let provider = IpApiCo::with_base_url(server.uri());
        let result = provider.fetch(&HTTP_CLIENT, "8.8.4.4").await.unwrap();
        assert!(result.ok);
        assert_eq!(result.country.as_deref(), Some("United States"));
        // ipapi.co never supplies AS or continent data.
        assert!(result.asn.is_none());
        assert!(result.continent.is_none());
        assert!(result.organization.is_none());
    }

    #[tokio::test]
    async fn test_fetch_error_flag_with_reason() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{ "ip": "x", "error": true, "reason": "Invalid IP Address" }"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let provider = IpApiCo::with_base_url(server.uri());
        let err = provider.fetch(&HTTP_CLIENT, "x").await.unwrap_err();
        assert!(matches!(err, ToolboxError::UpstreamError(ref m) if m == "Invalid IP Address"));
    }

    #[tokio::test]
    async fn test_fetch_rate_limit_page_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(429).set_body_raw("<html>rate limited</html>", "text/html"),
            )
            .mount(&server)
            .await;

        let provider = IpApiCo::with_base_url(server.uri());
        let err = provider.fetch(&HTTP_CLIENT, "8.8.4.4").await.unwrap_err();
        assert!(matches!(err, ToolboxError::ParseError(_)));
    }
}
