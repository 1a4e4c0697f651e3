//! ipwho.is adapter.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{ToolboxError, ToolboxResult};
use crate::http::{fetch_text, parse_json};
use crate::types::GeoResult;

use super::GeoProvider;

const PROVIDER: &str = "ipwho.is";
const DEFAULT_BASE_URL: &str = "https://ipwho.is";

/// Response structure from the ipwho.is API.
#[derive(Deserialize)]
struct IpWhoisResponse {
    ip: Option<String>,
    success: bool,
    message: Option<String>,
    country: Option<String>,
    country_code: Option<String>,
    region: Option<String>,
    city: Option<String>,
    continent: Option<String>,
    continent_code: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    timezone: Option<IpWhoisTimezone>,
    connection: Option<IpWhoisConnection>,
    flag: Option<IpWhoisFlag>,
}

#[derive(Deserialize)]
struct IpWhoisTimezone {
    id: Option<String>,
    current_time: Option<String>,
}

#[derive(Deserialize)]
struct IpWhoisConnection {
    asn: Option<i64>,
    org: Option<String>,
    isp: Option<String>,
    domain: Option<String>,
}

#[derive(Deserialize)]
struct IpWhoisFlag {
    img: Option<String>,
}

/// ipwho.is signals failure through a `success: false` flag plus a `message`.
pub struct IpWhois {
    base_url: String,
}

impl IpWhois {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for IpWhois {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GeoProvider for IpWhois {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn fetch(&self, client: &reqwest::Client, ip: &str) -> ToolboxResult<GeoResult> {
        let url = format!("{}/{ip}", self.base_url);
        let text = fetch_text(PROVIDER, client.get(&url)).await?;
        let data: IpWhoisResponse = parse_json(&text, PROVIDER)?;

        if !data.success {
            return Err(ToolboxError::UpstreamError(
                data.message.unwrap_or_else(|| "Lookup failed".to_string()),
            ));
        }

        let (timezone, local_time) = data
            .timezone
            .map_or((None, None), |tz| (tz.id, tz.current_time));
        let (asn, org, isp, as_domain) = data.connection.map_or((None, None, None, None), |conn| {
            (
                conn.asn.map(|n| format!("AS{n}")),
                conn.org,
                conn.isp,
                conn.domain,
            )
        });

        Ok(GeoResult {
            city: data.city,
            region: data.region,
            country: data.country,
            country_code: data.country_code,
            continent: data.continent,
            continent_code: data.continent_code,
            latitude: data.latitude,
            longitude: data.longitude,
            asn,
            as_name: org.clone(),
            as_domain,
            isp,
            organization: org,
            timezone,
            local_time,
            flag: data.flag.and_then(|f| f.img),
            ..GeoResult::ok(PROVIDER, data.ip.unwrap_or_else(|| ip.to_string()))
        })
    }
}
