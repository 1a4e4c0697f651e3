//! Public types returned by toolbox operations.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// DNS record type queried by the record fetcher.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    /// IPv4 address record.
    A,
    /// IPv6 address record.
    Aaaa,
    /// Mail exchange record.
    Mx,
    /// Name server record.
    Ns,
    /// Text record.
    Txt,
    /// Canonical name (alias) record.
    Cname,
    /// Start of authority record.
    Soa,
}

impl RecordType {
    /// The fixed set every record lookup queries, in display order.
    pub const ALL: [Self; 7] = [
        Self::A,
        Self::Aaaa,
        Self::Mx,
        Self::Ns,
        Self::Txt,
        Self::Cname,
        Self::Soa,
    ];
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::Aaaa => write!(f, "AAAA"),
            Self::Mx => write!(f, "MX"),
            Self::Ns => write!(f, "NS"),
            Self::Txt => write!(f, "TXT"),
            Self::Cname => write!(f, "CNAME"),
            Self::Soa => write!(f, "SOA"),
        }
    }
}

impl FromStr for RecordType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "A" => Ok(Self::A),
            "AAAA" => Ok(Self::Aaaa),
            "MX" => Ok(Self::Mx),
            "NS" => Ok(Self::Ns),
            "TXT" => Ok(Self::Txt),
            "CNAME" => Ok(Self::Cname),
            "SOA" => Ok(Self::Soa),
            _ => Err(format!("Unsupported DNS record type: {s}")),
        }
    }
}

/// One raw answer object from the DoH collaborator, kept as received.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DohAnswer {
    /// Owner name.
    pub name: String,
    /// Numeric record type as carried on the wire.
    #[serde(rename = "type")]
    pub rtype: u16,
    /// Time-to-live in seconds.
    #[serde(rename = "TTL")]
    pub ttl: Option<u32>,
    /// Record data in the upstream's own presentation format.
    pub data: String,
}

/// Per-type answer lists for one hostname.
///
/// Every type in [`RecordType::ALL`] is always present; an empty list means
/// "queried, none found or query failed".
pub type DnsRecordSet = BTreeMap<RecordType, Vec<DohAnswer>>;

/// Normalized geolocation data from a single provider.
///
/// Fields a provider does not supply stay unset rather than guessed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoResult {
    /// Provider label (e.g. `"ip-api.com"`).
    pub provider: String,
    /// Whether this provider produced a usable answer.
    pub ok: bool,
    /// IP address the answer refers to.
    pub ip: String,
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub continent: Option<String>,
    pub continent_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Autonomous System Number (e.g. `"AS13335"`).
    pub asn: Option<String>,
    pub as_name: Option<String>,
    pub as_domain: Option<String>,
    pub isp: Option<String>,
    pub organization: Option<String>,
    /// IANA timezone identifier.
    pub timezone: Option<String>,
    /// Current local time as reported by the provider.
    pub local_time: Option<String>,
    /// Flag image reference (URL) when the provider supplies one.
    pub flag: Option<String>,
    /// Failure description when `ok` is false.
    pub error: Option<String>,
}

impl GeoResult {
    /// Successful-result base; adapters fill in the fields they map.
    pub fn ok(provider: &str, ip: impl Into<String>) -> Self {
        Self {
            provider: provider.to_string(),
            ok: true,
            ip: ip.into(),
            city: None,
            region: None,
            country: None,
            country_code: None,
            continent: None,
            continent_code: None,
            latitude: None,
            longitude: None,
            asn: None,
            as_name: None,
            as_domain: None,
            isp: None,
            organization: None,
            timezone: None,
            local_time: None,
            flag: None,
            error: None,
        }
    }

    /// Failed result for one provider.
    pub fn failure(provider: &str, ip: &str, error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(error.into()),
            ..Self::ok(provider, ip)
        }
    }
}

/// Aggregate geolocation output: one entry per roster provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoLookupResult {
    /// Whether the aggregation ran to completion.
    pub ok: bool,
    /// The queried address.
    pub ip: String,
    /// Per-provider results, in roster order.
    pub results: Vec<GeoResult>,
}
