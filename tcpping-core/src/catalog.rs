//! Location/provider catalog: immutable, process-wide reference data.
//!
//! The catalog is loaded once from the JSON shape produced by the data layer
//! and treated as read-only for the process lifetime. Countries come in two
//! shapes: hierarchical countries nest cities under subdivisions and may
//! declare providers at the subdivision level; flat countries host cities
//! directly. The shape is decided once at load time and carried as a tagged
//! variant, so call sites dispatch on it instead of probing for fields.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Embedded default catalog data.
const BUNDLED_CATALOG: &str = include_str!("catalog.json");

/// Geographic coordinates of a location node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Protocol stacks a provider exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolCapability {
    pub v4: bool,
    pub v6: bool,
}

/// A network operator entry, scoped to the location node that declares it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    /// Stable code used in generated hostnames.
    pub code: String,
    /// Display name.
    pub name: String,
    /// IPv4/IPv6 capability.
    pub capability: ProtocolCapability,
}

/// A city node.
#[derive(Debug, Clone, PartialEq)]
pub struct City {
    pub code: String,
    pub name: String,
    pub loc: Option<Coordinates>,
    providers: BTreeMap<String, Provider>,
}

impl City {
    /// Providers declared directly on this city.
    pub fn providers(&self) -> &BTreeMap<String, Provider> {
        &self.providers
    }
}

/// A subdivision (administrative region) of a hierarchical country.
#[derive(Debug, Clone, PartialEq)]
pub struct Subdivision {
    pub code: String,
    pub name: String,
    pub loc: Option<Coordinates>,
    providers: BTreeMap<String, Provider>,
    cities: BTreeMap<String, City>,
}

impl Subdivision {
    /// Providers declared directly on this subdivision.
    pub fn providers(&self) -> &BTreeMap<String, Provider> {
        &self.providers
    }

    /// Cities nested under this subdivision.
    pub fn cities(&self) -> &BTreeMap<String, City> {
        &self.cities
    }
}

/// How a country hosts its cities and providers.
///
/// Hierarchical countries require a subdivision before anything deeper can be
/// selected; flat countries attach cities (and their providers) directly.
#[derive(Debug, Clone, PartialEq)]
pub enum CountryShape {
    Hierarchical {
        subdivisions: BTreeMap<String, Subdivision>,
    },
    Flat {
        cities: BTreeMap<String, City>,
    },
}

/// A country node.
#[derive(Debug, Clone, PartialEq)]
pub struct Country {
    pub code: String,
    pub name: String,
    pub loc: Option<Coordinates>,
    providers: BTreeMap<String, Provider>,
    pub shape: CountryShape,
}

impl Country {
    /// Providers declared directly on this country.
    pub fn providers(&self) -> &BTreeMap<String, Provider> {
        &self.providers
    }

    /// Whether cities nest under subdivisions.
    pub fn has_subdivisions(&self) -> bool {
        matches!(self.shape, CountryShape::Hierarchical { .. })
    }
}

/// A flattened (name, coordinates) marker for one city of a country.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CityMarker {
    pub code: String,
    pub name: String,
    pub loc: Coordinates,
}

// ---- raw wire shape ----------------------------------------------------

#[derive(Deserialize)]
struct RawProvider {
    name: String,
    v4: bool,
    v6: bool,
}

#[derive(Deserialize)]
struct RawCity {
    name: String,
    loc: Option<Coordinates>,
    #[serde(default)]
    providers: BTreeMap<String, RawProvider>,
}

#[derive(Deserialize)]
struct RawSubdivision {
    name: String,
    loc: Option<Coordinates>,
    #[serde(default)]
    providers: BTreeMap<String, RawProvider>,
    #[serde(default)]
    cities: BTreeMap<String, RawCity>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCountry {
    name: String,
    loc: Option<Coordinates>,
    has_subdivisions: bool,
    #[serde(default)]
    providers: BTreeMap<String, RawProvider>,
    #[serde(default)]
    subdivisions: BTreeMap<String, RawSubdivision>,
    #[serde(default)]
    cities: BTreeMap<String, RawCity>,
}

fn convert_providers(raw: BTreeMap<String, RawProvider>) -> BTreeMap<String, Provider> {
    raw.into_iter()
        .map(|(code, p)| {
            let provider = Provider {
                code: code.clone(),
                name: p.name,
                capability: ProtocolCapability { v4: p.v4, v6: p.v6 },
            };
            (code, provider)
        })
        .collect()
}

fn convert_cities(raw: BTreeMap<String, RawCity>) -> BTreeMap<String, City> {
    raw.into_iter()
        .map(|(code, c)| {
            let city = City {
                code: code.clone(),
                name: c.name,
                loc: c.loc,
                providers: convert_providers(c.providers),
            };
            (code, city)
        })
        .collect()
}

fn convert_country(code: &str, raw: RawCountry) -> CoreResult<Country> {
    let shape = if raw.has_subdivisions {
        if !raw.cities.is_empty() {
            return Err(CoreError::CatalogUnavailable(format!(
                "country {code} declares subdivisions but hosts top-level cities"
            )));
        }
        let subdivisions = raw
            .subdivisions
            .into_iter()
            .map(|(sub_code, s)| {
                let subdivision = Subdivision {
                    code: sub_code.clone(),
                    name: s.name,
                    loc: s.loc,
                    providers: convert_providers(s.providers),
                    cities: convert_cities(s.cities),
                };
                (sub_code, subdivision)
            })
            .collect();
        CountryShape::Hierarchical { subdivisions }
    } else {
        if !raw.subdivisions.is_empty() {
            return Err(CoreError::CatalogUnavailable(format!(
                "country {code} hosts subdivisions without declaring them"
            )));
        }
        CountryShape::Flat {
            cities: convert_cities(raw.cities),
        }
    };

    Ok(Country {
        code: code.to_string(),
        name: raw.name,
        loc: raw.loc,
        providers: convert_providers(raw.providers),
        shape,
    })
}

// ---- catalog -----------------------------------------------------------

/// The immutable location/provider catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationCatalog {
    countries: BTreeMap<String, Country>,
}

impl LocationCatalog {
    /// Load a catalog from its JSON wire shape.
    ///
    /// Malformed input and shape/flag disagreements (a country whose
    /// `hasSubdivisions` flag contradicts the branch it populates) are both
    /// [`CoreError::CatalogUnavailable`].
    pub fn from_json_str(json: &str) -> CoreResult<Self> {
        let raw: BTreeMap<String, RawCountry> = serde_json::from_str(json)
            .map_err(|e| CoreError::CatalogUnavailable(format!("malformed catalog JSON: {e}")))?;

        let mut countries = BTreeMap::new();
        for (code, raw_country) in raw {
            let country = convert_country(&code, raw_country)?;
            countries.insert(code, country);
        }
        Ok(Self { countries })
    }

    /// Load the embedded default catalog.
    pub fn bundled() -> CoreResult<Self> {
        Self::from_json_str(BUNDLED_CATALOG)
    }

    /// All countries, keyed by code.
    pub fn countries(&self) -> &BTreeMap<String, Country> {
        &self.countries
    }

    /// Look up a country by code.
    pub fn country(&self, code: &str) -> Option<&Country> {
        self.countries.get(code)
    }

    /// Look up a subdivision under a country.
    ///
    /// Returns `None` for absent codes and for flat countries.
    pub fn subdivision(&self, country: &str, code: &str) -> Option<&Subdivision> {
        match &self.country(country)?.shape {
            CountryShape::Hierarchical { subdivisions } => subdivisions.get(code),
            CountryShape::Flat { .. } => None,
        }
    }

    /// Look up a city under a country (and, for hierarchical countries, a subdivision).
    pub fn city(&self, country: &str, subdivision: Option<&str>, code: &str) -> Option<&City> {
        match &self.country(country)?.shape {
            CountryShape::Hierarchical { .. } => self
                .subdivision(country, subdivision?)
                .and_then(|s| s.cities.get(code)),
            CountryShape::Flat { cities } => cities.get(code),
        }
    }

    /// Providers visible at the most specific selected node that declares any.
    ///
    /// Precedence is city > subdivision > country; levels are never merged.
    /// Returns `None` when no level on the path declares a provider.
    pub fn providers_at(
        &self,
        country: &str,
        subdivision: Option<&str>,
        city: Option<&str>,
    ) -> Option<&BTreeMap<String, Provider>> {
        let country_node = self.country(country)?;

        if let Some(city_code) = city {
            if let Some(city_node) = self.city(country, subdivision, city_code) {
                if !city_node.providers.is_empty() {
                    return Some(&city_node.providers);
                }
            }
        }

        if let Some(sub_code) = subdivision {
            if let Some(sub_node) = self.subdivision(country, sub_code) {
                if !sub_node.providers.is_empty() {
                    return Some(&sub_node.providers);
                }
            }
        }

        if country_node.providers.is_empty() {
            None
        } else {
            Some(&country_node.providers)
        }
    }

    /// Flattened city markers for a country, across both shapes.
    ///
    /// Cities without coordinates are skipped.
    pub fn city_markers(&self, country: &str) -> Vec<CityMarker> {
        let Some(country_node) = self.country(country) else {
            return Vec::new();
        };

        let cities: Vec<&City> = match &country_node.shape {
            CountryShape::Flat { cities } => cities.values().collect(),
            CountryShape::Hierarchical { subdivisions } => subdivisions
                .values()
                .flat_map(|s| s.cities.values())
                .collect(),
        };

        cities
            .into_iter()
            .filter_map(|c| {
                c.loc.map(|loc| CityMarker {
                    code: c.code.clone(),
                    name: c.name.clone(),
                    loc,
                })
            })
            .collect()
    }
}
