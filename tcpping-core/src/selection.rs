//! Selection state machine over the location catalog.
//!
//! Every user-facing choice (country, subdivision, city, provider, protocol)
//! funnels through [`SelectionResolver::apply`] as a [`SelectionEvent`]. Each
//! accepted event replaces the whole [`Selection`] atomically, including the
//! cascading reset of dependent fields and protocol re-derivation; rejected
//! events leave the state untouched.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::{LocationCatalog, ProtocolCapability};
use crate::error::{CoreError, CoreResult};

/// Protocol choice for a generated hostname.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    V4,
    V6,
    Dual,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V4 => write!(f, "v4"),
            Self::V6 => write!(f, "v6"),
            Self::Dual => write!(f, "dual"),
        }
    }
}

impl Protocol {
    /// Protocols compatible with a provider's capability.
    ///
    /// A dual-stack provider offers all three choices so the user can still
    /// force a single stack; single-stack providers offer exactly one.
    pub fn available_for(capability: ProtocolCapability) -> Vec<Self> {
        let mut available = Vec::with_capacity(3);
        if capability.v4 && capability.v6 {
            available.push(Self::Dual);
        }
        if capability.v4 {
            available.push(Self::V4);
        }
        if capability.v6 {
            available.push(Self::V6);
        }
        available
    }
}

/// The resolver's working state.
///
/// Invariants (held between events, see [`SelectionResolver`]):
/// `subdivision` is set only under a hierarchical country; `city` only if the
/// selected parent actually contains it; `provider` only if visible at the
/// most specific selected node; `protocol` only if compatible with the
/// provider's capability.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub country: Option<String>,
    pub subdivision: Option<String>,
    pub city: Option<String>,
    pub provider: Option<String>,
    pub protocol: Option<Protocol>,
}

/// A selection transition request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    SetCountry(String),
    SetSubdivision(String),
    SetCity(String),
    SetProvider(String),
    SetProtocol(Protocol),
    Reset,
}

/// State machine enforcing the selection invariants against a catalog.
#[derive(Debug, Clone)]
pub struct SelectionResolver {
    catalog: Arc<LocationCatalog>,
    selection: Selection,
}

impl SelectionResolver {
    pub fn new(catalog: Arc<LocationCatalog>) -> Self {
        Self {
            catalog,
            selection: Selection::default(),
        }
    }

    /// Current selection.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The catalog this resolver validates against.
    pub fn catalog(&self) -> &LocationCatalog {
        &self.catalog
    }

    /// Apply one transition.
    ///
    /// On rejection the current selection is left exactly as it was; callers
    /// that treat invalid input as a no-op can ignore the error.
    pub fn apply(&mut self, event: SelectionEvent) -> CoreResult<()> {
        match self.transition(event) {
            Ok(next) => {
                self.selection = next;
                Ok(())
            }
            Err(e) => {
                log::debug!("selection transition rejected: {e}");
                Err(e)
            }
        }
    }

    /// Whether the selection suffices for hostname generation.
    ///
    /// Flat countries need only a provider; hierarchical countries also need
    /// the subdivision. A city is never mandatory.
    pub fn is_generation_ready(&self) -> bool {
        let Some(country_code) = self.selection.country.as_deref() else {
            return false;
        };
        let Some(country) = self.catalog.country(country_code) else {
            return false;
        };
        if self.selection.provider.is_none() {
            return false;
        }
        !country.has_subdivisions() || self.selection.subdivision.is_some()
    }

    fn transition(&self, event: SelectionEvent) -> CoreResult<Selection> {
        let current = &self.selection;
        match event {
            SelectionEvent::Reset => Ok(Selection::default()),

            SelectionEvent::SetCountry(code) => {
                if self.catalog.country(&code).is_none() {
                    return Err(CoreError::InvalidSelection(format!(
                        "unknown country: {code}"
                    )));
                }
                Ok(Selection {
                    country: Some(code),
                    ..Selection::default()
                })
            }

            SelectionEvent::SetSubdivision(code) => {
                let country_code = current.country.as_deref().ok_or_else(|| {
                    CoreError::InvalidSelection("no country selected".to_string())
                })?;
                let country = self.catalog.country(country_code).ok_or_else(|| {
                    CoreError::InvalidSelection(format!("unknown country: {country_code}"))
                })?;
                if !country.has_subdivisions() {
                    return Err(CoreError::InvalidSelection(format!(
                        "country {country_code} has no subdivisions"
                    )));
                }
                if self.catalog.subdivision(country_code, &code).is_none() {
                    return Err(CoreError::InvalidSelection(format!(
                        "unknown subdivision: {code}"
                    )));
                }
                Ok(Selection {
                    country: current.country.clone(),
                    subdivision: Some(code),
                    ..Selection::default()
                })
            }

            SelectionEvent::SetCity(code) => {
                let country_code = current.country.as_deref().ok_or_else(|| {
                    CoreError::InvalidSelection("no country selected".to_string())
                })?;
                let subdivision = current.subdivision.as_deref();
                if self.catalog.city(country_code, subdivision, &code).is_none() {
                    return Err(CoreError::InvalidSelection(format!("unknown city: {code}")));
                }
                Ok(Selection {
                    country: current.country.clone(),
                    subdivision: current.subdivision.clone(),
                    city: Some(code),
                    ..Selection::default()
                })
            }

            SelectionEvent::SetProvider(code) => {
                let country_code = current.country.as_deref().ok_or_else(|| {
                    CoreError::InvalidSelection("no country selected".to_string())
                })?;
                let country = self.catalog.country(country_code).ok_or_else(|| {
                    CoreError::InvalidSelection(format!("unknown country: {country_code}"))
                })?;
                if country.has_subdivisions() && current.subdivision.is_none() {
                    return Err(CoreError::InvalidSelection(
                        "subdivision required before provider".to_string(),
                    ));
                }
                let provider = self
                    .catalog
                    .providers_at(
                        country_code,
                        current.subdivision.as_deref(),
                        current.city.as_deref(),
                    )
                    .and_then(|providers| providers.get(&code))
                    .ok_or_else(|| {
                        CoreError::InvalidSelection(format!("provider not visible here: {code}"))
                    })?;
                let protocol = derive_protocol(provider.capability, current.protocol);
                Ok(Selection {
                    country: current.country.clone(),
                    subdivision: current.subdivision.clone(),
                    city: current.city.clone(),
                    provider: Some(code),
                    protocol,
                })
            }

            SelectionEvent::SetProtocol(protocol) => {
                let provider_code = current.provider.as_deref().ok_or_else(|| {
                    CoreError::InvalidSelection("no provider selected".to_string())
                })?;
                let capability = self
                    .selected_capability(provider_code)
                    .ok_or_else(|| {
                        CoreError::InvalidSelection(format!(
                            "provider not visible here: {provider_code}"
                        ))
                    })?;
                if !Protocol::available_for(capability).contains(&protocol) {
                    return Err(CoreError::InvalidSelection(format!(
                        "protocol {protocol} not supported by {provider_code}"
                    )));
                }
                Ok(Selection {
                    protocol: Some(protocol),
                    ..current.clone()
                })
            }
        }
    }

    fn selected_capability(&self, provider_code: &str) -> Option<ProtocolCapability> {
        let country = self.selection.country.as_deref()?;
        self.catalog
            .providers_at(
                country,
                self.selection.subdivision.as_deref(),
                self.selection.city.as_deref(),
            )
            .and_then(|providers| providers.get(provider_code))
            .map(|p| p.capability)
    }
}

/// Re-derive the protocol when the provider changes.
///
/// Exactly one compatible option auto-selects; otherwise a previous value is
/// kept only while still compatible.
fn derive_protocol(capability: ProtocolCapability, previous: Option<Protocol>) -> Option<Protocol> {
    let available = Protocol::available_for(capability);
    if available.len() == 1 {
        return Some(available[0]);
    }
    previous.filter(|p| available.contains(p))
}
