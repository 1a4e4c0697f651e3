//! Canonical hostname generation from a resolved selection.

use crate::catalog::{CountryShape, LocationCatalog};
use crate::selection::{Protocol, Selection};

/// Fixed domain suffix for all generated hostnames.
pub const HOSTNAME_SUFFIX: &str = "tcpping.top";

/// Build the canonical diagnostic hostname for a selection.
///
/// Returns `None` unless country and provider are set (and the subdivision,
/// when the country requires one).
///
/// The two country shapes use two deliberately distinct grammars — token
/// order differs, so they must not be collapsed into one template:
///
/// - hierarchical: `[proto.]<subdivision>[-<city>]-<provider>.<cc>.tcpping.top`
/// - flat:         `[proto.]<provider>[-<city>].<cc>.tcpping.top`
pub fn build_hostname(catalog: &LocationCatalog, selection: &Selection) -> Option<String> {
    let country_code = selection.country.as_deref()?;
    let provider = selection.provider.as_deref()?;
    let country = catalog.country(country_code)?;

    let prefix = match selection.protocol {
        None | Some(Protocol::Dual) => String::new(),
        Some(p) => format!("{p}."),
    };
    let cc = country_code.to_lowercase();

    let core = match &country.shape {
        CountryShape::Hierarchical { .. } => {
            let subdivision = selection.subdivision.as_deref()?;
            match selection.city.as_deref() {
                Some(city) => format!("{subdivision}-{city}-{provider}"),
                None => format!("{subdivision}-{provider}"),
            }
        }
        CountryShape::Flat { .. } => match selection.city.as_deref() {
            Some(city) => format!("{provider}-{city}"),
            None => provider.to_string(),
        },
    };

    Some(format!("{prefix}{core}.{cc}.{HOSTNAME_SUFFIX}"))
}
