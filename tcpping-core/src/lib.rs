//! Core decision logic for tcpping diagnostics.
//!
//! Pure, synchronous building blocks behind the diagnostic hostname
//! generator: the location/provider catalog, the selection state machine, the
//! hostname grammar, and the raw-input classifier. Network-facing lookups
//! live in the companion `tcpping-toolbox` crate.

mod catalog;
mod classify;
mod error;
mod hostname;
mod selection;

pub use catalog::{
    City, CityMarker, Coordinates, Country, CountryShape, LocationCatalog, ProtocolCapability,
    Provider, Subdivision,
};
pub use classify::{classify, ClassifiedInput, InputKind};
pub use error::{CoreError, CoreResult};
pub use hostname::{build_hostname, HOSTNAME_SUFFIX};
pub use selection::{Protocol, Selection, SelectionEvent, SelectionResolver};
