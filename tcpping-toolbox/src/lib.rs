//! Network diagnostics for tcpping.
//!
//! Async lookups behind the diagnostic UI: concurrent multi-provider IP
//! geolocation, DNS record inspection over DNS-over-HTTPS, and hostname
//! resolvability checks. All operations are stateless; partial upstream
//! failure degrades per entry, never into an aggregate error.

mod error;
mod http;
mod lookup_slot;
pub mod providers;
mod services;
mod types;

pub use error::{ToolboxError, ToolboxResult};
pub use lookup_slot::{LookupSlot, LookupTicket};
pub use services::{geo_lookup_with, DiagnosticsService, DEFAULT_DOH_ENDPOINT};
pub use types::{DnsRecordSet, DohAnswer, GeoLookupResult, GeoResult, RecordType};
