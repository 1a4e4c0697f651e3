//! Unified error type definition.

use serde::Serialize;
use thiserror::Error;

/// Core layer error type.
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// The catalog could not be loaded or is structurally inconsistent.
    ///
    /// Fatal to any hostname-generation flow; surfaced to the caller, never retried.
    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// A selection transition was rejected.
    ///
    /// The resolver's state is left untouched when this is returned.
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),
}

/// Core layer Result type alias.
pub type CoreResult<T> = std::result::Result<T, CoreError>;
