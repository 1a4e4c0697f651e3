//! Unified error type definition.

use serde::Serialize;
use thiserror::Error;

/// Toolbox error type.
///
/// Most lookup paths absorb failures into partial-success result shapes
/// (`GeoResult { ok: false }`, empty answer lists); these variants surface
/// only where no such shape exists, or travel inside one as its `error` text.
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum ToolboxError {
    /// Input rejected before any lookup was attempted.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Transport-level failure talking to an upstream.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Upstream answered with something that is not structured data.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Upstream reported a failure through its own error convention.
    #[error("Upstream error: {0}")]
    UpstreamError(String),
}

/// Toolbox Result type alias.
pub type ToolboxResult<T> = std::result::Result<T, ToolboxError>;
