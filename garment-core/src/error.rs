//! Error types for studio operations.
//!
//! Scene mutations never fail; errors only arise at the boundary where
//! untyped input (strings, JSON) is turned into model values.

use thiserror::Error;

/// Result type for studio operations.
pub type StudioResult<T> = Result<T, StudioError>;

/// Errors that can occur when parsing input into the model.
#[derive(Debug, Error)]
pub enum StudioError {
    /// A color string was not a valid hex color.
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// An element identifier could not be parsed.
    #[error("Invalid element id: {0}")]
    InvalidElementId(String),

    /// Scene or catalog serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
