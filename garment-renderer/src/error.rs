//! Renderer error types.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while resolving images.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Renderer configuration is unusable.
    #[error("Invalid renderer configuration: {0}")]
    InvalidConfig(String),

    /// Delivery URL could not be built.
    #[error("Invalid delivery URL: {0}")]
    Url(#[from] url::ParseError),

    /// Image reference cannot be placed in a URL.
    #[error("Invalid image reference: {0}")]
    Reference(String),
}
