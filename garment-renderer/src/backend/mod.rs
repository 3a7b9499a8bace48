//! Image source backends.
//!
//! Each backend handles one kind of [`ImageSource`](garment_core::ImageSource):
//! the delivery backend builds transformation URLs for hosted images, the
//! local backend serves bundled paths and leaves transforms to the host.

pub mod delivery;
pub mod local;

use garment_core::{Displayable, RenderRequest};

use crate::{BackendType, RenderResult};

/// Trait for rendering backends.
pub trait RenderBackend {
    /// Get the backend type.
    fn backend_type(&self) -> BackendType;

    /// Resolve one image reference for display.
    ///
    /// `reference` is the remote id or local path chosen for this backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the reference cannot be turned into a source the
    /// host can load.
    fn render(&self, reference: &str, request: &RenderRequest<'_>) -> RenderResult<Displayable>;
}
