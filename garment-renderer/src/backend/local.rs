//! Bundled images served from the host's own static paths.
//!
//! Local images cannot be transformed server-side, so rotation becomes a CSS
//! transform on the displayable. Tints are not applied to local images.

use garment_core::{Displayable, RenderRequest};

use crate::{BackendType, RenderError, RenderResult};

use super::RenderBackend;

/// Backend for local image paths.
#[derive(Debug, Clone, Default)]
pub struct LocalBackend {
    base_path: Option<String>,
}

impl LocalBackend {
    /// Create a backend that emits paths unchanged.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix relative paths with `base_path`. Absolute paths are kept.
    #[must_use]
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        let base_path = base_path.into();
        self.base_path = (!base_path.is_empty()).then_some(base_path);
        self
    }

    fn resolve(&self, path: &str) -> String {
        match &self.base_path {
            Some(base) if !path.starts_with('/') => {
                format!("{}/{path}", base.trim_end_matches('/'))
            }
            _ => path.to_string(),
        }
    }
}

/// CSS transform for a rotation, if there is one.
#[must_use]
pub fn rotate_transform(rotation: f32) -> Option<String> {
    rotation.is_normal().then(|| format!("rotate({rotation}deg)"))
}

impl RenderBackend for LocalBackend {
    fn backend_type(&self) -> BackendType {
        BackendType::Local
    }

    fn render(&self, reference: &str, request: &RenderRequest<'_>) -> RenderResult<Displayable> {
        if reference.is_empty() {
            return Err(RenderError::Reference("empty local path".to_string()));
        }
        let src = self.resolve(reference);
        tracing::trace!("Local image {src} at {:?}", request.size);

        Ok(Displayable::Image {
            src,
            width: request.size.width,
            height: request.size.height,
            transform: rotate_transform(request.rotation),
            filter: None,
        })
    }
}
