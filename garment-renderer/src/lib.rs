//! # Garment Studio Renderer
//!
//! Render adapters that turn image references into something a host page
//! can display. The core hands over a [`RenderRequest`]; the renderer picks
//! a backend for the request's image source and falls back when it cannot.
//!
//! ## Rendering Backends
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │             RenderAdapter Trait             │
//! ├───────────────┬──────────────┬──────────────┤
//! │ Delivery CDN  │ Local path   │ Placeholder  │
//! │ (remote ids)  │ (CSS rotate) │ (no image)   │
//! └───────────────┴──────────────┴──────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod error;
pub mod thumbnail;

pub use backend::delivery::{DeliveryBackend, DeliveryConfig};
pub use backend::local::LocalBackend;
pub use backend::RenderBackend;
pub use error::{RenderError, RenderResult};

use garment_core::{
    Displayable, Frame, ImageSource, InteractionController, RenderAdapter, RenderRequest, Scene,
};

/// Configuration for the renderer.
#[derive(Debug, Clone, Default)]
pub struct RendererConfig {
    /// Hosted image delivery. Without it remote ids fall back to the local
    /// path, or a placeholder.
    pub delivery: Option<DeliveryConfig>,
    /// Prefix for relative local paths.
    pub local_base_path: Option<String>,
}

impl RendererConfig {
    /// Configuration delivering hosted images from `cloud_name`.
    #[must_use]
    pub fn with_cloud(cloud_name: impl Into<String>) -> Self {
        Self {
            delivery: Some(DeliveryConfig::new(cloud_name)),
            local_base_path: None,
        }
    }
}

/// Available rendering backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    /// Image delivery CDN for remote ids.
    Delivery,
    /// Host-served local paths.
    Local,
}

/// The main renderer: a [`RenderAdapter`] over the configured backends.
pub struct StudioRenderer {
    config: RendererConfig,
    delivery: Option<DeliveryBackend>,
    local: LocalBackend,
}

impl std::fmt::Debug for StudioRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StudioRenderer")
            .field("backends", &self.active_backends())
            .finish_non_exhaustive()
    }
}

impl StudioRenderer {
    /// Create a new renderer with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the delivery configuration is invalid.
    pub fn new(config: RendererConfig) -> RenderResult<Self> {
        let delivery = config
            .delivery
            .clone()
            .map(DeliveryBackend::new)
            .transpose()?;
        let local = match &config.local_base_path {
            Some(base) => LocalBackend::new().with_base_path(base.clone()),
            None => LocalBackend::new(),
        };

        Ok(Self {
            config,
            delivery,
            local,
        })
    }

    /// Renderer for local images only.
    #[must_use]
    pub fn local_only() -> Self {
        Self {
            config: RendererConfig::default(),
            delivery: None,
            local: LocalBackend::new(),
        }
    }

    /// Get the renderer configuration.
    #[must_use]
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Backends available, in preference order.
    #[must_use]
    pub fn active_backends(&self) -> Vec<BackendType> {
        let mut backends = Vec::with_capacity(2);
        if let Some(delivery) = &self.delivery {
            backends.push(delivery.backend_type());
        }
        backends.push(self.local.backend_type());
        backends
    }

    /// Compose the whole scene into a frame.
    #[must_use]
    pub fn render_frame(&self, scene: &Scene, controller: &InteractionController) -> Frame {
        let frame = Frame::compose(scene, controller, self);
        tracing::debug!(
            "Rendered frame: {} layers, garment placeholder: {}",
            frame.layers.len(),
            frame.garment.is_placeholder()
        );
        frame
    }

    fn render_local(&self, request: &RenderRequest<'_>) -> Displayable {
        let Some(path) = request.image.local_path.as_deref().filter(|p| !p.is_empty()) else {
            return Displayable::placeholder(request.size);
        };
        self.local.render(path, request).unwrap_or_else(|e| {
            tracing::warn!("Local render failed for {path}: {e}");
            Displayable::placeholder(request.size)
        })
    }
}

impl RenderAdapter for StudioRenderer {
    fn render(&self, request: &RenderRequest<'_>) -> Displayable {
        match request.image.source() {
            Some(ImageSource::Remote(id)) => match &self.delivery {
                Some(delivery) => delivery.render(id, request).unwrap_or_else(|e| {
                    tracing::warn!("Delivery unavailable for {id}, falling back: {e}");
                    self.render_local(request)
                }),
                None => {
                    tracing::debug!("No delivery configured for {id}, falling back to local");
                    self.render_local(request)
                }
            },
            Some(ImageSource::Local(_)) => self.render_local(request),
            None => Displayable::placeholder(request.size),
        }
    }
}
