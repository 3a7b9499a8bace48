//! Hosted images served through an image delivery CDN.
//!
//! Transformations are encoded in the URL path, one step per segment:
//!
//! ```text
//! https://res.cloudinary.com/<cloud>/image/upload/c_fill,h_80,w_80/f_auto/q_auto/co_rgb:cccccc,e_colorize:100/a_90/<public id>
//! ```
//!
//! Resizing, tinting and rotation happen on the CDN, so the returned
//! displayable carries no CSS transform or filter.

use garment_core::{Displayable, RenderRequest};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{BackendType, RenderError, RenderResult};

use super::RenderBackend;

/// Default delivery host.
pub const DEFAULT_DELIVERY_HOST: &str = "res.cloudinary.com";

/// Colorize strength applied with a tint, in percent.
pub const COLORIZE_LEVEL: u8 = 100;

/// Where hosted images are delivered from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryConfig {
    /// Account name that owns the images.
    pub cloud_name: String,
    /// Use HTTPS.
    #[serde(default = "default_secure")]
    pub secure: bool,
    /// CDN host name.
    #[serde(default = "default_host")]
    pub host: String,
}

fn default_secure() -> bool {
    true
}

fn default_host() -> String {
    DEFAULT_DELIVERY_HOST.to_string()
}

impl DeliveryConfig {
    /// Secure delivery from the default host.
    #[must_use]
    pub fn new(cloud_name: impl Into<String>) -> Self {
        Self {
            cloud_name: cloud_name.into(),
            secure: default_secure(),
            host: default_host(),
        }
    }

    /// Deliver from a different host.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Toggle HTTPS.
    #[must_use]
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Check the configuration and build the upload base URL.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidConfig`] if the cloud name is empty or
    /// contains characters other than ASCII alphanumerics, `-` and `_`, and
    /// [`RenderError::Url`] if the host does not form a valid URL.
    pub fn base_url(&self) -> RenderResult<Url> {
        let valid_name = !self.cloud_name.is_empty()
            && self
                .cloud_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid_name {
            return Err(RenderError::InvalidConfig(format!(
                "cloud name '{}' is not valid",
                self.cloud_name
            )));
        }
        if self.host.is_empty() {
            return Err(RenderError::InvalidConfig("empty delivery host".to_string()));
        }

        let scheme = if self.secure { "https" } else { "http" };
        let mut url = Url::parse(&format!("{scheme}://{}/", self.host))?;
        push_segments(&mut url, [self.cloud_name.as_str(), "image", "upload"])?;
        Ok(url)
    }
}

fn push_segments<'s>(url: &mut Url, segments: impl IntoIterator<Item = &'s str>) -> RenderResult<()> {
    url.path_segments_mut()
        .map_err(|()| RenderError::InvalidConfig("delivery URL cannot hold a path".to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(())
}

/// Transformation steps for a request, in delivery order.
#[must_use]
pub fn transformations(request: &RenderRequest<'_>) -> Vec<String> {
    let mut steps = Vec::with_capacity(5);

    let (width, height) = (request.size.width.round(), request.size.height.round());
    if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
        steps.push(format!("c_fill,h_{height},w_{width}"));
    }
    steps.push("f_auto".to_string());
    steps.push("q_auto".to_string());
    if let Some(tint) = request.tint {
        steps.push(format!(
            "co_rgb:{},e_colorize:{COLORIZE_LEVEL}",
            tint.digits()
        ));
    }
    if request.rotation.is_normal() {
        steps.push(format!("a_{}", request.rotation));
    }
    steps
}

/// Backend that builds delivery URLs for remote ids.
#[derive(Debug, Clone)]
pub struct DeliveryBackend {
    config: DeliveryConfig,
    base: Url,
}

impl DeliveryBackend {
    /// Create a backend from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: DeliveryConfig) -> RenderResult<Self> {
        let base = config.base_url()?;
        tracing::debug!("Delivery backend ready at {base}");
        Ok(Self { config, base })
    }

    /// The configuration this backend was built with.
    #[must_use]
    pub fn config(&self) -> &DeliveryConfig {
        &self.config
    }

    /// Build the delivery URL for one image.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Reference`] if `public_id` is empty or has
    /// empty path segments.
    pub fn url_for(&self, public_id: &str, request: &RenderRequest<'_>) -> RenderResult<Url> {
        let id = public_id.trim_matches('/');
        if id.is_empty() || id.split('/').any(str::is_empty) {
            return Err(RenderError::Reference(format!(
                "'{public_id}' is not a usable public id"
            )));
        }

        let steps = transformations(request);
        let mut url = self.base.clone();
        push_segments(
            &mut url,
            steps.iter().map(String::as_str).chain(id.split('/')),
        )?;
        Ok(url)
    }
}

impl RenderBackend for DeliveryBackend {
    fn backend_type(&self) -> BackendType {
        BackendType::Delivery
    }

    fn render(&self, reference: &str, request: &RenderRequest<'_>) -> RenderResult<Displayable> {
        let url = self.url_for(reference, request)?;
        tracing::trace!("Delivery image {url}");
        Ok(Displayable::Image {
            src: url.into(),
            width: request.size.width,
            height: request.size.height,
            transform: None,
            filter: None,
        })
    }
}
