//! Design elements and garment properties - the building blocks of a scene.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{StudioError, StudioResult};

/// Smallest width or height an element may have, in pixels.
pub const MIN_ELEMENT_SIZE: f32 = 20.0;

/// Initial X position of a newly added element.
pub const DEFAULT_ELEMENT_X: f32 = 50.0;

/// Initial Y position of a newly added element.
pub const DEFAULT_ELEMENT_Y: f32 = 50.0;

/// Initial width and height of a newly added element.
pub const DEFAULT_ELEMENT_SIZE: f32 = 80.0;

/// Stacking value used for resting elements without an explicit z-index.
pub const DEFAULT_Z_INDEX: i32 = 1;

/// Unique identifier for a design element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(Uuid);

impl ElementId {
    /// Create a new unique element ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an element ID from its string form.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::InvalidElementId`] if `value` is not a UUID.
    pub fn parse(value: &str) -> StudioResult<Self> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|e| StudioError::InvalidElementId(format!("{value}: {e}")))
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A `#rrggbb` color used to tint rendered images.
///
/// Parsing accepts three or six hex digits with an optional leading `#`
/// and normalizes to lowercase six-digit form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

impl HexColor {
    /// Parse a hex color string.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::InvalidColor`] if `value` is not a 3 or 6 digit
    /// hex color.
    pub fn parse(value: &str) -> StudioResult<Self> {
        let digits = value.strip_prefix('#').unwrap_or(value);
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(StudioError::InvalidColor(value.to_string()));
        }
        let expanded = match digits.len() {
            6 => digits.to_ascii_lowercase(),
            3 => digits
                .chars()
                .flat_map(|c| [c, c])
                .collect::<String>()
                .to_ascii_lowercase(),
            _ => return Err(StudioError::InvalidColor(value.to_string())),
        };
        Ok(Self(format!("#{expanded}")))
    }

    /// Plain white, shown by pickers when nothing is set.
    #[must_use]
    pub fn white() -> Self {
        Self(String::from("#ffffff"))
    }

    /// The color with its leading `#`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The six hex digits without the leading `#`.
    #[must_use]
    pub fn digits(&self) -> &str {
        &self.0[1..]
    }
}

impl FromStr for HexColor {
    type Err = StudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for HexColor {
    type Error = StudioError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.0
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where an image comes from: a remote asset identifier, a local path, or both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    /// Identifier of an asset hosted by the remote image service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<String>,
    /// Path of an image served alongside the application.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_path: Option<String>,
}

/// The reference an [`ImageRef`] resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource<'a> {
    /// Remote asset identifier.
    Remote(&'a str),
    /// Local path.
    Local(&'a str),
}

impl ImageRef {
    /// Create a reference from optional remote and local parts.
    #[must_use]
    pub fn new(remote_id: Option<String>, local_path: Option<String>) -> Self {
        Self {
            remote_id,
            local_path,
        }
    }

    /// Reference to a remote asset.
    #[must_use]
    pub fn remote(remote_id: impl Into<String>) -> Self {
        Self::new(Some(remote_id.into()), None)
    }

    /// Reference to a local image.
    #[must_use]
    pub fn local(local_path: impl Into<String>) -> Self {
        Self::new(None, Some(local_path.into()))
    }

    /// Resolve the effective source. A non-empty remote id wins over a local
    /// path; empty strings count as absent.
    #[must_use]
    pub fn source(&self) -> Option<ImageSource<'_>> {
        fn non_empty(value: Option<&str>) -> Option<&str> {
            value.filter(|v| !v.is_empty())
        }

        non_empty(self.remote_id.as_deref())
            .map(ImageSource::Remote)
            .or_else(|| non_empty(self.local_path.as_deref()).map(ImageSource::Local))
    }

    /// Whether neither part resolves to anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.source().is_none()
    }
}

/// An overlay placed on the garment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignElement {
    /// Unique identifier.
    pub id: ElementId,
    /// Opaque category tag such as `"pocket"`.
    pub category: String,
    /// Visual content.
    pub image: ImageRef,
    /// X position (pixels from the canvas' left edge).
    pub x: f32,
    /// Y position (pixels from the canvas' top edge).
    pub y: f32,
    /// Width in pixels, never below [`MIN_ELEMENT_SIZE`].
    pub width: f32,
    /// Height in pixels, never below [`MIN_ELEMENT_SIZE`].
    pub height: f32,
    /// Rotation in degrees.
    #[serde(default)]
    pub rotation: f32,
    /// Tint applied to the rendered image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<HexColor>,
    /// Reserved texture reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture: Option<String>,
    /// Reserved stacking value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
}

impl DesignElement {
    /// Create an element with the default placement and size.
    #[must_use]
    pub fn new(category: impl Into<String>, image: ImageRef) -> Self {
        Self {
            id: ElementId::new(),
            category: category.into(),
            image,
            x: DEFAULT_ELEMENT_X,
            y: DEFAULT_ELEMENT_Y,
            width: DEFAULT_ELEMENT_SIZE,
            height: DEFAULT_ELEMENT_SIZE,
            rotation: 0.0,
            color: None,
            texture: None,
            z_index: None,
        }
    }

    /// Set the tint.
    #[must_use]
    pub fn with_color(mut self, color: Option<HexColor>) -> Self {
        self.color = color;
        self
    }

    /// Set both dimensions, raising each to [`MIN_ELEMENT_SIZE`] if needed.
    pub fn set_size(&mut self, width: f32, height: f32) {
        self.width = clamp_dimension(width);
        self.height = clamp_dimension(height);
    }

    /// Stacking value when the element is neither selected nor dragged.
    #[must_use]
    pub fn resting_z(&self) -> i32 {
        self.z_index.unwrap_or(DEFAULT_Z_INDEX)
    }

    /// Check if a point (in canvas coordinates) is within this element.
    #[must_use]
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

/// Apply the minimum size floor. Non-finite input collapses to the floor.
#[must_use]
pub fn clamp_dimension(value: f32) -> f32 {
    if value.is_finite() {
        value.max(MIN_ELEMENT_SIZE)
    } else {
        MIN_ELEMENT_SIZE
    }
}

/// Display properties of the base garment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GarmentProperties {
    /// Garment image.
    pub image: ImageRef,
    /// Tint applied to the garment image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<HexColor>,
}

impl Default for GarmentProperties {
    fn default() -> Self {
        Self {
            image: ImageRef::default(),
            color: Some(HexColor::white()),
        }
    }
}
