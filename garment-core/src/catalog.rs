//! Garment and element catalogs consumed as plain data.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    ElementDefaults, ElementId, GarmentProperties, HexColor, ImageRef, SceneStore, StudioError,
    StudioResult,
};

/// Thumbnail box for garment catalog entries.
pub const GARMENT_THUMBNAIL_SIZE: (f32, f32) = (100.0, 120.0);

/// Thumbnail box for element catalog entries.
pub const ELEMENT_THUMBNAIL_SIZE: (f32, f32) = (80.0, 80.0);

/// An element the user can place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementCatalogEntry {
    /// Name shown in the picker.
    pub display_name: String,
    /// Category given to placed elements.
    pub category: String,
    /// Image of the element.
    #[serde(flatten)]
    pub image: ImageRef,
}

impl ElementCatalogEntry {
    /// Place this entry on the canvas. The new element is selected.
    pub fn add_to(&self, store: &mut SceneStore) -> ElementId {
        store.add_element(&self.category, self.image.clone())
    }
}

/// A garment the user can design on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GarmentCatalogEntry {
    /// Name shown in the picker.
    pub display_name: String,
    /// Garment image.
    #[serde(flatten)]
    pub image: ImageRef,
    /// Remote id of a dedicated thumbnail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl GarmentCatalogEntry {
    /// Switch the design to this garment, clearing placed elements.
    pub fn choose(&self, store: &mut SceneStore) {
        store.set_garment(self.image.clone(), None);
    }

    /// Image used for the picker thumbnail. A dedicated thumbnail wins over
    /// the garment image.
    #[must_use]
    pub fn thumbnail_image(&self) -> ImageRef {
        match self.thumbnail.as_deref().filter(|t| !t.is_empty()) {
            Some(thumbnail) => ImageRef::remote(thumbnail),
            None => self.image.clone(),
        }
    }

    /// Whether this entry is the garment currently shown.
    ///
    /// Compares resolved sources only. An entry without any image is never
    /// active.
    #[must_use]
    pub fn is_active(&self, garment: &GarmentProperties) -> bool {
        match (self.image.source(), garment.image.source()) {
            (Some(entry), Some(current)) => entry == current,
            _ => false,
        }
    }
}

/// Everything the pickers offer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Garments in display order.
    #[serde(default)]
    pub garments: Vec<GarmentCatalogEntry>,
    /// Elements in display order.
    #[serde(default)]
    pub elements: Vec<ElementCatalogEntry>,
    /// Initial tint of new elements, by category.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tints: BTreeMap<String, HexColor>,
}

impl Catalog {
    /// Parse a catalog from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> StudioResult<Self> {
        serde_json::from_str(json).map_err(StudioError::Serialization)
    }

    /// Defaults for new elements with this catalog's category tints applied.
    #[must_use]
    pub fn element_defaults(&self) -> ElementDefaults {
        self.tints
            .iter()
            .fold(ElementDefaults::default(), |defaults, (category, tint)| {
                defaults.with_category_tint(category.clone(), tint.clone())
            })
    }

    /// Elements of one category, in display order.
    pub fn elements_in<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a ElementCatalogEntry> + 'a {
        self.elements.iter().filter(move |e| e.category == category)
    }

    /// Distinct element categories in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for entry in &self.elements {
            if !seen.contains(&entry.category.as_str()) {
                seen.push(&entry.category);
            }
        }
        seen
    }

    /// The garment entry matching the current garment, if any.
    #[must_use]
    pub fn active_garment(&self, garment: &GarmentProperties) -> Option<&GarmentCatalogEntry> {
        self.garments.iter().find(|g| g.is_active(garment))
    }
}
