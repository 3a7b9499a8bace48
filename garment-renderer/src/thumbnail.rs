//! Catalog picker thumbnails.

use garment_core::catalog::{ELEMENT_THUMBNAIL_SIZE, GARMENT_THUMBNAIL_SIZE};
use garment_core::{
    BoxSize, Displayable, ElementCatalogEntry, GarmentCatalogEntry, RenderAdapter, RenderRequest,
};

fn box_size((width, height): (f32, f32)) -> BoxSize {
    BoxSize { width, height }
}

/// Thumbnail for a garment entry. Untinted and unrotated.
#[must_use]
pub fn garment_thumbnail(adapter: &dyn RenderAdapter, entry: &GarmentCatalogEntry) -> Displayable {
    let image = entry.thumbnail_image();
    adapter.render(&RenderRequest {
        image: &image,
        size: box_size(GARMENT_THUMBNAIL_SIZE),
        tint: None,
        rotation: 0.0,
    })
}

/// Thumbnail for an element entry.
#[must_use]
pub fn element_thumbnail(adapter: &dyn RenderAdapter, entry: &ElementCatalogEntry) -> Displayable {
    adapter.render(&RenderRequest {
        image: &entry.image,
        size: box_size(ELEMENT_THUMBNAIL_SIZE),
        tint: None,
        rotation: 0.0,
    })
}
