//! The scene: garment, placed elements, and the selection pointer.

use serde::{Deserialize, Serialize};

use crate::{DesignElement, ElementId, GarmentProperties, StudioError, StudioResult};

/// Default canvas container width in pixels.
pub const DEFAULT_CANVAS_WIDTH: f32 = 500.0;

/// Default canvas container height in pixels.
pub const DEFAULT_CANVAS_HEIGHT: f32 = 700.0;

/// Stacking value of the element being dragged.
pub const DRAGGING_Z: i32 = 100;

/// Stacking value of the selected element while it is not dragged.
pub const SELECTED_Z: i32 = 50;

/// Size of the canvas container that elements are clipped to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: DEFAULT_CANVAS_WIDTH,
            height: DEFAULT_CANVAS_HEIGHT,
        }
    }
}

impl CanvasSize {
    /// Limit a move delta so `element` stays inside the canvas.
    ///
    /// An element already outside the container may move back in but never
    /// further out. An element larger than the container cannot move along
    /// that axis in the outward direction.
    #[must_use]
    pub fn clip_delta(&self, element: &DesignElement, dx: f32, dy: f32) -> (f32, f32) {
        (
            clip_axis(element.x, element.width, self.width, dx),
            clip_axis(element.y, element.height, self.height, dy),
        )
    }
}

fn clip_axis(position: f32, extent: f32, limit: f32, delta: f32) -> f32 {
    if !delta.is_finite() {
        return 0.0;
    }
    let lower = (-position).min(0.0);
    let upper = (limit - position - extent).max(0.0);
    delta.max(lower).min(upper)
}

/// A snapshot of the design: garment, elements in insertion order, and the
/// selected element id.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Scene {
    /// The base garment.
    garment: GarmentProperties,
    /// Placed elements; order is default draw order.
    elements: Vec<DesignElement>,
    /// Currently selected element id. May dangle.
    selected: Option<ElementId>,
    /// Canvas container size.
    canvas: CanvasSize,
}

impl Scene {
    /// Create an empty scene with the given canvas size.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            canvas: CanvasSize { width, height },
            ..Self::default()
        }
    }

    /// Garment properties.
    #[must_use]
    pub fn garment(&self) -> &GarmentProperties {
        &self.garment
    }

    /// All elements in insertion order.
    #[must_use]
    pub fn elements(&self) -> &[DesignElement] {
        &self.elements
    }

    /// Canvas container size.
    #[must_use]
    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    /// Raw selected id, which may not match any live element.
    #[must_use]
    pub fn selected_id(&self) -> Option<ElementId> {
        self.selected
    }

    /// Resolve the selected element against the live collection.
    #[must_use]
    pub fn selected_element(&self) -> Option<&DesignElement> {
        self.selected.and_then(|id| self.get_element(id))
    }

    /// Whether `id` is the live selected element.
    #[must_use]
    pub fn is_selected(&self, id: ElementId) -> bool {
        self.selected_element().is_some_and(|e| e.id == id)
    }

    /// Get an element by ID.
    #[must_use]
    pub fn get_element(&self, id: ElementId) -> Option<&DesignElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Get the number of elements in the scene.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Check if the scene has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Stacking value of `element` given the element currently dragged.
    #[must_use]
    pub fn effective_z(&self, element: &DesignElement, dragging: Option<ElementId>) -> i32 {
        if dragging == Some(element.id) {
            DRAGGING_Z
        } else if self.selected == Some(element.id) {
            SELECTED_Z
        } else {
            element.resting_z()
        }
    }

    /// Elements sorted bottom to top. Ties keep insertion order.
    #[must_use]
    pub fn draw_order(&self, dragging: Option<ElementId>) -> Vec<&DesignElement> {
        let mut ordered: Vec<_> = self.elements.iter().collect();
        ordered.sort_by_key(|e| self.effective_z(e, dragging));
        ordered
    }

    /// Find the topmost element containing the given canvas point.
    #[must_use]
    pub fn element_at(&self, x: f32, y: f32) -> Option<ElementId> {
        self.draw_order(None)
            .into_iter()
            .rev()
            .find(|e| e.contains_point(x, y))
            .map(|e| e.id)
    }

    pub(crate) fn get_element_mut(&mut self, id: ElementId) -> Option<&mut DesignElement> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    pub(crate) fn garment_mut(&mut self) -> &mut GarmentProperties {
        &mut self.garment
    }

    pub(crate) fn push_element(&mut self, element: DesignElement) {
        self.elements.push(element);
    }

    pub(crate) fn remove_element(&mut self, id: ElementId) -> Option<DesignElement> {
        let index = self.elements.iter().position(|e| e.id == id)?;
        Some(self.elements.remove(index))
    }

    pub(crate) fn clear_elements(&mut self) {
        self.elements.clear();
    }

    pub(crate) fn set_selected(&mut self, id: Option<ElementId>) {
        self.selected = id;
    }

    pub(crate) fn set_canvas(&mut self, canvas: CanvasSize) {
        self.canvas = canvas;
    }

    /// Serialize the scene to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> StudioResult<String> {
        serde_json::to_string(self).map_err(StudioError::Serialization)
    }
}
