//! Scene storage and the mutation operations the rest of the studio goes through.
//!
//! [`SceneStore`] is the only owner of the [`Scene`]. Every public mutation is a
//! single atomic transition: it runs to completion, then the change callback
//! (if any) observes exactly one new snapshot. Operations that target an
//! element which no longer exists are silent no-ops.

use std::collections::HashMap;
use std::fmt;

use crate::scene::CanvasSize;
use crate::{
    DesignElement, ElementId, ElementProperty, GarmentProperty, HexColor, ImageRef, Scene,
};

/// Tint given to new elements when their category has no override.
pub const DEFAULT_ELEMENT_TINT: &str = "#cccccc";

/// Callback type for scene change notifications.
pub type OnChangeCallback = Box<dyn Fn(&Scene)>;

/// Category-specific defaults applied by [`SceneStore::add_element`].
#[derive(Debug, Clone)]
pub struct ElementDefaults {
    fallback_tint: Option<HexColor>,
    by_category: HashMap<String, HexColor>,
}

impl Default for ElementDefaults {
    fn default() -> Self {
        Self {
            fallback_tint: HexColor::parse(DEFAULT_ELEMENT_TINT).ok(),
            by_category: HashMap::new(),
        }
    }
}

impl ElementDefaults {
    /// Override the initial tint for one category.
    #[must_use]
    pub fn with_category_tint(mut self, category: impl Into<String>, tint: HexColor) -> Self {
        self.by_category.insert(category.into(), tint);
        self
    }

    /// Initial tint for a new element of `category`.
    #[must_use]
    pub fn tint_for(&self, category: &str) -> Option<HexColor> {
        self.by_category
            .get(category)
            .or(self.fallback_tint.as_ref())
            .cloned()
    }
}

/// Owner of the scene and its mutation operations.
///
/// # Example
///
/// ```
/// use garment_core::{ImageRef, SceneStore};
///
/// let mut store = SceneStore::new();
/// store.set_garment(ImageRef::local("/images/shirt.png"), None);
///
/// let id = store.add_element("pocket", ImageRef::local("/images/pocket.png"));
/// store.resize_element(id, 5.0, 5.0);
///
/// let pocket = store.selected_element().unwrap();
/// assert_eq!(pocket.width, 20.0);
/// ```
#[derive(Default)]
pub struct SceneStore {
    scene: Scene,
    defaults: ElementDefaults,
    on_change: Option<OnChangeCallback>,
}

impl fmt::Debug for SceneStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneStore")
            .field("scene", &self.scene)
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

impl SceneStore {
    /// Create a store holding an empty scene with the default canvas size.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose canvas container has the given size.
    #[must_use]
    pub fn with_canvas(width: f32, height: f32) -> Self {
        Self {
            scene: Scene::new(width, height),
            ..Self::default()
        }
    }

    /// Replace the defaults applied to new elements.
    #[must_use]
    pub fn with_defaults(mut self, defaults: ElementDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Set the change notification callback.
    pub fn set_on_change<F>(&mut self, callback: F)
    where
        F: Fn(&Scene) + 'static,
    {
        self.on_change = Some(Box::new(callback));
    }

    /// Read-only view of the current scene.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Owned copy of the current scene.
    #[must_use]
    pub fn snapshot(&self) -> Scene {
        self.scene.clone()
    }

    /// The selected element, looked up in the live collection.
    #[must_use]
    pub fn selected_element(&self) -> Option<&DesignElement> {
        self.scene.selected_element()
    }

    /// Resize the canvas container. Existing elements are left where they are.
    pub fn set_canvas_size(&mut self, width: f32, height: f32) {
        self.scene.set_canvas(CanvasSize { width, height });
        self.commit("set_canvas_size");
    }

    /// Switch to a new garment, starting a fresh design.
    ///
    /// When `tint` is `None` the current garment color is kept.
    pub fn set_garment(&mut self, image: ImageRef, tint: Option<HexColor>) {
        let garment = self.scene.garment_mut();
        garment.image = image;
        if tint.is_some() {
            garment.color = tint;
        }
        self.scene.clear_elements();
        self.scene.set_selected(None);
        tracing::debug!("Garment changed: {:?}", self.scene.garment().image);
        self.commit("set_garment");
    }

    /// Place a new element with default geometry and select it.
    pub fn add_element(&mut self, category: &str, image: ImageRef) -> ElementId {
        let mut element =
            DesignElement::new(category, image).with_color(self.defaults.tint_for(category));
        while self.scene.get_element(element.id).is_some() {
            element.id = ElementId::new();
        }
        let id = element.id;
        self.scene.push_element(element);
        self.scene.set_selected(Some(id));
        tracing::debug!("Added {category} element {id}");
        self.commit("add_element");
        id
    }

    /// Move an element by a delta, clipped to the canvas, and select it.
    ///
    /// Returns the delta actually applied, or `None` if the element does not
    /// exist. The selection is updated either way.
    pub fn move_element(&mut self, id: ElementId, dx: f32, dy: f32) -> Option<(f32, f32)> {
        let canvas = self.scene.canvas();
        let applied = self.scene.get_element_mut(id).map(|element| {
            let (cx, cy) = canvas.clip_delta(element, dx, dy);
            element.x += cx;
            element.y += cy;
            (cx, cy)
        });
        if applied.is_none() {
            tracing::debug!("Move ignored, element {id} not found");
        }
        self.scene.set_selected(Some(id));
        self.commit("move_element");
        applied
    }

    /// Resize an element, never below the minimum size.
    ///
    /// Returns `false` if the element does not exist.
    pub fn resize_element(&mut self, id: ElementId, width: f32, height: f32) -> bool {
        let Some(element) = self.scene.get_element_mut(id) else {
            tracing::debug!("Resize ignored, element {id} not found");
            return false;
        };
        element.set_size(width, height);
        self.commit("resize_element");
        true
    }

    /// Toggle selection: selecting the selected id clears it, any other id
    /// (even one with no element) becomes the selection.
    pub fn select_element(&mut self, id: ElementId) {
        let next = if self.scene.selected_id() == Some(id) {
            None
        } else {
            Some(id)
        };
        self.scene.set_selected(next);
        self.commit("select_element");
    }

    /// Clear the selection.
    pub fn deselect(&mut self) {
        self.scene.set_selected(None);
        self.commit("deselect");
    }

    /// Delete the selected element and clear the selection.
    ///
    /// Returns the removed element. A dangling selection is cleared and
    /// `None` is returned.
    pub fn remove_selected(&mut self) -> Option<DesignElement> {
        let id = self.scene.selected_id()?;
        let removed = self.scene.remove_element(id);
        self.scene.set_selected(None);
        tracing::debug!("Removed selected element {id}");
        self.commit("remove_selected");
        removed
    }

    /// Replace one field of an element.
    ///
    /// Returns `false` if the element does not exist.
    pub fn set_element_property(&mut self, id: ElementId, property: ElementProperty) -> bool {
        let Some(element) = self.scene.get_element_mut(id) else {
            tracing::debug!("Property ignored, element {id} not found");
            return false;
        };
        property.apply(element);
        self.commit("set_element_property");
        true
    }

    /// Replace one garment field. Changing the image resets the design like
    /// [`SceneStore::set_garment`].
    pub fn set_garment_property(&mut self, property: GarmentProperty) {
        match property {
            GarmentProperty::Image(image) => self.set_garment(image, None),
            GarmentProperty::Color(color) => {
                self.scene.garment_mut().color = color;
                self.commit("set_garment_property");
            }
        }
    }

    fn commit(&self, operation: &'static str) {
        tracing::trace!(
            operation,
            elements = self.scene.element_count(),
            "Scene updated"
        );
        if let Some(ref callback) = self.on_change {
            callback(&self.scene);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    fn pocket(store: &mut SceneStore) -> ElementId {
        store.add_element("pocket", ImageRef::local("/images/pocket.png"))
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = SceneStore::new();
        assert!(store.scene().is_empty());
        assert!(store.selected_element().is_none());
    }

    #[test]
    fn test_add_element_selects_and_tints() {
        let mut store = SceneStore::new();
        let id = pocket(&mut store);

        let element = store.selected_element().expect("selected");
        assert_eq!(element.id, id);
        assert_eq!(element.category, "pocket");
        assert_eq!(
            element.color.as_ref().map(HexColor::as_str),
            Some(DEFAULT_ELEMENT_TINT)
        );
    }

    #[test]
    fn test_add_element_uses_category_tint() {
        let navy = HexColor::parse("#000080").expect("color");
        let mut store = SceneStore::new()
            .with_defaults(ElementDefaults::default().with_category_tint("patch", navy.clone()));
        store.add_element("patch", ImageRef::default());
        assert_eq!(store.selected_element().and_then(|e| e.color.clone()), Some(navy));
    }

    #[test]
    fn test_add_elements_have_distinct_ids() {
        let mut store = SceneStore::new();
        let a = pocket(&mut store);
        let b = pocket(&mut store);
        assert_ne!(a, b);
        assert_eq!(store.scene().element_count(), 2);
    }

    #[test]
    fn test_set_garment_resets_design() {
        let mut store = SceneStore::new();
        pocket(&mut store);
        pocket(&mut store);

        store.set_garment(ImageRef::local("/images/jeans.png"), None);

        assert!(store.scene().is_empty());
        assert!(store.scene().selected_id().is_none());
        assert_eq!(
            store.scene().garment().image,
            ImageRef::local("/images/jeans.png")
        );
    }

    #[test]
    fn test_set_garment_keeps_color_without_tint() {
        let mut store = SceneStore::new();
        let red = HexColor::parse("#ff0000").expect("color");
        store.set_garment_property(GarmentProperty::Color(Some(red.clone())));
        store.set_garment(ImageRef::remote("shirt"), None);
        assert_eq!(store.scene().garment().color, Some(red));

        let blue = HexColor::parse("#0000ff").expect("color");
        store.set_garment(ImageRef::remote("shirt"), Some(blue.clone()));
        assert_eq!(store.scene().garment().color, Some(blue));
    }

    #[test]
    fn test_move_element_missing_is_noop_but_selects() {
        let mut store = SceneStore::new();
        let id = pocket(&mut store);
        let ghost = ElementId::new();

        assert!(store.move_element(ghost, 10.0, 10.0).is_none());
        assert_eq!(store.scene().selected_id(), Some(ghost));
        let element = store.scene().get_element(id).expect("exists");
        assert!((element.x - 50.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_move_element_clips_to_canvas() {
        let mut store = SceneStore::new();
        let id = pocket(&mut store);
        let applied = store.move_element(id, -100.0, 25.0).expect("exists");
        assert!((applied.0 + 50.0).abs() < f32::EPSILON);
        assert!((applied.1 - 25.0).abs() < f32::EPSILON);

        let element = store.scene().get_element(id).expect("exists");
        assert!(element.x.abs() < f32::EPSILON);
        assert!((element.y - 75.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_resize_clamps_to_minimum() {
        let mut store = SceneStore::new();
        let id = pocket(&mut store);
        assert!(store.resize_element(id, -300.0, 5.0));
        let element = store.scene().get_element(id).expect("exists");
        assert!((element.width - 20.0).abs() < f32::EPSILON);
        assert!((element.height - 20.0).abs() < f32::EPSILON);

        assert!(!store.resize_element(ElementId::new(), 100.0, 100.0));
    }

    #[test]
    fn test_select_toggles() {
        let mut store = SceneStore::new();
        let a = pocket(&mut store);
        let b = pocket(&mut store);

        store.select_element(a);
        assert_eq!(store.scene().selected_id(), Some(a));
        store.select_element(a);
        assert!(store.scene().selected_id().is_none());

        store.select_element(a);
        store.select_element(b);
        assert_eq!(store.scene().selected_id(), Some(b));
    }

    #[test]
    fn test_select_dangling_id() {
        let mut store = SceneStore::new();
        pocket(&mut store);
        let ghost = ElementId::new();
        store.select_element(ghost);
        assert_eq!(store.scene().selected_id(), Some(ghost));
        assert!(store.selected_element().is_none());
    }

    #[test]
    fn test_remove_selected() {
        let mut store = SceneStore::new();
        let keep = pocket(&mut store);
        let gone = pocket(&mut store);

        let removed = store.remove_selected().expect("removed");
        assert_eq!(removed.id, gone);
        assert!(store.selected_element().is_none());
        assert!(store.scene().get_element(keep).is_some());
        assert!(store.remove_selected().is_none());
    }

    #[test]
    fn test_set_element_property() {
        let mut store = SceneStore::new();
        let id = pocket(&mut store);
        assert!(store.set_element_property(id, ElementProperty::Rotation(90.0)));

        let element = store.scene().get_element(id).expect("exists");
        assert!((element.rotation - 90.0).abs() < f32::EPSILON);
        assert!((element.width - 80.0).abs() < f32::EPSILON);

        assert!(!store.set_element_property(ElementId::new(), ElementProperty::Rotation(1.0)));
    }

    #[test]
    fn test_garment_image_property_resets_design() {
        let mut store = SceneStore::new();
        pocket(&mut store);
        store.set_garment_property(GarmentProperty::Image(ImageRef::local("/images/shirt.png")));
        assert!(store.scene().is_empty());
    }

    #[test]
    fn test_on_change_fires_once_per_operation() {
        let mut store = SceneStore::new();
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        store.set_on_change(move |_| seen.set(seen.get() + 1));

        let id = pocket(&mut store);
        store.move_element(id, 1.0, 1.0);
        store.resize_element(id, 40.0, 40.0);
        store.deselect();
        assert_eq!(count.get(), 4);

        // Nothing selected, nothing to remove.
        store.remove_selected();
        assert_eq!(count.get(), 4);
    }
}
