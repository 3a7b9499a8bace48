//! WebAssembly bindings for garment-core.
//!
//! This module provides JavaScript-callable functions when compiled to WASM.
//! The page owns rendering; it reads scene snapshots as JSON after each call.
//! While a gesture runs, [`DocumentCapture`] keeps the page's move and
//! release handlers registered on `document`.

use js_sys::Function;
use wasm_bindgen::prelude::*;
use web_sys::EventTarget;

use crate::{
    ElementField, ElementId, GarmentField, GestureKind, ImageRef, InteractionConfig,
    InteractionController, ListenerGuard, PointerCapture, PointerEvent, PropertyEditor,
    SceneStore,
};

/// DOM events routed to the gesture while it runs.
pub const CAPTURED_EVENTS: [&str; 2] = ["mousemove", "mouseup"];

/// Initialize the studio WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();
}

/// Registers the page's pointer handlers on `document` for the length of
/// one gesture. The guard returned by [`PointerCapture::capture`] removes
/// them again.
#[derive(Debug, Clone)]
pub struct DocumentCapture {
    on_move: Function,
    on_release: Function,
}

impl DocumentCapture {
    /// Capture that forwards `mousemove` to `on_move` and `mouseup` to
    /// `on_release`.
    #[must_use]
    pub fn new(on_move: Function, on_release: Function) -> Self {
        Self {
            on_move,
            on_release,
        }
    }

    fn listeners(&self) -> [(&'static str, Function); 2] {
        [
            (CAPTURED_EVENTS[0], self.on_move.clone()),
            (CAPTURED_EVENTS[1], self.on_release.clone()),
        ]
    }
}

impl PointerCapture for DocumentCapture {
    fn capture(&mut self, kind: GestureKind) -> ListenerGuard {
        let Some(target) = web_sys::window()
            .and_then(|w| w.document())
            .map(EventTarget::from)
        else {
            tracing::warn!("No document, {kind:?} gesture runs without global listeners");
            return ListenerGuard::noop();
        };

        let listeners = self.listeners();
        for (event, handler) in &listeners {
            if let Err(e) = target.add_event_listener_with_callback(event, handler) {
                tracing::warn!("Failed to listen for {event}: {e:?}");
            }
        }
        tracing::debug!("Document listeners added for {kind:?} gesture");

        ListenerGuard::new(move || {
            for (event, handler) in &listeners {
                if let Err(e) = target.remove_event_listener_with_callback(event, handler) {
                    tracing::warn!("Failed to remove {event} listener: {e:?}");
                }
            }
            tracing::debug!("Document listeners removed");
        })
    }
}

/// Studio instance for WASM.
#[wasm_bindgen]
pub struct WasmStudio {
    store: SceneStore,
    controller: InteractionController,
}

fn image_ref(remote_id: Option<String>, local_path: Option<String>) -> ImageRef {
    ImageRef::new(remote_id, local_path)
}

#[wasm_bindgen]
impl WasmStudio {
    /// Create a studio whose canvas container has the given size.
    ///
    /// When both handlers are given they are attached to `document` on
    /// every press and detached on release, so the page only forwards the
    /// press itself. The handlers receive the DOM event and are expected
    /// to call `pointerMove` / `pointerUp` with canvas-local coordinates.
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new(
        width: f32,
        height: f32,
        on_move: Option<Function>,
        on_release: Option<Function>,
    ) -> Self {
        let config = InteractionConfig::default();
        let controller = match (on_move, on_release) {
            (Some(on_move), Some(on_release)) => InteractionController::with_capture(
                config,
                DocumentCapture::new(on_move, on_release),
            ),
            _ => InteractionController::new(config),
        };
        Self {
            store: SceneStore::with_canvas(width, height),
            controller,
        }
    }

    /// Get the current scene as JSON.
    #[wasm_bindgen(js_name = getSceneJson)]
    #[must_use]
    pub fn get_scene_json(&self) -> String {
        self.store.scene().to_json().unwrap_or_default()
    }

    /// Get the selected element as JSON, or `undefined` when none.
    #[wasm_bindgen(js_name = getSelectedElementJson)]
    #[must_use]
    pub fn get_selected_element_json(&self) -> Option<String> {
        self.store
            .selected_element()
            .and_then(|e| serde_json::to_string(e).ok())
    }

    /// Switch garments, clearing the design.
    #[wasm_bindgen(js_name = setGarment)]
    pub fn set_garment(&mut self, remote_id: Option<String>, local_path: Option<String>) {
        self.store
            .set_garment(image_ref(remote_id, local_path), None);
    }

    /// Add an element and return its id.
    #[wasm_bindgen(js_name = addElement)]
    pub fn add_element(
        &mut self,
        category: &str,
        remote_id: Option<String>,
        local_path: Option<String>,
    ) -> String {
        self.store
            .add_element(category, image_ref(remote_id, local_path))
            .to_string()
    }

    /// Toggle selection of an element by id.
    ///
    /// # Errors
    ///
    /// Returns an error string if `id` is not a valid element id.
    #[wasm_bindgen(js_name = selectElement)]
    pub fn select_element(&mut self, id: &str) -> Result<(), String> {
        let id = ElementId::parse(id).map_err(|e| e.to_string())?;
        self.store.select_element(id);
        Ok(())
    }

    /// Remove the selected element. Returns whether one was removed.
    #[wasm_bindgen(js_name = removeSelected)]
    pub fn remove_selected(&mut self) -> bool {
        self.store.remove_selected().is_some()
    }

    /// Forward a pointer press. Returns the resulting interaction as JSON.
    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, x: f32, y: f32) -> String {
        self.pointer(PointerEvent::down(x, y))
    }

    /// Forward a pointer move. Returns the resulting interaction as JSON.
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f32, y: f32) -> String {
        self.pointer(PointerEvent::moved(x, y))
    }

    /// Forward a pointer release. Returns the resulting interaction as JSON.
    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self, x: f32, y: f32) -> String {
        self.pointer(PointerEvent::up(x, y))
    }

    /// Apply raw control input to a field of the selected element.
    ///
    /// # Errors
    ///
    /// Returns an error string if `field` is not an editable element field.
    #[wasm_bindgen(js_name = editElement)]
    pub fn edit_element(&mut self, field: &str, raw: &str) -> Result<bool, String> {
        let field: ElementField =
            serde_json::from_value(serde_json::Value::String(field.to_string()))
                .map_err(|e| e.to_string())?;
        let Some(value) = field.kind().parse_input(raw) else {
            return Ok(false);
        };
        Ok(PropertyEditor::new(&mut self.store).edit_element(field, value))
    }

    /// Apply raw control input to the garment color.
    #[wasm_bindgen(js_name = editGarmentColor)]
    pub fn edit_garment_color(&mut self, raw: &str) -> bool {
        let field = GarmentField::Color;
        field
            .kind()
            .parse_input(raw)
            .is_some_and(|value| PropertyEditor::new(&mut self.store).edit_garment(field, value))
    }
}

impl WasmStudio {
    fn pointer(&mut self, event: PointerEvent) -> String {
        let interaction = self.controller.handle(&mut self.store, &event);
        serde_json::to_string(&interaction).unwrap_or_default()
    }
}

impl Default for WasmStudio {
    fn default() -> Self {
        Self::new(
            crate::scene::DEFAULT_CANVAS_WIDTH,
            crate::scene::DEFAULT_CANVAS_HEIGHT,
            None,
            None,
        )
    }
}
