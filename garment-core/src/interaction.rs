//! Pointer gestures: click-to-select, drag-to-move, and handle resizing.
//!
//! One gesture runs at a time. A press opens a [`GestureSession`] which
//! owns the host's global pointer listeners through a [`ListenerGuard`];
//! dropping the session at release tears the listeners down.
//!
//! ```text
//! Idle ──press body──▶ Pressed ──travel > activation──▶ Dragging ──release──▶ Idle
//!   │                     └──────────release (click)────────────────────────▶ Idle
//!   └──press handle──▶ Resizing ──release──────────────────────────────────▶ Idle
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{DesignElement, ElementId, PointerEvent, PointerPhase, PointerTarget, Scene, SceneStore};

/// Tunables for gesture recognition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InteractionConfig {
    /// Pointer travel in pixels before a press on an element becomes a drag.
    pub activation_distance: f32,
    /// Edge length of the square resize handle.
    pub handle_size: f32,
    /// How far the handle sticks out past the element's bottom-right corner.
    pub handle_offset: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            activation_distance: 8.0,
            handle_size: 12.0,
            handle_offset: 5.0,
        }
    }
}

impl InteractionConfig {
    /// Where the resize handle of `element` sits.
    #[must_use]
    pub fn handle_rect(&self, element: &DesignElement) -> HandleRect {
        HandleRect {
            x: element.x + element.width + self.handle_offset - self.handle_size,
            y: element.y + element.height + self.handle_offset - self.handle_size,
            width: self.handle_size,
            height: self.handle_size,
        }
    }
}

/// Axis-aligned rectangle of a resize handle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandleRect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl HandleRect {
    /// Check if a point is within the handle.
    #[must_use]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

/// Which kind of gesture a set of listeners was registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureKind {
    /// Press on an element body or the canvas, possibly becoming a drag.
    Press,
    /// Press on a resize handle.
    Resize,
}

/// Deregisters a gesture's pointer listeners when dropped.
pub struct ListenerGuard {
    teardown: Option<Box<dyn FnOnce()>>,
}

impl ListenerGuard {
    /// Guard that runs `teardown` exactly once, on drop.
    pub fn new<F>(teardown: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        Self {
            teardown: Some(Box::new(teardown)),
        }
    }

    /// Guard with nothing to tear down.
    #[must_use]
    pub fn noop() -> Self {
        Self { teardown: None }
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }
}

impl fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerGuard")
            .field("armed", &self.teardown.is_some())
            .finish()
    }
}

/// Host hook that routes global pointer move/release events to the
/// controller while a gesture is in progress.
pub trait PointerCapture {
    /// Register listeners for a gesture. They stay registered until the
    /// returned guard is dropped.
    fn capture(&mut self, kind: GestureKind) -> ListenerGuard;
}

/// Capture for hosts that already deliver every pointer event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCapture;

impl PointerCapture for NoCapture {
    fn capture(&mut self, _kind: GestureKind) -> ListenerGuard {
        ListenerGuard::noop()
    }
}

/// Progress of the current gesture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GestureState {
    /// No gesture in progress.
    Idle,
    /// Pressed but not yet travelled past the activation distance.
    Pressed {
        /// What was pressed.
        target: PointerTarget,
        /// Press position.
        origin: (f32, f32),
    },
    /// Moving an element.
    Dragging {
        /// Dragged element.
        element: ElementId,
        /// Press position.
        origin: (f32, f32),
        /// Total delta applied to the element so far.
        applied: (f32, f32),
    },
    /// Resizing an element from its handle.
    Resizing {
        /// Resized element.
        element: ElementId,
        /// Press position.
        origin: (f32, f32),
        /// Width when the gesture began.
        origin_width: f32,
        /// Height when the gesture began.
        origin_height: f32,
    },
}

/// A gesture in progress together with the listeners it holds.
#[derive(Debug)]
pub struct GestureSession {
    state: GestureState,
    _listeners: ListenerGuard,
}

impl GestureSession {
    /// Current state of the gesture.
    #[must_use]
    pub fn state(&self) -> GestureState {
        self.state
    }
}

/// What a pointer event did to the scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Interaction {
    /// Nothing changed.
    None,
    /// A gesture started.
    Pressed {
        /// What was pressed.
        target: PointerTarget,
    },
    /// Click on an element toggled its selection.
    Selected {
        /// Clicked element.
        element: ElementId,
    },
    /// Click on the empty canvas cleared the selection.
    Deselected,
    /// Element moved by the given delta.
    Moved {
        /// Moved element.
        element: ElementId,
        /// Applied X delta.
        dx: f32,
        /// Applied Y delta.
        dy: f32,
    },
    /// Element resized.
    Resized {
        /// Resized element.
        element: ElementId,
        /// Requested width before clamping.
        width: f32,
        /// Requested height before clamping.
        height: f32,
    },
    /// Drag finished.
    DragEnded {
        /// Dragged element.
        element: ElementId,
    },
    /// Resize finished.
    ResizeEnded {
        /// Resized element.
        element: ElementId,
    },
}

/// Turns pointer events into [`SceneStore`] mutations.
pub struct InteractionController {
    config: InteractionConfig,
    capture: Box<dyn PointerCapture>,
    session: Option<GestureSession>,
}

impl fmt::Debug for InteractionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractionController")
            .field("config", &self.config)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(InteractionConfig::default())
    }
}

impl InteractionController {
    /// Create a controller for a host that delivers all pointer events.
    #[must_use]
    pub fn new(config: InteractionConfig) -> Self {
        Self::with_capture(config, NoCapture)
    }

    /// Create a controller that registers gesture listeners through `capture`.
    #[must_use]
    pub fn with_capture(config: InteractionConfig, capture: impl PointerCapture + 'static) -> Self {
        Self {
            config,
            capture: Box::new(capture),
            session: None,
        }
    }

    /// Gesture tunables.
    #[must_use]
    pub const fn config(&self) -> &InteractionConfig {
        &self.config
    }

    /// Current gesture state.
    #[must_use]
    pub fn state(&self) -> GestureState {
        self.session
            .as_ref()
            .map_or(GestureState::Idle, GestureSession::state)
    }

    /// Element currently being dragged, if any.
    #[must_use]
    pub fn dragging(&self) -> Option<ElementId> {
        match self.state() {
            GestureState::Dragging { element, .. } => Some(element),
            _ => None,
        }
    }

    /// Resize handle of the selected element, if one is shown.
    #[must_use]
    pub fn visible_handle(&self, scene: &Scene) -> Option<(ElementId, HandleRect)> {
        scene
            .selected_element()
            .map(|e| (e.id, self.config.handle_rect(e)))
    }

    /// Hit-test a canvas point. The selected element's handle wins over
    /// element bodies.
    #[must_use]
    pub fn target_at(&self, scene: &Scene, x: f32, y: f32) -> PointerTarget {
        if let Some((id, rect)) = self.visible_handle(scene) {
            if rect.contains(x, y) {
                return PointerTarget::ResizeHandle(id);
            }
        }
        scene
            .element_at(x, y)
            .map_or(PointerTarget::Canvas, PointerTarget::Element)
    }

    /// Feed one pointer event through the gesture state machine.
    pub fn handle(&mut self, store: &mut SceneStore, event: &PointerEvent) -> Interaction {
        match event.phase {
            PointerPhase::Down => self.press(store, event),
            PointerPhase::Move => self.motion(store, event),
            PointerPhase::Up => self.release(store, event),
        }
    }

    fn press(&mut self, store: &SceneStore, event: &PointerEvent) -> Interaction {
        if self.session.is_some() {
            tracing::debug!("Press ignored, gesture already in progress");
            return Interaction::None;
        }
        let scene = store.scene();
        let target = match event
            .target
            .unwrap_or_else(|| self.target_at(scene, event.x, event.y))
        {
            // A handle only exists while its element is selected.
            PointerTarget::ResizeHandle(id) if !scene.is_selected(id) => PointerTarget::Element(id),
            target => target,
        };
        let origin = (event.x, event.y);

        let (state, kind) = match target {
            PointerTarget::ResizeHandle(id) => {
                let Some(element) = scene.get_element(id) else {
                    return Interaction::None;
                };
                (
                    GestureState::Resizing {
                        element: id,
                        origin,
                        origin_width: element.width,
                        origin_height: element.height,
                    },
                    GestureKind::Resize,
                )
            }
            target => (GestureState::Pressed { target, origin }, GestureKind::Press),
        };

        tracing::debug!("Gesture started: {state:?}");
        self.session = Some(GestureSession {
            state,
            _listeners: self.capture.capture(kind),
        });
        Interaction::Pressed { target }
    }

    fn motion(&mut self, store: &mut SceneStore, event: &PointerEvent) -> Interaction {
        let activation = self.config.activation_distance;
        let Some(session) = self.session.as_mut() else {
            return Interaction::None;
        };
        if !activate_drag(&mut session.state, event, activation) {
            return Interaction::None;
        }

        match &mut session.state {
            GestureState::Dragging {
                element,
                origin,
                applied,
            } => drag_to(store, *element, *origin, applied, event),
            GestureState::Resizing {
                element,
                origin,
                origin_width,
                origin_height,
            } => resize_to(store, *element, *origin, (*origin_width, *origin_height), event),
            GestureState::Pressed { .. } | GestureState::Idle => Interaction::None,
        }
    }

    fn release(&mut self, store: &mut SceneStore, event: &PointerEvent) -> Interaction {
        let Some(mut session) = self.session.take() else {
            return Interaction::None;
        };
        // Hosts may coalesce moves, so travel is judged at release too.
        activate_drag(&mut session.state, event, self.config.activation_distance);
        tracing::debug!("Gesture ended: {:?}", session.state);

        match &mut session.state {
            GestureState::Pressed {
                target: PointerTarget::Element(id) | PointerTarget::ResizeHandle(id),
                ..
            } => {
                store.select_element(*id);
                Interaction::Selected { element: *id }
            }
            GestureState::Pressed {
                target: PointerTarget::Canvas,
                ..
            } => {
                store.deselect();
                Interaction::Deselected
            }
            GestureState::Dragging {
                element,
                origin,
                applied,
            } => {
                // The final move also pins the selection to the dragged element.
                drag_to(store, *element, *origin, applied, event);
                Interaction::DragEnded { element: *element }
            }
            GestureState::Resizing {
                element,
                origin,
                origin_width,
                origin_height,
            } => {
                resize_to(store, *element, *origin, (*origin_width, *origin_height), event);
                Interaction::ResizeEnded { element: *element }
            }
            GestureState::Idle => Interaction::None,
        }
    }
}

/// Promote a press on an element body to a drag once the pointer has
/// travelled past `activation`. Returns `false` while the press is still
/// a potential click.
fn activate_drag(state: &mut GestureState, event: &PointerEvent, activation: f32) -> bool {
    match *state {
        GestureState::Pressed {
            target: PointerTarget::Element(element),
            origin,
        } => {
            if event.distance_from(origin) <= activation {
                return false;
            }
            tracing::debug!("Drag activated on {element}");
            *state = GestureState::Dragging {
                element,
                origin,
                applied: (0.0, 0.0),
            };
            true
        }
        _ => true,
    }
}

/// Resize `element` so its bottom-right corner follows the pointer.
fn resize_to(
    store: &mut SceneStore,
    element: ElementId,
    origin: (f32, f32),
    (origin_width, origin_height): (f32, f32),
    event: &PointerEvent,
) -> Interaction {
    let width = origin_width + (event.x - origin.0);
    let height = origin_height + (event.y - origin.1);
    tracing::trace!("Resize {element} to {width}x{height}");
    if store.resize_element(element, width, height) {
        Interaction::Resized {
            element,
            width,
            height,
        }
    } else {
        Interaction::None
    }
}

/// Move `element` so its displacement from the drag start follows the
/// pointer, as far as the canvas allows.
fn drag_to(
    store: &mut SceneStore,
    element: ElementId,
    origin: (f32, f32),
    applied: &mut (f32, f32),
    event: &PointerEvent,
) -> Interaction {
    let dx = event.x - origin.0 - applied.0;
    let dy = event.y - origin.1 - applied.1;
    match store.move_element(element, dx, dy) {
        Some((ax, ay)) => {
            applied.0 += ax;
            applied.1 += ay;
            tracing::trace!("Drag {element} by ({ax}, {ay}), total {applied:?}");
            Interaction::Moved {
                element,
                dx: ax,
                dy: ay,
            }
        }
        None => Interaction::None,
    }
}
