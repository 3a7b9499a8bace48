//! Pointer input for canvas interaction.

use serde::{Deserialize, Serialize};

use crate::ElementId;

/// Phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    /// Button pressed.
    Down,
    /// Pointer moved.
    Move,
    /// Button released.
    Up,
}

/// What a pointer press landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "target", content = "id", rename_all = "snake_case")]
pub enum PointerTarget {
    /// Empty canvas area (or the garment image).
    Canvas,
    /// The body of an element.
    Element(ElementId),
    /// The resize handle of an element.
    ResizeHandle(ElementId),
}

/// A pointer event in canvas-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Phase of this event.
    pub phase: PointerPhase,
    /// X position in canvas coordinates.
    pub x: f32,
    /// Y position in canvas coordinates.
    pub y: f32,
    /// Target resolved by the host, if it knows it. Presses without a target
    /// are hit-tested against the scene.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<PointerTarget>,
}

impl PointerEvent {
    /// Create a new pointer event.
    #[must_use]
    pub fn new(phase: PointerPhase, x: f32, y: f32) -> Self {
        Self {
            phase,
            x,
            y,
            target: None,
        }
    }

    /// Press at a point.
    #[must_use]
    pub fn down(x: f32, y: f32) -> Self {
        Self::new(PointerPhase::Down, x, y)
    }

    /// Move to a point.
    #[must_use]
    pub fn moved(x: f32, y: f32) -> Self {
        Self::new(PointerPhase::Move, x, y)
    }

    /// Release at a point.
    #[must_use]
    pub fn up(x: f32, y: f32) -> Self {
        Self::new(PointerPhase::Up, x, y)
    }

    /// Attach an explicit target.
    #[must_use]
    pub fn on(mut self, target: PointerTarget) -> Self {
        self.target = Some(target);
        self
    }

    /// Distance from another point.
    #[must_use]
    pub fn distance_from(&self, (x, y): (f32, f32)) -> f32 {
        (self.x - x).hypot(self.y - y)
    }
}
