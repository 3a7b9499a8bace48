//! Render adapter boundary and frame composition.
//!
//! The core never produces pixels. It describes each element and the
//! garment as a [`RenderRequest`] and hands it to an injected
//! [`RenderAdapter`], then stacks the results into a [`Frame`].

use serde::Serialize;

use crate::interaction::{HandleRect, InteractionController};
use crate::scene::CanvasSize;
use crate::{DesignElement, ElementId, GarmentProperties, HexColor, ImageRef, Scene};

/// Label shown by placeholders.
pub const PLACEHOLDER_LABEL: &str = "No Image";

/// Opacity of an element while it is dragged.
pub const DRAGGING_OPACITY: f32 = 0.8;

/// Size of the box an image is rendered into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoxSize {
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

/// Everything an adapter needs to draw one image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderRequest<'a> {
    /// Image to draw.
    pub image: &'a ImageRef,
    /// Target box.
    pub size: BoxSize,
    /// Optional tint.
    pub tint: Option<&'a HexColor>,
    /// Rotation in degrees. Zero means none.
    pub rotation: f32,
}

impl<'a> RenderRequest<'a> {
    /// Request for a placed element.
    #[must_use]
    pub fn for_element(element: &'a DesignElement) -> Self {
        Self {
            image: &element.image,
            size: BoxSize {
                width: element.width,
                height: element.height,
            },
            tint: element.color.as_ref(),
            rotation: element.rotation,
        }
    }

    /// Request for the garment filling the canvas.
    #[must_use]
    pub fn for_garment(garment: &'a GarmentProperties, canvas: CanvasSize) -> Self {
        Self {
            image: &garment.image,
            size: BoxSize {
                width: canvas.width,
                height: canvas.height,
            },
            tint: garment.color.as_ref(),
            rotation: 0.0,
        }
    }
}

/// Something the host can display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Displayable {
    /// An image to load from `src`.
    Image {
        /// URL or path.
        src: String,
        /// Display width.
        width: f32,
        /// Display height.
        height: f32,
        /// CSS transform the host must apply itself, if the source could
        /// not bake it in.
        #[serde(skip_serializing_if = "Option::is_none")]
        transform: Option<String>,
        /// CSS filter the host must apply itself, if any.
        #[serde(skip_serializing_if = "Option::is_none")]
        filter: Option<String>,
    },
    /// Stand-in for an image with no reference.
    Placeholder {
        /// Display width.
        width: f32,
        /// Display height.
        height: f32,
        /// Text shown inside.
        label: String,
    },
}

impl Displayable {
    /// The placeholder for a box.
    #[must_use]
    pub fn placeholder(size: BoxSize) -> Self {
        Self::Placeholder {
            width: size.width,
            height: size.height,
            label: PLACEHOLDER_LABEL.to_string(),
        }
    }

    /// Whether this is a placeholder.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder { .. })
    }
}

/// Produces displayables from render requests.
///
/// Implementations must return [`Displayable::placeholder`] rather than fail
/// when the request's image has no reference.
pub trait RenderAdapter {
    /// Render one image.
    fn render(&self, request: &RenderRequest<'_>) -> Displayable;
}

/// One element of a composed frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layer {
    /// Element id.
    pub id: ElementId,
    /// Left edge in canvas pixels.
    pub x: f32,
    /// Top edge in canvas pixels.
    pub y: f32,
    /// Stacking value.
    pub z: i32,
    /// 1.0 at rest, lower while dragged.
    pub opacity: f32,
    /// Whether the element has the selection outline.
    pub selected: bool,
    /// Resize handle, present on the selected element.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<HandleRect>,
    /// Rendered content.
    pub content: Displayable,
}

/// The whole canvas ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    /// Canvas container size.
    pub canvas: CanvasSize,
    /// Garment background.
    pub garment: Displayable,
    /// Elements from bottom to top.
    pub layers: Vec<Layer>,
}

impl Frame {
    /// Render the current scene through `adapter`.
    #[must_use]
    pub fn compose(
        scene: &Scene,
        controller: &InteractionController,
        adapter: &dyn RenderAdapter,
    ) -> Self {
        let dragging = controller.dragging();
        let handle = controller.visible_handle(scene);
        let layers = scene
            .draw_order(dragging)
            .into_iter()
            .map(|element| Layer {
                id: element.id,
                x: element.x,
                y: element.y,
                z: scene.effective_z(element, dragging),
                opacity: if dragging == Some(element.id) {
                    DRAGGING_OPACITY
                } else {
                    1.0
                },
                selected: scene.is_selected(element.id),
                handle: handle
                    .filter(|(id, _)| *id == element.id)
                    .map(|(_, rect)| rect),
                content: adapter.render(&RenderRequest::for_element(element)),
            })
            .collect();

        Self {
            canvas: scene.canvas(),
            garment: adapter.render(&RenderRequest::for_garment(
                scene.garment(),
                scene.canvas(),
            )),
            layers,
        }
    }
}
