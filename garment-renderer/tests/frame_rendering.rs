//! Frame Rendering Integration Tests
//!
//! Tests rendering a whole edited scene through the studio renderer:
//! - Hosted garment and elements become delivery URLs
//! - Local elements keep CSS rotation
//! - Dragged and selected elements are marked in the frame

use garment_core::{
    Displayable, ElementProperty, HexColor, ImageRef, InteractionController, PointerEvent,
    SceneStore,
};
use garment_renderer::{RendererConfig, StudioRenderer};

fn renderer() -> StudioRenderer {
    StudioRenderer::new(RendererConfig::with_cloud("demo")).expect("valid renderer config")
}

fn src(displayable: &Displayable) -> &str {
    match displayable {
        Displayable::Image { src, .. } => src,
        Displayable::Placeholder { label, .. } => label,
    }
}

// ============================================================================
// Garment Background
// ============================================================================

#[test]
fn test_hosted_garment_fills_canvas_with_tint() {
    let mut store = SceneStore::new();
    store.set_garment(
        ImageRef::remote("garments/tee"),
        Some(HexColor::parse("#1e90ff").expect("color")),
    );

    let frame = renderer().render_frame(store.scene(), &InteractionController::default());
    assert_eq!(
        src(&frame.garment),
        "https://res.cloudinary.com/demo/image/upload/c_fill,h_700,w_500/f_auto/q_auto/co_rgb:1e90ff,e_colorize:100/garments/tee"
    );
}

#[test]
fn test_missing_garment_is_placeholder() {
    let store = SceneStore::new();
    let frame = renderer().render_frame(store.scene(), &InteractionController::default());
    assert!(frame.garment.is_placeholder());
    assert_eq!(src(&frame.garment), "No Image");
}

// ============================================================================
// Elements
// ============================================================================

#[test]
fn test_elements_render_per_source() {
    let mut store = SceneStore::new();
    let hosted = store.add_element("pocket", ImageRef::remote("pockets/cargo"));
    store.set_element_property(hosted, ElementProperty::Rotation(45.0));
    let local = store.add_element("pocket", ImageRef::local("/images/pocket.png"));
    store.set_element_property(local, ElementProperty::Rotation(30.0));
    store.deselect();

    let frame = renderer().render_frame(store.scene(), &InteractionController::default());
    assert_eq!(frame.layers.len(), 2);

    assert_eq!(
        src(&frame.layers[0].content),
        "https://res.cloudinary.com/demo/image/upload/c_fill,h_80,w_80/f_auto/q_auto/co_rgb:cccccc,e_colorize:100/a_45/pockets/cargo"
    );
    assert!(matches!(
        &frame.layers[1].content,
        Displayable::Image { src, transform: Some(t), .. }
            if src == "/images/pocket.png" && t == "rotate(30deg)"
    ));
}

#[test]
fn test_frame_marks_drag_and_serializes() {
    let mut store = SceneStore::new();
    let id = store.add_element("pocket", ImageRef::local("/images/pocket.png"));
    let mut controller = InteractionController::default();
    controller.handle(&mut store, &PointerEvent::down(60.0, 60.0));
    controller.handle(&mut store, &PointerEvent::moved(100.0, 60.0));

    let frame = renderer().render_frame(store.scene(), &controller);
    let layer = &frame.layers[0];
    assert_eq!(layer.id, id);
    assert!((layer.opacity - 0.8).abs() < f32::EPSILON);
    assert!(layer.selected);

    let json = serde_json::to_value(&frame).expect("frame serializes");
    assert_eq!(json["layers"][0]["content"]["kind"], "image");
    assert_eq!(json["garment"]["kind"], "placeholder");
    assert_eq!(json["layers"][0]["z"], 100);
}
