//! Editing Workflow Integration Tests
//!
//! Tests the complete editing flow across the public API:
//! - Garment selection and design reset
//! - Placing, dragging and resizing elements with the pointer
//! - Editing through the properties panel
//! - Change notifications and frame composition

use std::cell::RefCell;
use std::rc::Rc;

use garment_core::{
    Catalog, ControlValue, Displayable, ElementField, Frame, GarmentField, HexColor, ImageRef,
    ImageSource, Interaction, InteractionController, PointerEvent, PropertyEditor, RenderAdapter,
    RenderRequest, SceneStore,
};

/// Adapter that reports which source it was asked to draw.
struct SourceAdapter;

impl RenderAdapter for SourceAdapter {
    fn render(&self, request: &RenderRequest<'_>) -> Displayable {
        match request.image.source() {
            Some(ImageSource::Remote(id) | ImageSource::Local(id)) => Displayable::Image {
                src: id.to_string(),
                width: request.size.width,
                height: request.size.height,
                transform: None,
                filter: None,
            },
            None => Displayable::placeholder(request.size),
        }
    }
}

/// Press, travel and release in one go.
fn drag(
    controller: &mut InteractionController,
    store: &mut SceneStore,
    from: (f32, f32),
    to: (f32, f32),
) -> Interaction {
    controller.handle(store, &PointerEvent::down(from.0, from.1));
    controller.handle(store, &PointerEvent::moved(to.0, to.1));
    controller.handle(store, &PointerEvent::up(to.0, to.1))
}

fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < f32::EPSILON,
        "expected {expected}, got {actual}"
    );
}

// ============================================================================
// Store Scenario
// ============================================================================

#[test]
fn test_place_resize_and_push_against_canvas_edge() {
    let mut store = SceneStore::new();

    store.set_garment(ImageRef::new(Some(String::new()), Some("/local/shirt.png".into())), None);
    assert_eq!(
        store.scene().garment().image.source(),
        Some(ImageSource::Local("/local/shirt.png"))
    );
    assert!(store.scene().is_empty());

    let id = store.add_element("pocket", ImageRef::local("/local/pocket.png"));
    let element = store.selected_element().expect("new element is selected");
    assert_eq!(element.id, id);
    assert_close(element.x, 50.0);
    assert_close(element.y, 50.0);
    assert_close(element.width, 80.0);
    assert_close(element.height, 80.0);

    store.resize_element(id, 5.0, 5.0);
    let element = store.scene().get_element(id).expect("exists");
    assert_close(element.width, 20.0);
    assert_close(element.height, 20.0);

    store.move_element(id, 1000.0, 1000.0);
    let element = store.scene().get_element(id).expect("exists");
    assert_close(element.x, 480.0);
    assert_close(element.y, 680.0);
}

#[test]
fn test_removing_selected_clears_lookup() {
    let mut store = SceneStore::new();
    store.add_element("pocket", ImageRef::remote("pockets/cargo"));
    assert!(store.remove_selected().is_some());
    assert!(store.selected_element().is_none());
    assert!(store.remove_selected().is_none());
}

// ============================================================================
// Pointer Workflow
// ============================================================================

#[test]
fn test_drag_then_resize_then_click_away() {
    let mut store = SceneStore::new();
    let mut controller = InteractionController::default();
    let id = store.add_element("pocket", ImageRef::local("/p.png"));
    store.deselect();

    let ended = drag(&mut controller, &mut store, (70.0, 70.0), (170.0, 120.0));
    assert_eq!(ended, Interaction::DragEnded { element: id });
    assert_eq!(store.scene().selected_id(), Some(id));
    let element = store.scene().get_element(id).expect("exists");
    assert_close(element.x, 150.0);
    assert_close(element.y, 100.0);

    // Handle sits at the bottom-right corner: 150 + 80 + 5 - 12 = 223.
    let ended = drag(&mut controller, &mut store, (230.0, 180.0), (250.0, 200.0));
    assert_eq!(ended, Interaction::ResizeEnded { element: id });
    let element = store.scene().get_element(id).expect("exists");
    assert_close(element.width, 100.0);
    assert_close(element.height, 100.0);
    assert_close(element.x, 150.0);

    controller.handle(&mut store, &PointerEvent::down(10.0, 690.0));
    let released = controller.handle(&mut store, &PointerEvent::up(10.0, 690.0));
    assert_eq!(released, Interaction::Deselected);
    assert!(store.selected_element().is_none());
}

#[test]
fn test_topmost_element_receives_press() {
    let mut store = SceneStore::new();
    let mut controller = InteractionController::default();
    let below = store.add_element("pocket", ImageRef::local("/a.png"));
    let above = store.add_element("pocket", ImageRef::local("/b.png"));
    store.deselect();

    controller.handle(&mut store, &PointerEvent::down(60.0, 60.0));
    controller.handle(&mut store, &PointerEvent::up(60.0, 60.0));
    assert_eq!(store.scene().selected_id(), Some(above));

    // The selected element is raised, so it keeps winning the hit test.
    controller.handle(&mut store, &PointerEvent::down(60.0, 60.0));
    controller.handle(&mut store, &PointerEvent::up(60.0, 60.0));
    assert!(store.scene().selected_id().is_none());
    assert_ne!(below, above);
}

// ============================================================================
// Properties Panel
// ============================================================================

#[test]
fn test_properties_panel_edits_selected_element_and_garment() {
    let mut store = SceneStore::new();
    let id = store.add_element("pocket", ImageRef::local("/p.png"));

    let mut editor = PropertyEditor::new(&mut store);
    let controls = editor.element_controls();
    assert_eq!(controls.len(), 2);
    assert_eq!(controls[0].field, ElementField::Color);
    assert_eq!(controls[1].value, ControlValue::Number(0.0));

    let rotation = ElementField::Rotation
        .kind()
        .parse_input("400")
        .expect("slider accepts numbers");
    assert!(editor.edit_element(ElementField::Rotation, rotation));
    assert!(editor.edit_element(
        ElementField::Color,
        ControlValue::Color(HexColor::parse("#00ff00").expect("color")),
    ));
    assert!(editor.edit_garment(
        GarmentField::Color,
        ControlValue::Color(HexColor::parse("#222222").expect("color")),
    ));

    let element = store.scene().get_element(id).expect("exists");
    assert_close(element.rotation, 360.0);
    assert_eq!(element.color.as_ref().map(HexColor::as_str), Some("#00ff00"));
    assert_eq!(
        store.scene().garment().color.as_ref().map(HexColor::as_str),
        Some("#222222")
    );
}

#[test]
fn test_properties_panel_without_selection() {
    let mut store = SceneStore::new();
    let mut editor = PropertyEditor::new(&mut store);
    assert!(editor.element_controls().is_empty());
    assert!(!editor.can_remove());
    assert!(!editor.edit_element(ElementField::Rotation, ControlValue::Number(90.0)));
    assert_eq!(editor.garment_controls().len(), 1);
}

// ============================================================================
// Notifications and Composition
// ============================================================================

#[test]
fn test_each_operation_notifies_once() {
    let mut store = SceneStore::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    store.set_on_change(move |scene| sink.borrow_mut().push(scene.element_count()));

    let id = store.add_element("pocket", ImageRef::default());
    store.move_element(id, 5.0, 5.0);
    store.resize_element(id, 100.0, 100.0);
    store.remove_selected();
    store.remove_selected();

    assert_eq!(*seen.borrow(), vec![1, 1, 1, 0]);
}

#[test]
fn test_catalog_to_frame() {
    let catalog = Catalog::from_json(
        r#"{
            "garments": [{ "display_name": "Tee", "local_path": "/images/tee.jpg" }],
            "elements": [{ "display_name": "Pocket", "category": "pocket", "remote_id": "pockets/one" }]
        }"#,
    )
    .expect("catalog parses");

    let mut store = SceneStore::new();
    catalog.garments[0].choose(&mut store);
    let id = catalog.elements[0].add_to(&mut store);
    store.add_element("pocket", ImageRef::default());

    let frame = Frame::compose(store.scene(), &InteractionController::default(), &SourceAdapter);
    assert!(matches!(&frame.garment, Displayable::Image { src, .. } if src == "/images/tee.jpg"));
    assert_eq!(frame.layers.len(), 2);
    assert_eq!(frame.layers[0].id, id);
    assert!(frame.layers[1].content.is_placeholder());
    assert!(frame.layers[1].selected);
}
