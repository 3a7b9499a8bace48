//! Property tests for scene store invariants.

use garment_core::element::MIN_ELEMENT_SIZE;
use garment_core::{ElementId, ImageRef, SceneStore};
use proptest::prelude::*;

fn arb_delta() -> impl Strategy<Value = (f32, f32)> {
    (-600.0f32..600.0f32, -800.0f32..800.0f32)
}

fn arb_category() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("pocket".to_string()),
        Just("zipper".to_string()),
        "[a-z]{1,12}",
    ]
}

/// Store with `count` elements, the last one selected.
fn store_with(count: usize) -> (SceneStore, Vec<ElementId>) {
    let mut store = SceneStore::new();
    let ids = (0..count)
        .map(|i| store.add_element("pocket", ImageRef::local(format!("/p{i}.png"))))
        .collect();
    (store, ids)
}

proptest! {
    #[test]
    fn prop_final_position_is_origin_plus_applied_deltas(
        deltas in prop::collection::vec(arb_delta(), 1..40)
    ) {
        let (mut store, ids) = store_with(1);
        let id = ids[0];
        let (mut sum_x, mut sum_y) = (0.0f32, 0.0f32);

        for (dx, dy) in deltas {
            let (ax, ay) = store.move_element(id, dx, dy).expect("element exists");
            sum_x += ax;
            sum_y += ay;

            let element = store.scene().get_element(id).expect("element exists");
            prop_assert!(element.x >= 0.0 && element.x + element.width <= 500.0 + 1e-3);
            prop_assert!(element.y >= 0.0 && element.y + element.height <= 700.0 + 1e-3);
        }

        let element = store.scene().get_element(id).expect("element exists");
        prop_assert!((element.x - (50.0 + sum_x)).abs() < 1e-2);
        prop_assert!((element.y - (50.0 + sum_y)).abs() < 1e-2);
    }

    #[test]
    fn prop_resize_never_below_minimum(
        width in prop_oneof![any::<f32>(), -1000.0f32..1000.0f32],
        height in prop_oneof![any::<f32>(), -1000.0f32..1000.0f32],
    ) {
        let (mut store, ids) = store_with(1);
        store.resize_element(ids[0], width, height);

        let element = store.scene().get_element(ids[0]).expect("element exists");
        prop_assert!(element.width >= MIN_ELEMENT_SIZE);
        prop_assert!(element.height >= MIN_ELEMENT_SIZE);
    }

    #[test]
    fn prop_add_then_remove_restores_elements(
        existing in 0usize..6,
        category in arb_category(),
    ) {
        let (mut store, _) = store_with(existing);
        let before = store.scene().elements().to_vec();

        let id = store.add_element(&category, ImageRef::remote("pockets/new"));
        let removed = store.remove_selected().expect("added element is selected");

        prop_assert_eq!(removed.id, id);
        prop_assert_eq!(store.scene().elements(), before.as_slice());
        prop_assert!(store.selected_element().is_none());
    }

    #[test]
    fn prop_set_garment_resets_design(
        existing in 0usize..6,
        select_first in any::<bool>(),
        path in "/[a-z]{1,10}\\.png",
    ) {
        let (mut store, ids) = store_with(existing);
        if select_first {
            if let Some(&first) = ids.first() {
                store.select_element(first);
            }
        }

        store.set_garment(ImageRef::local(path), None);

        prop_assert!(store.scene().is_empty());
        prop_assert!(store.scene().selected_id().is_none());
    }

    #[test]
    fn prop_select_toggles(existing in 1usize..6, pick in any::<prop::sample::Index>()) {
        let (mut store, ids) = store_with(existing);
        store.deselect();
        let target = ids[pick.index(ids.len())];

        store.select_element(target);
        store.select_element(target);
        prop_assert!(store.scene().selected_id().is_none());

        let other = ElementId::new();
        store.select_element(target);
        store.select_element(other);
        prop_assert_eq!(store.scene().selected_id(), Some(other));
    }
}
