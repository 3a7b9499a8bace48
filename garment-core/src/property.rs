//! Typed property updates and the editor bridge that drives them.
//!
//! An editing surface never names fields by string. It asks the
//! [`PropertyEditor`] for the controls of the selected element or the
//! garment, and hands back a [`ControlValue`] for one of those controls.
//! The field's dispatch entry turns that into an [`ElementProperty`] or
//! [`GarmentProperty`] command, whose payload type is fixed per variant.

use serde::{Deserialize, Serialize};

use crate::{DesignElement, HexColor, ImageRef, SceneStore};

/// A single-field update to a design element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "property", content = "value", rename_all = "snake_case")]
pub enum ElementProperty {
    /// Replace the tint.
    Color(Option<HexColor>),
    /// Replace the rotation in degrees.
    Rotation(f32),
    /// Replace the category tag.
    Category(String),
    /// Replace the image reference.
    Image(ImageRef),
    /// Replace the reserved texture reference.
    Texture(Option<String>),
    /// Replace the reserved stacking value.
    ZIndex(Option<i32>),
    /// Move to an absolute position.
    Position {
        /// New X position.
        x: f32,
        /// New Y position.
        y: f32,
    },
    /// Set both dimensions, subject to the minimum size.
    Size {
        /// New width.
        width: f32,
        /// New height.
        height: f32,
    },
}

impl ElementProperty {
    /// Write this value into `element`, leaving every other field untouched.
    /// Non-finite numbers are dropped.
    pub fn apply(self, element: &mut DesignElement) {
        match self {
            Self::Color(color) => element.color = color,
            Self::Rotation(degrees) if degrees.is_finite() => element.rotation = degrees,
            Self::Category(category) => element.category = category,
            Self::Image(image) => element.image = image,
            Self::Texture(texture) => element.texture = texture,
            Self::ZIndex(z_index) => element.z_index = z_index,
            Self::Position { x, y } if x.is_finite() && y.is_finite() => {
                element.x = x;
                element.y = y;
            }
            Self::Size { width, height } => element.set_size(width, height),
            ignored => tracing::warn!("Ignoring non-finite element property {ignored:?}"),
        }
    }
}

/// A single-field update to the garment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "property", content = "value", rename_all = "snake_case")]
pub enum GarmentProperty {
    /// Replace the tint.
    Color(Option<HexColor>),
    /// Replace the image, which starts a fresh design.
    Image(ImageRef),
}

/// How a control constrains its input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlKind {
    /// Color picker emitting `#rrggbb`.
    ColorPicker,
    /// Slider limited to `min..=max` in increments of `step`.
    Range {
        /// Lowest value.
        min: f32,
        /// Highest value.
        max: f32,
        /// Increment.
        step: f32,
    },
}

impl ControlKind {
    /// Interpret raw control input the way the control itself would.
    ///
    /// Returns `None` for input the control could never produce.
    #[must_use]
    pub fn parse_input(&self, raw: &str) -> Option<ControlValue> {
        match *self {
            Self::ColorPicker => HexColor::parse(raw).ok().map(ControlValue::Color),
            Self::Range { .. } => raw
                .trim()
                .parse::<f32>()
                .ok()
                .and_then(|n| self.constrain(n))
                .map(ControlValue::Number),
        }
    }

    /// Snap a number into this control's range. Only meaningful for sliders.
    #[must_use]
    pub fn constrain(&self, value: f32) -> Option<f32> {
        match *self {
            Self::Range { min, max, step } if value.is_finite() => {
                let snapped = if step > 0.0 {
                    min + ((value - min) / step).round() * step
                } else {
                    value
                };
                Some(snapped.max(min).min(max))
            }
            _ => None,
        }
    }
}

/// A value read from or written to a control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ControlValue {
    /// Output of a color picker.
    Color(HexColor),
    /// Output of a slider.
    Number(f32),
}

/// An editable control as presented to the editing surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Control<F> {
    /// Which field the control edits.
    pub field: F,
    /// Human-readable label.
    pub label: &'static str,
    /// Input modality.
    pub kind: ControlKind,
    /// Current value.
    pub value: ControlValue,
}

const ROTATION_RANGE: ControlKind = ControlKind::Range {
    min: 0.0,
    max: 360.0,
    step: 1.0,
};

fn color_or_unset(color: Option<&HexColor>) -> HexColor {
    color.cloned().unwrap_or_else(HexColor::white)
}

/// Element fields exposed to the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementField {
    /// Tint.
    Color,
    /// Rotation in degrees.
    Rotation,
}

impl ElementField {
    /// Every editable element field, in display order.
    pub const ALL: [Self; 2] = [Self::Color, Self::Rotation];

    /// Label for the control.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Color => "Color",
            Self::Rotation => "Rotation",
        }
    }

    /// Control used to edit the field.
    #[must_use]
    pub fn kind(self) -> ControlKind {
        match self {
            Self::Color => ControlKind::ColorPicker,
            Self::Rotation => ROTATION_RANGE,
        }
    }

    /// Current value of the field on `element`.
    #[must_use]
    pub fn read(self, element: &DesignElement) -> ControlValue {
        match self {
            Self::Color => ControlValue::Color(color_or_unset(element.color.as_ref())),
            Self::Rotation => ControlValue::Number(element.rotation),
        }
    }

    /// Translate a control value into a property command.
    ///
    /// Returns `None` when the value's type does not belong to this field.
    #[must_use]
    pub fn command(self, value: ControlValue) -> Option<ElementProperty> {
        match (self, value) {
            (Self::Color, ControlValue::Color(color)) => Some(ElementProperty::Color(Some(color))),
            (Self::Rotation, ControlValue::Number(degrees)) => self
                .kind()
                .constrain(degrees)
                .map(ElementProperty::Rotation),
            _ => None,
        }
    }
}

/// Garment fields exposed to the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GarmentField {
    /// Tint.
    Color,
}

impl GarmentField {
    /// Every editable garment field, in display order.
    pub const ALL: [Self; 1] = [Self::Color];

    /// Label for the control.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Color => "Garment color",
        }
    }

    /// Control used to edit the field.
    #[must_use]
    pub fn kind(self) -> ControlKind {
        match self {
            Self::Color => ControlKind::ColorPicker,
        }
    }

    /// Translate a control value into a property command.
    #[must_use]
    pub fn command(self, value: ControlValue) -> Option<GarmentProperty> {
        match (self, value) {
            (Self::Color, ControlValue::Color(color)) => Some(GarmentProperty::Color(Some(color))),
            (Self::Color, ControlValue::Number(_)) => None,
        }
    }
}

/// Editing channel between a properties panel and the [`SceneStore`].
#[derive(Debug)]
pub struct PropertyEditor<'a> {
    store: &'a mut SceneStore,
}

impl<'a> PropertyEditor<'a> {
    /// Create an editor bound to a store for the duration of an edit.
    #[must_use]
    pub fn new(store: &'a mut SceneStore) -> Self {
        Self { store }
    }

    /// Controls for the selected element, or none when nothing is selected.
    #[must_use]
    pub fn element_controls(&self) -> Vec<Control<ElementField>> {
        let Some(element) = self.store.selected_element() else {
            return Vec::new();
        };
        ElementField::ALL
            .iter()
            .map(|&field| Control {
                field,
                label: field.label(),
                kind: field.kind(),
                value: field.read(element),
            })
            .collect()
    }

    /// Controls for the garment.
    #[must_use]
    pub fn garment_controls(&self) -> Vec<Control<GarmentField>> {
        let garment = self.store.scene().garment();
        GarmentField::ALL
            .iter()
            .map(|&field| Control {
                field,
                label: field.label(),
                kind: field.kind(),
                value: ControlValue::Color(color_or_unset(garment.color.as_ref())),
            })
            .collect()
    }

    /// Apply a control change to the selected element.
    ///
    /// Returns `false` if nothing is selected or the value does not fit the
    /// field.
    pub fn edit_element(&mut self, field: ElementField, value: ControlValue) -> bool {
        let Some(id) = self.store.selected_element().map(|e| e.id) else {
            return false;
        };
        let Some(command) = field.command(value) else {
            tracing::warn!("Dropping mismatched value for element field {field:?}");
            return false;
        };
        self.store.set_element_property(id, command)
    }

    /// Apply a control change to the garment.
    ///
    /// Returns `false` if the value does not fit the field.
    pub fn edit_garment(&mut self, field: GarmentField, value: ControlValue) -> bool {
        let Some(command) = field.command(value) else {
            tracing::warn!("Dropping mismatched value for garment field {field:?}");
            return false;
        };
        self.store.set_garment_property(command);
        true
    }

    /// Whether the remove affordance should be offered.
    #[must_use]
    pub fn can_remove(&self) -> bool {
        self.store.selected_element().is_some()
    }

    /// Remove the selected element.
    pub fn remove_selected(&mut self) -> Option<DesignElement> {
        self.store.remove_selected()
    }
}
