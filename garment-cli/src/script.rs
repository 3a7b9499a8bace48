//! Replay scripts: recorded user actions driven through the studio core.
//!
//! A script is a JSON array of [`Step`]s. Elements are referred to by the
//! order in which the script placed them, since their ids are generated.

use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

use garment_core::{
    Catalog, ElementField, ElementId, Frame, GarmentField, HexColor, ImageRef, Interaction,
    InteractionController, PointerEvent, PropertyEditor, RenderAdapter, SceneStore, StudioError,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::StudioConfig;

/// Errors raised while loading or replaying a script.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// Input could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Script JSON is malformed.
    #[error("Invalid script: {0}")]
    Json(#[from] serde_json::Error),

    /// Catalog or scene data is malformed.
    #[error(transparent)]
    Studio(#[from] StudioError),

    /// No catalog garment has this name.
    #[error("Unknown garment: {0}")]
    UnknownGarment(String),

    /// No catalog element has this name.
    #[error("Unknown catalog element: {0}")]
    UnknownElement(String),

    /// The script has not placed this many elements.
    #[error("Element #{0} was never placed")]
    NoSuchElement(usize),

    /// A control could never produce this input.
    #[error("Invalid input '{value}' for {field}")]
    InvalidInput {
        /// Field being edited.
        field: String,
        /// Raw input.
        value: String,
    },

    /// A step failed.
    #[error("Step {index} failed: {source}")]
    Step {
        /// Zero-based step index.
        index: usize,
        /// What went wrong.
        #[source]
        source: Box<ScriptError>,
    },
}

/// One recorded user action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Pick a garment from the catalog by display name.
    ChooseGarment {
        /// Catalog display name.
        name: String,
    },
    /// Switch to an arbitrary garment image.
    SetGarment {
        /// Garment image.
        #[serde(default)]
        image: ImageRef,
        /// Tint to apply. The current tint is kept when absent.
        #[serde(default)]
        color: Option<HexColor>,
    },
    /// Place a catalog element by display name.
    AddElement {
        /// Catalog display name.
        name: String,
    },
    /// Place an element that is not in the catalog.
    PlaceElement {
        /// Category tag.
        category: String,
        /// Element image.
        #[serde(default)]
        image: ImageRef,
    },
    /// Toggle selection of a placed element.
    Select {
        /// Placement index.
        element: usize,
    },
    /// Clear the selection.
    Deselect,
    /// Move a placed element by a delta.
    Move {
        /// Placement index.
        element: usize,
        /// X delta.
        dx: f32,
        /// Y delta.
        dy: f32,
    },
    /// Resize a placed element.
    Resize {
        /// Placement index.
        element: usize,
        /// Requested width.
        width: f32,
        /// Requested height.
        height: f32,
    },
    /// Raw pointer event in canvas coordinates.
    Pointer(PointerEvent),
    /// Press at `from`, move to `to`, release.
    Drag {
        /// Press point.
        from: (f32, f32),
        /// Release point.
        to: (f32, f32),
    },
    /// Raw control input for a field of the selected element.
    Edit {
        /// Field being edited.
        field: ElementField,
        /// Input as the control reports it.
        value: String,
    },
    /// Raw control input for a garment field.
    EditGarment {
        /// Field being edited.
        field: GarmentField,
        /// Input as the control reports it.
        value: String,
    },
    /// Delete the selected element.
    RemoveSelected,
    /// Resize the canvas container.
    SetCanvasSize {
        /// New width.
        width: f32,
        /// New height.
        height: f32,
    },
}

/// Parse a replay script.
///
/// # Errors
///
/// Returns an error if the JSON is not an array of steps.
pub fn parse_script(json: &str) -> Result<Vec<Step>, ScriptError> {
    Ok(serde_json::from_str(json)?)
}

/// Outcome of a replay.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReplayReport {
    /// Steps applied.
    pub steps: usize,
    /// Scene change notifications observed.
    pub changes: usize,
    /// Effects of pointer steps, in order.
    pub interactions: Vec<Interaction>,
}

/// A studio session being driven by a script.
#[derive(Debug)]
pub struct Session {
    store: SceneStore,
    controller: InteractionController,
    catalog: Catalog,
    placed: Vec<ElementId>,
    changes: Rc<Cell<usize>>,
}

impl Session {
    /// Create an empty session.
    #[must_use]
    pub fn new(config: &StudioConfig, catalog: Catalog) -> Self {
        let mut store = SceneStore::with_canvas(config.canvas_width, config.canvas_height)
            .with_defaults(catalog.element_defaults());
        let changes = Rc::new(Cell::new(0));
        let counter = Rc::clone(&changes);
        store.set_on_change(move |_| counter.set(counter.get() + 1));

        Self {
            store,
            controller: InteractionController::new(config.interaction),
            catalog,
            placed: Vec::new(),
            changes,
        }
    }

    /// The scene store.
    #[must_use]
    pub fn store(&self) -> &SceneStore {
        &self.store
    }

    /// Ids of placed elements, in placement order.
    #[must_use]
    pub fn placed(&self) -> &[ElementId] {
        &self.placed
    }

    /// Render the current scene.
    #[must_use]
    pub fn frame(&self, adapter: &dyn RenderAdapter) -> Frame {
        Frame::compose(self.store.scene(), &self.controller, adapter)
    }

    /// Apply every step in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::Step`] wrapping the first step's failure.
    pub fn replay(&mut self, steps: &[Step]) -> Result<ReplayReport, ScriptError> {
        let before = self.changes.get();
        let mut report = ReplayReport::default();

        for (index, step) in steps.iter().enumerate() {
            tracing::debug!("Step {index}: {step:?}");
            let interactions = self.apply(step).map_err(|e| ScriptError::Step {
                index,
                source: Box::new(e),
            })?;
            report.interactions.extend(interactions);
            report.steps += 1;
        }

        report.changes = self.changes.get() - before;
        tracing::info!(
            "Replayed {} steps, {} scene changes",
            report.steps,
            report.changes
        );
        Ok(report)
    }

    /// Apply one step. Returns the interactions produced by pointer steps.
    ///
    /// # Errors
    ///
    /// Returns an error if the step refers to something the catalog or the
    /// script does not define, or carries input no control could produce.
    pub fn apply(&mut self, step: &Step) -> Result<Vec<Interaction>, ScriptError> {
        match step {
            Step::ChooseGarment { name } => {
                let garment = self
                    .catalog
                    .garments
                    .iter()
                    .find(|g| &g.display_name == name)
                    .ok_or_else(|| ScriptError::UnknownGarment(name.clone()))?;
                garment.choose(&mut self.store);
            }
            Step::SetGarment { image, color } => {
                self.store.set_garment(image.clone(), color.clone());
            }
            Step::AddElement { name } => {
                let entry = self
                    .catalog
                    .elements
                    .iter()
                    .find(|e| &e.display_name == name)
                    .ok_or_else(|| ScriptError::UnknownElement(name.clone()))?;
                let id = entry.add_to(&mut self.store);
                self.placed.push(id);
            }
            Step::PlaceElement { category, image } => {
                let id = self.store.add_element(category, image.clone());
                self.placed.push(id);
            }
            Step::Select { element } => {
                let id = self.placed_id(*element)?;
                self.store.select_element(id);
            }
            Step::Deselect => self.store.deselect(),
            Step::Move { element, dx, dy } => {
                let id = self.placed_id(*element)?;
                self.store.move_element(id, *dx, *dy);
            }
            Step::Resize {
                element,
                width,
                height,
            } => {
                let id = self.placed_id(*element)?;
                self.store.resize_element(id, *width, *height);
            }
            Step::Pointer(event) => {
                return Ok(vec![self.controller.handle(&mut self.store, event)]);
            }
            Step::Drag { from, to } => {
                let events = [
                    PointerEvent::down(from.0, from.1),
                    PointerEvent::moved(to.0, to.1),
                    PointerEvent::up(to.0, to.1),
                ];
                return Ok(events
                    .iter()
                    .map(|event| self.controller.handle(&mut self.store, event))
                    .collect());
            }
            Step::Edit { field, value } => {
                let input = field.kind().parse_input(value).ok_or_else(|| {
                    ScriptError::InvalidInput {
                        field: field.label().to_string(),
                        value: value.clone(),
                    }
                })?;
                if !PropertyEditor::new(&mut self.store).edit_element(*field, input) {
                    tracing::debug!("Edit of {field:?} ignored, nothing selected");
                }
            }
            Step::EditGarment { field, value } => {
                let input = field.kind().parse_input(value).ok_or_else(|| {
                    ScriptError::InvalidInput {
                        field: field.label().to_string(),
                        value: value.clone(),
                    }
                })?;
                PropertyEditor::new(&mut self.store).edit_garment(*field, input);
            }
            Step::RemoveSelected => {
                if PropertyEditor::new(&mut self.store).remove_selected().is_none() {
                    tracing::debug!("Remove ignored, nothing selected");
                }
            }
            Step::SetCanvasSize { width, height } => {
                self.store.set_canvas_size(*width, *height);
            }
        }
        Ok(Vec::new())
    }

    fn placed_id(&self, index: usize) -> Result<ElementId, ScriptError> {
        self.placed
            .get(index)
            .copied()
            .ok_or(ScriptError::NoSuchElement(index))
    }

    /// Human-readable description of the current scene.
    #[must_use]
    pub fn summary(&self) -> String {
        let scene = self.store.scene();
        let garment = scene.garment();
        let name = self.catalog.active_garment(garment).map_or_else(
            || {
                if garment.image.is_empty() {
                    "none".to_string()
                } else {
                    "custom".to_string()
                }
            },
            |entry| entry.display_name.clone(),
        );
        let color = garment
            .color
            .as_ref()
            .map_or("none", HexColor::as_str);

        let mut lines = vec![
            format!("Garment: {name} ({color})"),
            format!("Elements: {}", scene.element_count()),
        ];
        lines.extend(scene.elements().iter().enumerate().map(|(index, element)| {
            let marker = if scene.is_selected(element.id) { "*" } else { " " };
            format!(
                "{marker} #{index} {} at ({}, {}) {}x{} rot {}",
                element.category,
                element.x,
                element.y,
                element.width,
                element.height,
                element.rotation
            )
        }));
        lines.iter().map(|line| format!("{line}\n")).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use garment_core::PointerPhase;

    fn session() -> Session {
        let catalog = crate::load_catalog(None).expect("bundled catalog");
        Session::new(&StudioConfig::new(), catalog)
    }

    #[test]
    fn test_parse_script_steps() {
        let steps = parse_script(
            r##"[
                { "action": "choose_garment", "name": "Camisa Formal" },
                { "action": "add_element", "name": "Bolsillo Cargo" },
                { "action": "pointer", "phase": "down", "x": 60, "y": 60 },
                { "action": "drag", "from": [60, 60], "to": [90, 90] },
                { "action": "edit", "field": "rotation", "value": "45" },
                { "action": "edit_garment", "field": "color", "value": "#ff0000" },
                { "action": "set_garment", "image": { "remote_id": "garments/tee" } },
                { "action": "remove_selected" }
            ]"##,
        )
        .expect("script parses");
        assert_eq!(steps.len(), 8);
        assert!(matches!(
            &steps[2],
            Step::Pointer(PointerEvent {
                phase: PointerPhase::Down,
                ..
            })
        ));
        assert_eq!(
            steps[6],
            Step::SetGarment {
                image: ImageRef::remote("garments/tee"),
                color: None,
            }
        );
    }

    #[test]
    fn test_catalog_steps() {
        let mut session = session();
        session
            .apply(&Step::ChooseGarment {
                name: "Pantalón Jean".to_string(),
            })
            .expect("garment exists");
        session
            .apply(&Step::AddElement {
                name: "Bolsillo Grande".to_string(),
            })
            .expect("element exists");

        assert_eq!(session.placed().len(), 1);
        assert!(session.summary().starts_with("Garment: Pantalón Jean"));
        assert!(matches!(
            session.apply(&Step::ChooseGarment {
                name: "Kimono".to_string()
            }),
            Err(ScriptError::UnknownGarment(_))
        ));
    }

    #[test]
    fn test_replay_reports_step_index() {
        let mut session = session();
        let steps = vec![
            Step::PlaceElement {
                category: "patch".to_string(),
                image: ImageRef::default(),
            },
            Step::Select { element: 3 },
        ];
        match session.replay(&steps) {
            Err(ScriptError::Step { index, source }) => {
                assert_eq!(index, 1);
                assert!(matches!(*source, ScriptError::NoSuchElement(3)));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_invalid_control_input() {
        let mut session = session();
        let result = session.apply(&Step::Edit {
            field: ElementField::Color,
            value: "blue".to_string(),
        });
        assert!(matches!(result, Err(ScriptError::InvalidInput { .. })));
    }

    #[test]
    fn test_summary_lists_every_element() {
        let mut session = session();
        session
            .apply(&Step::AddElement {
                name: "Bolsillo Clásico".to_string(),
            })
            .expect("add");

        let summary = session.summary();
        let lines: Vec<&str> = summary.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Garment: none (#ffffff)");
        assert_eq!(lines[1], "Elements: 1");
        assert_eq!(lines[2], "* #0 pocket at (50, 50) 80x80 rot 0");
        assert!(summary.ends_with('\n'));
    }

    #[test]
    fn test_replay_counts_changes_and_interactions() {
        let mut session = session();
        let report = session
            .replay(&[
                Step::AddElement {
                    name: "Bolsillo Clásico".to_string(),
                },
                Step::Deselect,
                Step::Drag {
                    from: (60.0, 60.0),
                    to: (160.0, 60.0),
                },
                Step::Edit {
                    field: ElementField::Rotation,
                    value: "90".to_string(),
                },
            ])
            .expect("replay");

        assert_eq!(report.steps, 4);
        // add, deselect, two drag moves, rotation edit
        assert_eq!(report.changes, 5);
        assert_eq!(report.interactions.len(), 3);
        assert_eq!(
            report.interactions[2],
            Interaction::DragEnded {
                element: session.placed()[0]
            }
        );

        let element = session.store().selected_element().expect("selected");
        assert!((element.x - 150.0).abs() < f32::EPSILON);
        assert!((element.rotation - 90.0).abs() < f32::EPSILON);
    }
}
