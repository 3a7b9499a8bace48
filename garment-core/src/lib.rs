//! # Garment Studio Core
//!
//! Editing core for a garment customization canvas: a garment background
//! with user-placed design elements (pockets, zippers, patches) that can be
//! selected, dragged, resized, rotated and tinted.
//! Compiles to WASM so the same core drives the browser editor.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              garment-core.wasm              │
//! ├─────────────────────────────────────────────┤
//! │  Scene Store      │  Interaction            │
//! │  - Garment        │  - Click to select      │
//! │  - Elements       │  - Drag to move         │
//! │  - Selection      │  - Handle resize        │
//! ├─────────────────────────────────────────────┤
//! │  Property Editor  │  Render Boundary        │
//! │  - Controls       │  - RenderAdapter trait  │
//! │  - Typed commands │  - Frame composition    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Every mutation goes through [`SceneStore`]; observers registered with
//! [`SceneStore::set_on_change`] see the new [`Scene`] after each one.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod element;
pub mod error;
pub mod event;
pub mod interaction;
pub mod property;
pub mod render;
pub mod scene;
pub mod store;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use catalog::{Catalog, ElementCatalogEntry, GarmentCatalogEntry};
pub use element::{DesignElement, ElementId, GarmentProperties, HexColor, ImageRef, ImageSource};
pub use error::{StudioError, StudioResult};
pub use event::{PointerEvent, PointerPhase, PointerTarget};
pub use interaction::{
    GestureKind, GestureSession, GestureState, HandleRect, Interaction, InteractionConfig,
    InteractionController, ListenerGuard, NoCapture, PointerCapture,
};
pub use property::{
    Control, ControlKind, ControlValue, ElementField, ElementProperty, GarmentField,
    GarmentProperty, PropertyEditor,
};
pub use render::{BoxSize, Displayable, Frame, Layer, RenderAdapter, RenderRequest};
pub use scene::{CanvasSize, Scene};
pub use store::{ElementDefaults, OnChangeCallback, SceneStore};

/// Garment core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
