//! # Garment Studio CLI
//!
//! Headless host for the garment studio. Loads a catalog, replays a script
//! of user actions against the scene store, and prints the rendered frame,
//! the scene, or a short summary.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p garment-cli -- --script session.json
//! ```
//!
//! ## With a custom catalog and local images only:
//!
//! ```bash
//! GARMENT_CATALOG=catalog.json cargo run -p garment-cli -- --local-only --output summary --script -
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `StudioConfig` - Canvas size, gesture tuning, renderer and input paths
//! - `Session` - Store, interaction controller and catalog driven by `Step`s

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

mod script;

pub use script::{parse_script, ReplayReport, ScriptError, Session, Step};

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use garment_core::scene::{DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH};
use garment_core::{Catalog, InteractionConfig};
use garment_renderer::{DeliveryConfig, RendererConfig};

/// Cloud name used when none is configured.
pub const DEFAULT_CLOUD_NAME: &str = "dsmht9avs";

/// Catalog bundled with the binary.
pub const DEFAULT_CATALOG_JSON: &str = include_str!("../catalog/default.json");

/// What to print after the replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Rendered frame as JSON.
    #[default]
    Frame,
    /// Scene snapshot as JSON.
    Scene,
    /// Human-readable summary.
    Summary,
}

/// Command-line arguments for garment-studio.
#[derive(Debug, Clone, Parser)]
#[command(name = "garment-studio")]
#[command(about = "Replay garment design sessions and render the result")]
#[command(version)]
pub struct CliArgs {
    /// Replay script: a JSON array of steps. `-` reads stdin.
    #[arg(long, short)]
    pub script: Option<PathBuf>,

    /// Catalog JSON file. The bundled catalog is used when omitted.
    #[arg(long, env = "GARMENT_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Cloud name for hosted image delivery
    #[arg(long, env = "GARMENT_CLOUD_NAME", default_value = DEFAULT_CLOUD_NAME)]
    pub cloud_name: String,

    /// Serve every image from its local path
    #[arg(long)]
    pub local_only: bool,

    /// Prefix for relative local image paths
    #[arg(long, env = "GARMENT_LOCAL_BASE_PATH")]
    pub local_base_path: Option<String>,

    /// Canvas width in pixels
    #[arg(long, env = "GARMENT_CANVAS_WIDTH", default_value_t = DEFAULT_CANVAS_WIDTH)]
    pub canvas_width: f32,

    /// Canvas height in pixels
    #[arg(long, env = "GARMENT_CANVAS_HEIGHT", default_value_t = DEFAULT_CANVAS_HEIGHT)]
    pub canvas_height: f32,

    /// Pointer travel before a press becomes a drag
    #[arg(long, default_value_t = InteractionConfig::default().activation_distance)]
    pub activation_distance: f32,

    /// What to print after the replay
    #[arg(long, value_enum, default_value_t = OutputFormat::Frame)]
    pub output: OutputFormat,
}

/// Studio host configuration.
#[derive(Debug, Clone)]
pub struct StudioConfig {
    /// Canvas width in pixels.
    pub canvas_width: f32,
    /// Canvas height in pixels.
    pub canvas_height: f32,
    /// Gesture tuning.
    pub interaction: InteractionConfig,
    /// Render adapter configuration.
    pub renderer: RendererConfig,
    /// Catalog file, or `None` for the bundled catalog.
    pub catalog_path: Option<PathBuf>,
    /// Replay script, or `None` for an empty session.
    pub script_path: Option<PathBuf>,
    /// What to print after the replay.
    pub output: OutputFormat,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl StudioConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            interaction: InteractionConfig::default(),
            renderer: RendererConfig::with_cloud(DEFAULT_CLOUD_NAME),
            catalog_path: None,
            script_path: None,
            output: OutputFormat::default(),
        }
    }
}

impl From<CliArgs> for StudioConfig {
    fn from(args: CliArgs) -> Self {
        Self {
            canvas_width: args.canvas_width,
            canvas_height: args.canvas_height,
            interaction: InteractionConfig {
                activation_distance: args.activation_distance,
                ..InteractionConfig::default()
            },
            renderer: RendererConfig {
                delivery: (!args.local_only).then(|| DeliveryConfig::new(args.cloud_name)),
                local_base_path: args.local_base_path,
            },
            catalog_path: args.catalog,
            script_path: args.script,
            output: args.output,
        }
    }
}

fn read_source(path: &Path) -> Result<String, ScriptError> {
    let io_error = |source| ScriptError::Io {
        path: path.to_path_buf(),
        source,
    };
    if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .map_err(io_error)?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(path).map_err(io_error)
    }
}

/// Load a catalog file, or the bundled catalog when `path` is `None`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid catalog.
pub fn load_catalog(path: Option<&Path>) -> Result<Catalog, ScriptError> {
    let catalog = match path {
        Some(path) => Catalog::from_json(&read_source(path)?)?,
        None => Catalog::from_json(DEFAULT_CATALOG_JSON)?,
    };
    tracing::debug!(
        "Catalog loaded: {} garments, {} elements",
        catalog.garments.len(),
        catalog.elements.len()
    );
    Ok(catalog)
}

/// Load a replay script. `-` reads stdin.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid script.
pub fn load_script(path: &Path) -> Result<Vec<Step>, ScriptError> {
    parse_script(&read_source(path)?)
}
