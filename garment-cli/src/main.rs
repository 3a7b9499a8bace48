//! # Garment Studio
//!
//! Headless host that replays a design session and prints the result.

use anyhow::Context;
use clap::Parser;
use garment_cli::{load_catalog, load_script, CliArgs, OutputFormat, Session, StudioConfig};
use garment_renderer::StudioRenderer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,garment_core=debug,garment_renderer=debug"));

    // Results go to stdout, so logs go to stderr.
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true);

    // Use JSON format in production (RUST_LOG_FORMAT=json)
    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = CliArgs::parse();
    let config = StudioConfig::from(args);

    tracing::info!(
        "Canvas {}x{}, backends: {}",
        config.canvas_width,
        config.canvas_height,
        if config.renderer.delivery.is_some() {
            "delivery + local"
        } else {
            "local"
        }
    );

    let renderer =
        StudioRenderer::new(config.renderer.clone()).context("Invalid renderer configuration")?;
    let catalog = load_catalog(config.catalog_path.as_deref()).context("Failed to load catalog")?;
    let steps = match &config.script_path {
        Some(path) => load_script(path)
            .with_context(|| format!("Failed to load script {}", path.display()))?,
        None => {
            tracing::warn!("No script given, rendering an empty session");
            Vec::new()
        }
    };

    let mut session = Session::new(&config, catalog);
    session.replay(&steps).context("Replay failed")?;

    match config.output {
        OutputFormat::Frame => {
            let frame = session.frame(&renderer);
            println!("{}", serde_json::to_string_pretty(&frame)?);
        }
        OutputFormat::Scene => println!("{}", session.store().scene().to_json()?),
        OutputFormat::Summary => print!("{}", session.summary()),
    }

    Ok(())
}
