//! Inkmap CLI - renders a styled street map image from a GeoJSON extract.
//!
//! The core pipeline treats data acquisition, configuration parsing and file
//! I/O as external concerns; this binary provides all three: it reads a JSON
//! configuration, loads map elements from a GeoJSON file, registers icon
//! images and saves the rendered image.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use inkmap::element::GeoPoint;
use inkmap::render::{finalize, finalize_scaled, DecodedImage, IconRegistry, MapRenderer};
use inkmap::style::StyleConfig;
use inkmap::view::{MapView, Size};
use serde::Deserialize;

#[derive(Parser)]
#[command(name = "inkmap")]
#[command(about = "Render a styled street map image from a GeoJSON extract", long_about = None)]
struct Args {
    /// Configuration file in JSON format
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// Input GeoJSON file with the map elements to render
    #[arg(long)]
    input: PathBuf,

    /// Output image path
    #[arg(long, default_value = "out/map.png")]
    output: PathBuf,
}

/// Render configuration, deserialized from the `--config` file.
#[derive(Debug, Deserialize)]
struct MapConfig {
    center_latitude: f64,
    center_longitude: f64,
    zoom: f64,
    width: u32,
    height: u32,
    /// Optional output resolution; the canvas is resampled when set.
    #[serde(default)]
    output_width: Option<u32>,
    #[serde(default)]
    output_height: Option<u32>,
    #[serde(default)]
    style: StyleConfig,
    /// Icon name to image file path.
    #[serde(default)]
    icons: HashMap<String, PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Err(err) = run(&args) {
        log::error!("{err}");
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config: MapConfig = serde_json::from_str(&fs::read_to_string(&args.config)?)?;

    let elements = inkmap::geojson::elements_from_geojson(&fs::read_to_string(&args.input)?)?;
    log::info!(
        "loaded {} elements from {}",
        elements.len(),
        args.input.display()
    );

    let mut icons = IconRegistry::new();
    for (name, path) in &config.icons {
        let bytes = fs::read(path)?;
        icons.insert(name.clone(), DecodedImage::decode(&bytes)?);
    }

    let center = GeoPoint::latlon(config.center_latitude, config.center_longitude);
    let view = MapView::new(center, config.zoom)
        .with_size(Size::new(config.width, config.height));

    let renderer = MapRenderer::new(config.style).with_icons(icons);
    let rendered = renderer.render(elements, &view)?;
    let (canvas, diagnostics) = rendered.into_parts();

    for key in diagnostics.ignored_style_keys() {
        log::warn!("style override '{key}' was ignored");
    }
    if diagnostics.skipped_icon_count() > 0 {
        log::info!(
            "{} icon(s) skipped to avoid overlap",
            diagnostics.skipped_icon_count()
        );
    }

    let image = match (config.output_width, config.output_height) {
        (Some(width), Some(height)) => finalize_scaled(canvas, Size::new(width, height))?,
        _ => finalize(canvas)?,
    };

    if let Some(parent) = args.output.parent() {
        fs::create_dir_all(parent)?;
    }
    image.save(&args.output)?;
    log::info!(
        "saved {}x{} map to {}",
        image.width(),
        image.height(),
        args.output.display()
    );

    Ok(())
}
