//! Inkmap renders styled street map images from OpenStreetMap-sourced vector
//! data. It takes tagged geographic elements (points, lines and polygons with
//! key/value attributes), classifies them into semantic categories, resolves
//! a visual style for each one and composes them into a correctly layered
//! raster image.
//!
//! # Quick start
//!
//! ```no_run
//! use inkmap::latlon;
//! use inkmap::element::{GeoElement, Geom};
//! use inkmap::render::{finalize, MapRenderer};
//! use inkmap::style::StyleConfig;
//! use inkmap::view::{MapView, Size};
//!
//! let road = GeoElement::new(
//!     1,
//!     Geom::Line(vec![latlon!(48.8566, 2.3522), latlon!(48.8570, 2.3530)]),
//!     [("highway".to_string(), "residential".to_string())],
//! );
//!
//! let view = MapView::new(latlon!(48.8566, 2.3522), 15.0).with_size(Size::new(1024, 768));
//! let rendered = MapRenderer::new(StyleConfig::default())
//!     .render(vec![road], &view)
//!     .expect("render failed");
//!
//! let (canvas, diagnostics) = rendered.into_parts();
//! println!("skipped {} icons", diagnostics.skipped_icon_count());
//! let image = finalize(canvas).expect("export failed");
//! # let _ = image;
//! ```
//!
//! # Pipeline
//!
//! A render is a single-pass dataflow:
//!
//! * [`classify`](classify::classify) assigns each element a semantic
//!   [`Category`](classify::Category) from an ordered tag-rule table; elements
//!   with unrecognized tags become `Unknown` and are still rendered.
//! * [`resolve`](style::resolve) maps each classified feature to a
//!   [`Style`](style::Style), merging built-in defaults with the overrides of
//!   a [`StyleConfig`](style::StyleConfig).
//! * [`MapRenderer`](render::MapRenderer) projects geometries through the
//!   Web-Mercator [`Projector`](projection::Projector) and draws them onto a
//!   [`Canvas`](render::Canvas) in fixed layer order, with point features
//!   placed last by the icon overlay.
//! * [`finalize`](render::finalize) flattens the canvas into an
//!   [`image::RgbaImage`] for the caller to persist.
//!
//! Classification and style resolution are pure and run in parallel across
//! elements; drawing is sequential because all layers share one canvas.

#![warn(clippy::unwrap_used)]
#![warn(missing_docs)]

pub mod classify;
mod color;
pub mod diagnostics;
pub mod element;
pub mod error;
#[cfg(feature = "geojson")]
pub mod geojson;
pub mod projection;
pub mod render;
pub mod style;
pub mod view;

pub use color::Color;
pub use element::{GeoElement, GeoPoint, Geom};
pub use error::InkmapError;
pub use render::{MapRenderer, RenderedMap};
pub use view::{MapView, Size};
