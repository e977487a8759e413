//! Layered composition of classified and styled features onto a canvas.
//!
//! Layers are drawn in a fixed order: unrecognized elements first (so the
//! fallback never occludes real data), then water, footprints, roads by
//! ascending visual priority, metro lines, and finally the icon overlay.
//! Within a layer, elements keep their input order.

use rayon::prelude::*;

use crate::classify::{self, Category, ClassifiedFeature};
use crate::diagnostics::RenderDiagnostics;
use crate::element::{GeoElement, Geom};
use crate::error::InkmapError;
use crate::projection::{Projector, ScreenPoint};
use crate::style::{self, Style, StyleConfig};
use crate::view::MapView;

pub use canvas::Canvas;
pub use export::{finalize, finalize_scaled};
pub use icon::{scaled_icon_size, DecodedImage, IconRegistry};

use icon::{IconPlacer, PixelRect};

pub mod canvas;
mod export;
pub mod icon;

/// Result of a successful render: the finished canvas and the non-fatal
/// warnings collected along the way.
pub struct RenderedMap {
    canvas: Canvas,
    diagnostics: RenderDiagnostics,
}

impl RenderedMap {
    /// The finished canvas.
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Warnings collected during the render.
    pub fn diagnostics(&self) -> &RenderDiagnostics {
        &self.diagnostics
    }

    /// Splits the result into the canvas and the diagnostics.
    pub fn into_parts(self) -> (Canvas, RenderDiagnostics) {
        (self.canvas, self.diagnostics)
    }
}

/// The rendering pipeline: classifies elements, resolves their styles and
/// composes them into a raster map.
#[derive(Debug, Default, Clone)]
pub struct MapRenderer {
    style: StyleConfig,
    icons: IconRegistry,
}

impl MapRenderer {
    /// Creates a renderer with the given style configuration and no icons.
    pub fn new(style: StyleConfig) -> Self {
        Self {
            style,
            icons: IconRegistry::new(),
        }
    }

    /// Returns the renderer with the given icon registry.
    pub fn with_icons(mut self, icons: IconRegistry) -> Self {
        self.icons = icons;
        self
    }

    /// Renders the elements into a canvas for the given view.
    ///
    /// Classification and style resolution run in parallel across elements;
    /// drawing is sequential since all layers share one canvas. The render
    /// either completes or fails atomically: a canvas is only returned on
    /// success, and the only fatal failures are an invalid input coordinate
    /// and an exhausted pixel budget.
    pub fn render(
        &self,
        elements: Vec<GeoElement>,
        view: &MapView,
    ) -> Result<RenderedMap, InkmapError> {
        let mut diagnostics = RenderDiagnostics::default();
        for key in self.style.unknown_keys() {
            log::warn!("ignoring style override with unknown category: {key}");
            diagnostics.record_ignored_key(key);
        }

        let projector = Projector::new(view)?;

        let features = classify::classify_all(elements);
        log::debug!("classified {} elements", features.len());

        let styled: Vec<(ClassifiedFeature, Style)> = features
            .into_par_iter()
            .map(|feature| {
                let style = style::resolve(&feature, &self.style);
                (feature, style)
            })
            .collect();

        let mut canvas = Canvas::new(
            view.size(),
            self.style.background(),
            canvas::stroke_scale(view.zoom()),
        )?;

        let mut unknown = Vec::new();
        let mut water = Vec::new();
        let mut footprints = Vec::new();
        let mut roads = Vec::new();
        let mut metro = Vec::new();
        let mut markers = Vec::new();

        for entry in &styled {
            let (feature, style) = entry;
            if feature.element().geometry().is_point() {
                markers.push(entry);
                continue;
            }

            match feature.category() {
                Category::Unknown => unknown.push(entry),
                Category::Water => water.push(entry),
                Category::Building | Category::Poi => {
                    footprints.push(entry);
                    // An area feature with an icon also gets a marker at its
                    // centroid.
                    if style.icon.is_some() {
                        markers.push(entry);
                    }
                }
                Category::Road(class) => roads.push((class.draw_priority(), entry)),
                Category::MetroLine => metro.push(entry),
            }
        }
        // Stable sort: same-class roads keep their input order.
        roads.sort_by_key(|(priority, _)| *priority);

        for (feature, style) in unknown
            .iter()
            .chain(water.iter())
            .chain(footprints.iter())
        {
            draw_shape(&mut canvas, &projector, feature, style)?;
        }
        for (_, (feature, style)) in &roads {
            draw_shape(&mut canvas, &projector, feature, style)?;
        }
        for (feature, style) in &metro {
            draw_shape(&mut canvas, &projector, feature, style)?;
        }

        self.place_icons(&mut canvas, &projector, view, &markers, &mut diagnostics)?;

        Ok(RenderedMap {
            canvas,
            diagnostics,
        })
    }

    /// Draws the icon overlay: POI and building markers in input order, with
    /// overlapping later icons skipped.
    fn place_icons(
        &self,
        canvas: &mut Canvas,
        projector: &Projector,
        view: &MapView,
        markers: &[&(ClassifiedFeature, Style)],
        diagnostics: &mut RenderDiagnostics,
    ) -> Result<(), InkmapError> {
        let icon_size = scaled_icon_size(view.zoom(), &self.style.icon_sizing);
        let mut placer = IconPlacer::new();

        for (feature, style) in markers {
            let element = feature.element();
            let points = projector.project_all(element.geometry().points())?;
            let anchor = centroid(&points);

            let icon = style.icon.as_deref().and_then(|name| {
                let found = self.icons.get(name);
                if found.is_none() {
                    log::warn!("icon '{name}' is not registered, drawing a marker instead");
                }
                found
            });

            match icon {
                Some(image) => {
                    let scale = icon_size / image.width().max(image.height()).max(1) as f64;
                    let width = image.width() as f64 * scale;
                    let height = image.height() as f64 * scale;
                    let rect = PixelRect::centered_at(anchor, width, height);
                    if placer.try_place(element.id(), rect) {
                        canvas.draw_image(image, rect.left(), rect.top(), scale);
                    }
                }
                None => {
                    let radius = icon_size * 0.2;
                    let rect = PixelRect::centered_at(anchor, radius * 2.0, radius * 2.0);
                    if placer.try_place(element.id(), rect) {
                        canvas.draw_marker(anchor, radius, style.stroke_color);
                    }
                }
            }
        }

        for id in placer.skipped() {
            diagnostics.record_skipped_icon(*id);
        }
        if diagnostics.skipped_icon_count() > 0 {
            log::info!(
                "skipped {} overlapping icon(s)",
                diagnostics.skipped_icon_count()
            );
        }
        Ok(())
    }
}

fn draw_shape(
    canvas: &mut Canvas,
    projector: &Projector,
    feature: &ClassifiedFeature,
    style: &Style,
) -> Result<(), InkmapError> {
    match feature.element().geometry() {
        // Point features are handled by the icon overlay.
        Geom::Point(_) => {}
        Geom::Line(points) => canvas.stroke_path(&projector.project_all(points)?, style),
        Geom::Polygon(points) => canvas.fill_polygon(&projector.project_all(points)?, style),
    }
    Ok(())
}

fn centroid(points: &[ScreenPoint]) -> ScreenPoint {
    if points.len() == 1 {
        return points[0];
    }
    let n = points.len().max(1) as f64;
    let x = points.iter().map(|p| p.x).sum::<f64>() / n;
    let y = points.iter().map(|p| p.y).sum::<f64>() / n;
    ScreenPoint::new(x, y)
}
