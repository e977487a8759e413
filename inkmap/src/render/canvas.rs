//! The shared mutable drawing surface of a render.

use tiny_skia::{
    FillRule, LineCap, Paint, Path, PathBuilder, Pixmap, PixmapPaint, Stroke, StrokeDash,
    Transform,
};

use crate::color::Color;
use crate::error::InkmapError;
use crate::projection::ScreenPoint;
use crate::render::icon::DecodedImage;
use crate::style::{Style, REFERENCE_ZOOM};
use crate::view::Size;

/// Upper bound on the number of pixels a canvas or exported image may have.
/// At 4 bytes per pixel this caps a single buffer at 1 GiB.
pub(crate) const MAX_PIXELS: u64 = 1 << 28;

/// Zoom-dependent multiplier applied to stroke widths, which are specified at
/// [`REFERENCE_ZOOM`]. Clamped so extreme zooms do not degenerate lines.
pub(crate) fn stroke_scale(zoom: f64) -> f64 {
    2f64.powf(zoom - REFERENCE_ZOOM).clamp(0.25, 4.0)
}

/// Raster drawing surface accumulating all layers of one render.
///
/// The canvas is the single mutable resource of the pipeline. It is owned by
/// the compositor for the duration of a render and handed to the exporter at
/// the end; `&mut` access makes concurrent drawing impossible.
pub struct Canvas {
    pixmap: Pixmap,
    stroke_scale: f64,
}

impl Canvas {
    /// Creates a canvas of the given size filled with the background color.
    ///
    /// Fails with [`InkmapError::ResourceExhausted`] if the size exceeds the
    /// pixel budget, before any allocation happens.
    pub fn new(size: Size, background: Color, stroke_scale: f64) -> Result<Self, InkmapError> {
        let pixels = size.width() as u64 * size.height() as u64;
        if pixels > MAX_PIXELS {
            return Err(InkmapError::ResourceExhausted {
                width: size.width(),
                height: size.height(),
            });
        }

        let mut pixmap = Pixmap::new(size.width(), size.height()).ok_or_else(|| {
            InkmapError::Generic(format!(
                "cannot create {}x{} canvas",
                size.width(),
                size.height()
            ))
        })?;

        let [r, g, b, a] = background.to_u8_array();
        pixmap.fill(
            tiny_skia::Color::from_rgba8(r, g, b, a),
        );

        Ok(Self {
            pixmap,
            stroke_scale,
        })
    }

    /// Size of the canvas in pixels.
    pub fn size(&self) -> Size {
        Size::new(self.pixmap.width(), self.pixmap.height())
    }

    /// Raw premultiplied RGBA pixel data.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// Draws an open path stroked with the style's stroke parameters.
    pub fn stroke_path(&mut self, points: &[ScreenPoint], style: &Style) {
        let Some(path) = build_path(points, false) else {
            return;
        };
        self.stroke(&path, style);
    }

    /// Draws a closed polygon, filled if the style has a fill color and
    /// outlined if it has a positive stroke width.
    pub fn fill_polygon(&mut self, points: &[ScreenPoint], style: &Style) {
        let Some(path) = build_path(points, true) else {
            return;
        };

        if let Some(fill) = style.fill_color {
            if !fill.is_transparent() {
                self.pixmap.fill_path(
                    &path,
                    &color_paint(fill),
                    FillRule::Winding,
                    Transform::identity(),
                    None,
                );
            }
        }
        self.stroke(&path, style);
    }

    /// Draws a filled circle marker centered at the given point.
    pub fn draw_marker(&mut self, center: ScreenPoint, radius: f64, color: Color) {
        let Some(path) = PathBuilder::from_circle(center.x as f32, center.y as f32, radius as f32)
        else {
            return;
        };
        self.pixmap.fill_path(
            &path,
            &color_paint(color),
            FillRule::Winding,
            Transform::identity(),
            None,
        );
    }

    /// Blits a decoded image with its top-left corner at `(left, top)`,
    /// scaled uniformly by `scale`.
    pub fn draw_image(&mut self, image: &DecodedImage, left: f64, top: f64, scale: f64) {
        let transform = Transform::from_row(
            scale as f32,
            0.0,
            0.0,
            scale as f32,
            left as f32,
            top as f32,
        );
        self.pixmap.draw_pixmap(
            0,
            0,
            image.pixmap().as_ref(),
            &PixmapPaint::default(),
            transform,
            None,
        );
    }

    fn stroke(&mut self, path: &Path, style: &Style) {
        if style.stroke_width <= 0.0 || style.stroke_color.is_transparent() {
            return;
        }

        let scale = self.stroke_scale as f32;
        let stroke = Stroke {
            width: (style.stroke_width * self.stroke_scale) as f32,
            line_cap: LineCap::Round,
            dash: style.dash_pattern.as_ref().and_then(|pattern| {
                let scaled = pattern.iter().map(|v| *v as f32 * scale).collect();
                StrokeDash::new(scaled, 0.0)
            }),
            ..Stroke::default()
        };
        self.pixmap.stroke_path(
            path,
            &color_paint(style.stroke_color),
            &stroke,
            Transform::identity(),
            None,
        );
    }

    pub(crate) fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }
}

fn color_paint(color: Color) -> Paint<'static> {
    let [r, g, b, a] = color.to_u8_array();
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

fn build_path(points: &[ScreenPoint], close: bool) -> Option<Path> {
    if points.len() < 2 {
        return None;
    }

    let mut builder = PathBuilder::new();
    builder.move_to(points[0].x as f32, points[0].y as f32);
    for point in &points[1..] {
        builder.line_to(point.x as f32, point.y as f32);
    }
    if close {
        builder.close();
    }
    builder.finish()
}
