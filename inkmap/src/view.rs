//! View parameters defining the coordinate frame of a single render.

use serde::{Deserialize, Serialize};

use crate::element::GeoPoint;

/// Size of the canvas in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    width: u32,
    height: u32,
}

impl Size {
    /// Creates a new size.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Half of the width.
    pub fn half_width(&self) -> f64 {
        self.width as f64 / 2.0
    }

    /// Half of the height.
    pub fn half_height(&self) -> f64 {
        self.height as f64 / 2.0
    }

    /// Returns true if either dimension is zero.
    pub fn is_zero(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Center, zoom and canvas size defining one render's coordinate frame.
///
/// A view is immutable for the duration of a render. The `with_*` methods
/// return modified copies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    center: GeoPoint,
    zoom: f64,
    size: Size,
}

impl MapView {
    /// Creates a new view centered at the given point.
    pub fn new(center: GeoPoint, zoom: f64) -> Self {
        Self {
            center,
            zoom,
            size: Size::new(0, 0),
        }
    }

    /// Center of the view.
    pub fn center(&self) -> GeoPoint {
        self.center
    }

    /// Zoom level. Follows the web map convention: at zoom `z` the whole
    /// world is `256 * 2^z` pixels wide.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Canvas size in pixels.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Returns a copy of the view with the given canvas size.
    pub fn with_size(&self, size: Size) -> Self {
        Self { size, ..*self }
    }

    /// Returns a copy of the view with the given zoom level.
    pub fn with_zoom(&self, zoom: f64) -> Self {
        Self { zoom, ..*self }
    }
}
