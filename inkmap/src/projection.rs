//! Projection of geographic coordinates into canvas pixel space.

use crate::element::GeoPoint;
use crate::error::InkmapError;
use crate::view::MapView;

/// Latitude limit of the Web Mercator projection, in degrees.
///
/// Latitudes beyond this value are valid input but are clamped before the
/// projection formula so the result stays finite.
pub const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_78;

/// Pixel size of the world at zoom 0.
const TILE_SIZE: f64 = 256.0;

/// A point in canvas pixel space. The origin is the top-left corner of the
/// canvas, y grows downwards.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScreenPoint {
    /// Horizontal pixel coordinate.
    pub x: f64,
    /// Vertical pixel coordinate.
    pub y: f64,
}

impl ScreenPoint {
    /// Creates a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Web Mercator projector for a fixed [`MapView`].
///
/// The projector is a pure function of the view it was created with: it holds
/// no mutable state, so repeated calls with the same input always produce the
/// same output and it can be shared freely between threads.
#[derive(Debug, Clone, Copy)]
pub struct Projector {
    center_x: f64,
    center_y: f64,
    world_size: f64,
    half_width: f64,
    half_height: f64,
}

impl Projector {
    /// Creates a projector for the given view.
    ///
    /// Fails with [`InkmapError::InvalidCoordinate`] if the view center is
    /// out of range.
    pub fn new(view: &MapView) -> Result<Self, InkmapError> {
        let center = view.center();
        if !center.is_valid() {
            return Err(InkmapError::InvalidCoordinate {
                lat: center.lat(),
                lon: center.lon(),
            });
        }

        let world_size = TILE_SIZE * 2f64.powf(view.zoom());
        Ok(Self {
            center_x: normalized_x(&center),
            center_y: normalized_y(&center),
            world_size,
            half_width: view.size().half_width(),
            half_height: view.size().half_height(),
        })
    }

    /// Projects a geographic coordinate to canvas pixel space.
    ///
    /// The view center maps to the canvas center. Out-of-range input fails
    /// with [`InkmapError::InvalidCoordinate`]; this is the only failure
    /// mode.
    pub fn project(&self, point: &GeoPoint) -> Result<ScreenPoint, InkmapError> {
        if !point.is_valid() {
            return Err(InkmapError::InvalidCoordinate {
                lat: point.lat(),
                lon: point.lon(),
            });
        }

        let x = (normalized_x(point) - self.center_x) * self.world_size + self.half_width;
        let y = (normalized_y(point) - self.center_y) * self.world_size + self.half_height;
        Ok(ScreenPoint::new(x, y))
    }

    /// Projects every vertex of a sequence, failing on the first invalid one.
    pub fn project_all(&self, points: &[GeoPoint]) -> Result<Vec<ScreenPoint>, InkmapError> {
        points.iter().map(|p| self.project(p)).collect()
    }
}

/// Horizontal world coordinate in [0, 1].
fn normalized_x(point: &GeoPoint) -> f64 {
    (point.lon() + 180.0) / 360.0
}

/// Vertical world coordinate in [0, 1], 0 at the north edge.
fn normalized_y(point: &GeoPoint) -> f64 {
    let lat = point
        .lat()
        .clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE);
    let lat_rad = lat.to_radians();
    let y = (std::f64::consts::FRAC_PI_4 + lat_rad / 2.0).tan().ln();
    (1.0 - y / std::f64::consts::PI) / 2.0
}
