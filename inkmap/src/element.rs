//! Raw tagged geographic primitives as supplied by the data acquisition
//! collaborator.

use ahash::{HashMap, HashMapExt};
use serde::{Deserialize, Serialize};

/// 2d point on the surface of the Earth, in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct GeoPoint {
    lat: f64,
    lon: f64,
}

impl GeoPoint {
    /// Creates a new point from latitude and longitude values (in degrees).
    pub fn latlon(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Latitude in radians.
    pub fn lat_rad(&self) -> f64 {
        self.lat.to_radians()
    }

    /// Longitude in radians.
    pub fn lon_rad(&self) -> f64 {
        self.lon.to_radians()
    }

    /// Returns true if latitude is within [-90, 90] and longitude within [-180, 180].
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// Creates a new [`GeoPoint`] from latitude and longitude values (in degrees).
#[macro_export]
macro_rules! latlon {
    ($lat:expr, $lon:expr) => {
        $crate::element::GeoPoint::latlon($lat, $lon)
    };
}

/// Geometry of a [`GeoElement`].
///
/// Multi-geometries are not represented; the data acquisition collaborator
/// splits them into one element per part before handing them over.
#[derive(Debug, Clone, PartialEq)]
pub enum Geom {
    /// A single coordinate.
    Point(GeoPoint),
    /// An open sequence of coordinates drawn as a path.
    Line(Vec<GeoPoint>),
    /// A closed outer ring. The first vertex does not need to be repeated at
    /// the end.
    Polygon(Vec<GeoPoint>),
}

impl Geom {
    /// All vertices of the geometry in order.
    pub fn points(&self) -> &[GeoPoint] {
        match self {
            Geom::Point(p) => std::slice::from_ref(p),
            Geom::Line(points) => points,
            Geom::Polygon(points) => points,
        }
    }

    /// Returns true if this is a point geometry.
    pub fn is_point(&self) -> bool {
        matches!(self, Geom::Point(_))
    }
}

/// A raw tagged geographic primitive from the source map data.
///
/// Elements are immutable once constructed and are owned exclusively by a
/// single pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoElement {
    id: u64,
    geometry: Geom,
    tags: HashMap<String, String>,
}

impl GeoElement {
    /// Creates a new element from its source id, geometry and tag mapping.
    pub fn new(
        id: u64,
        geometry: Geom,
        tags: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        Self {
            id,
            geometry,
            tags: tags.into_iter().collect(),
        }
    }

    /// Creates a new element without any tags.
    pub fn untagged(id: u64, geometry: Geom) -> Self {
        Self {
            id,
            geometry,
            tags: HashMap::new(),
        }
    }

    /// Source element id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Geometry of the element.
    pub fn geometry(&self) -> &Geom {
        &self.geometry
    }

    /// Value of the given tag, if present.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(|v| v.as_str())
    }

    /// All tags of the element.
    pub fn tags(&self) -> &HashMap<String, String> {
        &self.tags
    }
}
