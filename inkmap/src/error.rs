//! Error types used by the crate.

use image::ImageError;
use thiserror::Error;

/// Inkmap error type.
///
/// Only structural failures are represented here. Cosmetic problems (unknown
/// style override keys, icons skipped because of overlap) never abort a
/// render and are reported through
/// [`RenderDiagnostics`](crate::diagnostics::RenderDiagnostics) instead.
#[derive(Debug, Error)]
pub enum InkmapError {
    /// Latitude or longitude outside of the valid range.
    #[error("invalid coordinate: lat {lat}, lon {lon}")]
    InvalidCoordinate {
        /// Latitude of the rejected coordinate, in degrees.
        lat: f64,
        /// Longitude of the rejected coordinate, in degrees.
        lon: f64,
    },
    /// Requested raster size exceeds the pixel budget.
    #[error("requested canvas size {width}x{height} exceeds available memory")]
    ResourceExhausted {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },
    /// Image decoding error.
    #[error("image decode error: {0:?}")]
    ImageDecode(#[from] ImageError),
    /// Error reading/writing data to the FS.
    #[error("failed to read file")]
    FsIo(#[from] std::io::Error),
    /// Generic error - details are inside.
    #[error("{0}")]
    Generic(String),
}
