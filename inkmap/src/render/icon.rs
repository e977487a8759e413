//! Icon placement for point-of-interest and building markers.
//!
//! Icons are placed in input order with a sequential acceptance scan: the
//! first icon claims its pixel space, later icons whose bounding boxes
//! overlap an already placed one are skipped and reported through the render
//! diagnostics. This favors deterministic, order-stable output over optimal
//! packing.

use ahash::{HashMap, HashMapExt};
use tiny_skia::{IntSize, Pixmap};

use crate::error::InkmapError;
use crate::projection::ScreenPoint;
use crate::style::{IconSizing, REFERENCE_ZOOM};

/// An image decoded into premultiplied RGBA, ready for blitting.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pixmap: Pixmap,
}

impl DecodedImage {
    /// Decodes an image from a byte slice.
    ///
    /// Attempts to guess the format of the image from the data. Non-RGBA
    /// images are converted to RGBA.
    pub fn decode(bytes: &[u8]) -> Result<Self, InkmapError> {
        let decoded = image::load_from_memory(bytes)?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();

        let mut data = rgba.into_raw();
        premultiply(&mut data);

        let size = IntSize::from_wh(width, height)
            .ok_or_else(|| InkmapError::Generic("zero-sized icon image".to_string()))?;
        let pixmap = Pixmap::from_vec(data, size)
            .ok_or_else(|| InkmapError::Generic("icon pixel buffer mismatch".to_string()))?;

        Ok(Self { pixmap })
    }

    /// Width of the image in pixels.
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Height of the image in pixels.
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub(crate) fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }
}

fn premultiply(rgba: &mut [u8]) {
    for pixel in rgba.chunks_exact_mut(4) {
        let a = pixel[3] as u16;
        pixel[0] = ((pixel[0] as u16 * a) / 255) as u8;
        pixel[1] = ((pixel[1] as u16 * a) / 255) as u8;
        pixel[2] = ((pixel[2] as u16 * a) / 255) as u8;
    }
}

/// Named icon images referenced by styles.
#[derive(Debug, Default, Clone)]
pub struct IconRegistry {
    icons: HashMap<String, DecodedImage>,
}

impl IconRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            icons: HashMap::new(),
        }
    }

    /// Registers an icon under the given name, replacing any previous one.
    pub fn insert(&mut self, name: impl Into<String>, image: DecodedImage) {
        self.icons.insert(name.into(), image);
    }

    /// Returns the icon registered under the given name.
    pub fn get(&self, name: &str) -> Option<&DecodedImage> {
        self.icons.get(name)
    }
}

/// Icon size in pixels for the given zoom level: the configured base size at
/// [`REFERENCE_ZOOM`], doubling per zoom level, clamped to the configured
/// bounds.
pub fn scaled_icon_size(zoom: f64, sizing: &IconSizing) -> f64 {
    (sizing.base * 2f64.powf(zoom - REFERENCE_ZOOM)).clamp(sizing.min, sizing.max)
}

/// Axis-aligned pixel-space bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PixelRect {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
}

impl PixelRect {
    pub(crate) fn centered_at(anchor: ScreenPoint, width: f64, height: f64) -> Self {
        Self {
            left: anchor.x - width / 2.0,
            top: anchor.y - height / 2.0,
            right: anchor.x + width / 2.0,
            bottom: anchor.y + height / 2.0,
        }
    }

    pub(crate) fn left(&self) -> f64 {
        self.left
    }

    pub(crate) fn top(&self) -> f64 {
        self.top
    }

    fn intersects(&self, other: &PixelRect) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }
}

/// Sequential acceptance scan over already placed icon boxes.
#[derive(Debug, Default)]
pub(crate) struct IconPlacer {
    placed: Vec<PixelRect>,
    skipped: Vec<u64>,
}

impl IconPlacer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Claims the given box if it does not overlap any previously placed one.
    /// Returns false and records the element as skipped otherwise.
    pub(crate) fn try_place(&mut self, element_id: u64, rect: PixelRect) -> bool {
        if self.placed.iter().any(|placed| placed.intersects(&rect)) {
            self.skipped.push(element_id);
            return false;
        }
        self.placed.push(rect);
        true
    }

    pub(crate) fn skipped(&self) -> &[u64] {
        &self.skipped
    }
}
