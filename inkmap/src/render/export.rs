//! Flattening of a finished canvas into an exportable pixel buffer.

use image::imageops::FilterType;
use image::RgbaImage;

use crate::error::InkmapError;
use crate::render::canvas::{Canvas, MAX_PIXELS};
use crate::view::Size;

/// Flattens the canvas into a straight (non-premultiplied) RGBA buffer at its
/// native resolution.
pub fn finalize(canvas: Canvas) -> Result<RgbaImage, InkmapError> {
    let pixmap = canvas.into_pixmap();
    let width = pixmap.width();
    let height = pixmap.height();

    let mut data = pixmap.take();
    demultiply(&mut data);

    RgbaImage::from_raw(width, height, data)
        .ok_or_else(|| InkmapError::Generic("pixel buffer size mismatch".to_string()))
}

/// Flattens the canvas and resamples it to the requested output resolution.
///
/// Fails with [`InkmapError::ResourceExhausted`] if the target size exceeds
/// the pixel budget.
pub fn finalize_scaled(canvas: Canvas, target: Size) -> Result<RgbaImage, InkmapError> {
    let pixels = target.width() as u64 * target.height() as u64;
    if pixels > MAX_PIXELS {
        return Err(InkmapError::ResourceExhausted {
            width: target.width(),
            height: target.height(),
        });
    }
    if target.is_zero() {
        return Err(InkmapError::Generic(
            "output size must not be zero".to_string(),
        ));
    }

    let native = canvas.size();
    let image = finalize(canvas)?;
    if target == native {
        return Ok(image);
    }

    Ok(image::imageops::resize(
        &image,
        target.width(),
        target.height(),
        FilterType::Lanczos3,
    ))
}

/// Converts premultiplied RGBA back to straight alpha.
fn demultiply(rgba: &mut [u8]) {
    for pixel in rgba.chunks_exact_mut(4) {
        let a = pixel[3] as u16;
        if a > 0 && a < 255 {
            pixel[0] = ((pixel[0] as u16 * 255) / a).min(255) as u8;
            pixel[1] = ((pixel[1] as u16 * 255) / a).min(255) as u8;
            pixel[2] = ((pixel[2] as u16 * 255) / a).min(255) as u8;
        }
    }
}
