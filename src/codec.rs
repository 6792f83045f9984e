//! Bitmap codec boundary.
//!
//! File decoding and encoding is delegated to the `image` crate. 8-bit
//! luminance files load as `Gray8`; everything else is converted to `Rgb8`.
//! `Bit1` buffers are written as black/white luminance.

use std::path::Path;

use image::{DynamicImage, GrayImage, RgbImage};
use ndarray::Array3;
use tracing::debug;

use crate::buffer::{ImageBuffer, PixelFormat};
use crate::error::{EditError, Result};

/// Decode the image at `path`.
pub fn load(path: impl AsRef<Path>) -> Result<ImageBuffer> {
    let path = path.as_ref();
    let decoded = image::open(path)?;
    let buffer = from_dynamic(decoded)?;
    debug!(
        path = %path.display(),
        width = buffer.width(),
        height = buffer.height(),
        format = ?buffer.format(),
        "image loaded"
    );
    Ok(buffer)
}

/// Encode `buffer` to `path`; the file format follows the extension.
pub fn save(buffer: &ImageBuffer, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    to_dynamic(buffer)?.save(path)?;
    debug!(path = %path.display(), "image saved");
    Ok(())
}

/// Convert a decoded image into an [`ImageBuffer`].
pub fn from_dynamic(image: DynamicImage) -> Result<ImageBuffer> {
    let (format, width, height, raw) = match image {
        DynamicImage::ImageLuma8(gray) => {
            let (w, h) = gray.dimensions();
            (PixelFormat::Gray8, w, h, gray.into_raw())
        }
        other => {
            let rgb = other.to_rgb8();
            let (w, h) = rgb.dimensions();
            (PixelFormat::Rgb8, w, h, rgb.into_raw())
        }
    };
    let data = Array3::from_shape_vec(
        (height as usize, width as usize, format.channels()),
        raw,
    )?;
    ImageBuffer::from_array(format, data)
}

/// Convert an [`ImageBuffer`] into an encodable image.
pub fn to_dynamic(buffer: &ImageBuffer) -> Result<DynamicImage> {
    let width = buffer.width() as u32;
    let height = buffer.height() as u32;
    let samples = buffer.as_array();

    let image = match buffer.format() {
        PixelFormat::Rgb8 => {
            RgbImage::from_raw(width, height, samples.iter().copied().collect())
                .map(DynamicImage::ImageRgb8)
        }
        PixelFormat::Gray8 => {
            GrayImage::from_raw(width, height, samples.iter().copied().collect())
                .map(DynamicImage::ImageLuma8)
        }
        PixelFormat::Bit1 => GrayImage::from_raw(
            width,
            height,
            samples.iter().map(|&v| if v != 0 { 255 } else { 0 }).collect(),
        )
        .map(DynamicImage::ImageLuma8),
    };

    image.ok_or_else(|| {
        EditError::precondition(format!(
            "{}x{} buffer does not fit an encodable image",
            width, height
        ))
    })
}
