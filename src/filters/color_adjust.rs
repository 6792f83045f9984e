//! Color adjustment filters: Negative, Contrast.
//!
//! These are pixel-wise operations that don't require spatial context.
//! Any input format is read as RGB; output is always RGB8.

use ndarray::Array3;
use tracing::debug;

use super::core::ChannelSums;
use crate::buffer::{ImageBuffer, PixelFormat};
use crate::error::{EditError, Result};

// ============================================================================
// Negative
// ============================================================================

/// Invert every channel: `(255-R, 255-G, 255-B)`.
pub fn negative(image: &ImageBuffer) -> ImageBuffer {
    debug!(width = image.width(), height = image.height(), "negative");
    let (width, height) = image.size();
    let mut output = ImageBuffer::blank(width, height, PixelFormat::Rgb8);

    for y in 0..height {
        for x in 0..width {
            let [r, g, b] = image.rgb_at(x, y);
            output.put_rgb(x, y, [255 - r, 255 - g, 255 - b]);
        }
    }
    output
}

// ============================================================================
// Contrast
// ============================================================================

/// Raw contrast response before storage.
///
/// Pixels whose channel mean is below 128 are scaled by `1 - deg` and
/// capped at 255; the rest are scaled by `1 + deg` and floored at 0, with
/// no upper cap. Scaling truncates toward zero.
pub fn contrast_sums(image: &ImageBuffer, deg: f64) -> Result<ChannelSums> {
    if !(deg > 0.0 && deg < 1.0) {
        return Err(EditError::precondition(format!(
            "contrast degree must satisfy 0 < deg < 1, got {}",
            deg
        )));
    }

    let (width, height) = image.size();
    let mut data = Array3::<i32>::zeros((height, width, 3));

    for y in 0..height {
        for x in 0..width {
            let rgb = image.rgb_at(x, y);
            let mean = rgb.iter().map(|&v| v as f64).sum::<f64>() / 3.0;

            for (c, &v) in rgb.iter().enumerate() {
                data[[y, x, c]] = if mean < 128.0 {
                    ((v as f64 * (1.0 - deg)) as i32).min(255)
                } else {
                    ((v as f64 * (1.0 + deg)) as i32).max(0)
                };
            }
        }
    }

    Ok(ChannelSums::from_array(data))
}

/// Push dark pixels darker and bright pixels brighter.
///
/// # Arguments
/// * `image` - Source image
/// * `deg` - Strength, `0 < deg < 1`
pub fn contrast(image: &ImageBuffer, deg: f64) -> Result<ImageBuffer> {
    debug!(deg, "contrast");
    Ok(contrast_sums(image, deg)?.commit())
}
