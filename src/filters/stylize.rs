//! Stylize filters: Silhouette.
//!
//! Silhouette is a binary threshold on the unrounded channel mean. The
//! output is a `Bit1` buffer: 1 where the pixel is at least as bright as
//! the benchmark, 0 elsewhere.

use ndarray::Array3;
use tracing::debug;

use crate::buffer::{channel_mean, ImageBuffer, PixelFormat};

/// Fixed benchmark used when `relative` is off.
pub const SILHOUETTE_BENCHMARK: f64 = 128.0;

/// Image-wide average of `floor((R+G+B)/3)`.
pub fn mean_intensity(image: &ImageBuffer) -> f64 {
    let (width, height) = image.size();
    let mut total: u64 = 0;
    for y in 0..height {
        for x in 0..width {
            total += channel_mean(image.rgb_at(x, y)) as u64;
        }
    }
    total as f64 / (width * height) as f64
}

/// Threshold `image` into a 1-bit silhouette.
///
/// # Arguments
/// * `image` - Source image
/// * `relative` - Use the image's [`mean_intensity`] as the benchmark
///   instead of [`SILHOUETTE_BENCHMARK`]
pub fn silhouette(image: &ImageBuffer, relative: bool) -> ImageBuffer {
    let benchmark = if relative {
        mean_intensity(image)
    } else {
        SILHOUETTE_BENCHMARK
    };
    debug!(relative, benchmark, "silhouette");

    let (width, height) = image.size();
    let data = Array3::from_shape_fn((height, width, 1), |(y, x, _)| {
        let [r, g, b] = image.rgb_at(x, y);
        let weight = (r as f64 + g as f64 + b as f64) / 3.0;
        u8::from(weight >= benchmark)
    });

    ImageBuffer::from_raw(PixelFormat::Bit1, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silhouette_fixed_benchmark() {
        let img = ImageBuffer::from_rgb_pixels(2, 1, &[[127, 127, 127], [128, 128, 128]]).unwrap();
        let out = silhouette(&img, false);
        assert_eq!(out.format(), PixelFormat::Bit1);
        assert_eq!(out.sample(0, 0, 0), 0);
        assert_eq!(out.sample(1, 0, 0), 1);
    }

    #[test]
    fn test_silhouette_uses_unrounded_weight() {
        // Mean 127.67 stays below 128.
        let img = ImageBuffer::filled(1, 1, [128, 128, 127]).unwrap();
        assert_eq!(silhouette(&img, false).sample(0, 0, 0), 0);
    }

    #[test]
    fn test_silhouette_relative() {
        let img = ImageBuffer::from_rgb_pixels(
            4,
            1,
            &[[10, 10, 10], [20, 20, 20], [30, 30, 30], [40, 40, 40]],
        )
        .unwrap();
        assert_eq!(mean_intensity(&img), 25.0);

        let out = silhouette(&img, true);
        let bits: Vec<u8> = (0..4).map(|x| out.sample(x, 0, 0)).collect();
        assert_eq!(bits, vec![0, 0, 1, 1]);

        // Absolute benchmark puts everything below.
        let out = silhouette(&img, false);
        assert!((0..4).all(|x| out.sample(x, 0, 0) == 0));
    }

    #[test]
    fn test_silhouette_relative_average_is_floored_per_pixel() {
        // Per-pixel floors 1 and 2 average to 1.5; weights 1.67 and 2.0 both pass.
        let img = ImageBuffer::from_rgb_pixels(2, 1, &[[1, 2, 2], [2, 2, 2]]).unwrap();
        assert_eq!(mean_intensity(&img), 1.5);
        let out = silhouette(&img, true);
        assert_eq!(out.sample(0, 0, 0), 1);
        assert_eq!(out.sample(1, 0, 0), 1);
    }

    #[test]
    fn test_silhouette_reads_as_black_and_white() {
        let img = ImageBuffer::filled(1, 1, [250, 250, 250]).unwrap();
        assert_eq!(silhouette(&img, false).rgb_at(0, 0), [255, 255, 255]);
    }
}
