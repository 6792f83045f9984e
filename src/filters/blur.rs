//! Box blur.
//!
//! Averages each pixel with its `(2·deg+1)²` neighborhood. Pixels near the
//! border average against the black padding, so edges darken slightly.

use tracing::debug;

use super::core::{convolve_centered, ChannelSums, Kernel};
use crate::buffer::ImageBuffer;
use crate::error::Result;

/// Kernel used by [`box_blur`]: all ones, side `2·deg + 1`.
pub fn box_kernel(deg: usize) -> Result<Kernel> {
    Kernel::uniform(2 * deg + 1, 1)
}

/// Unclamped box blur sums (divided by the window area, truncated).
pub fn box_blur_sums(image: &ImageBuffer, deg: usize) -> Result<ChannelSums> {
    let kernel = box_kernel(deg)?;
    let area = (kernel.side() * kernel.side()) as i32;
    convolve_centered(image, &kernel, Some(area))
}

/// Apply box blur of radius `deg`; output has the source extent.
///
/// `deg == 0` is the identity.
pub fn box_blur(image: &ImageBuffer, deg: usize) -> Result<ImageBuffer> {
    debug!(deg, width = image.width(), height = image.height(), "box_blur");
    Ok(box_blur_sums(image, deg)?.commit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_blur_uniform_interior() {
        let img = ImageBuffer::filled(5, 5, [200, 200, 200]).unwrap();
        let out = box_blur(&img, 1).unwrap();
        assert_eq!(out.size(), (5, 5));
        for y in 1..4 {
            for x in 1..4 {
                assert_eq!(out.rgb_at(x, y), [200, 200, 200]);
            }
        }
    }

    #[test]
    fn test_box_blur_border_averages_with_black() {
        let img = ImageBuffer::filled(5, 5, [90, 90, 90]).unwrap();
        let out = box_blur(&img, 1).unwrap();
        // Corner sees 4 of 9 pixels: 360 / 9 = 40.
        assert_eq!(out.rgb_at(0, 0), [40, 40, 40]);
        // Edge sees 6 of 9: 540 / 9 = 60.
        assert_eq!(out.rgb_at(2, 0), [60, 60, 60]);
    }

    #[test]
    fn test_box_blur_zero_is_identity() {
        let img = ImageBuffer::from_rgb_pixels(2, 1, &[[1, 2, 3], [250, 251, 252]]).unwrap();
        assert_eq!(box_blur(&img, 0).unwrap(), img);
    }

    #[test]
    fn test_box_blur_truncates() {
        // Single bright pixel spreads as floor(100 / 9) = 11.
        let mut img = ImageBuffer::filled(3, 3, [0, 0, 0]).unwrap();
        img.put_rgb(1, 1, [100, 100, 100]);
        let out = box_blur(&img, 1).unwrap();
        assert_eq!(out.rgb_at(0, 0), [11, 11, 11]);
        assert_eq!(out.rgb_at(1, 1), [11, 11, 11]);
    }

    #[test]
    fn test_box_kernel_shape() {
        let k = box_kernel(2).unwrap();
        assert_eq!(k.side(), 5);
        assert!(k.weights().iter().all(|&w| w == 1));
    }
}
