//! Grayscale conversion filter.
//!
//! Uses the plain channel average, `floor((R + G + B) / 3)`, rather than a
//! luminosity weighting. The intermediate is a `Gray8` plane; the filter
//! result is expanded back to RGB8 with `R = G = B`.

use ndarray::Array3;
use tracing::debug;

use crate::buffer::{channel_mean, ImageBuffer, PixelFormat};

/// Average-intensity plane of `image` as a `Gray8` buffer.
pub fn luminance_plane(image: &ImageBuffer) -> ImageBuffer {
    let (width, height) = image.size();
    let data = Array3::from_shape_fn((height, width, 1), |(y, x, _)| {
        gray_value(image.rgb_at(x, y))
    });
    ImageBuffer::from_raw(PixelFormat::Gray8, data)
}

/// Convert to gray, stored as RGB8 `(w, w, w)`.
pub fn black_white(image: &ImageBuffer) -> ImageBuffer {
    debug!(width = image.width(), height = image.height(), "black_white");
    luminance_plane(image).to_rgb8()
}

/// Single-pixel form of [`black_white`].
#[inline]
pub fn gray_value(rgb: [u8; 3]) -> u8 {
    channel_mean(rgb) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_image() -> ImageBuffer {
        ImageBuffer::from_rgb_pixels(
            2,
            2,
            &[[10, 20, 30], [40, 50, 60], [70, 80, 90], [100, 110, 120]],
        )
        .unwrap()
    }

    #[test]
    fn test_black_white_scenario() {
        let out = black_white(&sample_image());
        assert_eq!(out.format(), PixelFormat::Rgb8);
        assert_eq!(
            out.rgb_pixels(),
            vec![[20, 20, 20], [50, 50, 50], [80, 80, 80], [110, 110, 110]]
        );
    }

    #[test]
    fn test_black_white_floors() {
        let img = ImageBuffer::filled(1, 1, [1, 1, 2]).unwrap();
        assert_eq!(black_white(&img).rgb_at(0, 0), [1, 1, 1]);
        assert_eq!(gray_value([255, 255, 254]), 254);
    }

    #[test]
    fn test_black_white_idempotent() {
        let img = ImageBuffer::from_rgb_pixels(
            3,
            1,
            &[[0, 7, 255], [13, 200, 99], [255, 255, 255]],
        )
        .unwrap();
        let once = black_white(&img);
        assert_eq!(black_white(&once), once);
    }

    #[test]
    fn test_luminance_plane_is_gray8() {
        let plane = luminance_plane(&sample_image());
        assert_eq!(plane.format(), PixelFormat::Gray8);
        assert_eq!(plane.sample(1, 1, 0), 110);

        let img = sample_image();
        for y in 0..2 {
            for x in 0..2 {
                assert_eq!(plane.sample(x, y, 0), gray_value(img.rgb_at(x, y)));
            }
        }
    }
}
