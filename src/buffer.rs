//! In-memory pixel grid.
//!
//! ## Layout
//!
//! Pixels live in an `Array3<u8>` of shape (height, width, channels),
//! indexed `[[y, x, c]]`:
//!
//! | Format | Channels | Sample range |
//! |--------|----------|--------------|
//! | Rgb8   | 3        | 0-255 per channel |
//! | Gray8  | 1        | 0-255 luminance |
//! | Bit1   | 1        | 0 or 1 |
//!
//! Filters never mutate a buffer they were given; they allocate a new one.
//! Every buffer owns its storage, so clones are fully independent.

use ndarray::{Array3, ArrayView3};

use crate::error::{EditError, Result};

/// Sample layout of an [`ImageBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// Red, green, blue, 8 bits each.
    Rgb8,
    /// Single 8-bit luminance channel.
    Gray8,
    /// Two-valued pixels, stored as 0 or 1.
    Bit1,
}

impl PixelFormat {
    /// Number of stored channels per pixel.
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::Rgb8 => 3,
            PixelFormat::Gray8 | PixelFormat::Bit1 => 1,
        }
    }

    /// Infer an 8-bit format from a channel count (3 → RGB, 1 → gray).
    pub fn from_channels(channels: usize) -> Option<Self> {
        match channels {
            3 => Some(PixelFormat::Rgb8),
            1 => Some(PixelFormat::Gray8),
            _ => None,
        }
    }
}

/// A width × height grid of pixels in one [`PixelFormat`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    format: PixelFormat,
    data: Array3<u8>,
}

impl ImageBuffer {
    /// Create an all-black buffer.
    ///
    /// Both dimensions must be positive.
    pub fn new(width: usize, height: usize, format: PixelFormat) -> Result<Self> {
        check_dimensions(width, height)?;
        Ok(Self::blank(width, height, format))
    }

    /// Wrap an existing (height, width, channels) array.
    ///
    /// For `Bit1`, any non-zero sample is stored as 1.
    pub fn from_array(format: PixelFormat, data: Array3<u8>) -> Result<Self> {
        let (height, width, channels) = data.dim();
        check_dimensions(width, height)?;
        if channels != format.channels() {
            return Err(EditError::precondition(format!(
                "{:?} needs {} channel(s), got {}",
                format,
                format.channels(),
                channels
            )));
        }
        let data = match format {
            PixelFormat::Bit1 => data.mapv(|v| u8::from(v != 0)),
            _ => data,
        };
        Ok(Self { format, data })
    }

    /// Build an RGB buffer from row-major pixels.
    pub fn from_rgb_pixels(width: usize, height: usize, pixels: &[[u8; 3]]) -> Result<Self> {
        check_dimensions(width, height)?;
        let flat: Vec<u8> = pixels.iter().flatten().copied().collect();
        let data = Array3::from_shape_vec((height, width, 3), flat)?;
        Ok(Self {
            format: PixelFormat::Rgb8,
            data,
        })
    }

    /// Build a uniformly colored RGB buffer.
    pub fn filled(width: usize, height: usize, rgb: [u8; 3]) -> Result<Self> {
        check_dimensions(width, height)?;
        let data = Array3::from_shape_fn((height, width, 3), |(_, _, c)| rgb[c]);
        Ok(Self {
            format: PixelFormat::Rgb8,
            data,
        })
    }

    /// Wrap an array already known to match `format`.
    pub(crate) fn from_raw(format: PixelFormat, data: Array3<u8>) -> Self {
        Self { format, data }
    }

    /// Infallible black canvas for internal use; callers guarantee positive dimensions.
    pub(crate) fn blank(width: usize, height: usize, format: PixelFormat) -> Self {
        Self {
            format,
            data: Array3::<u8>::zeros((height, width, format.channels())),
        }
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    /// `(width, height)`.
    pub fn size(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Read pixel `(x, y)` as an RGB triple.
    ///
    /// Gray pixels expand to `(v, v, v)`; `Bit1` pixels read as white or black.
    #[inline]
    pub fn rgb_at(&self, x: usize, y: usize) -> [u8; 3] {
        match self.format {
            PixelFormat::Rgb8 => [
                self.data[[y, x, 0]],
                self.data[[y, x, 1]],
                self.data[[y, x, 2]],
            ],
            PixelFormat::Gray8 => {
                let v = self.data[[y, x, 0]];
                [v, v, v]
            }
            PixelFormat::Bit1 => {
                let v = if self.data[[y, x, 0]] != 0 { 255 } else { 0 };
                [v, v, v]
            }
        }
    }

    /// Raw stored sample (0/1 for `Bit1`).
    #[inline]
    pub fn sample(&self, x: usize, y: usize, channel: usize) -> u8 {
        self.data[[y, x, channel]]
    }

    /// Write pixel `(x, y)` from an RGB triple, converting to the buffer's format.
    pub fn put_rgb(&mut self, x: usize, y: usize, rgb: [u8; 3]) {
        match self.format {
            PixelFormat::Rgb8 => {
                for (c, v) in rgb.into_iter().enumerate() {
                    self.data[[y, x, c]] = v;
                }
            }
            PixelFormat::Gray8 => {
                self.data[[y, x, 0]] = channel_mean(rgb) as u8;
            }
            PixelFormat::Bit1 => {
                self.data[[y, x, 0]] = u8::from(channel_mean(rgb) >= 128);
            }
        }
    }

    /// All pixels as RGB triples in row-major order.
    pub fn rgb_pixels(&self) -> Vec<[u8; 3]> {
        let (width, height) = self.size();
        let mut out = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                out.push(self.rgb_at(x, y));
            }
        }
        out
    }

    /// Convert to an RGB8 buffer (copy if already RGB8).
    pub fn to_rgb8(&self) -> ImageBuffer {
        if self.format == PixelFormat::Rgb8 {
            return self.clone();
        }
        let (width, height) = self.size();
        let data = Array3::from_shape_fn((height, width, 3), |(y, x, c)| self.rgb_at(x, y)[c]);
        ImageBuffer {
            format: PixelFormat::Rgb8,
            data,
        }
    }

    pub fn as_array(&self) -> ArrayView3<'_, u8> {
        self.data.view()
    }

    pub fn into_array(self) -> Array3<u8> {
        self.data
    }
}

/// Integer mean of the three channels, `floor((R+G+B)/3)`.
#[inline]
pub(crate) fn channel_mean(rgb: [u8; 3]) -> u32 {
    (rgb[0] as u32 + rgb[1] as u32 + rgb[2] as u32) / 3
}

fn check_dimensions(width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(EditError::precondition(format!(
            "image dimensions must be positive, got {}x{}",
            width, height
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_black() {
        let img = ImageBuffer::new(3, 2, PixelFormat::Rgb8).unwrap();
        assert_eq!(img.size(), (3, 2));
        assert!(img.rgb_pixels().iter().all(|p| *p == [0, 0, 0]));
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert!(matches!(
            ImageBuffer::new(0, 4, PixelFormat::Gray8),
            Err(EditError::Precondition(_))
        ));
    }

    #[test]
    fn test_from_rgb_pixels_row_major() {
        let img = ImageBuffer::from_rgb_pixels(2, 1, &[[1, 2, 3], [4, 5, 6]]).unwrap();
        assert_eq!(img.rgb_at(0, 0), [1, 2, 3]);
        assert_eq!(img.rgb_at(1, 0), [4, 5, 6]);
    }

    #[test]
    fn test_from_rgb_pixels_wrong_count() {
        let err = ImageBuffer::from_rgb_pixels(2, 2, &[[0, 0, 0]]).unwrap_err();
        assert!(matches!(err, EditError::Shape(_)));
    }

    #[test]
    fn test_from_array_channel_mismatch() {
        let data = Array3::<u8>::zeros((2, 2, 3));
        assert!(ImageBuffer::from_array(PixelFormat::Gray8, data).is_err());
    }

    #[test]
    fn test_bit1_reads_as_black_or_white() {
        let mut data = Array3::<u8>::zeros((1, 2, 1));
        data[[0, 1, 0]] = 7;
        let img = ImageBuffer::from_array(PixelFormat::Bit1, data).unwrap();
        assert_eq!(img.sample(1, 0, 0), 1);
        assert_eq!(img.rgb_at(0, 0), [0, 0, 0]);
        assert_eq!(img.rgb_at(1, 0), [255, 255, 255]);
    }

    #[test]
    fn test_gray_to_rgb8() {
        let mut data = Array3::<u8>::zeros((1, 1, 1));
        data[[0, 0, 0]] = 90;
        let img = ImageBuffer::from_array(PixelFormat::Gray8, data).unwrap();
        let rgb = img.to_rgb8();
        assert_eq!(rgb.format(), PixelFormat::Rgb8);
        assert_eq!(rgb.rgb_at(0, 0), [90, 90, 90]);
    }

    #[test]
    fn test_clone_is_independent() {
        let a = ImageBuffer::filled(2, 2, [10, 10, 10]).unwrap();
        let mut b = a.clone();
        b.put_rgb(0, 0, [99, 99, 99]);
        assert_eq!(a.rgb_at(0, 0), [10, 10, 10]);
        assert_eq!(b.rgb_at(0, 0), [99, 99, 99]);
    }
}
