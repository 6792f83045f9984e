//! Core utilities shared by the convolution filters.
//!
//! This module provides:
//! - Border padding (black canvas, centered or top-left)
//! - Square integer kernels
//! - The convolution engine producing unclamped channel sums
//! - The commit step that saturates sums into RGB8 storage

use ndarray::{Array3, ArrayView3};
use rayon::prelude::*;
use tracing::trace;

use crate::buffer::{ImageBuffer, PixelFormat};
use crate::error::{EditError, Result};

// ============================================================================
// Padding
// ============================================================================

/// Copy `buffer` onto a black canvas enlarged by `excess` pixels on each axis.
///
/// With `center`, the source lands at offset `excess / 2` on both axes;
/// otherwise at the top-left corner. `excess == 0` returns an independent
/// copy of the buffer in its own format; any other value yields RGB8.
pub fn pad(buffer: &ImageBuffer, excess: usize, center: bool) -> ImageBuffer {
    if excess == 0 {
        return buffer.clone();
    }

    let (width, height) = buffer.size();
    trace!(width, height, excess, center, "pad");

    let offset = if center { excess / 2 } else { 0 };
    let mut canvas = ImageBuffer::blank(width + excess, height + excess, PixelFormat::Rgb8);

    for y in 0..height {
        for x in 0..width {
            canvas.put_rgb(x + offset, y + offset, buffer.rgb_at(x, y));
        }
    }

    canvas
}

// ============================================================================
// Kernels
// ============================================================================

/// Square weight kernel, flattened row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kernel {
    weights: Vec<i32>,
    side: usize,
}

impl Kernel {
    /// Creates a kernel from flattened weights.
    ///
    /// The length must be a perfect square with an odd side.
    pub fn new(weights: Vec<i32>) -> Result<Self> {
        let len = weights.len();
        let side = integer_sqrt(len);
        if len == 0 || side * side != len {
            return Err(EditError::precondition(format!(
                "kernel length {} is not a perfect square",
                len
            )));
        }
        if side % 2 == 0 {
            return Err(EditError::precondition(format!(
                "kernel side {} must be odd",
                side
            )));
        }
        Ok(Self { weights, side })
    }

    /// Creates a kernel by concatenating rows in order.
    ///
    /// Rows need not have equal length; only the total must form a square.
    pub fn from_rows(rows: &[&[i32]]) -> Result<Self> {
        Self::new(rows.iter().flat_map(|row| row.iter().copied()).collect())
    }

    /// A `side × side` kernel with every weight equal to `weight`.
    pub fn uniform(side: usize, weight: i32) -> Result<Self> {
        Self::new(vec![weight; side * side])
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn weights(&self) -> &[i32] {
        &self.weights
    }
}

fn integer_sqrt(n: usize) -> usize {
    let mut root = (n as f64).sqrt() as usize;
    while root * root > n {
        root -= 1;
    }
    while (root + 1) * (root + 1) <= n {
        root += 1;
    }
    root
}

// ============================================================================
// Channel sums
// ============================================================================

/// Per-pixel RGB results of a filter before they are committed to storage.
///
/// Values are not clamped and may fall outside 0-255.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSums {
    data: Array3<i32>,
}

impl ChannelSums {
    pub(crate) fn from_array(data: Array3<i32>) -> Self {
        Self { data }
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    /// Raw RGB sums at `(x, y)`.
    #[inline]
    pub fn at(&self, x: usize, y: usize) -> [i32; 3] {
        [
            self.data[[y, x, 0]],
            self.data[[y, x, 1]],
            self.data[[y, x, 2]],
        ]
    }

    pub fn as_array(&self) -> ArrayView3<'_, i32> {
        self.data.view()
    }

    /// Saturate every sample into 0-255 and store as RGB8.
    pub fn commit(&self) -> ImageBuffer {
        ImageBuffer::from_raw(
            PixelFormat::Rgb8,
            self.data.mapv(|v| v.clamp(0, 255) as u8),
        )
    }
}

// ============================================================================
// Convolution
// ============================================================================

/// Convolve an already padded buffer with `kernel`.
///
/// Output pixel `(x, y)` reads the padded region `[x, x+L-1] × [y, y+L-1]`,
/// so the result is `L - 1` pixels smaller than `padded` on each axis.
/// With `normalize`, each channel sum is divided by the divisor and
/// truncated toward zero. Sums are never clamped here.
///
/// # Errors
/// [`EditError::Precondition`] if the kernel does not fit the buffer, the
/// divisor is zero, or a channel sum does not fit in `i32`.
pub fn convolve(
    padded: &ImageBuffer,
    kernel: &Kernel,
    normalize: Option<i32>,
) -> Result<ChannelSums> {
    let side = kernel.side();
    let (padded_w, padded_h) = padded.size();

    if padded_w < side || padded_h < side {
        return Err(EditError::precondition(format!(
            "{}x{} buffer is smaller than a {}x{} kernel",
            padded_w, padded_h, side, side
        )));
    }
    if normalize == Some(0) {
        return Err(EditError::precondition("normalization divisor must be non-zero"));
    }

    let width = padded_w - side + 1;
    let height = padded_h - side + 1;
    trace!(width, height, side, ?normalize, "convolve");

    let weights = kernel.weights();
    let mut flat = vec![0i32; width * height * 3];

    // Rows are independent; each worker owns exactly one output row.
    // Accumulate in i64 so any i32 kernel over 8-bit samples cannot wrap.
    flat.par_chunks_mut(width * 3)
        .enumerate()
        .try_for_each(|(y, row)| -> Result<()> {
            for x in 0..width {
                let mut sums = [0i64; 3];
                for (i, &w) in weights.iter().enumerate() {
                    let rgb = padded.rgb_at(x + i % side, y + i / side);
                    for (s, v) in sums.iter_mut().zip(rgb) {
                        *s += v as i64 * w as i64;
                    }
                }
                for (c, s) in sums.into_iter().enumerate() {
                    let value = match normalize {
                        Some(divisor) => s / divisor as i64,
                        None => s,
                    };
                    row[x * 3 + c] = i32::try_from(value).map_err(|_| {
                        EditError::precondition(format!(
                            "channel sum {} at ({}, {}) overflows the convolution range",
                            value, x, y
                        ))
                    })?;
                }
            }
            Ok(())
        })?;

    let data = Array3::from_shape_vec((height, width, 3), flat)?;
    Ok(ChannelSums::from_array(data))
}

/// Pad `buffer` by `L - 1` (centered) and convolve, keeping the source extent.
pub fn convolve_centered(
    buffer: &ImageBuffer,
    kernel: &Kernel,
    normalize: Option<i32>,
) -> Result<ChannelSums> {
    let padded = pad(buffer, kernel.side() - 1, true);
    convolve(&padded, kernel, normalize)
}
