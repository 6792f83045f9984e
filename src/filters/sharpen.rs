//! Sharpen filter.
//!
//! The default stencil is assembled from three rows of unequal length,
//!
//! ```text
//! [0, -a, 0, -a]
//! [4a + 1, -a]
//! [0, -a, 0]
//! ```
//!
//! concatenated positionally into nine weights and read back as a 3x3 grid.
//! The rows themselves are not a 3x3 layout; only the flattened sequence
//! `0, -a, 0, -a, 4a+1, -a, 0, -a, 0` is used. [`SharpenStencil::Plus`]
//! builds the conventional plus-shaped stencil directly from a 3x3 grid,
//! and [`sharpen_with_kernel_sums`] accepts any kernel.

use tracing::debug;

use super::core::{convolve_centered, ChannelSums, Kernel};
use crate::buffer::ImageBuffer;
use crate::error::{EditError, Result};

/// Which kernel layout [`sharpen`] uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SharpenStencil {
    /// Rows `[0,-a,0,-a]`, `[4a+1,-a]`, `[0,-a,0]` flattened positionally.
    #[default]
    Flattened,
    /// Conventional 3x3 plus-shaped stencil.
    Plus,
}

impl SharpenStencil {
    /// Build the kernel for integer strength `amount`.
    pub fn kernel(self, amount: i32) -> Result<Kernel> {
        let a = amount;
        match self {
            SharpenStencil::Flattened => Kernel::from_rows(&[
                &[0, -a, 0, -a],
                &[4 * a + 1, -a],
                &[0, -a, 0],
            ]),
            SharpenStencil::Plus => Kernel::new(vec![
                0, -a, 0,
                -a, 4 * a + 1, -a,
                0, -a, 0,
            ]),
        }
    }
}

/// Truncate a sharpen degree toward zero.
///
/// The bound keeps `4a + 1` representable; sums that still overflow are
/// rejected by the convolution engine.
pub fn sharpen_amount(deg: f64) -> Result<i32> {
    if !deg.is_finite() || deg.abs() > i32::MAX as f64 / 8.0 {
        return Err(EditError::precondition(format!(
            "sharpen degree {} is not a usable finite number",
            deg
        )));
    }
    Ok(deg as i32)
}

/// Unclamped sharpen response.
pub fn sharpen_sums(image: &ImageBuffer, deg: f64, stencil: SharpenStencil) -> Result<ChannelSums> {
    let kernel = stencil.kernel(sharpen_amount(deg)?)?;
    sharpen_with_kernel_sums(image, &kernel)
}

/// Sharpen with a caller-built kernel.
pub fn sharpen_with_kernel_sums(image: &ImageBuffer, kernel: &Kernel) -> Result<ChannelSums> {
    convolve_centered(image, kernel, None)
}

/// Sharpen `image`; `deg` is truncated to an integer. Negative values blur.
pub fn sharpen(image: &ImageBuffer, deg: f64, stencil: SharpenStencil) -> Result<ImageBuffer> {
    debug!(deg, ?stencil, "sharpen");
    Ok(sharpen_sums(image, deg, stencil)?.commit())
}
