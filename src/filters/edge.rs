//! Edge detection.
//!
//! Applies an 8-neighbor Laplacian to each RGB channel independently, so
//! edges keep the color of the channel that changes. Flat regions go black.

use tracing::debug;

use super::core::{convolve_centered, ChannelSums, Kernel};
use crate::buffer::ImageBuffer;
use crate::error::Result;

/// 8-neighbor Laplacian:
///
/// ```text
/// -1 -1 -1
/// -1  8 -1
/// -1 -1 -1
/// ```
pub const EDGE_WEIGHTS: [i32; 9] = [-1, -1, -1, -1, 8, -1, -1, -1, -1];

pub fn edge_kernel() -> Result<Kernel> {
    Kernel::new(EDGE_WEIGHTS.to_vec())
}

/// Raw Laplacian response; values may be negative or exceed 255.
pub fn edge_detection_sums(image: &ImageBuffer) -> Result<ChannelSums> {
    convolve_centered(image, &edge_kernel()?, None)
}

/// Colored outline of `image` on a black background.
pub fn edge_detection(image: &ImageBuffer) -> Result<ImageBuffer> {
    debug!(width = image.width(), height = image.height(), "edge_detection");
    Ok(edge_detection_sums(image)?.commit())
}
