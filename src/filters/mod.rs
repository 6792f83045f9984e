//! Filter modules for image editing.
//!
//! ## Supported Formats
//!
//! Every filter accepts any [`PixelFormat`](crate::buffer::PixelFormat) and
//! reads pixels as RGB:
//!
//! | Format | Read as |
//! |--------|---------|
//! | Rgb8 | (R, G, B) |
//! | Gray8 | (v, v, v) |
//! | Bit1 | white or black |
//!
//! ## Architecture
//!
//! All filters follow these principles:
//! - **Pure** - Input buffers are borrowed; a new buffer is returned
//! - **Unclamped engine** - Arithmetic filters first produce
//!   [`ChannelSums`](core::ChannelSums); saturation happens only in
//!   [`commit`](core::ChannelSums::commit)
//! - **Black borders** - Neighborhood filters pad with black so the output
//!   keeps the source extent
//! - **Deterministic** - Convolution rows run in parallel with rayon
//!
//! ## Filter Categories
//!
//! - **Convolution**: box_blur, edge_detection, sharpen
//! - **Pixel-wise**: negative, contrast, black_white
//! - **Stylize**: silhouette (1-bit output)

pub mod core;
pub mod blur;
pub mod edge;
pub mod sharpen;
pub mod color_adjust;
pub mod grayscale;
pub mod stylize;
