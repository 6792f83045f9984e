//! WebAssembly exports for convimg filters.
//!
//! These functions are exposed to JavaScript via wasm-bindgen.
//!
//! ## Buffer Layout
//!
//! Every function takes and returns a flat RGB8 array
//! (length = width * height * 3). 1-bit results are expanded to
//! black/white RGB before they are returned.

use ndarray::Array3;
use wasm_bindgen::prelude::*;

use crate::buffer::{ImageBuffer, PixelFormat};
use crate::catalog::Filter;
use crate::filters::sharpen::SharpenStencil;

fn rgb_from_flat(data: &[u8], width: usize, height: usize) -> Result<ImageBuffer, JsError> {
    let array = Array3::from_shape_vec((height, width, 3), data.to_vec())?;
    Ok(ImageBuffer::from_array(PixelFormat::Rgb8, array)?)
}

fn run_flat(
    filter: Filter,
    data: &[u8],
    width: usize,
    height: usize,
) -> Result<Vec<u8>, JsError> {
    let input = rgb_from_flat(data, width, height)?;
    let output = filter.apply(&input)?.to_rgb8();
    Ok(output.into_array().into_raw_vec_and_offset().0)
}

// ============================================================================
// Convolution filters
// ============================================================================

/// Box blur over a `(2*deg+1)` square window.
///
/// # Arguments
/// * `data` - Flat array of RGB bytes
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `deg` - Blur radius
#[wasm_bindgen]
pub fn box_blur_rgb_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    deg: usize,
) -> Result<Vec<u8>, JsError> {
    run_flat(Filter::BoxBlur { deg }, data, width, height)
}

/// 8-neighbor edge detection.
#[wasm_bindgen]
pub fn edge_detection_rgb_wasm(
    data: &[u8],
    width: usize,
    height: usize,
) -> Result<Vec<u8>, JsError> {
    run_flat(Filter::EdgeDetection, data, width, height)
}

/// Sharpen; `deg` is truncated to an integer.
///
/// `plus_stencil` selects the 4-neighbor cross instead of the default
/// flattened stencil.
#[wasm_bindgen]
pub fn sharpen_rgb_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    deg: f64,
    plus_stencil: bool,
) -> Result<Vec<u8>, JsError> {
    let stencil = if plus_stencil {
        SharpenStencil::Plus
    } else {
        SharpenStencil::Flattened
    };
    run_flat(Filter::Sharpen { deg, stencil }, data, width, height)
}

// ============================================================================
// Tone filters
// ============================================================================

#[wasm_bindgen]
pub fn negative_rgb_wasm(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, JsError> {
    run_flat(Filter::Negative, data, width, height)
}

#[wasm_bindgen]
pub fn black_white_rgb_wasm(
    data: &[u8],
    width: usize,
    height: usize,
) -> Result<Vec<u8>, JsError> {
    run_flat(Filter::BlackWhite, data, width, height)
}

/// Contrast stretch; `deg` must lie strictly between 0 and 1.
#[wasm_bindgen]
pub fn contrast_rgb_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    deg: f64,
) -> Result<Vec<u8>, JsError> {
    run_flat(Filter::Contrast { deg }, data, width, height)
}

/// 1-bit threshold, returned as black/white RGB.
#[wasm_bindgen]
pub fn silhouette_rgb_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    relative: bool,
) -> Result<Vec<u8>, JsError> {
    run_flat(Filter::Silhouette { relative }, data, width, height)
}
