//! Named editing operations.
//!
//! Each operation reads either the session's current image or its original,
//! runs the matching filter, and installs the result as the new current
//! image under its operation name. A filter that fails leaves the session
//! untouched.

use crate::buffer::ImageBuffer;
use crate::error::Result;
use crate::filters::blur::box_blur;
use crate::filters::color_adjust::{contrast, negative};
use crate::filters::core::{convolve_centered, Kernel};
use crate::filters::edge::edge_detection;
use crate::filters::grayscale::black_white;
use crate::filters::sharpen::{sharpen, sharpen_with_kernel_sums, SharpenStencil};
use crate::filters::stylize::silhouette;
use crate::session::EditSession;

/// A filter together with its parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Average over a `(2·deg+1)²` window.
    BoxBlur { deg: usize },
    /// 8-neighbor Laplacian outline.
    EdgeDetection,
    /// 1-bit threshold at 128 or at the image mean.
    Silhouette { relative: bool },
    /// Channel-average gray.
    BlackWhite,
    /// Channel inversion.
    Negative,
    /// Darken dark pixels, brighten bright ones; `0 < deg < 1`.
    Contrast { deg: f64 },
    /// Sharpen; `deg` is truncated to an integer.
    Sharpen { deg: f64, stencil: SharpenStencil },
    /// Arbitrary kernel, optionally normalized by `divisor`.
    Convolve { kernel: Kernel, divisor: Option<i32> },
}

impl Filter {
    /// Name recorded in the session history.
    pub fn name(&self) -> &'static str {
        match self {
            Filter::BoxBlur { .. } => "box_blur",
            Filter::EdgeDetection => "edge_detection",
            Filter::Silhouette { .. } => "silhouette",
            Filter::BlackWhite => "black_white",
            Filter::Negative => "negative",
            Filter::Contrast { .. } => "contrast",
            Filter::Sharpen { .. } => "sharpen",
            Filter::Convolve { .. } => "convolve",
        }
    }

    /// Run the filter on `image`, producing a new buffer.
    pub fn apply(&self, image: &ImageBuffer) -> Result<ImageBuffer> {
        match self {
            Filter::BoxBlur { deg } => box_blur(image, *deg),
            Filter::EdgeDetection => edge_detection(image),
            Filter::Silhouette { relative } => Ok(silhouette(image, *relative)),
            Filter::BlackWhite => Ok(black_white(image)),
            Filter::Negative => Ok(negative(image)),
            Filter::Contrast { deg } => contrast(image, *deg),
            Filter::Sharpen { deg, stencil } => sharpen(image, *deg, *stencil),
            Filter::Convolve { kernel, divisor } => {
                Ok(convolve_centered(image, kernel, *divisor)?.commit())
            }
        }
    }
}

impl EditSession {
    /// Apply `filter` to the current image, or to the original if `original`.
    pub fn run(&mut self, filter: &Filter, original: bool) -> Result<()> {
        let output = filter.apply(self.source(original))?;
        self.apply(output, filter.name());
        Ok(())
    }

    pub fn box_blur(&mut self, deg: usize, original: bool) -> Result<()> {
        self.run(&Filter::BoxBlur { deg }, original)
    }

    pub fn edge_detection(&mut self, original: bool) -> Result<()> {
        self.run(&Filter::EdgeDetection, original)
    }

    /// Replace the image with a 1-bit silhouette.
    pub fn silhouette(&mut self, relative: bool, original: bool) -> Result<()> {
        self.run(&Filter::Silhouette { relative }, original)
    }

    pub fn black_white(&mut self, original: bool) -> Result<()> {
        self.run(&Filter::BlackWhite, original)
    }

    pub fn negative(&mut self, original: bool) -> Result<()> {
        self.run(&Filter::Negative, original)
    }

    pub fn contrast(&mut self, deg: f64, original: bool) -> Result<()> {
        self.run(&Filter::Contrast { deg }, original)
    }

    /// Sharpen with the default flattened stencil.
    pub fn sharpen(&mut self, deg: f64, original: bool) -> Result<()> {
        self.run(
            &Filter::Sharpen {
                deg,
                stencil: SharpenStencil::default(),
            },
            original,
        )
    }

    /// Sharpen with a caller-supplied kernel, recorded as `"sharpen"`.
    pub fn sharpen_with_kernel(&mut self, kernel: &Kernel, original: bool) -> Result<()> {
        let output = sharpen_with_kernel_sums(self.source(original), kernel)?.commit();
        self.apply(output, "sharpen");
        Ok(())
    }
}
