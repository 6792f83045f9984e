//! convimg
//!
//! Raster image editing through convolution and tone filters, with undo.
//! Python bindings via PyO3 and WASM bindings for JavaScript are available
//! behind the `python` and `wasm` features.
//!
//! ## Image Format
//! Buffers hold one of three pixel formats:
//! - **RGB8**: (height, width, 3) - 3 color channels, 0-255
//! - **Gray8**: (height, width, 1) - single luminance channel, 0-255
//! - **Bit1**: (height, width, 1) - two-valued, produced by `silhouette`
//!
//! ## Architecture
//! - [`filters`] are pure functions from a borrowed buffer to a new buffer.
//! - [`session::EditSession`] owns the current and original images and the
//!   undo history (unlimited stack or single step).
//! - [`catalog`] binds the named operations to the session.
//! - [`codec`] loads and saves files through the `image` crate.
//!
//! ```
//! use convimg::{EditSession, HistoryMode, ImageBuffer};
//!
//! let image = ImageBuffer::filled(4, 4, [200, 120, 40]).unwrap();
//! let mut session = EditSession::new(image, HistoryMode::Unlimited);
//! session.negative(false).unwrap();
//! session.box_blur(1, false).unwrap();
//! session.revert(false).unwrap();
//! assert_eq!(session.history().unwrap(), &["original", "negative"]);
//! ```

pub mod buffer;
pub mod catalog;
pub mod codec;
pub mod error;
pub mod filters;
pub mod session;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use buffer::{ImageBuffer, PixelFormat};
pub use catalog::Filter;
pub use error::{EditError, Result};
pub use filters::core::{ChannelSums, Kernel};
pub use filters::sharpen::SharpenStencil;
pub use session::{EditSession, HistoryMode, SavePathPrompt, SessionBuilder, Viewer};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use std::path::PathBuf;

    use numpy::{IntoPyArray, PyArray3, PyReadonlyArray3};
    use pyo3::exceptions::{PyRuntimeError, PyValueError};
    use pyo3::prelude::*;

    use crate::buffer::{ImageBuffer, PixelFormat};
    use crate::catalog::Filter;
    use crate::error::EditError;
    use crate::filters::core::pad;
    use crate::filters::sharpen::SharpenStencil;
    use crate::session::{EditSession, HistoryMode};

    fn to_py_err(err: EditError) -> PyErr {
        match err {
            EditError::NotRevertible | EditError::Underflow => {
                PyRuntimeError::new_err(err.to_string())
            }
            other => PyValueError::new_err(other.to_string()),
        }
    }

    /// Accepts (H, W, 3) as RGB8 and (H, W, 1) as Gray8.
    fn buffer_from_numpy(image: PyReadonlyArray3<'_, u8>) -> PyResult<ImageBuffer> {
        let array = image.as_array();
        let channels = array.dim().2;
        let format = PixelFormat::from_channels(channels).ok_or_else(|| {
            PyValueError::new_err(format!("expected 1 or 3 channels, got {}", channels))
        })?;
        ImageBuffer::from_array(format, array.to_owned()).map_err(to_py_err)
    }

    fn run_filter<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        filter: Filter,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let input = buffer_from_numpy(image)?;
        let output = filter.apply(&input).map_err(to_py_err)?;
        Ok(output.into_array().into_pyarray(py))
    }

    // ========================================================================
    // Edit session
    // ========================================================================

    /// Image editing session with undo.
    ///
    /// With `stack=True` every edit can be reverted back to the original;
    /// otherwise only the last edit can be undone, once.
    #[pyclass(name = "ConvImg")]
    pub struct ConvImg {
        inner: EditSession,
    }

    #[pymethods]
    impl ConvImg {
        #[new]
        #[pyo3(signature = (directory=None, image=None, stack=true))]
        fn new<'py>(
            directory: Option<PathBuf>,
            image: Option<PyReadonlyArray3<'py, u8>>,
            stack: bool,
        ) -> PyResult<Self> {
            let mode = if stack {
                HistoryMode::Unlimited
            } else {
                HistoryMode::SingleStep
            };
            let mut builder = EditSession::builder().history(mode);
            if let Some(image) = image {
                builder = builder.image(buffer_from_numpy(image)?);
            }
            if let Some(path) = directory {
                builder = builder.path(path);
            }
            let inner = builder.build().map_err(to_py_err)?;
            Ok(Self { inner })
        }

        #[pyo3(signature = (deg, original=false))]
        fn box_blur(&mut self, deg: usize, original: bool) -> PyResult<()> {
            self.inner.box_blur(deg, original).map_err(to_py_err)
        }

        #[pyo3(signature = (original=false))]
        fn edge_detection(&mut self, original: bool) -> PyResult<()> {
            self.inner.edge_detection(original).map_err(to_py_err)
        }

        #[pyo3(signature = (relative=false, original=false))]
        fn silhouette(&mut self, relative: bool, original: bool) -> PyResult<()> {
            self.inner.silhouette(relative, original).map_err(to_py_err)
        }

        #[pyo3(signature = (original=false))]
        fn black_white(&mut self, original: bool) -> PyResult<()> {
            self.inner.black_white(original).map_err(to_py_err)
        }

        #[pyo3(signature = (original=false))]
        fn negative(&mut self, original: bool) -> PyResult<()> {
            self.inner.negative(original).map_err(to_py_err)
        }

        #[pyo3(signature = (deg, original=false))]
        fn contrast(&mut self, deg: f64, original: bool) -> PyResult<()> {
            self.inner.contrast(deg, original).map_err(to_py_err)
        }

        #[pyo3(signature = (deg, original=false))]
        fn sharpen(&mut self, deg: f64, original: bool) -> PyResult<()> {
            self.inner.sharpen(deg, original).map_err(to_py_err)
        }

        #[pyo3(signature = (original=false))]
        fn revert(&mut self, original: bool) -> PyResult<()> {
            self.inner.revert(original).map_err(to_py_err)
        }

        /// Copy of the current image as a (H, W, C) uint8 array.
        fn return_image<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray3<u8>> {
            self.inner.current().into_array().into_pyarray(py)
        }

        fn save(&self, path: PathBuf) -> PyResult<()> {
            self.inner.save(path).map_err(to_py_err)
        }

        #[getter]
        fn history(&self) -> Option<Vec<String>> {
            self.inner.history().map(|h| h.to_vec())
        }

        #[getter]
        fn stack_size(&self) -> Option<usize> {
            self.inner.stack_len()
        }

        fn __str__(&self) -> String {
            self.inner.to_string()
        }
    }

    // ========================================================================
    // Stateless filters
    // ========================================================================

    #[pyfunction]
    #[pyo3(signature = (image, excess, center=true))]
    pub fn pad_image<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        excess: usize,
        center: bool,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let input = buffer_from_numpy(image)?;
        Ok(pad(&input, excess, center).into_array().into_pyarray(py))
    }

    #[pyfunction]
    pub fn box_blur<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        deg: usize,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        run_filter(py, image, Filter::BoxBlur { deg })
    }

    #[pyfunction]
    pub fn edge_detection<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        run_filter(py, image, Filter::EdgeDetection)
    }

    #[pyfunction]
    #[pyo3(signature = (image, deg, plus_stencil=false))]
    pub fn sharpen<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        deg: f64,
        plus_stencil: bool,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let stencil = if plus_stencil {
            SharpenStencil::Plus
        } else {
            SharpenStencil::Flattened
        };
        run_filter(py, image, Filter::Sharpen { deg, stencil })
    }

    #[pyfunction]
    pub fn negative<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        run_filter(py, image, Filter::Negative)
    }

    #[pyfunction]
    pub fn black_white<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        run_filter(py, image, Filter::BlackWhite)
    }

    #[pyfunction]
    pub fn contrast<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        deg: f64,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        run_filter(py, image, Filter::Contrast { deg })
    }

    /// Returns (H, W, 1) with values 0 or 1.
    #[pyfunction]
    #[pyo3(signature = (image, relative=false))]
    pub fn silhouette<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        relative: bool,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        run_filter(py, image, Filter::Silhouette { relative })
    }

    /// convimg Rust extension module
    #[pymodule]
    pub fn convimg(m: &Bound<'_, PyModule>) -> PyResult<()> {
        // Session
        m.add_class::<ConvImg>()?;

        // Padding
        m.add_function(wrap_pyfunction!(pad_image, m)?)?;

        // Convolution filters
        m.add_function(wrap_pyfunction!(box_blur, m)?)?;
        m.add_function(wrap_pyfunction!(edge_detection, m)?)?;
        m.add_function(wrap_pyfunction!(sharpen, m)?)?;

        // Tone filters
        m.add_function(wrap_pyfunction!(negative, m)?)?;
        m.add_function(wrap_pyfunction!(black_white, m)?)?;
        m.add_function(wrap_pyfunction!(contrast, m)?)?;
        m.add_function(wrap_pyfunction!(silhouette, m)?)?;

        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::convimg;
