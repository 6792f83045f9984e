//! Error types for image editing sessions and filters.

use thiserror::Error;

/// Errors raised by filters, the edit session and the codec boundary.
#[derive(Error, Debug)]
pub enum EditError {
    /// Neither a source buffer nor a path was supplied.
    #[error("no source image: supply either an image buffer or a path to load")]
    Construction,

    /// Unlimited-mode revert with only the initial entry left on the stack.
    #[error("cannot revert past the original image")]
    Underflow,

    /// Single-step revert with no saved state to restore.
    #[error("the session has already been reverted or has not been edited yet")]
    NotRevertible,

    /// A caller-supplied argument is outside its documented domain.
    #[error("precondition violated: {0}")]
    Precondition(String),

    /// A pixel grid could not be assembled with the requested shape.
    #[error("pixel grid shape mismatch: {0}")]
    Shape(#[from] ndarray::ShapeError),

    /// The bitmap codec failed to read or write a file.
    #[error("codec error: {0}")]
    Codec(#[from] image::ImageError),
}

impl EditError {
    pub(crate) fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition(message.into())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EditError>;
