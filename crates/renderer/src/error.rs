//! Errors raised when moving pixels off a canvas.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("frame buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
