//! Construction-time failures. Once a starfield is running nothing in the
//! frame path can fail.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StarfieldError {
    #[error("drawing surface is {width}x{height}; both dimensions must be non-zero")]
    EmptySurface { width: u32, height: u32 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
