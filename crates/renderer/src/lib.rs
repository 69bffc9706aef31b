//! 2D drawing surfaces for the starfield.

pub mod canvas;
pub mod error;
pub mod raster;
pub mod recording;

pub use canvas::*;
pub use error::*;
pub use raster::*;
pub use recording::*;
