//! Perspective starfield: a fixed pool of stars flying toward the viewer,
//! transient meteors and energy waves, and a hyperspace regime at high speed.
//!
//! - `Simulation` advances flight state and every pool by an elapsed delta
//! - `scene::draw_frame` paints the result onto any [`renderer::Canvas`]
//! - `Starfield` owns both plus a frame pacer and is what hosts drive

pub mod config;
pub mod error;
pub mod flight;
pub mod meteor;
pub mod palette;
pub mod scene;
pub mod scheduler;
pub mod simulation;
pub mod star;
pub mod starfield;
pub mod trail;
pub mod wave;

pub use config::*;
pub use error::*;
pub use flight::*;
pub use meteor::*;
pub use scene::draw_frame;
pub use scheduler::*;
pub use simulation::*;
pub use star::*;
pub use starfield::*;
pub use trail::*;
pub use wave::*;
