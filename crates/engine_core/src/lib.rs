//! Core types shared by the starfield crates.
//!
//! This crate provides the foundational pieces used across the workspace:
//! - Perspective projection
//! - Structured colours
//! - Frame timing

pub mod color;
pub mod projection;
pub mod time;

pub use color::*;
pub use projection::*;
pub use time::*;

// Re-export commonly used types
pub use glam::{Vec2, Vec3};
