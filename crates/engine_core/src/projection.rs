//! Perspective projection from simulation space onto the drawing surface.
//!
//! Simulation coordinates are stored relative to the viewport centre; depth
//! `z` grows away from the viewer. A point projects with
//! `scale = perspective / (perspective + z)`.

use glam::{Vec2, Vec3};

/// Result of projecting one point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    /// Absolute screen position.
    pub screen: Vec2,
    /// Depth scale factor in `(0, 1]` for positive depths.
    pub scale: f32,
}

/// Depth scale for a point at depth `z`, or `None` when the denominator is
/// not positive or `z` is not a valid depth.
pub fn depth_scale(perspective: f32, z: f32) -> Option<f32> {
    if !(z > 0.0) {
        return None;
    }
    let denom = perspective + z;
    if !(denom > 0.0) {
        return None;
    }
    Some(perspective / denom)
}

/// Viewport-aware projector. Holds the centre the relative coordinates are
/// measured from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub perspective: f32,
    center: Vec2,
    size: Vec2,
}

impl Projection {
    pub fn new(perspective: f32, width: f32, height: f32) -> Self {
        let mut projection = Self {
            perspective,
            center: Vec2::ZERO,
            size: Vec2::ZERO,
        };
        projection.set_viewport(width, height);
        projection
    }

    /// Recompute the centre reference after a surface resize.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.size = Vec2::new(width.max(0.0), height.max(0.0));
        self.center = self.size * 0.5;
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Project a centre-relative point. `None` for `z <= 0`.
    pub fn project(&self, point: Vec3) -> Option<Projected> {
        let scale = depth_scale(self.perspective, point.z)?;
        Some(Projected {
            screen: self.center + Vec2::new(point.x, point.y) * scale,
            scale,
        })
    }

    /// Whether a screen point lies inside the viewport grown by `margin`.
    pub fn contains(&self, screen: Vec2, margin: f32) -> bool {
        screen.x >= -margin
            && screen.x <= self.size.x + margin
            && screen.y >= -margin
            && screen.y <= self.size.y + margin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearer_points_scale_larger() {
        let near = depth_scale(1000.0, 100.0).unwrap();
        let far = depth_scale(1000.0, 3000.0).unwrap();
        assert!(near > far);
        assert!((far - 0.25).abs() < 1e-6);
    }

    #[test]
    fn non_positive_depth_is_rejected() {
        assert_eq!(depth_scale(1000.0, 0.0), None);
        assert_eq!(depth_scale(1000.0, -1.0), None);
        assert_eq!(depth_scale(1000.0, f32::NAN), None);
        assert_eq!(depth_scale(-2000.0, 500.0), None);
    }

    #[test]
    fn project_is_relative_to_center() {
        let p = Projection::new(1000.0, 800.0, 600.0);
        let out = p.project(Vec3::new(100.0, -200.0, 1000.0)).unwrap();
        assert!((out.scale - 0.5).abs() < 1e-6);
        assert_eq!(out.screen, Vec2::new(450.0, 200.0));
    }

    #[test]
    fn resize_moves_center_only() {
        let mut p = Projection::new(1000.0, 800.0, 600.0);
        p.set_viewport(200.0, 100.0);
        assert_eq!(p.center(), Vec2::new(100.0, 50.0));
        assert_eq!(p.perspective, 1000.0);
        assert!(p.contains(Vec2::new(-10.0, 50.0), 20.0));
        assert!(!p.contains(Vec2::new(-30.0, 50.0), 20.0));
    }
}
