//! Bounded history of past screen positions.

use glam::Vec2;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailPoint {
    pub position: Vec2,
    /// Fade weight; 0 is invisible, oldest points fade first.
    pub weight: f32,
}

/// Ring buffer with push-and-evict-oldest semantics. The cap is passed per
/// push because star trails grow and shrink with speed.
#[derive(Debug, Clone, Default)]
pub struct Trail {
    points: VecDeque<TrailPoint>,
}

impl Trail {
    /// Reserve room for `capacity` points so steady-state pushes don't allocate.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { points: VecDeque::with_capacity(capacity) }
    }

    /// Append a point at full weight, then evict from the front until at most
    /// `cap` points remain.
    pub fn push(&mut self, position: Vec2, cap: usize) {
        self.points.push_back(TrailPoint { position, weight: 1.0 });
        self.truncate(cap);
    }

    /// Drop the oldest points until at most `cap` remain.
    pub fn truncate(&mut self, cap: usize) {
        while self.points.len() > cap {
            self.points.pop_front();
        }
    }

    /// Reassign weights as `(index / len) * scale`, oldest first.
    pub fn fade(&mut self, scale: f32) {
        let len = self.points.len() as f32;
        for (i, point) in self.points.iter_mut().enumerate() {
            point.weight = (i as f32 / len) * scale;
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrailPoint> {
        self.points.iter()
    }

    /// Consecutive `(older, newer)` pairs; empty for fewer than two points.
    pub fn segments(&self) -> impl Iterator<Item = (&TrailPoint, &TrailPoint)> {
        self.points.iter().zip(self.points.iter().skip(1))
    }
}
