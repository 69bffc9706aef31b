//! The drawing-surface contract the scene painter targets.
//!
//! Coordinates are in surface pixels with the origin at the top-left corner.
//! Every primitive alpha-blends over what is already there; nothing here ever
//! clears implicitly.

use engine_core::{Rgba, Vec2};

/// Dash pattern for strokes, in pixels along the path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dash {
    pub on: f32,
    pub off: f32,
    /// Pattern phase. Positive values shift the pattern backwards along the path.
    pub offset: f32,
}

impl Dash {
    pub fn new(on: f32, off: f32, offset: f32) -> Self {
        Self { on, off, offset }
    }

    /// Whether the point at arc length `s` falls on a dash. Degenerate
    /// patterns draw solid.
    pub fn is_on(&self, s: f32) -> bool {
        let period = self.on + self.off;
        if !(period > 0.0) || !(self.on > 0.0) {
            return true;
        }
        (s + self.offset).rem_euclid(period) < self.on
    }
}

/// Line style for `stroke_*` calls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Rgba,
    pub width: f32,
    pub dash: Option<Dash>,
}

impl Stroke {
    pub fn solid(color: Rgba, width: f32) -> Self {
        Self { color, width, dash: None }
    }

    pub fn dashed(color: Rgba, width: f32, dash: Dash) -> Self {
        Self { color, width, dash: Some(dash) }
    }
}

/// One colour stop of a gradient; `offset` in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Rgba,
}

impl GradientStop {
    pub fn new(offset: f32, color: Rgba) -> Self {
        Self { offset, color }
    }
}

/// Colour of a gradient at position `t`. Stops are expected in ascending
/// offset order; positions outside the stop range take the end colours.
pub fn sample_gradient(stops: &[GradientStop], t: f32) -> Rgba {
    let Some(first) = stops.first() else {
        return Rgba::TRANSPARENT;
    };
    if t <= first.offset {
        return first.color;
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.offset {
            let span = b.offset - a.offset;
            if span <= f32::EPSILON {
                return b.color;
            }
            return a.color.lerp(b.color, (t - a.offset) / span);
        }
    }
    stops[stops.len() - 1].color
}

/// A 2D immediate-mode drawing surface.
pub trait Canvas {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Change the surface size. Contents after a resize are unspecified.
    fn resize(&mut self, width: u32, height: u32);

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);
    fn stroke_line(&mut self, from: Vec2, to: Vec2, stroke: &Stroke);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, stroke: &Stroke);

    /// Fill the disc of `radius` around `center` with a radial gradient.
    fn fill_radial_gradient(&mut self, center: Vec2, radius: f32, stops: &[GradientStop]);

    /// Fill the whole surface with a gradient running from `from` to `to`.
    fn fill_linear_gradient(&mut self, from: Vec2, to: Vec2, stops: &[GradientStop]);

    fn size(&self) -> Vec2 {
        Vec2::new(self.width() as f32, self.height() as f32)
    }
}
