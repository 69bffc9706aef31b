//! A canvas that records draw calls instead of rasterizing them.
//!
//! Used by tests and diagnostics to check what a frame asked for without
//! inspecting pixels.

use crate::canvas::{Canvas, GradientStop, Stroke};
use engine_core::{Rgba, Vec2};

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect { x: f32, y: f32, w: f32, h: f32, color: Rgba },
    FillCircle { center: Vec2, radius: f32, color: Rgba },
    StrokeLine { from: Vec2, to: Vec2, stroke: Stroke },
    StrokeCircle { center: Vec2, radius: f32, stroke: Stroke },
    RadialGradient { center: Vec2, radius: f32, stops: Vec<GradientStop> },
    LinearGradient { from: Vec2, to: Vec2, stops: Vec<GradientStop> },
}

#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, commands: Vec::new() }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drain recorded commands.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn count(&self, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }

    /// Number of dashed circle strokes (tunnel rings).
    pub fn dashed_circles(&self) -> usize {
        self.count(|c| matches!(c, DrawCommand::StrokeCircle { stroke, .. } if stroke.dash.is_some()))
    }
}

impl Canvas for RecordingCanvas {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba) {
        self.commands.push(DrawCommand::FillRect { x, y, w, h, color });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::FillCircle { center, radius, color });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, stroke: &Stroke) {
        self.commands.push(DrawCommand::StrokeLine { from, to, stroke: *stroke });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, stroke: &Stroke) {
        self.commands.push(DrawCommand::StrokeCircle { center, radius, stroke: *stroke });
    }

    fn fill_radial_gradient(&mut self, center: Vec2, radius: f32, stops: &[GradientStop]) {
        self.commands.push(DrawCommand::RadialGradient { center, radius, stops: stops.to_vec() });
    }

    fn fill_linear_gradient(&mut self, from: Vec2, to: Vec2, stops: &[GradientStop]) {
        self.commands.push(DrawCommand::LinearGradient { from, to, stops: stops.to_vec() });
    }
}
