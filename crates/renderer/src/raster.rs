//! Software rasterizer over an RGBA8 pixel buffer.
//!
//! Shapes are rendered with signed-distance coverage (one pixel of
//! anti-aliasing) and blended source-over. Every primitive clips its bounding
//! box to the surface first, so off-screen or absurdly large shapes cost
//! nothing and never index out of bounds.

use crate::canvas::{sample_gradient, Canvas, GradientStop, Stroke};
use crate::error::RenderError;
use engine_core::{Rgb, Rgba, Vec2};
use image::RgbaImage;
use std::path::Path;

/// CPU-side drawing surface.
#[derive(Debug, Clone)]
pub struct PixelCanvas {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
}

/// Inclusive-exclusive pixel ranges covered by a clipped bounding box.
struct PixelBounds {
    x0: u32,
    x1: u32,
    y0: u32,
    y1: u32,
}

impl PixelCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0, 0, 0, 255]; (width as usize) * (height as usize)],
        }
    }

    /// Overwrite every pixel with an opaque colour.
    pub fn clear(&mut self, color: Rgb) {
        self.pixels.fill([color.r, color.g, color.b, 255]);
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }

    /// Raw RGBA bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Copy the buffer into a presentation frame of the same size.
    pub fn copy_to(&self, frame: &mut [u8]) -> Result<(), RenderError> {
        let bytes = self.as_bytes();
        if frame.len() != bytes.len() {
            return Err(RenderError::BufferSize {
                expected: bytes.len(),
                actual: frame.len(),
            });
        }
        frame.copy_from_slice(bytes);
        Ok(())
    }

    pub fn to_image(&self) -> Result<RgbaImage, RenderError> {
        RgbaImage::from_raw(self.width, self.height, self.as_bytes().to_vec()).ok_or(
            RenderError::BufferSize {
                expected: (self.width as usize) * (self.height as usize) * 4,
                actual: self.pixels.len() * 4,
            },
        )
    }

    /// Encode the current contents as PNG.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), RenderError> {
        let path = path.as_ref();
        self.to_image()?.save(path)?;
        log::debug!("Wrote {}x{} frame to {:?}", self.width, self.height, path);
        Ok(())
    }

    /// Clip a float bounding box to pixel indices. `None` when nothing of it is
    /// on the surface or any coordinate is not finite.
    fn bounds(&self, min: Vec2, max: Vec2) -> Option<PixelBounds> {
        if !min.is_finite() || !max.is_finite() || self.width == 0 || self.height == 0 {
            return None;
        }
        let x0 = min.x.floor().max(0.0);
        let y0 = min.y.floor().max(0.0);
        let x1 = max.x.ceil().min(self.width as f32);
        let y1 = max.y.ceil().min(self.height as f32);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some(PixelBounds {
            x0: x0 as u32,
            x1: x1 as u32,
            y0: y0 as u32,
            y1: y1 as u32,
        })
    }

    fn blend(&mut self, x: u32, y: u32, color: Rgba, coverage: f32) {
        let a = color.a * coverage.clamp(0.0, 1.0);
        if a <= 0.0 {
            return;
        }
        let idx = (y * self.width + x) as usize;
        let Some(dst) = self.pixels.get_mut(idx) else {
            return;
        };
        let mix = |d: u8, s: u8| (d as f32 + (s as f32 - d as f32) * a).round() as u8;
        dst[0] = mix(dst[0], color.rgb.r);
        dst[1] = mix(dst[1], color.rgb.g);
        dst[2] = mix(dst[2], color.rgb.b);
        dst[3] = 255;
    }

    /// Run `coverage` for every pixel centre inside the clipped box.
    fn shade(&mut self, min: Vec2, max: Vec2, mut coverage: impl FnMut(Vec2) -> Option<(Rgba, f32)>) {
        let Some(b) = self.bounds(min, max) else {
            return;
        };
        for y in b.y0..b.y1 {
            for x in b.x0..b.x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if let Some((color, cov)) = coverage(p) {
                    self.blend(x, y, color, cov);
                }
            }
        }
    }
}

/// Distance from `p` to the segment `a`-`b`, and the arc length of the closest point.
fn segment_distance(p: Vec2, a: Vec2, b: Vec2) -> (f32, f32) {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return (p.distance(a), 0.0);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (p.distance(a + ab * t), t * len_sq.sqrt())
}

impl Canvas for PixelCanvas {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == self.width && height == self.height {
            return;
        }
        *self = Self::new(width, height);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba) {
        if color.is_invisible() {
            return;
        }
        let (min, max) = (Vec2::new(x, y), Vec2::new(x + w, y + h));
        self.shade(min, max, |_| Some((color, 1.0)));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        if color.is_invisible() || !(radius > 0.0) {
            return;
        }
        let reach = Vec2::splat(radius + 1.0);
        self.shade(center - reach, center + reach, |p| {
            let cov = radius + 0.5 - p.distance(center);
            (cov > 0.0).then_some((color, cov))
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, stroke: &Stroke) {
        if stroke.color.is_invisible() || !(stroke.width > 0.0) {
            return;
        }
        let half = (stroke.width * 0.5).max(0.5);
        let reach = Vec2::splat(half + 1.0);
        let dash = stroke.dash;
        self.shade(from.min(to) - reach, from.max(to) + reach, |p| {
            let (dist, along) = segment_distance(p, from, to);
            if dash.is_some_and(|d| !d.is_on(along)) {
                return None;
            }
            let cov = half + 0.5 - dist;
            (cov > 0.0).then_some((stroke.color, cov))
        });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, stroke: &Stroke) {
        if stroke.color.is_invisible() || !(stroke.width > 0.0) || !(radius > 0.0) {
            return;
        }
        let half = (stroke.width * 0.5).max(0.5);
        let reach = Vec2::splat(radius + half + 1.0);
        let dash = stroke.dash;
        self.shade(center - reach, center + reach, |p| {
            let d = p - center;
            let cov = half + 0.5 - (d.length() - radius).abs();
            if cov <= 0.0 {
                return None;
            }
            if let Some(dash) = dash {
                let angle = d.y.atan2(d.x).rem_euclid(std::f32::consts::TAU);
                if !dash.is_on(angle * radius) {
                    return None;
                }
            }
            Some((stroke.color, cov))
        });
    }

    fn fill_radial_gradient(&mut self, center: Vec2, radius: f32, stops: &[GradientStop]) {
        if !(radius > 0.0) || stops.is_empty() {
            return;
        }
        let reach = Vec2::splat(radius);
        self.shade(center - reach, center + reach, |p| {
            let t = p.distance(center) / radius;
            (t <= 1.0).then(|| (sample_gradient(stops, t), 1.0))
        });
    }

    fn fill_linear_gradient(&mut self, from: Vec2, to: Vec2, stops: &[GradientStop]) {
        if stops.is_empty() {
            return;
        }
        let axis = to - from;
        let len_sq = axis.length_squared();
        let size = self.size();
        self.shade(Vec2::ZERO, size, |p| {
            let t = if len_sq > f32::EPSILON {
                (p - from).dot(axis) / len_sq
            } else {
                0.0
            };
            Some((sample_gradient(stops, t.clamp(0.0, 1.0)), 1.0))
        });
    }
}
