//! Scene painter: turns the simulation's derived attributes into draw calls.
//!
//! Layer order is background, hyperspace tunnel, speed lines, stars, meteors,
//! energy waves. The painter only reads the simulation.

use crate::meteor::Meteor;
use crate::palette;
use crate::simulation::Simulation;
use crate::star::{Star, GLOW_DEPTH};
use crate::wave::EnergyWave;
use engine_core::{Rgb, Rgba, Vec2};
use renderer::{Canvas, Dash, GradientStop, Stroke};
use std::f32::consts::{PI, TAU};

// Background
const BLUR_ALPHA: f32 = 0.08;
const HYPERSPACE_BLUR_ALPHA: f32 = 0.05;
const BLUR_SPEED_BONUS: f32 = 0.15;
const NEBULA_CLOUDS: usize = 3;
const AURORA_LAYERS: usize = 3;

// Hyperspace tunnel
const TUNNEL_RINGS: usize = 12;
const RING_BASE_RADIUS: f32 = 30.0;
const RING_SPACING: f32 = 60.0;
const RING_ALPHA: f32 = 0.4;
const RING_DASH: (f32, f32) = (10.0, 20.0);
const TUNNEL_SPOKES: usize = 16;
const SPOKE_ALPHA: f32 = 0.2;

// Speed lines
const SPEED_LINE_THRESHOLD: f32 = 5.0;
const SPEED_LINE_RANGE: f32 = 7.0;
const SPEED_LINES: usize = 30;
const SPEED_LINE_LENGTH: f32 = 100.0;
const SPEED_LINE_INNER: f32 = 50.0;

// Stars
const TRAIL_MIN_SPEED: f32 = 2.0;
const CORE_DEPTH: f32 = 200.0;
const RING_DEPTH: f32 = 300.0;
const HALO_BRIGHTNESS: f32 = 0.6;

/// Paint one frame of `sim` onto `canvas`.
pub fn draw_frame<C: Canvas + ?Sized>(canvas: &mut C, sim: &Simulation) {
    let size = canvas.size();
    if size.x <= 0.0 || size.y <= 0.0 {
        return;
    }
    let config = sim.config();
    let flight = sim.flight();
    let hyper = flight.is_hyperspace();
    // Reduced motion freezes the animated backgrounds.
    let t = if config.reduced_motion { 0.0 } else { sim.time_ms() as f32 };

    draw_motion_blur(canvas, size, flight.speed, hyper);
    if config.enable_nebula {
        draw_nebula(canvas, size, t);
    }
    if config.enable_aurora {
        draw_aurora(canvas, size, t);
    }

    if !config.reduced_motion {
        if hyper {
            draw_tunnel(canvas, size, t);
        }
        if flight.speed > SPEED_LINE_THRESHOLD {
            draw_speed_lines(canvas, size, flight.speed, t);
        }
    }

    for star in sim.stars().iter().filter(|s| s.visible) {
        draw_star(canvas, star, flight.speed, hyper);
    }
    for meteor in sim.meteors().iter() {
        draw_meteor(canvas, meteor);
    }
    for wave in sim.waves().iter() {
        draw_wave(canvas, wave);
    }
}

/// Translucent black over the previous frame; lower alpha leaves longer smears.
pub fn motion_blur_alpha(speed: f32, hyperspace: bool) -> f32 {
    let base = if hyperspace { HYPERSPACE_BLUR_ALPHA } else { BLUR_ALPHA };
    base + (speed / 10.0).clamp(0.0, BLUR_SPEED_BONUS)
}

fn draw_motion_blur<C: Canvas + ?Sized>(canvas: &mut C, size: Vec2, speed: f32, hyper: bool) {
    canvas.fill_rect(0.0, 0.0, size.x, size.y, Rgb::BLACK.with_alpha(motion_blur_alpha(speed, hyper)));
}

fn draw_nebula<C: Canvas + ?Sized>(canvas: &mut C, size: Vec2, time_ms: f32) {
    let t = time_ms * 0.0005;
    for i in 0..NEBULA_CLOUDS {
        let fi = i as f32;
        let center = Vec2::new(
            size.x * (0.2 + fi * 0.3) + (t + fi).sin() * 50.0,
            size.y * (0.3 + fi * 0.2) + (t * 1.2 + fi).cos() * 30.0,
        );
        let radius = 100.0 + fi * 50.0 + (t * 0.8 + fi).sin() * 20.0;
        let stops = [
            GradientStop::new(0.0, palette::NEBULA_CORE.with_alpha(0.05 + (t + fi).sin() * 0.02)),
            GradientStop::new(0.5, palette::NEBULA_EDGE.with_alpha(0.03 + (t + fi).cos() * 0.015)),
            GradientStop::new(1.0, Rgba::TRANSPARENT),
        ];
        canvas.fill_radial_gradient(center, radius, &stops);
    }
}

fn draw_aurora<C: Canvas + ?Sized>(canvas: &mut C, size: Vec2, time_ms: f32) {
    let t = time_ms * 0.001;
    let [a, b, c, d] = palette::AURORA;
    for layer in 0..AURORA_LAYERS {
        let offset = layer as f32 * 0.3;
        let intensity = 0.03 + layer as f32 * 0.01;
        let stops = [
            GradientStop::new(0.0, a.with_alpha(intensity + (t + offset).sin() * 0.02)),
            GradientStop::new(0.3, b.with_alpha(intensity * 0.7 + (t * 1.2 + offset).cos() * 0.015)),
            GradientStop::new(0.6, c.with_alpha(intensity * 0.5 + (t * 0.8 + offset).sin() * 0.01)),
            GradientStop::new(1.0, d.with_alpha(intensity * 0.3 + (t * 1.5 + offset).cos() * 0.008)),
        ];
        canvas.fill_linear_gradient(Vec2::ZERO, size, &stops);
    }
}

fn draw_tunnel<C: Canvas + ?Sized>(canvas: &mut C, size: Vec2, t: f32) {
    let center = size * 0.5;
    let expansion = (t * 0.15).rem_euclid(RING_SPACING);
    let dash = Dash::new(RING_DASH.0, RING_DASH.1, -t * 0.05);
    for i in 0..TUNNEL_RINGS {
        let fi = i as f32;
        let radius = RING_BASE_RADIUS + fi * RING_SPACING + expansion;
        let alpha = (1.0 - fi / TUNNEL_RINGS as f32) * RING_ALPHA * (1.0 - expansion / RING_SPACING);
        let stroke = Stroke::dashed(palette::TUNNEL_RING.with_alpha(alpha), 2.0, dash);
        canvas.stroke_circle(center, radius, &stroke);
    }

    let reach = size.x.min(size.y);
    let stroke = Stroke::solid(palette::TUNNEL_SPOKE.with_alpha(SPOKE_ALPHA), 1.0);
    for i in 0..TUNNEL_SPOKES {
        let angle = i as f32 * PI / 8.0;
        let dir = Vec2::from_angle(angle);
        canvas.stroke_line(center + dir * RING_BASE_RADIUS, center + dir * reach, &stroke);
    }
}

fn speed_line_intensity(speed: f32) -> f32 {
    ((speed - SPEED_LINE_THRESHOLD) / SPEED_LINE_RANGE).clamp(0.0, 1.0)
}

/// Lines drawn at `speed`; grows with how far speed is past the threshold.
fn speed_line_count(speed: f32) -> usize {
    ((SPEED_LINES as f32 * speed_line_intensity(speed)).ceil() as usize).min(SPEED_LINES)
}

fn draw_speed_lines<C: Canvas + ?Sized>(canvas: &mut C, size: Vec2, speed: f32, t: f32) {
    let center = size * 0.5;
    let intensity = speed_line_intensity(speed);
    let count = speed_line_count(speed);
    let max_radius = size.x.max(size.y);
    for i in 0..count {
        let fi = i as f32;
        let dir = Vec2::from_angle(fi / count as f32 * TAU);
        let progress = (t * 0.02 + fi * 0.1).rem_euclid(1.0);
        let start = max_radius * (1.0 - progress);
        if start < SPEED_LINE_INNER {
            continue;
        }
        let end = (start - SPEED_LINE_LENGTH).max(SPEED_LINE_INNER);
        let alpha = intensity * 0.4 * (1.0 - progress);
        let stroke = Stroke::solid(Rgb::WHITE.with_alpha(alpha), 1.0);
        canvas.stroke_line(center + dir * start, center + dir * end, &stroke);
    }
}

fn draw_star<C: Canvas + ?Sized>(canvas: &mut C, star: &Star, speed: f32, hyper: bool) {
    let z = star.position.z;

    if star.trail.len() > 1 && speed > TRAIL_MIN_SPEED {
        let width = star.size * if hyper { 1.2 } else { 0.6 };
        let gain = if hyper { 0.6 } else { 0.4 };
        for (a, b) in star.trail.segments() {
            let color = star.color.with_alpha(b.weight * star.brightness * gain);
            if !color.is_invisible() {
                canvas.stroke_line(a.position, b.position, &Stroke::solid(color, width));
            }
        }
    }

    let alpha = star.brightness.min(1.0);
    if z < GLOW_DEPTH && star.size > 0.0 {
        let glow = (GLOW_DEPTH - z) / GLOW_DEPTH;
        let blur = star.size * (2.0 + glow * 8.0);
        let stops = [
            GradientStop::new(0.0, star.color.with_alpha(alpha)),
            GradientStop::new(star.size / (star.size + blur), star.color.with_alpha(alpha * 0.5)),
            GradientStop::new(1.0, Rgba::TRANSPARENT),
        ];
        canvas.fill_radial_gradient(star.screen, star.size + blur, &stops);
    }
    canvas.fill_circle(star.screen, star.size, star.color.with_alpha(alpha));

    if z < CORE_DEPTH {
        canvas.fill_circle(star.screen, star.size * 0.5, Rgb::WHITE.with_alpha(alpha));
    }
    if star.brightness > HALO_BRIGHTNESS {
        canvas.fill_circle(star.screen, star.size * 1.5, star.color.with_alpha(alpha * 0.3));
    }
    if z < RING_DEPTH {
        let closeness = (RING_DEPTH - z) / RING_DEPTH;
        let stroke = Stroke::solid(star.color.with_alpha(closeness * 0.3), 2.0);
        canvas.stroke_circle(star.screen, star.size * (1.0 + closeness * 2.0), &stroke);
    }
}

fn draw_meteor<C: Canvas + ?Sized>(canvas: &mut C, meteor: &Meteor) {
    for (a, b) in meteor.trail.segments() {
        let stroke = Stroke::solid(meteor.color.with_alpha(b.weight * 0.8), meteor.size);
        canvas.stroke_line(a.position, b.position, &stroke);
    }

    let fade = meteor.fade();
    let stops = [
        GradientStop::new(0.0, meteor.color.with_alpha(fade * 0.6)),
        GradientStop::new(1.0, Rgba::TRANSPARENT),
    ];
    canvas.fill_radial_gradient(meteor.position, meteor.size * 4.0, &stops);
    canvas.fill_circle(meteor.position, meteor.size, meteor.color.with_alpha(fade));
}

fn draw_wave<C: Canvas + ?Sized>(canvas: &mut C, wave: &EnergyWave) {
    let outer = Stroke::solid(wave.color.with_alpha(wave.opacity), 2.0);
    canvas.stroke_circle(wave.center, wave.radius, &outer);
    let inner = Stroke::solid(wave.color.with_alpha(wave.opacity * 0.5), 1.0);
    canvas.stroke_circle(wave.center, wave.radius * 0.7, &inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StarfieldConfig;
    use renderer::{DrawCommand, RecordingCanvas};

    fn sim(config: StarfieldConfig) -> Simulation {
        Simulation::new(StarfieldConfig { seed: Some(3), ..config }, 800.0, 600.0).unwrap()
    }

    fn plain() -> StarfieldConfig {
        StarfieldConfig {
            enable_nebula: false,
            enable_meteors: false,
            enable_energy_waves: false,
            ..Default::default()
        }
    }

    #[test]
    fn frame_starts_with_motion_blur_fill() {
        let s = sim(plain());
        let mut canvas = RecordingCanvas::new(800, 600);
        draw_frame(&mut canvas, &s);
        match &canvas.commands()[0] {
            DrawCommand::FillRect { w, h, color, .. } => {
                assert_eq!((*w, *h), (800.0, 600.0));
                assert!((color.a - motion_blur_alpha(4.0, false)).abs() < 1e-6);
            }
            other => panic!("expected background fill, got {other:?}"),
        }
    }

    #[test]
    fn blur_alpha_depends_on_mode_and_speed() {
        assert!((motion_blur_alpha(0.0, false) - 0.08).abs() < 1e-6);
        assert!((motion_blur_alpha(0.0, true) - 0.05).abs() < 1e-6);
        assert!((motion_blur_alpha(12.0, true) - 0.20).abs() < 1e-6);
    }

    #[test]
    fn tunnel_only_in_hyperspace() {
        let mut s = sim(plain());
        let mut canvas = RecordingCanvas::new(800, 600);
        draw_frame(&mut canvas, &s);
        assert_eq!(canvas.dashed_circles(), 0);

        s.set_speed(10.0);
        canvas.take();
        draw_frame(&mut canvas, &s);
        assert_eq!(canvas.dashed_circles(), TUNNEL_RINGS);
    }

    #[test]
    fn speed_lines_need_speed_above_five() {
        let white_lines = |c: &RecordingCanvas| {
            c.count(|cmd| matches!(cmd, DrawCommand::StrokeLine { stroke, .. } if stroke.color.rgb == Rgb::WHITE))
        };
        let mut s = sim(StarfieldConfig { stars_count: 0, ..plain() });
        let mut canvas = RecordingCanvas::new(800, 600);
        draw_frame(&mut canvas, &s);
        assert_eq!(white_lines(&canvas), 0);

        s.set_speed(7.0);
        for _ in 0..300 {
            s.step(16.67);
        }
        canvas.take();
        draw_frame(&mut canvas, &s);
        let slow = white_lines(&canvas);
        assert!(slow > 0 && slow <= speed_line_count(s.flight().speed));

        s.set_speed(8.0);
        for _ in 0..300 {
            s.step(16.67);
        }
        assert!(!s.flight().is_hyperspace());
        canvas.take();
        draw_frame(&mut canvas, &s);
        assert!(white_lines(&canvas) > slow);
    }

    #[test]
    fn speed_line_count_scales_with_excess_speed() {
        assert_eq!(speed_line_count(SPEED_LINE_THRESHOLD), 0);
        assert_eq!(speed_line_count(SPEED_LINE_THRESHOLD + SPEED_LINE_RANGE / 2.0), SPEED_LINES / 2);
        assert_eq!(speed_line_count(SPEED_LINE_THRESHOLD + SPEED_LINE_RANGE), SPEED_LINES);
        assert_eq!(speed_line_count(100.0), SPEED_LINES);
        assert!(speed_line_count(6.0) < speed_line_count(9.0));
    }

    #[test]
    fn reduced_motion_skips_overlays() {
        let mut s = sim(StarfieldConfig { reduced_motion: true, stars_count: 0, ..plain() });
        s.set_speed(12.0);
        let mut canvas = RecordingCanvas::new(800, 600);
        draw_frame(&mut canvas, &s);
        assert_eq!(canvas.commands().len(), 1);
    }

    #[test]
    fn background_layers_follow_flags() {
        let s = sim(StarfieldConfig {
            enable_aurora: true,
            enable_meteors: false,
            stars_count: 0,
            ..Default::default()
        });
        let mut canvas = RecordingCanvas::new(800, 600);
        draw_frame(&mut canvas, &s);
        assert_eq!(canvas.count(|c| matches!(c, DrawCommand::RadialGradient { .. })), NEBULA_CLOUDS);
        assert_eq!(canvas.count(|c| matches!(c, DrawCommand::LinearGradient { .. })), AURORA_LAYERS);
    }

    #[test]
    fn painting_leaves_simulation_untouched() {
        let s = sim(StarfieldConfig::default());
        let before: Vec<_> = s.stars().iter().map(|st| (st.position, st.trail.len())).collect();
        let mut canvas = RecordingCanvas::new(800, 600);
        draw_frame(&mut canvas, &s);
        let after: Vec<_> = s.stars().iter().map(|st| (st.position, st.trail.len())).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn zero_sized_canvas_draws_nothing() {
        let s = sim(plain());
        let mut canvas = RecordingCanvas::new(0, 0);
        draw_frame(&mut canvas, &s);
        assert!(canvas.is_empty());
    }
}
