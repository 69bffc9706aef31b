//! Star pool: fixed-size far-field lights flying toward the viewer.

use crate::config::StarfieldConfig;
use crate::flight::FlightState;
use crate::palette;
use crate::simulation::FrameContext;
use crate::trail::Trail;
use engine_core::{Projection, Rgb};
use glam::{Vec2, Vec3};
use rand::Rng;

/// Depth advance multiplier while in hyperspace.
pub const WARP_MULTIPLIER: f32 = 2.5;
/// Half extent of the x/y spawn volume, in centre-relative units.
pub const FIELD_HALF_EXTENT: f32 = 3000.0;
/// Stars nearer than this get a size boost ("flash-by").
pub const CLOSE_DEPTH: f32 = 500.0;
/// Stars nearer than this gain brightness and glow.
pub const GLOW_DEPTH: f32 = 1000.0;

const DRIFT: f32 = 0.05;
const TURBULENCE_TIME_FREQ: f64 = 0.002;
const TURBULENCE_DEPTH_FREQ: f64 = 0.001;
const STEERING_GAIN: f32 = 0.000_008;
const DISTORTION_TIME_FREQ: f64 = 0.01;
const DISTORTION_DEPTH_FREQ: f64 = 0.01;
const DISTORTION_X: f32 = 50.0;
const DISTORTION_Y: f32 = 30.0;
const PROXIMITY_SIZE_BOOST: f32 = 3.0;
const PROXIMITY_BRIGHTNESS: f32 = 0.8;
const HYPERSPACE_SIZE_BOOST: f32 = 2.0;
const HYPERSPACE_BRIGHTNESS: f32 = 0.5;
const HYPERSPACE_TRAIL_MULT: f32 = 2.0;
const FADE_RATE: f32 = 0.6;
const HYPERSPACE_FADE_RATE: f32 = 0.8;
const TWINKLE_RATE: f32 = 0.02;
const VISIBILITY_MARGIN: f32 = 50.0;

#[derive(Debug, Clone)]
pub struct Star {
    /// Centre-relative x/y, depth z.
    pub position: Vec3,
    /// Small per-axis wander applied every frame.
    pub drift: Vec2,
    pub color: Rgb,
    pub twinkle: f32,
    pub screen: Vec2,
    pub size: f32,
    pub brightness: f32,
    pub visible: bool,
    pub trail: Trail,
}

impl Star {
    fn spawn(config: &StarfieldConfig, depth_band: f32, rng: &mut impl Rng) -> Self {
        let mut star = Self {
            position: Vec3::ZERO,
            drift: Vec2::new(rng.gen_range(-DRIFT..=DRIFT), rng.gen_range(-DRIFT..=DRIFT)),
            color: Rgb::WHITE,
            twinkle: rng.gen_range(0.0..std::f32::consts::TAU),
            screen: Vec2::ZERO,
            size: config.star_size.min,
            brightness: 0.0,
            visible: false,
            trail: Trail::with_capacity(max_trail_cap(config).saturating_add(1)),
        };
        star.reset(config, depth_band, rng);
        star
    }

    /// Move to a fresh random point in the far field with an empty trail.
    fn reset(&mut self, config: &StarfieldConfig, depth_band: f32, rng: &mut impl Rng) {
        self.position = Vec3::new(
            rng.gen_range(-FIELD_HALF_EXTENT..=FIELD_HALF_EXTENT),
            rng.gen_range(-FIELD_HALF_EXTENT..=FIELD_HALF_EXTENT),
            rng.gen_range((config.z_far - depth_band)..=config.z_far),
        );
        self.color = palette::random_star_color(rng);
        self.trail.clear();
    }

    /// Recompute screen position, size, brightness and visibility from the
    /// current position. Returns `false` if the star could not be projected.
    fn derive(&mut self, flight: &FlightState, projection: &Projection, config: &StarfieldConfig) -> bool {
        let Some(projected) = projection.project(self.position) else {
            self.visible = false;
            return false;
        };
        self.screen = projected.screen;

        let z = self.position.z;
        let hyper = flight.is_hyperspace();
        let base = 1.0 - z / config.z_far;
        let proximity = if z < CLOSE_DEPTH {
            (CLOSE_DEPTH - z) / CLOSE_DEPTH * PROXIMITY_SIZE_BOOST
        } else {
            0.0
        };
        let size_boost = if hyper { HYPERSPACE_SIZE_BOOST } else { 1.0 };
        self.size = (base * config.star_size.max * size_boost + config.star_size.min) * (1.0 + proximity);

        let speed_factor = speed_factor(flight, config);
        let glow = if z < GLOW_DEPTH {
            (GLOW_DEPTH - z) / GLOW_DEPTH * PROXIMITY_BRIGHTNESS
        } else {
            0.0
        };
        let hyper_boost = if hyper { HYPERSPACE_BRIGHTNESS } else { 0.0 };
        self.brightness = base * 0.9 + 0.1 + speed_factor * 0.4 + hyper_boost + glow;
        if config.enable_twinkle {
            self.brightness *= 0.85 + 0.15 * self.twinkle.sin();
        }

        let margin = self.size * 2.0 + VISIBILITY_MARGIN;
        self.visible = z > 0.0 && projection.contains(self.screen, margin);
        true
    }

    /// Advance one frame. Returns `true` if the star passed the viewer and was respawned.
    fn update(&mut self, ctx: &FrameContext<'_>, rng: &mut impl Rng) -> bool {
        let config = ctx.config;
        let flight = ctx.flight;
        let dt = ctx.dt;
        let speed = flight.speed;
        let hyper = flight.is_hyperspace();

        let warp = if hyper { WARP_MULTIPLIER } else { 1.0 };
        self.position.z -= speed * dt * warp;

        let intensity = if config.base_speed > 0.0 {
            flight.turbulence * (speed / config.base_speed)
        } else {
            0.0
        };
        let phase = (ctx.time_ms * TURBULENCE_TIME_FREQ + self.position.z as f64 * TURBULENCE_DEPTH_FREQ) as f32;
        self.position.x += (phase.sin() * intensity + self.drift.x) * dt;
        self.position.y += (phase.cos() * intensity + self.drift.y) * dt;

        let steering = (config.z_far - self.position.z).max(0.0) * STEERING_GAIN * speed;
        self.position.x += flight.direction.x * steering * dt;
        self.position.y += flight.direction.y * steering * dt;

        if hyper {
            let phase =
                (ctx.time_ms * DISTORTION_TIME_FREQ + self.position.z as f64 * DISTORTION_DEPTH_FREQ) as f32;
            self.position.x += phase.sin() * DISTORTION_X * dt;
            self.position.y += phase.cos() * DISTORTION_Y * dt;
        }

        // Also catches NaN depth.
        let respawned = !(self.position.z > 0.0);
        if respawned {
            self.reset(config, config.respawn_jitter, rng);
        }

        if config.enable_twinkle {
            self.twinkle = (self.twinkle + TWINKLE_RATE * dt).rem_euclid(std::f32::consts::TAU);
        }

        let previous = self.screen;
        if !self.derive(flight, ctx.projection, config) {
            return respawned;
        }

        let cap = trail_cap(flight, config);
        if !respawned && self.screen != previous {
            self.trail.push(previous, cap);
        } else {
            self.trail.truncate(cap);
        }
        self.trail.fade(if hyper { HYPERSPACE_FADE_RATE } else { FADE_RATE });
        respawned
    }
}

fn speed_factor(flight: &FlightState, config: &StarfieldConfig) -> f32 {
    (flight.speed / config.max_speed).clamp(0.0, 1.0)
}

/// Current trail cap: scales with speed, doubled in hyperspace.
pub fn trail_cap(flight: &FlightState, config: &StarfieldConfig) -> usize {
    let mult = if flight.is_hyperspace() { HYPERSPACE_TRAIL_MULT } else { 1.0 };
    (config.trail_length as f32 * speed_factor(flight, config) * mult).floor() as usize
}

/// Largest cap `trail_cap` can return for this configuration.
pub fn max_trail_cap(config: &StarfieldConfig) -> usize {
    (config.trail_length as f32 * HYPERSPACE_TRAIL_MULT) as usize
}

/// Fixed-size pool. Stars are recycled, never added or removed.
#[derive(Debug, Clone, Default)]
pub struct StarPool {
    stars: Vec<Star>,
}

impl StarPool {
    pub fn new(
        config: &StarfieldConfig,
        flight: &FlightState,
        projection: &Projection,
        rng: &mut impl Rng,
    ) -> Self {
        let stars = (0..config.stars_count)
            .map(|_| {
                let mut star = Star::spawn(config, config.initial_depth_range, rng);
                star.derive(flight, projection, config);
                star
            })
            .collect();
        Self { stars }
    }

    /// Advance every star. Returns how many respawned this frame.
    pub fn update(&mut self, ctx: &FrameContext<'_>, rng: &mut impl Rng) -> usize {
        let mut respawned = 0;
        for star in &mut self.stars {
            if star.update(ctx, rng) {
                respawned += 1;
            }
        }
        respawned
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Star> {
        self.stars.iter()
    }

    pub fn as_slice(&self) -> &[Star] {
        &self.stars
    }

    /// Mutable access for tests and tools that need to place stars exactly.
    pub fn as_mut_slice(&mut self) -> &mut [Star] {
        &mut self.stars
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn setup(count: usize) -> (StarfieldConfig, FlightState, Projection, StdRng) {
        let config = StarfieldConfig { stars_count: count, ..Default::default() };
        let flight = FlightState::new(config.base_speed, config.turbulence, config.hyperspace_threshold);
        let projection = Projection::new(config.perspective, 800.0, 600.0);
        (config, flight, projection, StdRng::seed_from_u64(7))
    }

    fn ctx<'a>(
        dt: f32,
        config: &'a StarfieldConfig,
        flight: &'a FlightState,
        projection: &'a Projection,
    ) -> FrameContext<'a> {
        FrameContext { dt, time_ms: 0.0, flight, projection, config }
    }

    #[test]
    fn pool_has_fixed_size_and_valid_depths() {
        let (config, flight, projection, mut rng) = setup(50);
        let mut pool = StarPool::new(&config, &flight, &projection, &mut rng);
        for _ in 0..500 {
            pool.update(&ctx(2.0, &config, &flight, &projection), &mut rng);
            assert_eq!(pool.len(), 50);
            for star in pool.iter() {
                assert!(star.position.z > 0.0 && star.position.z <= config.z_far);
            }
        }
    }

    #[test]
    fn crossing_the_viewer_respawns_far_with_empty_trail() {
        let (config, mut flight, projection, mut rng) = setup(1);
        flight.speed = 0.0;
        let mut pool = StarPool::new(&config, &flight, &projection, &mut rng);
        {
            let star = &mut pool.as_mut_slice()[0];
            star.position.z = 1.0;
            star.trail.push(Vec2::ONE, 10);
            star.trail.push(Vec2::ZERO, 10);
        }
        flight.speed = 5.0;
        let respawned = pool.update(&ctx(2.0, &config, &flight, &projection), &mut rng);
        assert_eq!(respawned, 1);
        let star = &pool.as_slice()[0];
        assert!(star.position.z >= config.z_far - config.respawn_jitter);
        assert!(star.position.z <= config.z_far);
        assert!(star.trail.is_empty());
    }

    #[test]
    fn trail_never_exceeds_cap_as_speed_drops() {
        let (config, mut flight, projection, mut rng) = setup(20);
        flight.set_target_speed(12.0, 12.0);
        flight.speed = 12.0;
        let mut pool = StarPool::new(&config, &flight, &projection, &mut rng);
        for _ in 0..100 {
            pool.update(&ctx(1.0, &config, &flight, &projection), &mut rng);
        }
        flight.set_target_speed(1.0, 12.0);
        for _ in 0..100 {
            flight.integrate(1.0, 0.2);
            pool.update(&ctx(1.0, &config, &flight, &projection), &mut rng);
            let cap = trail_cap(&flight, &config);
            assert!(pool.iter().all(|s| s.trail.len() <= cap));
        }
    }

    #[test]
    fn nearer_stars_are_larger_and_brighter() {
        let (config, flight, projection, mut rng) = setup(2);
        let mut pool = StarPool::new(&config, &flight, &projection, &mut rng);
        let stars = pool.as_mut_slice();
        stars[0].position = Vec3::new(0.0, 0.0, 3500.0);
        stars[1].position = Vec3::new(0.0, 0.0, 200.0);
        for star in stars.iter_mut() {
            assert!(star.derive(&flight, &projection, &config));
        }
        assert!(stars[1].size > stars[0].size);
        assert!(stars[1].brightness > stars[0].brightness);
        assert!(stars[0].visible && stars[1].visible);
    }

    /// One star at `position` with no drift, steering or turbulence.
    fn still_star(
        config: &StarfieldConfig,
        flight: &FlightState,
        projection: &Projection,
        rng: &mut StdRng,
        position: Vec3,
    ) -> StarPool {
        let mut pool = StarPool::new(config, flight, projection, rng);
        let star = &mut pool.as_mut_slice()[0];
        star.position = position;
        star.drift = Vec2::ZERO;
        star.trail.clear();
        assert!(star.derive(flight, projection, config));
        pool
    }

    #[test]
    fn hyperspace_warps_depth_advance() {
        let (config, mut flight, projection, mut rng) = setup(1);
        flight.turbulence = 0.0;
        flight.speed = 4.0;
        let start = Vec3::new(0.0, 0.0, 2000.0);

        let mut pool = still_star(&config, &flight, &projection, &mut rng, start);
        pool.update(&ctx(1.0, &config, &flight, &projection), &mut rng);
        assert!((pool.as_slice()[0].position.z - 1996.0).abs() < 1e-3);

        flight.set_target_speed(10.0, config.max_speed);
        assert!(flight.is_hyperspace());
        let mut pool = still_star(&config, &flight, &projection, &mut rng, start);
        pool.update(&ctx(1.0, &config, &flight, &projection), &mut rng);
        assert!((pool.as_slice()[0].position.z - (2000.0 - 4.0 * WARP_MULTIPLIER)).abs() < 1e-3);
    }

    #[test]
    fn steering_pulls_near_stars_further_than_far_ones() {
        let (config, mut flight, projection, mut rng) = setup(1);
        flight.turbulence = 0.0;
        flight.speed = 4.0;
        flight.direction = Vec2::new(1.0, 0.0);

        let mut near = still_star(&config, &flight, &projection, &mut rng, Vec3::new(0.0, 0.0, 500.0));
        let mut far = still_star(&config, &flight, &projection, &mut rng, Vec3::new(0.0, 0.0, 3500.0));
        near.update(&ctx(1.0, &config, &flight, &projection), &mut rng);
        far.update(&ctx(1.0, &config, &flight, &projection), &mut rng);
        let near = near.as_slice()[0].position;
        let far = far.as_slice()[0].position;

        // Steering uses the depth after this frame's advance.
        let expected_near = (config.z_far - 496.0) * STEERING_GAIN * 4.0;
        let expected_far = (config.z_far - 3496.0) * STEERING_GAIN * 4.0;
        assert!((near.x - expected_near).abs() < 1e-5);
        assert!((far.x - expected_far).abs() < 1e-5);
        assert!(near.x > far.x && far.x > 0.0);
        assert_eq!(near.y, 0.0);
        assert_eq!(far.y, 0.0);
    }

    #[test]
    fn turbulence_scales_with_speed_and_vanishes_at_rest() {
        let (config, mut flight, projection, mut rng) = setup(1);
        let start = Vec3::new(0.0, 0.0, 2000.0);
        for speed in [0.0, 4.0, 8.0] {
            flight.speed = speed;
            let mut pool = still_star(&config, &flight, &projection, &mut rng, start);
            pool.update(&ctx(1.0, &config, &flight, &projection), &mut rng);
            let p = pool.as_slice()[0].position;

            let phase = (p.z as f64 * TURBULENCE_DEPTH_FREQ) as f32;
            let intensity = config.turbulence * speed / config.base_speed;
            assert!((p.x - phase.sin() * intensity).abs() < 1e-5, "x at speed {speed}");
            assert!((p.y - phase.cos() * intensity).abs() < 1e-5, "y at speed {speed}");
            if speed == 0.0 {
                assert_eq!((p.x, p.y), (0.0, 0.0));
            }
        }
    }

    #[test]
    fn shrinking_trail_is_refaded_without_movement() {
        let (config, mut flight, projection, mut rng) = setup(1);
        flight.turbulence = 0.0;
        flight.speed = 0.5;
        // On the view axis the screen position doesn't change with depth.
        let mut pool = still_star(&config, &flight, &projection, &mut rng, Vec3::new(0.0, 0.0, 2000.0));
        for i in 0..10 {
            pool.as_mut_slice()[0].trail.push(Vec2::splat(i as f32), 20);
        }

        pool.update(&ctx(1.0, &config, &flight, &projection), &mut rng);
        let trail = &pool.as_slice()[0].trail;
        let cap = trail_cap(&flight, &config);
        assert!(cap > 0 && cap < 10);
        assert_eq!(trail.len(), cap);
        for (i, point) in trail.iter().enumerate() {
            let want = i as f32 / cap as f32 * FADE_RATE;
            assert!((point.weight - want).abs() < 1e-6);
        }
    }

    #[test]
    fn empty_pool_updates_cleanly() {
        let (config, flight, projection, mut rng) = setup(0);
        let mut pool = StarPool::new(&config, &flight, &projection, &mut rng);
        assert!(pool.is_empty());
        assert_eq!(pool.update(&ctx(1.0, &config, &flight, &projection), &mut rng), 0);
    }
}
