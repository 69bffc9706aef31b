//! Meteors: short-lived screen-space streaks entering from the viewport edges.

use crate::palette;
use crate::trail::Trail;
use engine_core::Rgb;
use glam::Vec2;
use rand::Rng;

pub const METEOR_LIFE: f32 = 100.0;
pub const METEOR_TRAIL_CAP: usize = 20;
/// Meteors are culled once this far outside the viewport.
pub const CULL_MARGIN: f32 = 100.0;
/// Spawn distance outside the chosen edge.
const SPAWN_OFFSET: f32 = 50.0;
const SPAWN_DELAY_MS: std::ops::RangeInclusive<f64> = 1000.0..=3000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

#[derive(Debug, Clone)]
pub struct Meteor {
    pub position: Vec2,
    pub velocity: Vec2,
    pub size: f32,
    pub color: Rgb,
    pub life: f32,
    pub max_life: f32,
    pub trail: Trail,
}

impl Meteor {
    pub fn new(position: Vec2, velocity: Vec2, size: f32, color: Rgb) -> Self {
        Self {
            position,
            velocity,
            size,
            color,
            life: METEOR_LIFE,
            max_life: METEOR_LIFE,
            trail: Trail::with_capacity(METEOR_TRAIL_CAP + 1),
        }
    }

    /// A meteor just outside `edge`, heading broadly inward.
    pub fn from_edge(edge: Edge, viewport: Vec2, rng: &mut impl Rng) -> Self {
        let inward = rng.gen_range(2.0..=5.0);
        let across = rng.gen_range(-2.0..=2.0);
        let (position, velocity) = match edge {
            Edge::Top => (
                Vec2::new(rng.gen_range(0.0..=viewport.x), -SPAWN_OFFSET),
                Vec2::new(across, inward),
            ),
            Edge::Right => (
                Vec2::new(viewport.x + SPAWN_OFFSET, rng.gen_range(0.0..=viewport.y)),
                Vec2::new(-inward, across),
            ),
            Edge::Bottom => (
                Vec2::new(rng.gen_range(0.0..=viewport.x), viewport.y + SPAWN_OFFSET),
                Vec2::new(across, -inward),
            ),
            Edge::Left => (
                Vec2::new(-SPAWN_OFFSET, rng.gen_range(0.0..=viewport.y)),
                Vec2::new(inward, across),
            ),
        };
        Self::new(position, velocity, rng.gen_range(1.0..=3.0), palette::random_meteor_color(rng))
    }

    /// Remaining-life ratio in `[0, 1]`.
    pub fn fade(&self) -> f32 {
        if self.max_life > 0.0 {
            (self.life / self.max_life).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    fn advance(&mut self, dt: f32) {
        self.position += self.velocity * dt;
        self.life -= dt;
        self.trail.push(self.position, METEOR_TRAIL_CAP);
        self.trail.fade(self.fade());
    }

    /// Alive and within the viewport grown by `CULL_MARGIN`.
    pub fn is_alive(&self, viewport: Vec2) -> bool {
        self.life > 0.0
            && self.position.x > -CULL_MARGIN
            && self.position.x < viewport.x + CULL_MARGIN
            && self.position.y > -CULL_MARGIN
            && self.position.y < viewport.y + CULL_MARGIN
    }
}

/// Self-expiring meteor collection plus its spawn countdown.
#[derive(Debug, Clone, Default)]
pub struct MeteorPool {
    meteors: Vec<Meteor>,
    next_spawn_ms: f64,
}

impl MeteorPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// One spawn roll against `frequency`. Returns `true` if a meteor was added.
    pub fn roll(&mut self, frequency: f32, viewport: Vec2, rng: &mut impl Rng) -> bool {
        if rng.gen::<f32>() >= frequency {
            return false;
        }
        let edge = match rng.gen_range(0..4) {
            0 => Edge::Top,
            1 => Edge::Right,
            2 => Edge::Bottom,
            _ => Edge::Left,
        };
        let meteor = Meteor::from_edge(edge, viewport, rng);
        log::debug!("Meteor from {:?} at {:?}", edge, meteor.position);
        self.meteors.push(meteor);
        true
    }

    /// Count down the spawn timer by `elapsed_ms`; when it expires, roll once
    /// and draw the next delay. Returns `true` if a meteor was added.
    pub fn tick_spawner(&mut self, elapsed_ms: f64, frequency: f32, viewport: Vec2, rng: &mut impl Rng) -> bool {
        self.next_spawn_ms -= elapsed_ms.max(0.0);
        if self.next_spawn_ms > 0.0 {
            return false;
        }
        self.next_spawn_ms = rng.gen_range(SPAWN_DELAY_MS);
        self.roll(frequency, viewport, rng)
    }

    /// Integrate every meteor and drop the expired ones. Never adds.
    pub fn advance(&mut self, dt: f32, viewport: Vec2) {
        for meteor in &mut self.meteors {
            meteor.advance(dt);
        }
        self.meteors.retain(|m| m.is_alive(viewport));
    }

    pub fn push(&mut self, meteor: Meteor) {
        self.meteors.push(meteor);
    }

    pub fn len(&self) -> usize {
        self.meteors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meteors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Meteor> {
        self.meteors.iter()
    }
}
