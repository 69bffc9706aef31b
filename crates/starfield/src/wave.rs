//! Energy waves: expanding rings that bloom at random points and fade out.

use crate::palette;
use engine_core::Rgb;
use glam::Vec2;
use rand::Rng;

/// Spawn chance per idealized frame.
pub const WAVE_SPAWN_CHANCE: f32 = 0.008;
const START_OPACITY: f32 = 0.4;
/// Opacity multiplier per idealized frame.
const DECAY: f32 = 0.985;
const MIN_OPACITY: f32 = 0.01;

#[derive(Debug, Clone)]
pub struct EnergyWave {
    pub center: Vec2,
    pub radius: f32,
    pub max_radius: f32,
    pub speed: f32,
    pub opacity: f32,
    pub color: Rgb,
}

impl EnergyWave {
    pub fn random(viewport: Vec2, rng: &mut impl Rng) -> Self {
        Self {
            center: Vec2::new(rng.gen_range(0.0..=viewport.x), rng.gen_range(0.0..=viewport.y)),
            radius: 0.0,
            max_radius: rng.gen_range(100.0..=250.0),
            speed: rng.gen_range(1.0..=4.0),
            opacity: START_OPACITY,
            color: palette::random_wave_color(rng),
        }
    }

    fn advance(&mut self, dt: f32) {
        self.radius += self.speed * dt;
        self.opacity *= DECAY.powf(dt);
    }

    pub fn is_alive(&self) -> bool {
        self.radius < self.max_radius && self.opacity > MIN_OPACITY
    }
}

#[derive(Debug, Clone, Default)]
pub struct WavePool {
    waves: Vec<EnergyWave>,
}

impl WavePool {
    /// Roll for a new wave, scaled by `dt` so the rate is frame-rate independent.
    pub fn maybe_spawn(&mut self, dt: f32, viewport: Vec2, rng: &mut impl Rng) -> bool {
        if rng.gen::<f32>() >= WAVE_SPAWN_CHANCE * dt {
            return false;
        }
        self.waves.push(EnergyWave::random(viewport, rng));
        true
    }

    pub fn advance(&mut self, dt: f32) {
        for wave in &mut self.waves {
            wave.advance(dt);
        }
        self.waves.retain(EnergyWave::is_alive);
    }

    pub fn push(&mut self, wave: EnergyWave) {
        self.waves.push(wave);
    }

    pub fn len(&self) -> usize {
        self.waves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waves.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EnergyWave> {
        self.waves.iter()
    }
}
