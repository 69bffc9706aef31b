//! Physics step: flight state, then stars, then meteors, then waves.
//!
//! Purely computational. Nothing here draws; the painter reads the derived
//! screen attributes afterwards.

use crate::config::StarfieldConfig;
use crate::error::StarfieldError;
use crate::flight::{FlightState, ModeChange};
use crate::meteor::MeteorPool;
use crate::star::StarPool;
use crate::wave::WavePool;
use engine_core::{frame_delta, Projection};
use glam::Vec2;
use rand::{rngs::StdRng, SeedableRng};

/// Everything a pool update needs from the current frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    /// Normalized, clamped frame delta.
    pub dt: f32,
    /// Simulation clock at the start of this step.
    pub time_ms: f64,
    pub flight: &'a FlightState,
    pub projection: &'a Projection,
    pub config: &'a StarfieldConfig,
}

/// What one step did, for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepReport {
    pub dt: f32,
    pub respawned: usize,
    pub meteor_spawned: bool,
    pub wave_spawned: bool,
    pub mode_change: Option<ModeChange>,
}

pub struct Simulation {
    config: StarfieldConfig,
    projection: Projection,
    flight: FlightState,
    stars: StarPool,
    meteors: MeteorPool,
    waves: WavePool,
    pointer: Vec2,
    time_ms: f64,
    rng: StdRng,
}

impl Simulation {
    /// Build the pools for a `width` x `height` viewport.
    pub fn new(config: StarfieldConfig, width: f32, height: f32) -> Result<Self, StarfieldError> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let projection = Projection::new(config.perspective, width, height);
        let flight = FlightState::new(
            config.base_speed.min(config.speed_cap()),
            config.turbulence,
            config.hyperspace_threshold,
        );
        let stars = StarPool::new(&config, &flight, &projection, &mut rng);
        let mut meteors = MeteorPool::new();
        if meteors_enabled(&config) {
            meteors.tick_spawner(0.0, config.meteor_frequency, projection.size(), &mut rng);
        }
        Ok(Self {
            pointer: projection.center(),
            config,
            projection,
            flight,
            stars,
            meteors,
            waves: WavePool::default(),
            time_ms: 0.0,
            rng,
        })
    }

    /// Advance by `elapsed_ms` of wall time. The delta is normalized to
    /// idealized frames and clamped before any integration.
    pub fn step(&mut self, elapsed_ms: f64) -> StepReport {
        let elapsed_ms = if elapsed_ms.is_finite() { elapsed_ms.max(0.0) } else { 0.0 };
        let dt = frame_delta(elapsed_ms);
        let cap = self.config.speed_cap();

        // Flight state first; every pool below reads the updated values.
        let mode_change = self.flight.autopilot(elapsed_ms, cap);
        self.flight.integrate(dt, self.config.acceleration);
        self.flight
            .steer(self.pointer, self.projection.center(), self.config.pointer_influence);

        let ctx = FrameContext {
            dt,
            time_ms: self.time_ms,
            flight: &self.flight,
            projection: &self.projection,
            config: &self.config,
        };
        let respawned = self.stars.update(&ctx, &mut self.rng);

        let viewport = self.projection.size();
        let meteor_spawned = meteors_enabled(&self.config)
            && self
                .meteors
                .tick_spawner(elapsed_ms, self.config.meteor_frequency, viewport, &mut self.rng);
        self.meteors.advance(dt, viewport);

        let wave_spawned = self.config.enable_energy_waves
            && !self.config.reduced_motion
            && self.waves.maybe_spawn(dt, viewport, &mut self.rng);
        self.waves.advance(dt);

        self.time_ms += elapsed_ms;

        if respawned > 0 {
            log::debug!("{} stars respawned", respawned);
        }
        StepReport { dt, respawned, meteor_spawned, wave_spawned, mode_change }
    }

    /// Route a new target speed through the configured cap.
    pub fn set_speed(&mut self, value: f32) -> Option<ModeChange> {
        self.flight.set_target_speed(value, self.config.speed_cap())
    }

    /// Map a scroll fraction in `[0, 1]` linearly onto
    /// `[base_speed, base_speed + scroll_speed_range]`.
    pub fn set_scroll_progress(&mut self, progress: f32) -> Option<ModeChange> {
        let progress = if progress.is_finite() { progress.clamp(0.0, 1.0) } else { 0.0 };
        self.set_speed(self.config.base_speed + progress * self.config.scroll_speed_range)
    }

    /// New viewport size. Pools are left untouched; the pointer re-centres.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.projection.set_viewport(width, height);
        self.pointer = self.projection.center();
    }

    pub fn set_pointer(&mut self, pointer: Vec2) {
        if pointer.is_finite() {
            self.pointer = pointer;
        }
    }

    pub fn config(&self) -> &StarfieldConfig {
        &self.config
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn flight(&self) -> &FlightState {
        &self.flight
    }

    pub fn stars(&self) -> &StarPool {
        &self.stars
    }

    pub fn meteors(&self) -> &MeteorPool {
        &self.meteors
    }

    pub fn waves(&self) -> &WavePool {
        &self.waves
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    /// Accumulated simulation time in milliseconds.
    pub fn time_ms(&self) -> f64 {
        self.time_ms
    }
}

fn meteors_enabled(config: &StarfieldConfig) -> bool {
    config.enable_meteors && !config.reduced_motion
}
