//! Starfield tuning. Every field has a default so partial documents (or no
//! document at all) are fine.

use crate::error::StarfieldError;
use serde::{Deserialize, Serialize};

/// Largest accepted `stars_count`.
pub const MAX_STARS: usize = 100_000;
/// Largest accepted `trail_length`. Hyperspace doubles it, so the longest
/// possible trail is twice this.
pub const MAX_TRAIL_LENGTH: usize = 10_000;

/// Inclusive size range for stars, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeRange {
    pub min: f32,
    pub max: f32,
}

impl Default for SizeRange {
    fn default() -> Self {
        Self { min: 0.3, max: 3.5 }
    }
}

/// Settings consumed by the simulation, painter and frame pacer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarfieldConfig {
    /// Number of stars. Fixed for the lifetime of an instance.
    pub stars_count: usize,
    /// Cruising speed at start; also the reference for turbulence scaling.
    pub base_speed: f32,
    /// Upper bound for `set_speed`.
    pub max_speed: f32,
    /// Exponential smoothing factor per idealized frame.
    pub acceleration: f32,
    pub star_size: SizeRange,
    /// Longest star trail at full speed outside hyperspace.
    pub trail_length: usize,
    /// Chance in `[0, 1]` that a meteor spawn roll succeeds.
    pub meteor_frequency: f32,
    /// Target speeds strictly above this enter hyperspace.
    pub hyperspace_threshold: f32,
    /// Extra target speed added by a fully scrolled page.
    pub scroll_speed_range: f32,
    pub target_fps: f32,
    pub perspective: f32,
    /// Far bound of the star volume.
    pub z_far: f32,
    /// Initial depths are spread over `[z_far - initial_depth_range, z_far]`.
    pub initial_depth_range: f32,
    /// Respawn depths are spread over `[z_far - respawn_jitter, z_far]`.
    pub respawn_jitter: f32,
    pub turbulence: f32,
    /// Steering strength per pixel of pointer offset from centre.
    pub pointer_influence: f32,
    pub enable_meteors: bool,
    pub enable_energy_waves: bool,
    pub enable_nebula: bool,
    pub enable_aurora: bool,
    pub enable_twinkle: bool,
    /// Caller-supplied accessibility flag: caps speed and turns off transient effects.
    pub reduced_motion: bool,
    pub reduced_motion_max_speed: f32,
    /// Fixed RNG seed. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            stars_count: 300,
            base_speed: 4.0,
            max_speed: 12.0,
            acceleration: 0.03,
            star_size: SizeRange::default(),
            trail_length: 120,
            meteor_frequency: 0.5,
            hyperspace_threshold: 8.0,
            scroll_speed_range: 6.0,
            target_fps: 60.0,
            perspective: 1000.0,
            z_far: 4000.0,
            initial_depth_range: 3000.0,
            respawn_jitter: 1000.0,
            turbulence: 0.2,
            pointer_influence: 0.0003,
            enable_meteors: true,
            enable_energy_waves: true,
            enable_nebula: true,
            enable_aurora: false,
            enable_twinkle: false,
            reduced_motion: false,
            reduced_motion_max_speed: 1.0,
            seed: None,
        }
    }
}

impl StarfieldConfig {
    /// Highest target speed currently allowed.
    pub fn speed_cap(&self) -> f32 {
        if self.reduced_motion {
            self.max_speed.min(self.reduced_motion_max_speed)
        } else {
            self.max_speed
        }
    }

    /// Frame interval in milliseconds derived from `target_fps`.
    pub fn frame_interval_ms(&self) -> f64 {
        1000.0 / self.target_fps as f64
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), StarfieldError> {
        let finite = [
            ("base_speed", self.base_speed),
            ("max_speed", self.max_speed),
            ("acceleration", self.acceleration),
            ("star_size.min", self.star_size.min),
            ("star_size.max", self.star_size.max),
            ("meteor_frequency", self.meteor_frequency),
            ("hyperspace_threshold", self.hyperspace_threshold),
            ("scroll_speed_range", self.scroll_speed_range),
            ("target_fps", self.target_fps),
            ("perspective", self.perspective),
            ("z_far", self.z_far),
            ("initial_depth_range", self.initial_depth_range),
            ("respawn_jitter", self.respawn_jitter),
            ("turbulence", self.turbulence),
            ("pointer_influence", self.pointer_influence),
            ("reduced_motion_max_speed", self.reduced_motion_max_speed),
        ];
        if let Some((name, value)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(invalid(format!("{name} must be finite, got {value}")));
        }

        if self.stars_count > MAX_STARS {
            return Err(invalid(format!("stars_count must be at most {MAX_STARS}, got {}", self.stars_count)));
        }
        if self.trail_length > MAX_TRAIL_LENGTH {
            return Err(invalid(format!(
                "trail_length must be at most {MAX_TRAIL_LENGTH}, got {}",
                self.trail_length
            )));
        }
        if self.max_speed <= 0.0 {
            return Err(invalid(format!("max_speed must be positive, got {}", self.max_speed)));
        }
        if self.base_speed < 0.0 {
            return Err(invalid(format!("base_speed must not be negative, got {}", self.base_speed)));
        }
        if self.acceleration <= 0.0 || self.acceleration > 1.0 {
            return Err(invalid(format!("acceleration must be in (0, 1], got {}", self.acceleration)));
        }
        if self.star_size.min < 0.0 || self.star_size.min > self.star_size.max {
            return Err(invalid(format!(
                "star_size must satisfy 0 <= min <= max, got {}..{}",
                self.star_size.min, self.star_size.max
            )));
        }
        if !(0.0..=1.0).contains(&self.meteor_frequency) {
            return Err(invalid(format!("meteor_frequency must be in [0, 1], got {}", self.meteor_frequency)));
        }
        if self.target_fps <= 0.0 {
            return Err(invalid(format!("target_fps must be positive, got {}", self.target_fps)));
        }
        if self.perspective <= 0.0 || self.z_far <= 0.0 {
            return Err(invalid("perspective and z_far must be positive".to_string()));
        }
        for (name, range) in [
            ("initial_depth_range", self.initial_depth_range),
            ("respawn_jitter", self.respawn_jitter),
        ] {
            if range < 0.0 || range >= self.z_far {
                return Err(invalid(format!("{name} must be in [0, z_far), got {range}")));
            }
        }
        if self.turbulence < 0.0 || self.reduced_motion_max_speed < 0.0 || self.scroll_speed_range < 0.0 {
            return Err(invalid(
                "turbulence, scroll_speed_range and reduced_motion_max_speed must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

fn invalid(msg: String) -> StarfieldError {
    StarfieldError::InvalidConfig(msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(StarfieldConfig::default().validate(), Ok(()));
    }

    #[test]
    fn partial_ron_keeps_defaults() {
        let cfg: StarfieldConfig = ron::from_str("(stars_count: 12, enable_aurora: true)").unwrap();
        assert_eq!(cfg.stars_count, 12);
        assert!(cfg.enable_aurora);
        assert_eq!(cfg.max_speed, 12.0);
        assert_eq!(cfg.star_size, SizeRange::default());
    }

    #[test]
    fn inverted_size_range_is_rejected() {
        let cfg = StarfieldConfig {
            star_size: SizeRange { min: 2.0, max: 1.0 },
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(StarfieldError::InvalidConfig(_))));
    }

    #[test]
    fn respawn_band_must_stay_in_front_of_viewer() {
        let cfg = StarfieldConfig { respawn_jitter: 4000.0, ..Default::default() };
        assert!(cfg.validate().is_err());
        let cfg = StarfieldConfig { target_fps: 0.0, ..Default::default() };
        assert!(cfg.validate().is_err());
        let cfg = StarfieldConfig { max_speed: f32::NAN, ..Default::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn oversized_pools_are_rejected() {
        let cfg = StarfieldConfig { trail_length: usize::MAX / 2, stars_count: 1, ..Default::default() };
        assert!(matches!(cfg.validate(), Err(StarfieldError::InvalidConfig(_))));
        let cfg = StarfieldConfig { stars_count: MAX_STARS + 1, ..Default::default() };
        assert!(cfg.validate().is_err());
        let cfg = StarfieldConfig { trail_length: MAX_TRAIL_LENGTH, stars_count: MAX_STARS, ..Default::default() };
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn reduced_motion_caps_speed() {
        let cfg = StarfieldConfig { reduced_motion: true, ..Default::default() };
        assert_eq!(cfg.speed_cap(), 1.0);
        assert_eq!(StarfieldConfig::default().speed_cap(), 12.0);
    }
}
