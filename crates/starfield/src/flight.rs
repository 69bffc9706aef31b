//! Flight state: the one record of motion parameters every entity update reads.

use glam::Vec2;

/// Simulation time between autopilot checks.
pub const AUTOPILOT_INTERVAL_MS: f64 = 100.0;
/// Below this current speed the autopilot intervenes.
pub const AUTOPILOT_MIN_SPEED: f32 = 3.0;
/// Target speed the autopilot raises to.
pub const AUTOPILOT_CRUISE_SPEED: f32 = 3.5;

/// A hyperspace transition, reported so the host can toggle its own styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeChange {
    Entered,
    Exited,
}

#[derive(Debug, Clone)]
pub struct FlightState {
    /// Current smoothed speed.
    pub speed: f32,
    target_speed: f32,
    /// Steering bias from the pointer's offset to the viewport centre.
    pub direction: Vec2,
    /// Positional jitter strength at base speed.
    pub turbulence: f32,
    hyperspace: bool,
    threshold: f32,
    autopilot_ms: f64,
}

impl FlightState {
    /// Start cruising at `speed` with target equal to it.
    pub fn new(speed: f32, turbulence: f32, threshold: f32) -> Self {
        Self {
            speed,
            target_speed: speed,
            direction: Vec2::ZERO,
            turbulence,
            hyperspace: speed > threshold,
            threshold,
            autopilot_ms: 0.0,
        }
    }

    pub fn target_speed(&self) -> f32 {
        self.target_speed
    }

    pub fn is_hyperspace(&self) -> bool {
        self.hyperspace
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Clamp `value` into `[0, cap]`, make it the target, and recompute the
    /// hyperspace flag (strictly greater than the threshold). Non-finite
    /// values are ignored.
    pub fn set_target_speed(&mut self, value: f32, cap: f32) -> Option<ModeChange> {
        if !value.is_finite() {
            log::warn!("Ignoring non-finite target speed {}", value);
            return None;
        }
        self.target_speed = value.clamp(0.0, cap.max(0.0));
        let was = self.hyperspace;
        self.hyperspace = self.target_speed > self.threshold;
        match (was, self.hyperspace) {
            (false, true) => Some(ModeChange::Entered),
            (true, false) => Some(ModeChange::Exited),
            _ => None,
        }
    }

    /// Exponential approach of `speed` toward the target. The factor is
    /// capped at 1 so a large `dt` lands on the target instead of overshooting.
    pub fn integrate(&mut self, dt: f32, acceleration: f32) {
        let k = (acceleration * dt).clamp(0.0, 1.0);
        self.speed += (self.target_speed - self.speed) * k;
    }

    /// Steering bias from the pointer position.
    pub fn steer(&mut self, pointer: Vec2, center: Vec2, influence: f32) {
        self.direction = (pointer - center) * influence;
    }

    /// Idle bias: every `AUTOPILOT_INTERVAL_MS` of accumulated time, keep the
    /// ship moving if it has slowed below the minimum. At most one check per
    /// call, so a long stall doesn't replay a backlog.
    pub fn autopilot(&mut self, elapsed_ms: f64, cap: f32) -> Option<ModeChange> {
        if elapsed_ms > 0.0 {
            self.autopilot_ms += elapsed_ms;
        }
        if self.autopilot_ms < AUTOPILOT_INTERVAL_MS {
            return None;
        }
        self.autopilot_ms %= AUTOPILOT_INTERVAL_MS;
        if self.speed >= AUTOPILOT_MIN_SPEED {
            return None;
        }
        let cruise = AUTOPILOT_CRUISE_SPEED.min(cap);
        if self.target_speed >= cruise {
            return None;
        }
        self.set_target_speed(cruise, cap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_converges_monotonically() {
        let mut f = FlightState::new(0.0, 0.2, 8.0);
        f.set_target_speed(10.0, 12.0);
        let mut gap = (f.speed - 10.0).abs();
        for _ in 0..200 {
            f.integrate(1.0, 0.03);
            let next = (f.speed - 10.0).abs();
            assert!(next < gap);
            gap = next;
        }
    }

    #[test]
    fn large_dt_does_not_overshoot() {
        let mut f = FlightState::new(0.0, 0.2, 8.0);
        f.set_target_speed(5.0, 12.0);
        f.integrate(1000.0, 0.5);
        assert_eq!(f.speed, 5.0);
    }

    #[test]
    fn threshold_equality_is_not_hyperspace() {
        let mut f = FlightState::new(4.0, 0.2, 8.0);
        assert_eq!(f.set_target_speed(8.0, 12.0), None);
        assert!(!f.is_hyperspace());
        assert_eq!(f.set_target_speed(8.01, 12.0), Some(ModeChange::Entered));
        assert_eq!(f.set_target_speed(9.0, 12.0), None);
        assert_eq!(f.set_target_speed(2.0, 12.0), Some(ModeChange::Exited));
    }

    #[test]
    fn target_is_clamped() {
        let mut f = FlightState::new(4.0, 0.2, 8.0);
        assert_eq!(f.set_target_speed(20.0, 12.0), Some(ModeChange::Entered));
        assert_eq!(f.target_speed(), 12.0);
        f.set_target_speed(-3.0, 12.0);
        assert_eq!(f.target_speed(), 0.0);
        f.set_target_speed(f32::NAN, 12.0);
        assert_eq!(f.target_speed(), 0.0);
    }

    #[test]
    fn autopilot_raises_idle_target_on_cadence() {
        let mut f = FlightState::new(0.0, 0.2, 8.0);
        assert_eq!(f.autopilot(50.0, 12.0), None);
        assert_eq!(f.target_speed(), 0.0);
        f.autopilot(50.0, 12.0);
        assert_eq!(f.target_speed(), AUTOPILOT_CRUISE_SPEED);
    }

    #[test]
    fn autopilot_respects_cap_and_fast_ships() {
        let mut f = FlightState::new(0.0, 0.2, 8.0);
        f.autopilot(100.0, 1.0);
        assert_eq!(f.target_speed(), 1.0);

        let mut fast = FlightState::new(6.0, 0.2, 8.0);
        fast.set_target_speed(0.0, 12.0);
        fast.autopilot(100.0, 12.0);
        assert_eq!(fast.target_speed(), 0.0);
    }
}
