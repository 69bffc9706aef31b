//! Time management for the animation loop.

use std::time::{Duration, Instant};

/// Duration of one idealized frame in milliseconds. A frame delta of `1.0`
/// corresponds to exactly this much elapsed time.
pub const IDEAL_FRAME_MS: f64 = 16.67;

/// Largest normalized frame delta fed into integration. Longer stalls (a
/// hidden window, a debugger pause) are treated as two idealized frames.
pub const MAX_FRAME_DELTA: f32 = 2.0;

/// Convert elapsed milliseconds into a normalized, clamped frame delta.
///
/// Negative or non-finite input yields `0.0`.
pub fn frame_delta(elapsed_ms: f64) -> f32 {
    if !elapsed_ms.is_finite() || elapsed_ms <= 0.0 {
        return 0.0;
    }
    ((elapsed_ms / IDEAL_FRAME_MS) as f32).min(MAX_FRAME_DELTA)
}

/// Where timestamps come from.
#[derive(Debug, Clone, Copy)]
enum Clock {
    /// Monotonic wall clock.
    Wall,
    /// Fixed step per update, for headless rendering.
    Simulated { step: Duration },
}

/// Host clock: produces the millisecond timestamps handed to the scheduler.
#[derive(Debug)]
pub struct Time {
    clock: Clock,
    /// Time when the clock started.
    start_time: Instant,
    /// Duration of the last update.
    delta: Duration,
    /// Total elapsed time since start.
    elapsed: Duration,
    /// Update count since start.
    frame_count: u64,
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

impl Time {
    /// Create a wall-clock time source.
    pub fn new() -> Self {
        Self {
            clock: Clock::Wall,
            start_time: Instant::now(),
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Create a simulated time source advancing `1 / hz` seconds per update.
    pub fn simulated(hz: f64) -> Self {
        let step = if hz > 0.0 {
            Duration::from_secs_f64(1.0 / hz)
        } else {
            Duration::ZERO
        };
        Self {
            clock: Clock::Simulated { step },
            ..Self::new()
        }
    }

    /// Advance the clock and return the new timestamp in milliseconds.
    pub fn update(&mut self) -> f64 {
        let elapsed = match self.clock {
            Clock::Wall => self.start_time.elapsed(),
            Clock::Simulated { step } => self.elapsed + step,
        };
        self.delta = elapsed.saturating_sub(self.elapsed);
        self.elapsed = elapsed;
        self.frame_count += 1;
        self.now_ms()
    }

    /// Timestamp of the last update in milliseconds since start.
    pub fn now_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }

    /// Get total elapsed time in seconds.
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Get the current update count.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the current rate (averaged over last update).
    pub fn fps(&self) -> f32 {
        if self.delta.as_secs_f32() > 0.0 {
            1.0 / self.delta.as_secs_f32()
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_delta_normalizes_to_ideal_frame() {
        assert!((frame_delta(IDEAL_FRAME_MS) - 1.0).abs() < 1e-6);
        assert!((frame_delta(IDEAL_FRAME_MS / 2.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn frame_delta_clamps_stalls_and_garbage() {
        assert_eq!(frame_delta(60_000.0), MAX_FRAME_DELTA);
        assert_eq!(frame_delta(-5.0), 0.0);
        assert_eq!(frame_delta(f64::NAN), 0.0);
        assert_eq!(frame_delta(f64::INFINITY), 0.0);
    }

    #[test]
    fn simulated_clock_steps_exactly() {
        let mut time = Time::simulated(50.0);
        assert!((time.update() - 20.0).abs() < 1e-9);
        assert!((time.update() - 40.0).abs() < 1e-9);
        assert_eq!(time.frame_count(), 2);
        assert!((time.fps() - 50.0).abs() < 0.01);
        assert!((time.elapsed_seconds() - 0.04).abs() < 1e-6);
    }
}
