//! Frame pacing. Decides, per host tick, whether a frame is due and how much
//! time it should integrate. Owns no simulation state.

use engine_core::IDEAL_FRAME_MS;

/// Clock jitter allowed below the frame interval before a tick is skipped.
const INTERVAL_SLACK_MS: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacerState {
    Running,
    Paused,
    /// Terminal. Reached only through `stop`.
    Stopped,
}

/// Result of offering a tick to the pacer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tick {
    /// Run one physics step of `elapsed_ms`, then render.
    Due { elapsed_ms: f64 },
    /// Too soon since the last accepted tick.
    Skipped,
    Paused,
    Stopped,
}

#[derive(Debug, Clone)]
pub struct FramePacer {
    state: PacerState,
    interval_ms: f64,
    last_ms: Option<f64>,
}

impl FramePacer {
    pub fn new(target_fps: f32) -> Self {
        let interval_ms = if target_fps > 0.0 && target_fps.is_finite() {
            1000.0 / target_fps as f64
        } else {
            IDEAL_FRAME_MS
        };
        Self { state: PacerState::Running, interval_ms, last_ms: None }
    }

    pub fn state(&self) -> PacerState {
        self.state
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    pub fn tick(&mut self, now_ms: f64) -> Tick {
        match self.state {
            PacerState::Stopped => return Tick::Stopped,
            PacerState::Paused => return Tick::Paused,
            PacerState::Running => {}
        }
        if !now_ms.is_finite() {
            return Tick::Skipped;
        }
        let Some(last) = self.last_ms else {
            // No baseline (fresh or just resumed): integrate one idealized frame.
            self.last_ms = Some(now_ms);
            return Tick::Due { elapsed_ms: IDEAL_FRAME_MS };
        };
        let elapsed_ms = now_ms - last;
        if elapsed_ms < 0.0 {
            log::debug!("Clock went backwards by {:.2}ms; resetting frame baseline", -elapsed_ms);
            self.last_ms = Some(now_ms);
            return Tick::Skipped;
        }
        if elapsed_ms + INTERVAL_SLACK_MS < self.interval_ms {
            return Tick::Skipped;
        }
        self.last_ms = Some(now_ms);
        Tick::Due { elapsed_ms }
    }

    /// Visibility signal. Hidden pauses; visible resumes with a fresh baseline.
    pub fn set_visible(&mut self, visible: bool) {
        match (self.state, visible) {
            (PacerState::Running, false) => {
                self.state = PacerState::Paused;
                log::debug!("Frame pacer paused");
            }
            (PacerState::Paused, true) => {
                self.state = PacerState::Running;
                self.last_ms = None;
                log::debug!("Frame pacer resumed");
            }
            _ => {}
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == PacerState::Running
    }

    pub fn stop(&mut self) {
        self.state = PacerState::Stopped;
        self.last_ms = None;
    }
}
