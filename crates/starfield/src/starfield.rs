//! The owning facade: one simulation, one frame pacer and the canvas it paints.

use crate::config::StarfieldConfig;
use crate::error::StarfieldError;
use crate::flight::ModeChange;
use crate::scene;
use crate::scheduler::{FramePacer, PacerState, Tick};
use crate::simulation::Simulation;
use glam::Vec2;
use renderer::Canvas;

/// What a call to [`Starfield::frame`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Physics stepped and the canvas was painted.
    Rendered,
    /// Too soon since the last frame.
    Skipped,
    /// Hidden; nothing ran.
    Paused,
    /// `dispose` was called; nothing will run again.
    Disposed,
}

pub struct Starfield<C: Canvas> {
    canvas: C,
    simulation: Simulation,
    pacer: FramePacer,
    visible: bool,
    frames_rendered: u64,
}

impl<C: Canvas> Starfield<C> {
    /// Validate the surface and configuration, then build the pools.
    pub fn create(canvas: C, config: StarfieldConfig) -> Result<Self, StarfieldError> {
        let (width, height) = (canvas.width(), canvas.height());
        if width == 0 || height == 0 {
            return Err(StarfieldError::EmptySurface { width, height });
        }
        let pacer = FramePacer::new(config.target_fps);
        let simulation = Simulation::new(config, width as f32, height as f32)?;
        log::info!(
            "Starfield created: {}x{}, {} stars, {:.1} fps target",
            width,
            height,
            simulation.stars().len(),
            simulation.config().target_fps
        );
        Ok(Self { canvas, simulation, pacer, visible: true, frames_rendered: 0 })
    }

    /// Offer a host tick at `now_ms`. Runs physics then paints when a frame is due.
    pub fn frame(&mut self, now_ms: f64) -> FrameOutcome {
        match self.pacer.tick(now_ms) {
            Tick::Stopped => FrameOutcome::Disposed,
            Tick::Paused => FrameOutcome::Paused,
            Tick::Skipped => FrameOutcome::Skipped,
            Tick::Due { elapsed_ms } => {
                let report = self.simulation.step(elapsed_ms);
                if let Some(change) = report.mode_change {
                    log_mode_change(change);
                }
                scene::draw_frame(&mut self.canvas, &self.simulation);
                self.frames_rendered += 1;
                FrameOutcome::Rendered
            }
        }
    }

    /// New surface size. Zero sizes (minimized windows) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::warn!("Ignoring resize to {}x{}", width, height);
            return;
        }
        self.canvas.resize(width, height);
        self.simulation.resize(width as f32, height as f32);
        log::info!("Starfield resized to {}x{}", width, height);
    }

    pub fn set_speed(&mut self, value: f32) -> Option<ModeChange> {
        let change = self.simulation.set_speed(value);
        if let Some(change) = change {
            log_mode_change(change);
        }
        change
    }

    pub fn set_scroll_progress(&mut self, progress: f32) -> Option<ModeChange> {
        let change = self.simulation.set_scroll_progress(progress);
        if let Some(change) = change {
            log_mode_change(change);
        }
        change
    }

    pub fn set_pointer(&mut self, x: f32, y: f32) {
        self.simulation.set_pointer(Vec2::new(x, y));
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        self.pacer.set_visible(visible);
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Stop for good. Later frames report `Disposed` and do nothing.
    pub fn dispose(&mut self) {
        if !self.is_disposed() {
            log::info!("Starfield disposed after {} frames", self.frames_rendered);
        }
        self.pacer.stop();
    }

    pub fn is_disposed(&self) -> bool {
        self.pacer.state() == PacerState::Stopped
    }

    pub fn speed(&self) -> f32 {
        self.simulation.flight().speed
    }

    pub fn target_speed(&self) -> f32 {
        self.simulation.flight().target_speed()
    }

    pub fn is_hyperspace(&self) -> bool {
        self.simulation.flight().is_hyperspace()
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }
}

fn log_mode_change(change: ModeChange) {
    match change {
        ModeChange::Entered => log::info!("Entering hyperspace"),
        ModeChange::Exited => log::info!("Leaving hyperspace"),
    }
}
