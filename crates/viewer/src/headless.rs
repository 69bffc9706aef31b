//! Offscreen rendering: run the starfield on a simulated clock and write PNGs.

use anyhow::{Context, Result};
use engine_core::Time;
use renderer::PixelCanvas;
use starfield::{FrameOutcome, Starfield, StarfieldConfig};
use std::path::{Path, PathBuf};

/// Simulated host refresh rate.
const HEADLESS_HZ: f64 = 60.0;

pub struct HeadlessRun<'a> {
    pub width: u32,
    pub height: u32,
    pub frames: u32,
    /// Save every Nth frame as well as the last. Zero saves only the last.
    pub snapshot_every: u32,
    pub out_dir: &'a Path,
    pub speed: Option<f32>,
}

/// Render `run.frames` frames and return the written files.
pub fn run(config: StarfieldConfig, run: &HeadlessRun<'_>) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(run.out_dir)
        .with_context(|| format!("creating output directory {:?}", run.out_dir))?;

    let canvas = PixelCanvas::new(run.width, run.height);
    let mut starfield = Starfield::create(canvas, config).context("creating starfield")?;
    if let Some(speed) = run.speed {
        starfield.set_speed(speed);
    }

    let mut time = Time::simulated(HEADLESS_HZ);
    let mut written = Vec::new();
    for frame in 1..=run.frames {
        let now = time.update();
        if starfield.frame(now) != FrameOutcome::Rendered {
            log::debug!("Frame {} at {:.2}ms not rendered", frame, now);
        }
        let snapshot = run.snapshot_every > 0 && frame % run.snapshot_every == 0;
        if snapshot || frame == run.frames {
            let path = run.out_dir.join(format!("frame_{:05}.png", frame));
            starfield
                .canvas()
                .save_png(&path)
                .with_context(|| format!("saving {:?}", path))?;
            log::debug!("Wrote {:?}", path);
            written.push(path);
        }
    }

    log::info!(
        "Rendered {} of {} frames ({}x{}) over {:.2}s simulated, final speed {:.2}{}",
        starfield.frames_rendered(),
        time.frame_count(),
        run.width,
        run.height,
        time.elapsed_seconds(),
        starfield.speed(),
        if starfield.is_hyperspace() { " in hyperspace" } else { "" }
    );
    starfield.dispose();
    Ok(written)
}
