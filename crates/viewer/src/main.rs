//! Starfield viewer: a window that flies through the starfield, or a headless
//! PNG exporter when `--headless` is given.

mod config;
mod headless;

use anyhow::{Context, Result};
use clap::Parser;
use engine_core::Time;
use input::InputState;
use pixels::{Pixels, PixelsBuilder, SurfaceTexture};
use renderer::PixelCanvas;
use starfield::{FrameOutcome, Starfield};
use std::path::PathBuf;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::{MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use config::ViewerConfig;

/// Speed used by the hyperspace toggle key.
const HYPERSPACE_SPEED: f32 = 10.0;
/// Target speed change per Up/Down press.
const SPEED_STEP: f32 = 1.0;
/// Host ticks between frame-rate debug lines.
const FPS_LOG_INTERVAL: u64 = 600;

#[derive(Debug, Parser)]
#[command(name = "starfield", version, about = "Fly through a perspective starfield")]
struct Args {
    /// RON config file (defaults to ./starfield.ron).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Render this many frames offscreen instead of opening a window.
    #[arg(long, value_name = "FRAMES")]
    headless: Option<u32>,
    /// Output directory for headless PNGs.
    #[arg(long, default_value = "frames")]
    out: PathBuf,
    #[arg(long)]
    width: Option<u32>,
    #[arg(long)]
    height: Option<u32>,
    /// Fixed RNG seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Initial target speed.
    #[arg(long)]
    speed: Option<f32>,
    #[arg(long)]
    reduced_motion: bool,
}

impl Args {
    /// Command-line values override the config file.
    fn apply(&self, config: &mut ViewerConfig) {
        if let Some(w) = self.width {
            config.window_width = w;
        }
        if let Some(h) = self.height {
            config.window_height = h;
        }
        if self.seed.is_some() {
            config.starfield.seed = self.seed;
        }
        if self.reduced_motion {
            config.starfield.reduced_motion = true;
        }
    }
}

/// Everything that exists once the window does.
struct ViewerState {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    starfield: Starfield<PixelCanvas>,
    input: InputState,
    time: Time,
    screenshots: u32,
}

impl ViewerState {
    fn new(window: Arc<Window>, config: &ViewerConfig, speed: Option<f32>) -> Result<Self> {
        let size = window.inner_size();
        let (width, height) = (size.width.max(1), size.height.max(1));
        let surface = SurfaceTexture::new(width, height, window.clone());
        let pixels = PixelsBuilder::new(width, height, surface)
            .enable_vsync(config.vsync)
            .build()
            .context("creating pixel surface")?;

        let mut starfield = Starfield::create(PixelCanvas::new(width, height), config.starfield.clone())
            .context("creating starfield")?;
        if let Some(speed) = speed {
            starfield.set_speed(speed);
        }
        let mut input = InputState::new();
        input.process_cursor_position((width as f64 / 2.0, height as f64 / 2.0));

        Ok(Self {
            window,
            pixels,
            starfield,
            input,
            time: Time::new(),
            screenshots: 0,
        })
    }

    /// Returns `true` when the app should exit.
    fn handle_window_event(&mut self, event: WindowEvent) -> bool {
        match event {
            WindowEvent::CloseRequested => return true,
            WindowEvent::Resized(size) => self.resize(size.width, size.height),
            WindowEvent::Focused(focused) => self.input.set_focused(focused),
            WindowEvent::Occluded(occluded) => {
                self.input.set_occluded(occluded);
                self.sync_visibility();
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.input.process_cursor_position((position.x, position.y));
            }
            WindowEvent::MouseWheel { delta, .. } => match delta {
                MouseScrollDelta::LineDelta(_, y) => self.input.process_scroll_lines(y),
                MouseScrollDelta::PixelDelta(pos) => self.input.process_scroll_pixels(pos.y),
            },
            WindowEvent::KeyboardInput { event, .. } => {
                if let winit::keyboard::PhysicalKey::Code(key) = event.physical_key {
                    self.input.process_keyboard(key, event.state);
                }
                if self.input.is_quit_pressed() {
                    return true;
                }
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.redraw() {
                    log::error!("Render failed: {:#}", e);
                    return true;
                }
            }
            _ => {}
        }
        false
    }

    fn resize(&mut self, width: u32, height: u32) {
        let minimized = width == 0 || height == 0;
        self.input.set_minimized(minimized);
        self.sync_visibility();
        if minimized {
            return;
        }
        if let Err(e) = self.pixels.resize_surface(width, height) {
            log::error!("Failed to resize surface: {}", e);
            return;
        }
        if let Err(e) = self.pixels.resize_buffer(width, height) {
            log::error!("Failed to resize buffer: {}", e);
            return;
        }
        self.starfield.resize(width, height);
    }

    fn sync_visibility(&mut self) {
        let visible = self.input.is_visible();
        if visible != self.starfield.is_visible() {
            log::debug!("Visibility -> {}", visible);
            self.starfield.set_visible(visible);
        }
    }

    /// Apply this frame's input to the starfield.
    fn apply_input(&mut self) {
        if self.input.pointer_moved() {
            let p = self.input.pointer();
            self.starfield.set_pointer(p.x, p.y);
        }
        if self.input.scroll_changed() {
            self.starfield.set_scroll_progress(self.input.scroll_progress());
        }
        let delta = self.input.speed_delta();
        if delta != 0.0 {
            let target = self.starfield.target_speed() + delta * SPEED_STEP;
            self.starfield.set_speed(target);
        }
        if self.input.is_hyperspace_toggle_pressed() {
            let base = self.starfield.simulation().config().base_speed;
            let target = if self.starfield.is_hyperspace() { base } else { HYPERSPACE_SPEED };
            self.starfield.set_speed(target);
        }
        if self.input.is_screenshot_pressed() {
            self.screenshot();
        }
        self.input.begin_frame();
    }

    fn screenshot(&mut self) {
        self.screenshots += 1;
        let path = PathBuf::from(format!("starfield_{:03}.png", self.screenshots));
        match self.starfield.canvas().save_png(&path) {
            Ok(()) => log::info!("Saved screenshot {:?}", path),
            Err(e) => log::warn!("Screenshot failed: {}", e),
        }
    }

    fn redraw(&mut self) -> Result<()> {
        self.apply_input();
        let now = self.time.update();
        if self.time.frame_count() % FPS_LOG_INTERVAL == 0 {
            log::debug!("{:.1} fps, {} frames rendered", self.time.fps(), self.starfield.frames_rendered());
        }
        if self.starfield.frame(now) == FrameOutcome::Rendered {
            self.starfield
                .canvas()
                .copy_to(self.pixels.frame_mut())
                .context("copying frame")?;
            self.pixels.render().context("presenting frame")?;
        }
        Ok(())
    }
}

/// Application handler for winit.
struct App {
    config: ViewerConfig,
    speed: Option<f32>,
    state: Option<ViewerState>,
}

impl App {
    fn new(config: ViewerConfig, speed: Option<f32>) -> Self {
        Self { config, speed, state: None }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_none() {
            let window_attrs = Window::default_attributes()
                .with_title("Starfield")
                .with_inner_size(winit::dpi::LogicalSize::new(self.config.window_width, self.config.window_height));

            let window = match event_loop.create_window(window_attrs) {
                Ok(w) => Arc::new(w),
                Err(e) => {
                    log::error!("Failed to create window: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            match ViewerState::new(window.clone(), &self.config, self.speed) {
                Ok(s) => {
                    self.state = Some(s);
                    window.request_redraw();
                }
                Err(e) => {
                    log::error!("Failed to initialize viewer: {:#}", e);
                    event_loop.exit();
                }
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(state) = &mut self.state {
            if state.handle_window_event(event) {
                state.starfield.dispose();
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, _: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut config = ViewerConfig::load(args.config.as_deref());
    args.apply(&mut config);

    if let Some(frames) = args.headless {
        let run = headless::HeadlessRun {
            width: config.window_width,
            height: config.window_height,
            frames,
            snapshot_every: config.snapshot_every,
            out_dir: &args.out,
            speed: args.speed,
        };
        let written = headless::run(config.starfield, &run)?;
        log::info!("Wrote {} PNG(s) to {:?}", written.len(), args.out);
        return Ok(());
    }

    log::info!("Starting starfield viewer");
    log::info!("Controls: mouse steers, wheel scrolls speed, Up/Down adjust, H toggles hyperspace, P saves a PNG, Esc quits");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config, args.speed);
    event_loop.run_app(&mut app)?;

    Ok(())
}
