//! Host input for the starfield viewer: pointer, scroll, visibility and keys.

use glam::Vec2;
use std::collections::HashSet;

/// Scroll progress gained per wheel line.
pub const SCROLL_STEP: f32 = 0.05;
/// Pixels of touchpad scroll that count as one wheel line.
pub const PIXELS_PER_LINE: f32 = 40.0;

/// Manages input state for the current frame.
#[derive(Debug)]
pub struct InputState {
    /// Keys currently held down.
    keys_held: HashSet<KeyCode>,
    /// Keys pressed this frame.
    keys_pressed: HashSet<KeyCode>,

    /// Cursor position in window coordinates.
    pointer: Vec2,
    /// Set when the cursor moved this frame.
    pointer_moved: bool,

    /// Page-scroll stand-in in `[0, 1]`.
    scroll_progress: f32,
    scroll_changed: bool,

    focused: bool,
    occluded: bool,
    minimized: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            keys_held: HashSet::new(),
            keys_pressed: HashSet::new(),
            pointer: Vec2::ZERO,
            pointer_moved: false,
            scroll_progress: 0.0,
            scroll_changed: false,
            focused: true,
            occluded: false,
            minimized: false,
        }
    }
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-frame state. Call once a frame's input has been consumed.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.pointer_moved = false;
        self.scroll_changed = false;
    }

    /// Process a keyboard event.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.keys_held.contains(&key) {
                    self.keys_pressed.insert(key);
                }
                self.keys_held.insert(key);
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
            }
        }
    }

    /// Process cursor position update.
    pub fn process_cursor_position(&mut self, position: (f64, f64)) {
        self.pointer = Vec2::new(position.0 as f32, position.1 as f32);
        self.pointer_moved = true;
    }

    /// Process a wheel event. Scrolling down (negative `lines`) moves
    /// progress toward 1, like reading further down a page.
    pub fn process_scroll_lines(&mut self, lines: f32) {
        if !lines.is_finite() {
            return;
        }
        let next = (self.scroll_progress - lines * SCROLL_STEP).clamp(0.0, 1.0);
        if next != self.scroll_progress {
            self.scroll_progress = next;
            self.scroll_changed = true;
        }
    }

    /// Touchpad-style pixel scroll, converted to wheel lines.
    pub fn process_scroll_pixels(&mut self, dy: f64) {
        self.process_scroll_lines(dy as f32 / PIXELS_PER_LINE);
    }

    /// Losing focus releases every held key; their release events go to
    /// whichever window took focus.
    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if !focused {
            self.keys_held.clear();
        }
    }

    pub fn set_occluded(&mut self, occluded: bool) {
        self.occluded = occluded;
    }

    /// Zero-sized windows count as minimized.
    pub fn set_minimized(&mut self, minimized: bool) {
        self.minimized = minimized;
    }

    // Query methods

    /// Check if a key is currently held.
    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Check if a key was pressed this frame.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub fn pointer_moved(&self) -> bool {
        self.pointer_moved
    }

    pub fn scroll_progress(&self) -> f32 {
        self.scroll_progress
    }

    /// Progress changed since the last `begin_frame`.
    pub fn scroll_changed(&self) -> bool {
        self.scroll_changed
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Whether the animation should be running: on screen and not minimized.
    /// Focus doesn't matter; a window behind another app can still be seen.
    pub fn is_visible(&self) -> bool {
        !self.occluded && !self.minimized
    }

    /// Speed change requested this frame (Up / Down arrows).
    pub fn speed_delta(&self) -> f32 {
        let mut delta = 0.0;
        if self.is_key_pressed(KeyCode::ArrowUp) {
            delta += 1.0;
        }
        if self.is_key_pressed(KeyCode::ArrowDown) {
            delta -= 1.0;
        }
        delta
    }

    /// Check if the hyperspace toggle was pressed (H).
    pub fn is_hyperspace_toggle_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::KeyH)
    }

    /// Check if screenshot was pressed (P).
    pub fn is_screenshot_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::KeyP)
    }

    /// Check if quit was pressed (Escape).
    pub fn is_quit_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::Escape)
    }
}

// Re-export for convenience
pub use winit::event::ElementState;
pub use winit::keyboard::KeyCode;
