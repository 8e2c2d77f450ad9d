// Input state tracking for keyboard and mouse-look
// Abstracts winit events into a per-frame snapshot: held movement keys plus
// the mouse delta accumulated since the last frame.
//
// Mouse deltas only count while the pointer is captured (cursor grabbed).
// The player has to click once to enable mouse-look.

use std::collections::HashSet;
use winit::event::{DeviceEvent, ElementState, MouseButton, WindowEvent};
use winit::keyboard::Key;

/// The four movement directions, bound to W/S/A/D.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKey {
    Forward,
    Back,
    Left,
    Right,
}

impl MoveKey {
    /// Map a key identity to a movement key. Case-insensitive.
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_lowercase().as_str() {
            "w" => Some(MoveKey::Forward),
            "s" => Some(MoveKey::Back),
            "a" => Some(MoveKey::Left),
            "d" => Some(MoveKey::Right),
            _ => None,
        }
    }
}

/// What one frame step gets to see.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    pub held: HashSet<MoveKey>,
    pub mouse_delta: (f32, f32),
}

impl InputSnapshot {
    pub fn is_held(&self, key: MoveKey) -> bool {
        self.held.contains(&key)
    }
}

#[derive(Debug, Default)]
pub struct InputState {
    keys_held: HashSet<MoveKey>,

    // Raw pointer motion accumulated while captured, reset by consume_mouse_delta()
    mouse_delta: (f32, f32),

    pointer_captured: bool,

    // Set by a click; the host tries to grab the cursor and reports back.
    capture_requested: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press or release. Keys other than W/A/S/D are ignored.
    pub fn on_key_change(&mut self, key: &str, is_down: bool) {
        let Some(key) = MoveKey::from_key(key) else {
            return;
        };
        if is_down {
            self.keys_held.insert(key);
        } else {
            self.keys_held.remove(&key);
        }
    }

    /// Accumulate raw pointer motion. Discarded unless the pointer is captured.
    pub fn on_mouse_move(&mut self, dx: f32, dy: f32) {
        if !self.pointer_captured {
            return;
        }
        self.mouse_delta.0 += dx;
        self.mouse_delta.1 += dy;
    }

    /// Take the accumulated delta and reset it to zero.
    /// Call at most once per frame or input is lost.
    pub fn consume_mouse_delta(&mut self) -> (f32, f32) {
        std::mem::take(&mut self.mouse_delta)
    }

    /// Consume this frame's input.
    pub fn snapshot(&mut self) -> InputSnapshot {
        InputSnapshot {
            held: self.keys_held.clone(),
            mouse_delta: self.consume_mouse_delta(),
        }
    }

    pub fn is_key_held(&self, key: MoveKey) -> bool {
        self.keys_held.contains(&key)
    }

    pub fn clear_keys(&mut self) {
        self.keys_held.clear();
    }

    // ------------------------------------------------------------------
    // Pointer capture
    // ------------------------------------------------------------------

    /// A pointer-down: ask the host to capture the pointer.
    pub fn request_capture(&mut self) {
        if !self.pointer_captured {
            self.capture_requested = true;
        }
    }

    /// Returns true once per pending capture request.
    pub fn take_capture_request(&mut self) -> bool {
        std::mem::take(&mut self.capture_requested)
    }

    /// The host reports whether the exclusive pointer mode is engaged.
    pub fn set_pointer_captured(&mut self, captured: bool) {
        self.pointer_captured = captured;
        if !captured {
            self.mouse_delta = (0.0, 0.0);
        }
    }

    pub fn release_capture(&mut self) {
        self.capture_requested = false;
        self.set_pointer_captured(false);
    }

    pub fn pointer_captured(&self) -> bool {
        self.pointer_captured
    }

    // ------------------------------------------------------------------
    // winit adapter
    // ------------------------------------------------------------------

    /// Feed a winit WindowEvent into the input state.
    /// Call this once per event before the app's own event handling.
    pub fn process_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let Key::Character(text) = &event.logical_key {
                    self.on_key_change(text.as_str(), event.state == ElementState::Pressed);
                }
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => self.request_capture(),
            WindowEvent::Focused(false) => {
                // Key-up events are lost while unfocused; don't keep walking.
                self.clear_keys();
            }
            _ => {}
        }
    }

    /// Raw mouse motion arrives as a device event while the cursor is grabbed.
    pub fn process_device_event(&mut self, event: &DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.on_mouse_move(delta.0 as f32, delta.1 as f32);
        }
    }
}
