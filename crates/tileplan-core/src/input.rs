//! Pointer state tracking for mouse events decoded by the host.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Pointer event in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
    },
    Up {
        position: Point,
        button: MouseButton,
    },
    Move {
        position: Point,
    },
    /// Wheel delta in browser pixel units (positive y scrolls down).
    Wheel {
        position: Point,
        delta: Vec2,
    },
}

/// Keyboard event carrying a key identifier such as `"s"` or `"Escape"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyEvent {
    Pressed(String),
    Released(String),
}

/// Tracks the pointer between events.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Current pointer position in screen coordinates.
    pub pointer_position: Point,
    /// Pointer position before the latest move.
    pub previous_pointer_position: Point,
    /// Currently pressed mouse buttons.
    pressed_buttons: HashSet<MouseButton>,
    /// Start position of the current primary-button drag.
    pub drag_start: Option<Point>,
}

impl InputState {
    /// Create a new input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a pointer event.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { position, button } => {
                self.move_to(position);
                self.pressed_buttons.insert(button);
                if button == MouseButton::Left && self.drag_start.is_none() {
                    self.drag_start = Some(position);
                }
            }
            PointerEvent::Up { position, button } => {
                self.move_to(position);
                self.pressed_buttons.remove(&button);
                if button == MouseButton::Left {
                    self.drag_start = None;
                }
            }
            PointerEvent::Move { position } | PointerEvent::Wheel { position, .. } => {
                self.move_to(position);
            }
        }
    }

    fn move_to(&mut self, position: Point) {
        self.previous_pointer_position = self.pointer_position;
        self.pointer_position = position;
    }

    /// Check if a button is currently pressed.
    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.pressed_buttons.contains(&button)
    }

    /// Whether a primary-button drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.drag_start.is_some()
    }

    /// Pointer movement between the last two pointer events.
    pub fn pointer_delta(&self) -> Vec2 {
        self.pointer_position - self.previous_pointer_position
    }

    /// Forget pressed buttons, e.g. when the window loses focus mid-drag.
    pub fn release_all(&mut self) {
        self.pressed_buttons.clear();
        self.drag_start = None;
    }
}
