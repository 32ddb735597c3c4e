//! Translation from winit events to core input.

use kurbo::Vec2;
use tileplan_core::CursorStyle;
use tileplan_core::input::MouseButton;
use winit::event::{MouseButton as WinitButton, MouseScrollDelta};
use winit::keyboard::Key;
use winit::window::CursorIcon;

/// Pixels per wheel line, matching what browsers report for one notch.
pub const LINE_DELTA_PIXELS: f64 = 20.0;

/// Wheel delta in browser units: pixels, positive y scrolls down.
///
/// winit reports positive y for scrolling up, so the sign is flipped.
pub fn wheel_delta(delta: MouseScrollDelta) -> Vec2 {
    match delta {
        MouseScrollDelta::LineDelta(x, y) => {
            Vec2::new(-x as f64 * LINE_DELTA_PIXELS, -y as f64 * LINE_DELTA_PIXELS)
        }
        MouseScrollDelta::PixelDelta(pos) => Vec2::new(-pos.x, -pos.y),
    }
}

pub fn mouse_button(button: WinitButton) -> Option<MouseButton> {
    match button {
        WinitButton::Left => Some(MouseButton::Left),
        WinitButton::Right => Some(MouseButton::Right),
        WinitButton::Middle => Some(MouseButton::Middle),
        _ => None,
    }
}

/// Key identifier as used by key bindings: the typed character, or the
/// name of a named key such as `Escape`.
pub fn key_identifier(key: &Key) -> Option<String> {
    match key {
        Key::Character(c) => Some(c.to_string()),
        Key::Named(named) => Some(format!("{:?}", named)),
        _ => None,
    }
}

pub fn cursor_icon(style: CursorStyle) -> CursorIcon {
    match style {
        CursorStyle::Move => CursorIcon::Move,
        CursorStyle::Default => CursorIcon::Default,
    }
}
