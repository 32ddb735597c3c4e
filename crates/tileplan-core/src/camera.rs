//! Camera module for pan and smoothed zoom transforms.

use kurbo::{Affine, Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Lowest zoom level the target may be set to (2^-3 = 12.5%).
pub const MIN_ZOOM_LEVEL: f64 = -3.0;
/// Highest zoom level the target may be set to (2^3 = 800%).
pub const MAX_ZOOM_LEVEL: f64 = 3.0;
/// Share of the current zoom level kept on each smoothing step.
pub const ZOOM_RETAIN: f64 = 0.6;
/// Share of the target zoom level blended in on each smoothing step.
pub const ZOOM_APPROACH: f64 = 0.4;
/// Wheel delta units per whole zoom level.
pub const WHEEL_SENSITIVITY: f64 = 100.0;
/// Frame rate the per-frame smoothing step was tuned for.
pub const REFERENCE_FRAME_RATE: f64 = 60.0;

/// Camera manages the view transform for the grid.
///
/// World points map to the screen as
/// `screen = (world + offset) * 2^zoom_level + viewport / 2`.
/// The zoom level is smoothed toward `target_zoom_level`, which is the only
/// value input handlers touch directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    /// Pan offset in world units.
    pub offset: Vec2,
    /// Smoothed zoom level (log2 of the scale factor).
    pub zoom_level: f64,
    /// Zoom level the smoothing converges toward. Always within
    /// [`MIN_ZOOM_LEVEL`, `MAX_ZOOM_LEVEL`].
    target_zoom_level: f64,
    /// Viewport size in screen pixels.
    pub viewport: Size,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom_level: 0.0,
            target_zoom_level: 0.0,
            viewport: Size::new(800.0, 600.0),
        }
    }
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a camera for a viewport of the given size.
    pub fn with_viewport(viewport: Size) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    /// Update the viewport size.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// The zoom level the camera is converging toward.
    pub fn target_zoom_level(&self) -> f64 {
        self.target_zoom_level
    }

    /// Uniform scale factor for the current zoom level.
    pub fn zoom_scale(&self) -> f64 {
        self.zoom_level.exp2()
    }

    /// Center of the viewport in screen coordinates.
    pub fn viewport_center(&self) -> Vec2 {
        Vec2::new(self.viewport.width * 0.5, self.viewport.height * 0.5)
    }

    /// Get the affine transform for rendering.
    ///
    /// This transform converts world coordinates to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.viewport_center())
            * Affine::scale(self.zoom_scale())
            * Affine::translate(self.offset)
    }

    /// Get the inverse transform for input handling.
    ///
    /// This transform converts screen coordinates to world coordinates.
    pub fn inverse_transform(&self) -> Affine {
        Affine::translate(-self.offset)
            * Affine::scale(1.0 / self.zoom_scale())
            * Affine::translate(-self.viewport_center())
    }

    /// Convert a screen point to world coordinates.
    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    /// Convert a world point to screen coordinates.
    pub fn world_to_screen(&self, world_point: Point) -> Point {
        self.transform() * world_point
    }

    /// Pan the camera by a delta measured in screen pixels.
    ///
    /// The delta is divided by the current scale so the world moves exactly
    /// as far as the cursor did, whatever the zoom.
    pub fn pan(&mut self, screen_delta: Vec2) {
        self.offset += screen_delta * (-self.zoom_level).exp2();
    }

    /// Set the target zoom level, clamped to the allowed range.
    pub fn set_target_zoom(&mut self, level: f64) {
        // NaN would poison the smoothing forever
        if level.is_nan() {
            return;
        }
        self.target_zoom_level = level.clamp(MIN_ZOOM_LEVEL, MAX_ZOOM_LEVEL);
    }

    /// Apply a vertical wheel delta. Positive deltas (scrolling down) zoom out.
    pub fn apply_wheel(&mut self, delta_y: f64) {
        self.set_target_zoom(self.target_zoom_level - delta_y / WHEEL_SENSITIVITY);
    }

    /// Advance the zoom smoothing by one frame.
    ///
    /// Must run once per frame before any coordinate conversion in that frame.
    pub fn advance(&mut self) {
        self.zoom_level = ZOOM_RETAIN * self.zoom_level + ZOOM_APPROACH * self.target_zoom_level;
    }

    /// Advance the zoom smoothing by an elapsed time in seconds.
    ///
    /// Matches [`Camera::advance`] at [`REFERENCE_FRAME_RATE`] and converges to
    /// the same target at any frame rate.
    pub fn advance_by(&mut self, dt_seconds: f64) {
        if dt_seconds.is_nan() || dt_seconds <= 0.0 {
            return;
        }
        let retain = ZOOM_RETAIN.powf(dt_seconds * REFERENCE_FRAME_RATE);
        self.zoom_level = retain * self.zoom_level + (1.0 - retain) * self.target_zoom_level;
    }

    /// Reset camera to default position and zoom.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.zoom_level = 0.0;
        self.target_zoom_level = 0.0;
    }
}
