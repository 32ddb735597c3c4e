//! Drawing surface abstraction.

use kurbo::{Point, Vec2};
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Initialization failed: {0}")]
    InitFailed(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Surface error: {0}")]
    Surface(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// A 2D drawing target with an ambient affine transform.
///
/// Geometry passed to the drawing calls is in the coordinate system set up by
/// `translate` and `scale`. `push_transform` saves the current transform and
/// `pop_transform` restores the most recently saved one.
pub trait DrawSurface {
    /// Reset the surface to a solid color and the identity transform.
    fn clear(&mut self, color: Color);

    /// Stroke a straight segment. `width` is in current coordinates.
    fn draw_line(&mut self, p0: Point, p1: Point, color: Color, width: f64);

    /// Fill an axis-aligned rectangle.
    fn fill_rect(&mut self, origin: Point, extent: Vec2, color: Color);

    /// Draw a single line of text with `position` as its top-left corner.
    fn draw_text(&mut self, text: &str, position: Point, color: Color, size: f64);

    /// Width and height `draw_text` would cover for this text.
    fn measure_text(&mut self, text: &str, size: f64) -> Vec2;

    fn push_transform(&mut self);

    /// Post-multiply the current transform by a translation.
    fn translate(&mut self, offset: Vec2);

    /// Post-multiply the current transform by a uniform scale.
    fn scale(&mut self, factor: f64);

    fn pop_transform(&mut self);
}
