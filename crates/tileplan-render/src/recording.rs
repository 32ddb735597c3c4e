//! A surface that records draw calls in screen space.

use crate::surface::DrawSurface;
use kurbo::{Affine, Point, Rect, Vec2};
use peniko::Color;

/// Approximate glyph advance as a fraction of the font size.
const GLYPH_ADVANCE: f64 = 0.6;
/// Approximate line height as a multiple of the font size.
const LINE_HEIGHT: f64 = 1.2;

/// A recorded draw call with geometry resolved through the transform stack.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    Clear(Color),
    Line {
        p0: Point,
        p1: Point,
        color: Color,
        /// Stroke width in screen pixels.
        width: f64,
    },
    Rect { rect: Rect, color: Color },
    Text {
        text: String,
        position: Point,
        color: Color,
        size: f64,
    },
}

/// Records everything drawn into it instead of rasterizing.
///
/// Useful for headless runs and for checking what a frame draws. Text is
/// measured with a fixed-advance approximation.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
    transform: Affine,
    stack: Vec<Affine>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands recorded since the last `clear`.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// The current transform.
    pub fn transform(&self) -> Affine {
        self.transform
    }

    /// Number of saved transforms not yet popped.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Recorded filled rectangles, in draw order.
    pub fn rects(&self) -> impl Iterator<Item = (Rect, Color)> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Rect { rect, color } => Some((*rect, *color)),
            _ => None,
        })
    }

    /// Recorded lines, in draw order.
    pub fn lines(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Line { p0, p1, .. } => Some((*p0, *p1)),
            _ => None,
        })
    }

    /// Recorded text strings, in draw order.
    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl DrawSurface for RecordingSurface {
    fn clear(&mut self, color: Color) {
        self.commands.clear();
        self.stack.clear();
        self.transform = Affine::IDENTITY;
        self.commands.push(DrawCommand::Clear(color));
    }

    fn draw_line(&mut self, p0: Point, p1: Point, color: Color, width: f64) {
        let scale = self.transform.as_coeffs()[0].abs();
        self.commands.push(DrawCommand::Line {
            p0: self.transform * p0,
            p1: self.transform * p1,
            color,
            width: width * scale,
        });
    }

    fn fill_rect(&mut self, origin: Point, extent: Vec2, color: Color) {
        let rect = Rect::from_origin_size(origin, extent.to_size());
        self.commands.push(DrawCommand::Rect {
            rect: self.transform.transform_rect_bbox(rect),
            color,
        });
    }

    fn draw_text(&mut self, text: &str, position: Point, color: Color, size: f64) {
        let scale = self.transform.as_coeffs()[0].abs();
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            position: self.transform * position,
            color,
            size: size * scale,
        });
    }

    fn measure_text(&mut self, text: &str, size: f64) -> Vec2 {
        let chars = text.chars().count() as f64;
        Vec2::new(chars * size * GLYPH_ADVANCE, size * LINE_HEIGHT)
    }

    fn push_transform(&mut self) {
        self.stack.push(self.transform);
    }

    fn translate(&mut self, offset: Vec2) {
        self.transform = self.transform * Affine::translate(offset);
    }

    fn scale(&mut self, factor: f64) {
        self.transform = self.transform * Affine::scale(factor);
    }

    fn pop_transform(&mut self) {
        match self.stack.pop() {
            Some(transform) => self.transform = transform,
            None => {
                log::warn!("pop_transform without matching push");
                self.transform = Affine::IDENTITY;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_stack() {
        let mut surface = RecordingSurface::new();
        surface.clear(Color::WHITE);
        surface.push_transform();
        surface.translate(Vec2::new(400.0, 300.0));
        surface.scale(2.0);
        surface.translate(Vec2::new(-10.0, 5.0));

        surface.fill_rect(Point::new(10.0, 0.0), Vec2::new(50.0, 25.0), Color::BLACK);
        surface.draw_line(Point::ZERO, Point::new(10.0, 0.0), Color::BLACK, 1.0);
        assert_eq!(surface.depth(), 1);

        surface.pop_transform();
        assert_eq!(surface.transform(), Affine::IDENTITY);
        assert_eq!(surface.depth(), 0);

        let (rect, _) = surface.rects().next().unwrap();
        assert_eq!(rect, Rect::new(400.0, 310.0, 500.0, 360.0));

        let last = surface.commands().last().cloned();
        let Some(DrawCommand::Line { p0, p1, width, .. }) = last else {
            panic!("expected a line");
        };
        assert_eq!(p0, Point::new(380.0, 310.0));
        assert_eq!(p1, Point::new(400.0, 310.0));
        assert_eq!(width, 2.0);
    }

    #[test]
    fn test_clear_drops_previous_frame() {
        let mut surface = RecordingSurface::new();
        surface.clear(Color::WHITE);
        surface.push_transform();
        surface.fill_rect(Point::ZERO, Vec2::new(1.0, 1.0), Color::BLACK);

        surface.clear(Color::WHITE);
        assert_eq!(surface.commands().len(), 1);
        assert!(matches!(surface.commands()[0], DrawCommand::Clear(_)));
        assert_eq!(surface.depth(), 0);
    }

    #[test]
    fn test_unbalanced_pop_resets() {
        let mut surface = RecordingSurface::new();
        surface.scale(3.0);
        surface.pop_transform();
        assert_eq!(surface.transform(), Affine::IDENTITY);
    }

    #[test]
    fn test_measure_text() {
        let mut surface = RecordingSurface::new();
        let extent = surface.measure_text("Store", 10.0);
        assert!((extent.x - 30.0).abs() < 1e-9);
        assert!((extent.y - 12.0).abs() < 1e-9);
    }
}
