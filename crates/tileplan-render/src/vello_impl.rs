//! Vello-based drawing surface.

use crate::surface::DrawSurface;
use kurbo::{Affine, Line, Point, Rect, Stroke, Vec2};
use parley::layout::PositionedLayoutItem;
use parley::{FontContext, Layout, LayoutContext, StyleProperty};
use peniko::{Brush, Color, Fill};
use vello::Scene;

/// Font families tried for HUD text, in order.
const FONT_STACK: &str = "system-ui, sans-serif";

/// Draws into a Vello scene for GPU rendering.
pub struct VelloSurface {
    /// The Vello scene being built.
    scene: Scene,
    /// Color the scene should be rendered over.
    background: Color,
    transform: Affine,
    stack: Vec<Affine>,
    /// Font context for text rendering (kept to avoid reloading fonts).
    font_cx: FontContext,
    layout_cx: LayoutContext<Brush>,
}

impl Default for VelloSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloSurface {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            background: Color::WHITE,
            transform: Affine::IDENTITY,
            stack: Vec::new(),
            font_cx: FontContext::new(),
            layout_cx: LayoutContext::new(),
        }
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The color passed to the last `clear`, used as the render base color.
    pub fn background(&self) -> Color {
        self.background
    }

    fn layout(&mut self, text: &str, size: f64, brush: Brush) -> Layout<Brush> {
        let mut builder = self.layout_cx.ranged_builder(&mut self.font_cx, text, 1.0, false);
        builder.push_default(StyleProperty::FontSize(size as f32));
        builder.push_default(StyleProperty::Brush(brush));
        builder.push_default(StyleProperty::FontStack(parley::FontStack::Source(
            FONT_STACK.into(),
        )));
        let mut layout = builder.build(text);

        layout.break_all_lines(None);
        layout.align(None, parley::Alignment::Start, parley::AlignmentOptions::default());
        layout
    }
}

impl DrawSurface for VelloSurface {
    fn clear(&mut self, color: Color) {
        self.scene.reset();
        self.background = color;
        self.transform = Affine::IDENTITY;
        self.stack.clear();
    }

    fn draw_line(&mut self, p0: Point, p1: Point, color: Color, width: f64) {
        self.scene
            .stroke(&Stroke::new(width), self.transform, color, None, &Line::new(p0, p1));
    }

    fn fill_rect(&mut self, origin: Point, extent: Vec2, color: Color) {
        let rect = Rect::from_origin_size(origin, extent.to_size());
        self.scene.fill(Fill::NonZero, self.transform, color, None, &rect);
    }

    fn draw_text(&mut self, text: &str, position: Point, color: Color, size: f64) {
        if text.is_empty() {
            return;
        }

        let brush = Brush::Solid(color);
        let layout = self.layout(text, size, brush.clone());
        let text_transform = self.transform * Affine::translate(position.to_vec2());

        let mut glyph_count = 0;
        for line in layout.lines() {
            for item in line.items() {
                let PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };
                let mut x = glyph_run.offset();
                let y = glyph_run.baseline();
                let run = glyph_run.run();
                let font = run.font();
                let font_size = run.font_size();
                let synthesis = run.synthesis();
                let glyph_xform = synthesis
                    .skew()
                    .map(|angle| Affine::skew(angle.to_radians().tan() as f64, 0.0));

                let glyphs: Vec<vello::Glyph> = glyph_run
                    .glyphs()
                    .map(|glyph| {
                        let gx = x + glyph.x;
                        let gy = y - glyph.y;
                        x += glyph.advance;
                        glyph_count += 1;
                        vello::Glyph {
                            id: glyph.id,
                            x: gx,
                            y: gy,
                        }
                    })
                    .collect();

                if !glyphs.is_empty() {
                    self.scene
                        .draw_glyphs(font)
                        .brush(&brush)
                        .hint(true)
                        .transform(text_transform)
                        .glyph_transform(glyph_xform)
                        .font_size(font_size)
                        .normalized_coords(run.normalized_coords())
                        .draw(Fill::NonZero, glyphs.into_iter());
                }
            }
        }

        // No usable font (e.g. wasm without system fonts): draw a bar so the
        // status area is still visible.
        if glyph_count == 0 {
            log::debug!("No glyphs for {:?}, drawing placeholder", text);
            let width = text.chars().count() as f64 * size * 0.6;
            let bar = Rect::new(
                position.x,
                position.y + size * 0.5,
                position.x + width,
                position.y + size * 0.7,
            );
            self.scene.fill(Fill::NonZero, self.transform, color, None, &bar);
        }
    }

    fn measure_text(&mut self, text: &str, size: f64) -> Vec2 {
        let layout = self.layout(text, size, Brush::Solid(Color::BLACK));
        let (width, height) = (layout.width() as f64, layout.height() as f64);
        if width > 0.0 {
            Vec2::new(width, height)
        } else {
            Vec2::new(text.chars().count() as f64 * size * 0.6, size * 1.2)
        }
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
