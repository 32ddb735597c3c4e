//! The per-frame driver: advance the camera, then draw grid, entities, ghost
//! and status line in that order.

use crate::surface::DrawSurface;
use kurbo::{Point, Rect, Size, Vec2};
use peniko::Color;
use tileplan_core::{EntityKind, GridLineKind, Session, Tool};

/// Colors and sizes used when drawing a frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameStyle {
    pub background: Color,
    pub minor_line: Color,
    pub major_line: Color,
    /// Grid line width in screen pixels, independent of zoom.
    pub line_width: f64,
    pub store: Color,
    pub track: Color,
    /// Alpha applied to the entity color for the ghost preview.
    pub ghost_alpha: f32,
    pub status_text: Color,
    pub status_background: Color,
    pub status_size: f64,
    /// Draw the status line in the top-left corner.
    pub show_status: bool,
}

impl Default for FrameStyle {
    fn default() -> Self {
        Self {
            background: Color::from_rgba8(255, 255, 255, 255),
            minor_line: Color::from_rgba8(221, 221, 221, 255),
            major_line: Color::from_rgba8(34, 34, 34, 255),
            line_width: 1.0,
            store: Color::from_rgba8(59, 130, 246, 255),
            track: Color::from_rgba8(120, 113, 108, 255),
            ghost_alpha: 0.4,
            status_text: Color::from_rgba8(250, 250, 250, 255),
            status_background: Color::from_rgba8(30, 30, 30, 200),
            status_size: 14.0,
            show_status: true,
        }
    }
}

impl FrameStyle {
    /// Fill color for an entity kind.
    pub fn entity_color(&self, kind: EntityKind) -> Color {
        match kind {
            EntityKind::Store => self.store,
            EntityKind::Track => self.track,
        }
    }
}

const STATUS_MARGIN: f64 = 8.0;
const STATUS_PADDING: f64 = 6.0;

/// Draw one frame of the session onto `surface`.
///
/// The camera is advanced before anything is drawn so the ghost preview is
/// computed through the same transform that draws the grid.
pub fn render_frame<S: DrawSurface + ?Sized>(
    session: &mut Session,
    surface: &mut S,
    viewport: Size,
    style: &FrameStyle,
    dt_seconds: f64,
) {
    if session.camera.viewport != viewport {
        log::debug!("Viewport resized to {}x{}", viewport.width, viewport.height);
        session.camera.set_viewport(viewport);
    }
    session.advance(dt_seconds);

    surface.clear(style.background);

    let camera = &session.camera;
    let zoom_scale = camera.zoom_scale();
    surface.push_transform();
    surface.translate(camera.viewport_center());
    surface.scale(zoom_scale);
    surface.translate(camera.offset);

    let line_width = style.line_width / zoom_scale;
    for line in session.grid.lines() {
        let color = match line.kind {
            GridLineKind::Minor => style.minor_line,
            GridLineKind::Major => style.major_line,
        };
        surface.draw_line(line.start, line.end, color, line_width);
    }

    // World area under the viewport; entities outside it are skipped.
    let visible = camera
        .inverse_transform()
        .transform_rect_bbox(Rect::from_origin_size(Point::ZERO, viewport));
    for entity in &session.placements {
        if entity.rect().intersect(visible).is_zero_area() {
            continue;
        }
        surface.fill_rect(entity.origin, entity.extent, style.entity_color(entity.kind));
    }

    if let Some(ghost) = session.ghost() {
        let color = style.entity_color(ghost.kind).with_alpha(style.ghost_alpha);
        surface.fill_rect(ghost.origin, ghost.extent, color);
    }

    surface.pop_transform();

    if style.show_status {
        draw_status(session, surface, style);
    }
}

fn draw_status<S: DrawSurface + ?Sized>(session: &Session, surface: &mut S, style: &FrameStyle) {
    let text = status_line(session);
    let extent = surface.measure_text(&text, style.status_size);
    let padding = Vec2::new(STATUS_PADDING, STATUS_PADDING);
    let origin = Point::new(STATUS_MARGIN, STATUS_MARGIN);

    surface.fill_rect(origin, extent + padding * 2.0, style.status_background);
    surface.draw_text(&text, origin + padding, style.status_text, style.status_size);
}

/// One-line summary of the tool, hovered cell, placed counts and zoom.
pub fn status_line(session: &Session) -> String {
    let tool = match session.tool {
        Tool::Idle => "Pan (drag to move)".to_string(),
        tool => match tool.anchor() {
            Some(anchor) => format!("{}: anchor at ({}, {})", tool.label(), anchor.x, anchor.y),
            None => format!("{}: click first corner", tool.label()),
        },
    };
    let cell = match session.grid.cell_at(session.world_cursor()) {
        Some((col, row)) => format!("({}, {})", col, row),
        None => "-".to_string(),
    };
    format!(
        "{} | Cell: {} | Stores: {} | Tracks: {} | Zoom: {:.0}%",
        tool,
        cell,
        session.placements.count_of(EntityKind::Store),
        session.placements.count_of(EntityKind::Track),
        session.camera.zoom_scale() * 100.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{DrawCommand, RecordingSurface};
    use tileplan_core::{Grid, footprint};
    use tileplan_core::input::{MouseButton, PointerEvent};

    const VIEWPORT: Size = Size::new(800.0, 600.0);

    fn session() -> Session {
        Session::new(Grid::new(4, 3, 50.0).unwrap())
    }

    fn click(session: &mut Session, screen: Point) {
        session.handle_pointer(PointerEvent::Move { position: screen });
        session.handle_pointer(PointerEvent::Down {
            position: screen,
            button: MouseButton::Left,
        });
        session.handle_pointer(PointerEvent::Up {
            position: screen,
            button: MouseButton::Left,
        });
    }

    #[test]
    fn test_draw_order() {
        let mut session = session();
        session.handle_key("s");
        click(&mut session, Point::new(400.0, 300.0));
        click(&mut session, Point::new(460.0, 310.0));
        session.handle_pointer(PointerEvent::Move {
            position: Point::new(420.0, 420.0),
        });
        session.handle_key("t");
        click(&mut session, Point::new(400.0, 300.0));
        session.handle_pointer(PointerEvent::Move {
            position: Point::new(530.0, 340.0),
        });

        let style = FrameStyle {
            show_status: false,
            ..FrameStyle::default()
        };
        let mut surface = RecordingSurface::new();
        render_frame(&mut session, &mut surface, VIEWPORT, &style, 1.0 / 60.0);

        let commands = surface.commands();
        assert!(matches!(commands[0], DrawCommand::Clear(_)));
        // 4 rows and 3 cols give 4 vertical and 5 horizontal lines.
        assert!(commands[1..10].iter().all(|c| matches!(c, DrawCommand::Line { .. })));
        assert_eq!(commands.len(), 12);

        let rects: Vec<_> = surface.rects().collect();
        assert_eq!(rects[0].0, Rect::new(400.0, 300.0, 500.0, 350.0));
        assert_eq!(rects[0].1.to_rgba8(), style.store.to_rgba8());
        assert_eq!(rects[1].0, Rect::new(400.0, 300.0, 550.0, 350.0));
        assert_eq!(rects[1].1.to_rgba8(), style.track.with_alpha(style.ghost_alpha).to_rgba8());
        assert_eq!(surface.depth(), 0);
    }

    #[test]
    fn test_grid_lines_follow_camera() {
        let mut session = session();
        session.camera.offset = Vec2::new(-50.0, 0.0);
        let mut surface = RecordingSurface::new();
        render_frame(&mut session, &mut surface, VIEWPORT, &FrameStyle::default(), 0.0);

        let (p0, p1) = surface.lines().next().unwrap();
        assert_eq!(p0, Point::new(350.0, 300.0));
        assert_eq!(p1, Point::new(350.0, 500.0));
    }

    #[test]
    fn test_line_width_is_zoom_independent() {
        let mut session = session();
        session.camera.zoom_level = 2.0;
        session.camera.set_target_zoom(2.0);
        let mut surface = RecordingSurface::new();
        render_frame(&mut session, &mut surface, VIEWPORT, &FrameStyle::default(), 0.0);

        for command in surface.commands() {
            if let DrawCommand::Line { width, .. } = command {
                assert!((width - 1.0).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_frame_advances_camera_and_viewport() {
        let mut session = session();
        session.camera.set_target_zoom(1.0);
        let mut surface = RecordingSurface::new();
        let viewport = Size::new(1024.0, 768.0);
        render_frame(&mut session, &mut surface, viewport, &FrameStyle::default(), 0.0);

        assert_eq!(session.camera.viewport, Size::new(1024.0, 768.0));
        assert!((session.camera.zoom_level - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_offscreen_entities_are_skipped() {
        let mut session = session();
        session.placements.push(footprint(EntityKind::Store, Point::ZERO, Point::ZERO, 50.0));
        let far = Point::new(5000.0, 5000.0);
        session.placements.push(footprint(EntityKind::Track, far, far, 50.0));

        let style = FrameStyle {
            show_status: false,
            ..FrameStyle::default()
        };
        let mut surface = RecordingSurface::new();
        render_frame(&mut session, &mut surface, VIEWPORT, &style, 0.0);

        let rects: Vec<_> = surface.rects().collect();
        assert_eq!(rects.len(), 1);
        assert_eq!(rects[0].0, Rect::new(400.0, 300.0, 450.0, 350.0));

        // Panning brings it back into view.
        session.camera.offset = Vec2::new(-5000.0, -5000.0);
        let mut surface = RecordingSurface::new();
        render_frame(&mut session, &mut surface, VIEWPORT, &style, 0.0);
        let rects: Vec<_> = surface.rects().collect();
        assert_eq!(rects.len(), 1);
        assert_eq!(rects[0].0, Rect::new(400.0, 300.0, 450.0, 350.0));
    }

    #[test]
    fn test_no_ghost_without_anchor() {
        let mut session = session();
        session.handle_key("s");
        session.handle_pointer(PointerEvent::Move {
            position: Point::new(420.0, 320.0),
        });
        let style = FrameStyle {
            show_status: false,
            ..FrameStyle::default()
        };
        let mut surface = RecordingSurface::new();
        render_frame(&mut session, &mut surface, VIEWPORT, &style, 0.0);
        assert_eq!(surface.rects().count(), 0);
    }

    #[test]
    fn test_status_line_drawn_in_screen_space() {
        let mut session = session();
        session.camera.zoom_level = 1.0;
        session.camera.set_target_zoom(1.0);
        let style = FrameStyle::default();
        let mut surface = RecordingSurface::new();
        render_frame(&mut session, &mut surface, VIEWPORT, &style, 0.0);

        let text = status_line(&session);
        assert_eq!(surface.texts().last(), Some(text.as_str()));

        let (backdrop, _) = surface.rects().last().unwrap();
        let extent = surface.clone().measure_text(&text, style.status_size);
        assert_eq!(backdrop.origin(), Point::new(STATUS_MARGIN, STATUS_MARGIN));
        assert!((backdrop.width() - (extent.x + 2.0 * STATUS_PADDING)).abs() < 1e-9);
    }

    #[test]
    fn test_status_line_text() {
        let mut session = session();
        assert_eq!(
            status_line(&session),
            "Pan (drag to move) | Cell: - | Stores: 0 | Tracks: 0 | Zoom: 100%"
        );

        session.handle_key("t");
        click(&mut session, Point::new(460.0, 310.0));
        assert_eq!(
            status_line(&session),
            "Track: anchor at (50, 0) | Cell: (1, 0) | Stores: 0 | Tracks: 0 | Zoom: 100%"
        );
    }
}
