//! Placement tool state machine.

use crate::placement::{EntityKind, PlacedEntity, footprint};
use crate::snap::snap_to_cell;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Pointer affordance the host should show for the active tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CursorStyle {
    /// Dragging pans the view.
    Move,
    /// Clicking places cells.
    Default,
}

/// The active tool and, for placing tools, the pending first corner.
///
/// `anchor: None` means the tool is waiting for its first click; `Some` holds
/// the snapped first corner while waiting for the second.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Tool {
    /// No placement; dragging pans the camera.
    #[default]
    Idle,
    PlacingStore { anchor: Option<Point> },
    PlacingTrack { anchor: Option<Point> },
}

impl Tool {
    /// A fresh placing tool for the given kind, awaiting its first click.
    pub fn placing(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Store => Tool::PlacingStore { anchor: None },
            EntityKind::Track => Tool::PlacingTrack { anchor: None },
        }
    }

    /// Kind of entity this tool places, `None` when idle.
    pub fn kind(&self) -> Option<EntityKind> {
        match self {
            Tool::Idle => None,
            Tool::PlacingStore { .. } => Some(EntityKind::Store),
            Tool::PlacingTrack { .. } => Some(EntityKind::Track),
        }
    }

    /// The pending first corner, if any.
    pub fn anchor(&self) -> Option<Point> {
        match self {
            Tool::Idle => None,
            Tool::PlacingStore { anchor } | Tool::PlacingTrack { anchor } => *anchor,
        }
    }

    fn anchor_mut(&mut self) -> Option<&mut Option<Point>> {
        match self {
            Tool::Idle => None,
            Tool::PlacingStore { anchor } | Tool::PlacingTrack { anchor } => Some(anchor),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Tool::Idle)
    }

    /// Select the tool for `kind`.
    ///
    /// Selecting the active tool again toggles back to idle. Switching to the
    /// other tool starts it fresh. Either way a pending anchor is discarded.
    pub fn select(&mut self, kind: EntityKind) {
        *self = if self.kind() == Some(kind) {
            Tool::Idle
        } else {
            Tool::placing(kind)
        };
    }

    /// Handle a primary click at a world position.
    ///
    /// The first click records the snapped anchor; the second returns the
    /// finished entity and leaves the tool ready for the next one. Idle
    /// clicks do nothing here.
    pub fn click(&mut self, world: Point, cell_size: f64) -> Option<PlacedEntity> {
        let kind = self.kind()?;
        let anchor = self.anchor_mut()?;
        match anchor.take() {
            None => {
                *anchor = Some(snap_to_cell(world, cell_size));
                None
            }
            Some(start) => Some(footprint(kind, start, world, cell_size)),
        }
    }

    /// The entity that would be placed by clicking at `world` now.
    pub fn ghost(&self, world: Point, cell_size: f64) -> Option<PlacedEntity> {
        let kind = self.kind()?;
        let anchor = self.anchor()?;
        Some(footprint(kind, anchor, world, cell_size))
    }

    /// Drop a pending anchor, keeping the tool. Returns whether one was dropped.
    pub fn cancel(&mut self) -> bool {
        self.anchor_mut()
            .and_then(|anchor| anchor.take())
            .is_some()
    }

    /// Cursor affordance for this tool.
    pub fn cursor(&self) -> CursorStyle {
        match self {
            Tool::Idle => CursorStyle::Move,
            Tool::PlacingStore { .. } | Tool::PlacingTrack { .. } => CursorStyle::Default,
        }
    }

    /// Short label for status display.
    pub fn label(&self) -> &'static str {
        match self {
            Tool::Idle => "Pan",
            Tool::PlacingStore { .. } => "Store",
            Tool::PlacingTrack { .. } => "Track",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Vec2;

    #[test]
    fn test_default_is_idle() {
        let tool = Tool::default();
        assert!(tool.is_idle());
        assert_eq!(tool.kind(), None);
        assert_eq!(tool.cursor(), CursorStyle::Move);
    }

    #[test]
    fn test_tool_toggle() {
        let mut tool = Tool::Idle;
        tool.select(EntityKind::Track);
        assert_eq!(tool, Tool::PlacingTrack { anchor: None });
        assert_eq!(tool.cursor(), CursorStyle::Default);

        tool.select(EntityKind::Track);
        assert_eq!(tool, Tool::Idle);
        assert_eq!(tool.cursor(), CursorStyle::Move);
    }

    #[test]
    fn test_switch_discards_anchor() {
        let mut tool = Tool::Idle;
        tool.select(EntityKind::Track);
        tool.click(Point::new(70.0, 20.0), 50.0);
        assert_eq!(tool.anchor(), Some(Point::new(50.0, 0.0)));

        tool.select(EntityKind::Store);
        assert_eq!(tool, Tool::PlacingStore { anchor: None });
    }

    #[test]
    fn test_toggle_off_discards_anchor() {
        let mut tool = Tool::placing(EntityKind::Store);
        tool.click(Point::new(10.0, 10.0), 50.0);
        tool.select(EntityKind::Store);
        assert_eq!(tool, Tool::Idle);
        tool.select(EntityKind::Store);
        assert_eq!(tool.anchor(), None);
    }

    #[test]
    fn test_idle_click_does_nothing() {
        let mut tool = Tool::Idle;
        assert_eq!(tool.click(Point::new(10.0, 10.0), 50.0), None);
        assert_eq!(tool, Tool::Idle);
    }

    #[test]
    fn test_two_click_store_placement() {
        let mut tool = Tool::placing(EntityKind::Store);

        assert_eq!(tool.click(Point::new(12.0, 37.0), 50.0), None);
        assert_eq!(tool.anchor(), Some(Point::ZERO));

        let placed = tool.click(Point::new(61.0, 2.0), 50.0).unwrap();
        assert_eq!(placed.kind, EntityKind::Store);
        assert_eq!(placed.origin, Point::ZERO);
        assert_eq!(placed.extent, Vec2::new(100.0, 50.0));
        assert_eq!(tool, Tool::PlacingStore { anchor: None });
    }

    #[test]
    fn test_two_click_track_placement() {
        let mut tool = Tool::placing(EntityKind::Track);
        tool.click(Point::new(5.0, 5.0), 50.0);
        let placed = tool.click(Point::new(130.0, 40.0), 50.0).unwrap();
        assert_eq!(placed.kind, EntityKind::Track);
        assert_eq!(placed.origin, Point::ZERO);
        assert_eq!(placed.extent, Vec2::new(150.0, 50.0));
    }

    #[test]
    fn test_ghost_matches_commit() {
        let mut tool = Tool::placing(EntityKind::Track);
        assert_eq!(tool.ghost(Point::new(300.0, 20.0), 50.0), None);

        tool.click(Point::new(120.0, 220.0), 50.0);
        for current in [
            Point::new(-80.0, 260.0),
            Point::new(115.0, 490.0),
            Point::new(400.0, 210.0),
        ] {
            let ghost = tool.ghost(current, 50.0);
            let mut committed = tool;
            assert_eq!(ghost, committed.click(current, 50.0));
        }
    }

    #[test]
    fn test_same_cell_twice_places_one_cell_at_inexact_size() {
        let mut tool = Tool::placing(EntityKind::Store);
        let world = Point::new(-738.877, 3814.27);
        tool.click(world, 0.1);
        let anchor = tool.anchor().unwrap();

        let placed = tool.click(world, 0.1).unwrap();
        assert_eq!(placed.origin, anchor);
        assert_eq!(placed.cells(0.1), (1, 1));
        assert_eq!(placed.extent, Vec2::new(0.1, 0.1));
    }

    #[test]
    fn test_escape_clears_anchor_only() {
        let mut tool = Tool::placing(EntityKind::Store);
        tool.click(Point::new(10.0, 10.0), 50.0);

        assert!(tool.cancel());
        assert_eq!(tool, Tool::PlacingStore { anchor: None });

        assert!(!tool.cancel());
        assert_eq!(tool, Tool::PlacingStore { anchor: None });

        let mut idle = Tool::Idle;
        assert!(!idle.cancel());
        assert_eq!(idle, Tool::Idle);
    }
}
