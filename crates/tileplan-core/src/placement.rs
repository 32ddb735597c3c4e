//! Placed entities and the footprint math shared by preview and commit.

use crate::snap::{cell_corner, cell_index, snap_to_cell};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// The kinds of entity that can be placed on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Store,
    Track,
}

impl EntityKind {
    /// Get display name for this kind.
    pub fn name(self) -> &'static str {
        match self {
            EntityKind::Store => "Store",
            EntityKind::Track => "Track",
        }
    }
}

/// An axis-aligned block of whole cells committed to the grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacedEntity {
    pub kind: EntityKind,
    /// Lower corner, a multiple of the cell size on both axes.
    pub origin: Point,
    /// Size, a positive multiple of the cell size on both axes.
    pub extent: Vec2,
}

impl PlacedEntity {
    /// Get the entity as a kurbo Rect.
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.origin, self.extent.to_size())
    }

    /// Number of cells covered as `(cols, rows)`.
    pub fn cells(&self, cell_size: f64) -> (u32, u32) {
        (
            (self.extent.x / cell_size).round() as u32,
            (self.extent.y / cell_size).round() as u32,
        )
    }
}

/// Force `point` onto the row or column of `anchor`.
///
/// The axis with the larger displacement wins; ties go horizontal.
pub fn axis_lock(anchor: Point, point: Point) -> Point {
    let delta = point - anchor;
    if delta.x.abs() >= delta.y.abs() {
        Point::new(point.x, anchor.y)
    } else {
        Point::new(anchor.x, point.y)
    }
}

/// Compute the entity spanned by an anchor and the current world position.
///
/// Used for both the ghost preview and the committed entity so the two can
/// never disagree. Tracks are axis-locked before snapping, then both corners
/// are resolved to cell indices and the inclusive bounding box of whole cells
/// is taken. An anchor that is already snapped keeps its exact position.
pub fn footprint(kind: EntityKind, anchor: Point, current: Point, cell_size: f64) -> PlacedEntity {
    let (a_col, a_row) = cell_index(anchor, cell_size);
    let current = match kind {
        EntityKind::Store => current,
        EntityKind::Track => axis_lock(snap_to_cell(anchor, cell_size), current),
    };
    let (b_col, b_row) = cell_index(current, cell_size);

    let origin = Point::new(
        cell_corner(a_col.min(b_col), cell_size),
        cell_corner(a_row.min(b_row), cell_size),
    );
    let extent = Vec2::new(
        cell_corner(a_col.abs_diff(b_col) as i64 + 1, cell_size),
        cell_corner(a_row.abs_diff(b_row) as i64 + 1, cell_size),
    );

    PlacedEntity {
        kind,
        origin,
        extent,
    }
}

/// Append-only collection of placed entities, kept in placement order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Placements {
    entities: Vec<PlacedEntity>,
}

impl Placements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entity. Later entities draw over earlier ones.
    pub fn push(&mut self, entity: PlacedEntity) {
        self.entities.push(entity);
    }

    /// Entities in placement (and render) order.
    pub fn iter(&self) -> impl Iterator<Item = &PlacedEntity> {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// The most recently placed entity.
    pub fn last(&self) -> Option<&PlacedEntity> {
        self.entities.last()
    }

    /// Number of entities of one kind.
    pub fn count_of(&self, kind: EntityKind) -> usize {
        self.entities.iter().filter(|e| e.kind == kind).count()
    }
}

impl<'a> IntoIterator for &'a Placements {
    type Item = &'a PlacedEntity;
    type IntoIter = std::slice::Iter<'a, PlacedEntity>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.iter()
    }
}
