//! Fixed-size placement grid anchored at the world origin.

use crate::snap::cell_index;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Every n-th grid line is drawn as a major line.
pub const MAJOR_LINE_INTERVAL: u32 = 10;

/// Grid construction errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    #[error("Cell size must be a positive finite number, got {0}")]
    InvalidCellSize(f64),
}

/// Whether a grid line is a regular or an emphasized one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GridLineKind {
    Minor,
    Major,
}

/// A single grid line in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    pub start: Point,
    pub end: Point,
    pub kind: GridLineKind,
}

/// Geometric description of the placement grid.
///
/// Cell `(col, row)` covers `[col * s, (col + 1) * s) x [row * s, (row + 1) * s)`
/// in world space, where `s` is the cell size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    rows: u32,
    cols: u32,
    cell_size: f64,
}

impl Grid {
    /// Create a grid, rejecting non-positive or non-finite cell sizes.
    pub fn new(rows: u32, cols: u32, cell_size: f64) -> Result<Self, GridError> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(GridError::InvalidCellSize(cell_size));
        }
        Ok(Self {
            rows,
            cols,
            cell_size,
        })
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// World-space extent of the whole grid.
    pub fn bounds(&self) -> Rect {
        Rect::new(
            0.0,
            0.0,
            self.cols as f64 * self.cell_size,
            self.rows as f64 * self.cell_size,
        )
    }

    /// The `(col, row)` of the cell containing a world point, if it lies on the grid.
    pub fn cell_at(&self, point: Point) -> Option<(u32, u32)> {
        let (col, row) = cell_index(point, self.cell_size);
        if col < 0 || row < 0 || col >= i64::from(self.cols) || row >= i64::from(self.rows) {
            return None;
        }
        Some((col as u32, row as u32))
    }

    /// Iterate over every grid line, vertical lines first.
    pub fn lines(&self) -> impl Iterator<Item = GridLine> + '_ {
        let bounds = self.bounds();
        let kind = |index: u32| {
            if index % MAJOR_LINE_INTERVAL == 0 {
                GridLineKind::Major
            } else {
                GridLineKind::Minor
            }
        };

        let vertical = (0..=self.cols).map(move |col| {
            let x = col as f64 * self.cell_size;
            GridLine {
                start: Point::new(x, bounds.y0),
                end: Point::new(x, bounds.y1),
                kind: kind(col),
            }
        });
        let horizontal = (0..=self.rows).map(move |row| {
            let y = row as f64 * self.cell_size;
            GridLine {
                start: Point::new(bounds.x0, y),
                end: Point::new(bounds.x1, y),
                kind: kind(row),
            }
        });

        vertical.chain(horizontal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_cell_size() {
        assert_eq!(Grid::new(3, 3, 0.0), Err(GridError::InvalidCellSize(0.0)));
        assert!(Grid::new(3, 3, -5.0).is_err());
        assert!(Grid::new(3, 3, f64::NAN).is_err());
        assert!(Grid::new(3, 3, f64::INFINITY).is_err());
    }

    #[test]
    fn test_bounds_anchored_at_origin() {
        let grid = Grid::new(30, 20, 50.0).unwrap();
        assert_eq!(grid.bounds(), Rect::new(0.0, 0.0, 1000.0, 1500.0));
    }

    #[test]
    fn test_cell_at() {
        let grid = Grid::new(4, 6, 50.0).unwrap();
        assert_eq!(grid.cell_at(Point::new(12.0, 37.0)), Some((0, 0)));
        assert_eq!(grid.cell_at(Point::new(299.0, 199.0)), Some((5, 3)));
        assert_eq!(grid.cell_at(Point::new(300.0, 10.0)), None);
        assert_eq!(grid.cell_at(Point::new(-0.1, 10.0)), None);
    }

    #[test]
    fn test_line_count_and_major_lines() {
        let grid = Grid::new(30, 25, 50.0).unwrap();
        let lines: Vec<_> = grid.lines().collect();
        assert_eq!(lines.len(), 26 + 31);

        let majors = lines.iter().filter(|l| l.kind == GridLineKind::Major).count();
        // cols 0, 10, 20 and rows 0, 10, 20, 30
        assert_eq!(majors, 7);
    }

    #[test]
    fn test_lines_span_grid() {
        let grid = Grid::new(2, 3, 10.0).unwrap();
        let first = grid.lines().next().unwrap();
        assert_eq!(first.start, Point::new(0.0, 0.0));
        assert_eq!(first.end, Point::new(0.0, 20.0));

        let last = grid.lines().last().unwrap();
        assert_eq!(last.start, Point::new(0.0, 20.0));
        assert_eq!(last.end, Point::new(30.0, 20.0));
    }

    #[test]
    fn test_empty_grid_still_has_edge_lines() {
        let grid = Grid::new(0, 0, 10.0).unwrap();
        assert_eq!(grid.lines().count(), 2);
        assert_eq!(grid.cell_at(Point::ZERO), None);
    }
}
