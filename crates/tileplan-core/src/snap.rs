//! Snapping world positions onto grid cells.
//!
//! Snapping goes through integer cell indices. A snapped coordinate is always
//! produced as `index as f64 * cell_size`, and [`cell_index`] maps exactly that
//! product back to `index`, so snapping an already snapped point is a no-op for
//! any cell size, including ones like `0.1` that have no exact binary form.

use kurbo::Point;

/// Snap a world point to the lower corner of the cell containing it.
///
/// Cells are anchored at the world origin, so the result is
/// `floor(point / cell_size) * cell_size` on each axis. Points exactly on a
/// grid line belong to the cell on the positive side of it, and so do points
/// within rounding distance below one.
pub fn snap_to_cell(point: Point, cell_size: f64) -> Point {
    let (col, row) = cell_index(point, cell_size);
    Point::new(cell_corner(col, cell_size), cell_corner(row, cell_size))
}

/// Integer cell coordinates `(col, row)` of the cell containing a world point.
///
/// Unlike [`crate::Grid::cell_at`] this is not bounded by the grid size.
pub fn cell_index(point: Point, cell_size: f64) -> (i64, i64) {
    (axis_index(point.x, cell_size), axis_index(point.y, cell_size))
}

/// World coordinate of the lower edge of cell `index` on one axis.
pub fn cell_corner(index: i64, cell_size: f64) -> f64 {
    index as f64 * cell_size
}

/// Index of the cell containing `value` on one axis.
///
/// `value / cell_size` can land on the wrong side of an integer, so the floor
/// is corrected against the corners it is compared with. Afterwards
/// `value - cell_corner(index) < cell_size`, and `cell_corner(index) <= value`
/// unless `value` is within rounding of the next grid line, which then wins.
fn axis_index(value: f64, cell_size: f64) -> i64 {
    let mut index = (value / cell_size).floor() as i64;
    if cell_corner(index, cell_size) > value {
        index = index.saturating_sub(1);
    }
    let next = index.saturating_add(1);
    if cell_corner(next, cell_size) <= value || value - cell_corner(index, cell_size) >= cell_size {
        index = next;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SAMPLES: [Point; 9] = [
        Point::new(0.0, 0.0),
        Point::new(12.0, 37.0),
        Point::new(49.999, 50.0),
        Point::new(-0.5, -49.0),
        Point::new(-50.0, -50.0001),
        Point::new(1234.5, -987.25),
        Point::new(61.0, 2.0),
        Point::new(130.0, 40.0),
        Point::new(-3.0e6, 7.5e5),
    ];

    /// Slack for the offset when a point sits within rounding of a grid line.
    fn rounding_slack(value: f64, cell_size: f64) -> f64 {
        8.0 * f64::EPSILON * (value.abs() + cell_size)
    }

    fn assert_snapped(p: Point, cell_size: f64) {
        let snapped = snap_to_cell(p, cell_size);
        let (col, row) = cell_index(p, cell_size);
        assert_eq!(snapped, Point::new(cell_corner(col, cell_size), cell_corner(row, cell_size)));

        let offset = p - snapped;
        assert!(offset.x < cell_size, "{p:?} @ {cell_size}: offset {offset:?}");
        assert!(offset.y < cell_size, "{p:?} @ {cell_size}: offset {offset:?}");
        assert!(offset.x >= -rounding_slack(p.x, cell_size), "{p:?} @ {cell_size}");
        assert!(offset.y >= -rounding_slack(p.y, cell_size), "{p:?} @ {cell_size}");

        assert_eq!(snap_to_cell(snapped, cell_size), snapped, "{p:?} @ {cell_size}");
        assert_eq!(cell_index(snapped, cell_size), (col, row), "{p:?} @ {cell_size}");
    }

    #[test]
    fn test_snap_basic() {
        assert_eq!(snap_to_cell(Point::new(12.0, 37.0), 50.0), Point::new(0.0, 0.0));
        assert_eq!(snap_to_cell(Point::new(61.0, 2.0), 50.0), Point::new(50.0, 0.0));
        assert_eq!(snap_to_cell(Point::new(130.0, 0.0), 50.0), Point::new(100.0, 0.0));
    }

    #[test]
    fn test_snap_negative_rounds_down() {
        assert_eq!(snap_to_cell(Point::new(-0.5, -49.0), 50.0), Point::new(-50.0, -50.0));
        assert_eq!(snap_to_cell(Point::new(-50.0, -50.5), 50.0), Point::new(-50.0, -100.0));
    }

    #[test]
    fn test_snap_on_grid_line_belongs_to_upper_cell() {
        assert_eq!(snap_to_cell(Point::new(50.0, 100.0), 50.0), Point::new(50.0, 100.0));
    }

    #[test]
    fn test_snap_samples() {
        for cell_size in [50.0, 20.0, 7.0, 0.5, 0.1, 0.3, 33.3] {
            for p in SAMPLES {
                assert_snapped(p, cell_size);
            }
        }
    }

    #[test]
    fn test_snap_is_idempotent_for_inexact_cell_size() {
        let p = Point::new(-738.877, 3814.27);
        let once = snap_to_cell(p, 0.1);
        assert_eq!(snap_to_cell(once, 0.1), once);
        assert_eq!(cell_index(once, 0.1), cell_index(p, 0.1));
        assert_eq!(cell_index(p, 0.1), (-7389, 38142));
    }

    #[test]
    fn test_point_just_below_grid_line_snaps_to_it() {
        // -1e-17 - (-50) rounds to exactly 50, a whole cell away.
        let p = Point::new(-1e-17, 10.0);
        let snapped = snap_to_cell(p, 50.0);
        assert_eq!(snapped, Point::new(0.0, 0.0));
        assert!((p - snapped).x < 50.0);
        assert_eq!(cell_index(p, 50.0), (0, 0));
    }

    #[test]
    fn test_cell_index() {
        assert_eq!(cell_index(Point::new(12.0, 37.0), 50.0), (0, 0));
        assert_eq!(cell_index(Point::new(130.0, -1.0), 50.0), (2, -1));
    }

    proptest! {
        #[test]
        fn prop_snap_lands_on_containing_cell(
            x in -1.0e6f64..1.0e6,
            y in -1.0e6f64..1.0e6,
            cell_size in 1.0e-3f64..1.0e3,
        ) {
            assert_snapped(Point::new(x, y), cell_size);
        }

        #[test]
        fn prop_snap_near_zero(
            x in -1.0e-9f64..1.0e-9,
            y in -1.0e-9f64..1.0e-9,
            cell_size in 1.0e-3f64..1.0e3,
        ) {
            assert_snapped(Point::new(x, y), cell_size);
        }

        #[test]
        fn prop_cell_corner_round_trips(
            index in -1_000_000i64..1_000_000,
            cell_size in 1.0e-3f64..1.0e3,
        ) {
            let corner = Point::new(cell_corner(index, cell_size), cell_corner(-index, cell_size));
            prop_assert_eq!(cell_index(corner, cell_size), (index, -index));
        }
    }
}
