//! Grid line-of-sight predicate.
//!
//! Traces the tiles crossed by the segment between two tile centres using
//! integer arithmetic only. The caster's own tile never blocks; every other
//! tile on the trace, destination included, must be open. When the segment
//! passes exactly through a tile corner, both tiles flanking that corner must
//! be open as well, so sight never slips between two diagonal walls.

use tracing::trace;

use super::CollisionSurface;
use crate::fixed::FixedVec2;

/// Returns true when nothing on `surface` blocks sight from `from` to `to`.
pub fn has_line_of_sight<S>(surface: &S, from: FixedVec2, to: FixedVec2) -> bool
where
    S: CollisionSurface + ?Sized,
{
    let start = from.tile();
    let end = to.tile();
    if start == end {
        return true;
    }

    let dx = end.0 as i64 - start.0 as i64;
    let dy = end.1 as i64 - start.1 as i64;
    let (adx, ady) = (dx.abs(), dy.abs());
    let step_x = dx.signum() as i32;
    let step_y = dy.signum() as i32;

    let (mut x, mut y) = start;
    let (mut progressed_x, mut progressed_y) = (0i64, 0i64);

    while progressed_x <= adx && progressed_y <= ady {
        let decision = (1 + 2 * progressed_x) * ady - (1 + 2 * progressed_y) * adx;

        if decision == 0 {
            // Exact corner crossing: both flanking tiles must be open.
            for (fx, fy) in [(x + step_x, y), (x, y + step_y)] {
                if (fx, fy) != start && surface.is_blocked(fx, fy) {
                    trace!(target: "combat::sight", x = fx, y = fy, "corner flank blocks sight");
                    return false;
                }
            }
            x += step_x;
            y += step_y;
            progressed_x += 1;
            progressed_y += 1;
        } else if decision < 0 {
            x += step_x;
            progressed_x += 1;
        } else {
            y += step_y;
            progressed_y += 1;
        }

        if surface.is_blocked(x, y) {
            trace!(target: "combat::sight", x, y, "tile blocks sight");
            return false;
        }
        if (x, y) == end {
            return true;
        }
    }

    // Unreachable for well-formed input: the trace always lands on `end`.
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::TileGrid;

    fn at(x: i32, y: i32) -> FixedVec2 {
        FixedVec2::from_ints(x, y)
    }

    #[test]
    fn clear_horizontal_and_vertical_paths() {
        let grid = TileGrid::open(8, 8);
        assert!(has_line_of_sight(&grid, at(0, 3), at(7, 3)));
        assert!(has_line_of_sight(&grid, at(2, 7), at(2, 0)));
    }

    #[test]
    fn wall_between_blocks_sight() {
        let grid = TileGrid::open(8, 8).with_solid(4, 3);
        assert!(!has_line_of_sight(&grid, at(0, 3), at(7, 3)));
        assert!(has_line_of_sight(&grid, at(0, 3), at(3, 3)));
    }

    #[test]
    fn solid_start_tile_does_not_block() {
        let grid = TileGrid::open(8, 8).with_solid(1, 1);
        assert!(has_line_of_sight(&grid, at(1, 1), at(5, 1)));
    }

    #[test]
    fn solid_destination_blocks() {
        let grid = TileGrid::open(8, 8).with_solid(5, 1);
        assert!(!has_line_of_sight(&grid, at(1, 1), at(5, 1)));
    }

    #[test]
    fn same_tile_is_always_visible() {
        let grid = TileGrid::open(2, 2).with_solid(0, 0);
        let inside = FixedVec2::new(
            crate::fixed::Fixed::from_raw(100),
            crate::fixed::Fixed::from_raw(40_000),
        );
        assert!(has_line_of_sight(&grid, at(0, 0), inside));
    }

    #[test]
    fn diagonal_corner_needs_both_flanks_open() {
        let open = TileGrid::open(4, 4);
        assert!(has_line_of_sight(&open, at(0, 0), at(3, 3)));

        let both = TileGrid::open(4, 4).with_solid(1, 0).with_solid(0, 1);
        assert!(!has_line_of_sight(&both, at(0, 0), at(1, 1)));

        let one = TileGrid::open(4, 4).with_solid(1, 0);
        assert!(!has_line_of_sight(&one, at(0, 0), at(1, 1)));
    }

    #[test]
    fn shallow_line_steps_through_expected_tiles() {
        // (0,0) -> (4,1) visits (1,0), (2,0), (2,1), (3,1), (4,1).
        let grid = TileGrid::open(6, 3).with_solid(2, 1);
        assert!(!has_line_of_sight(&grid, at(0, 0), at(4, 1)));
        let clear = TileGrid::open(6, 3).with_solid(1, 1);
        assert!(has_line_of_sight(&clear, at(0, 0), at(4, 1)));
    }

    #[test]
    fn negative_directions_trace_symmetrically() {
        let grid = TileGrid::open(8, 8).with_solid(3, 3);
        assert!(!has_line_of_sight(&grid, at(6, 6), at(0, 0)));
        assert!(!has_line_of_sight(&grid, at(0, 0), at(6, 6)));
    }

    #[test]
    fn leaving_the_grid_blocks() {
        let grid = TileGrid::open(4, 4);
        assert!(!has_line_of_sight(&grid, at(1, 1), at(6, 1)));
    }
}
