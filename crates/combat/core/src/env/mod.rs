//! Environment capabilities consulted by combat resolution.
//!
//! The combat core never owns map data; it only asks whether a tile blocks
//! sight. Any grid or procedural obstruction source can answer that.
mod sight;

pub use sight::has_line_of_sight;

/// Collision surface queried by integer tile coordinate.
pub trait CollisionSurface {
    /// Returns true if the tile at `(x, y)` blocks line of sight.
    fn is_blocked(&self, x: i32, y: i32) -> bool;
}

impl<S: CollisionSurface + ?Sized> CollisionSurface for &S {
    fn is_blocked(&self, x: i32, y: i32) -> bool {
        (**self).is_blocked(x, y)
    }
}
