use crate::env::CollisionSurface;

/// Rectangular collision grid stored row-major.
///
/// Tiles outside the grid are solid. An empty grid (the default) carries no
/// collision data and is treated as an open field.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileGrid {
    width: u32,
    height: u32,
    solid: Vec<bool>,
}

impl TileGrid {
    /// Grid of the given size with every tile open.
    pub fn open(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            solid: vec![false; width as usize * height as usize],
        }
    }

    /// Parses rows of `#` (solid) and any other character (open).
    ///
    /// Row 0 is `y = 0`. Short rows are padded with open tiles.
    pub fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len() as u32;
        let width = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0) as u32;
        let mut grid = Self::open(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                if ch == '#' {
                    grid.set_solid(x as i32, y as i32, true);
                }
            }
        }
        grid
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.solid.is_empty()
    }

    /// Builder form of [`TileGrid::set_solid`].
    #[must_use]
    pub fn with_solid(mut self, x: i32, y: i32) -> Self {
        self.set_solid(x, y, true);
        self
    }

    /// Marks a tile solid or open. Out-of-bounds coordinates are ignored.
    pub fn set_solid(&mut self, x: i32, y: i32, solid: bool) {
        if let Some(index) = self.index(x, y) {
            self.solid[index] = solid;
        }
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }
}

impl CollisionSurface for TileGrid {
    fn is_blocked(&self, x: i32, y: i32) -> bool {
        if self.is_empty() {
            return false;
        }
        match self.index(x, y) {
            Some(index) => self.solid[index],
            None => true,
        }
    }
}
