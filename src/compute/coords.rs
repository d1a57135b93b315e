//! Coordinate mapping and the 4-neighbor adjacency table.
//!
//! World coordinates have y increasing upward. Storage is row-major with
//! storage row 0 holding the topmost world row.

/// Map world coordinates to a storage index.
///
/// Returns `None` when `(x, y)` lies outside the grid.
#[inline]
pub fn cell_index(width: usize, height: usize, x: i32, y: i32) -> Option<usize> {
    if x < 0 || y < 0 {
        return None;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= width || y >= height {
        return None;
    }
    Some((height - 1 - y) * width + x)
}

/// Inverse of [`cell_index`]: storage index back to world `(x, y)`.
#[inline]
pub fn cell_coords(width: usize, height: usize, index: usize) -> (usize, usize) {
    debug_assert!(index < width * height, "index {index} outside {width}x{height} grid");
    (index % width, height - 1 - index / width)
}

/// Neighbor directions in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Down = 0,
    Left = 1,
    Right = 2,
    Up = 3,
}

impl Direction {
    /// All directions in the order flow and light visit them.
    pub const ALL: [Direction; 4] = [
        Direction::Down,
        Direction::Left,
        Direction::Right,
        Direction::Up,
    ];

    /// World-space offset `(dx, dy)`.
    #[inline]
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::Down => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, 1),
        }
    }
}

/// Precomputed down/left/right/up neighbor indices for every cell.
#[derive(Debug, Clone)]
pub struct NeighborTable {
    entries: Vec<[u32; 4]>,
}

impl NeighborTable {
    /// Stored in place of a missing neighbor.
    pub const NONE: u32 = u32::MAX;

    /// Build the table for a `width x height` grid.
    pub fn build(width: usize, height: usize) -> Self {
        debug_assert!(width * height < Self::NONE as usize);
        let mut entries = vec![[Self::NONE; 4]; width * height];
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                let Some(index) = cell_index(width, height, x, y) else {
                    continue;
                };
                for dir in Direction::ALL {
                    let (dx, dy) = dir.offset();
                    entries[index][dir as usize] = cell_index(width, height, x + dx, y + dy)
                        .map_or(Self::NONE, |n| n as u32);
                }
            }
        }
        Self { entries }
    }

    /// Number of cells covered.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Neighbor of `index` in direction `dir`, or `None` at the grid edge.
    #[inline]
    pub fn get(&self, index: usize, dir: Direction) -> Option<usize> {
        decode(self.entries[index][dir as usize])
    }

    /// All four neighbors of `index` in table order.
    #[inline]
    pub fn around(&self, index: usize) -> [Option<usize>; 4] {
        self.entries[index].map(decode)
    }
}

#[inline]
fn decode(raw: u32) -> Option<usize> {
    (raw != NeighborTable::NONE).then_some(raw as usize)
}
