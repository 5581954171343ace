//! Board geometry shared by placement, targeting, and pathfinding.
//!
//! Two grids are in play:
//! - the **layout grid** (3 columns x 21 rows) where an army is deployed
//!   when it is assembled;
//! - the **battlefield** (27 x 21) across which units move and fight.

use serde::{Deserialize, Serialize};

/// Columns in the army layout grid.
pub const LAYOUT_COLUMNS: i32 = 3;

/// Rows in the army layout grid.
pub const LAYOUT_ROWS: i32 = 21;

/// Number of cells in the army layout grid. Hard cap on army size.
pub const LAYOUT_CELLS: usize = (LAYOUT_COLUMNS * LAYOUT_ROWS) as usize;

/// Battlefield width (x axis).
pub const FIELD_WIDTH: i32 = 27;

/// Battlefield height (y axis).
pub const FIELD_HEIGHT: i32 = 21;

/// Offsets of the 8 king-move neighbours.
pub const KING_MOVES: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// A cell on either grid.
///
/// On the layout grid `x` is the column and `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct GridPos {
    /// Column / horizontal coordinate.
    pub x: i32,
    /// Row / transverse coordinate.
    pub y: i32,
}

/// A single step of a path. Paths are ordered sequences of edges.
pub type Edge = GridPos;

impl GridPos {
    /// Create a new grid position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Encode the coordinate into a single integer key.
    ///
    /// Injective over all `i32` pairs, so it doubles as an identity for
    /// visited-set and obstacle lookups.
    #[inline]
    #[must_use]
    pub const fn key(self) -> u64 {
        ((self.x as u32 as u64) << 32) | (self.y as u32 as u64)
    }

    /// Offset this position by `(dx, dy)`.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Chebyshev distance: the number of king moves on an open board.
    #[must_use]
    pub fn chebyshev_distance(self, other: Self) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    /// Manhattan distance.
    #[must_use]
    pub fn manhattan_distance(self, other: Self) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// True if `other` is one king move away (not the same cell).
    #[must_use]
    pub fn is_adjacent(self, other: Self) -> bool {
        self != other && self.chebyshev_distance(other) == 1
    }

    /// True if the position lies on the battlefield.
    #[must_use]
    pub const fn in_field(self) -> bool {
        self.x >= 0 && self.x < FIELD_WIDTH && self.y >= 0 && self.y < FIELD_HEIGHT
    }

    /// True if the position lies on the army layout grid.
    #[must_use]
    pub const fn in_layout(self) -> bool {
        self.x >= 0 && self.x < LAYOUT_COLUMNS && self.y >= 0 && self.y < LAYOUT_ROWS
    }

    /// Battlefield neighbours reachable with one king move.
    pub fn field_neighbors(self) -> impl Iterator<Item = GridPos> {
        KING_MOVES
            .into_iter()
            .map(move |(dx, dy)| self.offset(dx, dy))
            .filter(|pos| pos.in_field())
    }
}

impl std::fmt::Display for GridPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for GridPos {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_size() {
        assert_eq!(LAYOUT_CELLS, 63);
    }

    #[test]
    fn test_key_is_injective_for_negative_coords() {
        let a = GridPos::new(-1, 0).key();
        let b = GridPos::new(0, -1).key();
        let c = GridPos::new(0, 0).key();
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(b, c);
    }

    #[test]
    fn test_distances() {
        let a = GridPos::new(0, 0);
        let b = GridPos::new(3, 7);
        assert_eq!(a.chebyshev_distance(b), 7);
        assert_eq!(a.manhattan_distance(b), 10);
        assert_eq!(a.chebyshev_distance(a), 0);
    }

    #[test]
    fn test_adjacency() {
        let center = GridPos::new(5, 5);
        assert!(center.is_adjacent(GridPos::new(6, 6)));
        assert!(center.is_adjacent(GridPos::new(5, 4)));
        assert!(!center.is_adjacent(center));
        assert!(!center.is_adjacent(GridPos::new(7, 5)));
    }

    #[test]
    fn test_corner_has_three_neighbors() {
        assert_eq!(GridPos::new(0, 0).field_neighbors().count(), 3);
        assert_eq!(GridPos::new(26, 20).field_neighbors().count(), 3);
        assert_eq!(GridPos::new(10, 10).field_neighbors().count(), 8);
    }

    #[test]
    fn test_bounds() {
        assert!(GridPos::new(26, 20).in_field());
        assert!(!GridPos::new(27, 0).in_field());
        assert!(GridPos::new(2, 20).in_layout());
        assert!(!GridPos::new(3, 0).in_layout());
    }
}
