//! Randomized deployment cells on the army layout grid.
//!
//! The 63 layout cells are enumerated row by row and shuffled with a
//! caller-supplied random source. Seeding that source reproduces the exact
//! placement.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::grid::{GridPos, LAYOUT_CELLS, LAYOUT_COLUMNS, LAYOUT_ROWS};

/// All layout cells in fixed traversal order: rows outer, columns inner.
#[must_use]
pub fn layout_cells() -> Vec<GridPos> {
    let mut cells = Vec::with_capacity(LAYOUT_CELLS);
    for row in 0..LAYOUT_ROWS {
        for column in 0..LAYOUT_COLUMNS {
            cells.push(GridPos::new(column, row));
        }
    }
    cells
}

/// Hands out distinct layout cells in shuffled order.
#[derive(Debug, Clone)]
pub struct PlacementGrid {
    cells: Vec<GridPos>,
    next: usize,
}

impl PlacementGrid {
    /// Shuffle the layout cells with `rng`.
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut cells = layout_cells();
        cells.shuffle(rng);
        Self { cells, next: 0 }
    }

    /// Cells in the order they will be handed out.
    #[must_use]
    pub fn cells(&self) -> &[GridPos] {
        &self.cells
    }

    /// Take the next unused cell, or `None` once all 63 are used.
    pub fn next_cell(&mut self) -> Option<GridPos> {
        let cell = self.cells.get(self.next).copied()?;
        self.next += 1;
        Some(cell)
    }
}
