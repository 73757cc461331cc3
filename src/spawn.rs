//! Tile spawn policy: random colours that never complete a run of three.
//!
//! A colour is illegal at (row, col) when it matches both tiles to the left
//! (col-1 and col-2) or both tiles below (row+1 and row+2). Rows are filled
//! bottom-up and left-to-right, so those are the neighbours already placed.

use crate::grid::Grid;
use crate::tile::TileColor;
use log::warn;
use rand::Rng;

/// Random draws before giving up on sampling.
pub const MAX_ATTEMPTS: usize = 50;

#[derive(Debug, Clone)]
pub struct SpawnPolicy {
    palette: Vec<TileColor>,
    max_attempts: usize,
}

impl Default for SpawnPolicy {
    fn default() -> Self {
        Self::new(TileColor::ALL.to_vec())
    }
}

impl SpawnPolicy {
    pub fn new(palette: Vec<TileColor>) -> Self {
        assert!(!palette.is_empty(), "spawn palette must not be empty");
        Self {
            palette,
            max_attempts: MAX_ATTEMPTS,
        }
    }

    pub fn palette(&self) -> &[TileColor] {
        &self.palette
    }

    /// True if placing `color` at (row, col) would not complete a run of three.
    pub fn is_legal(grid: &Grid, row: usize, col: usize, color: TileColor) -> bool {
        let c = Some(color);
        let horizontal =
            col >= 2 && grid.color_at(col - 1, row) == c && grid.color_at(col - 2, row) == c;
        let vertical = grid.color_at(col, row + 1) == c && grid.color_at(col, row + 2) == c;
        !horizontal && !vertical
    }

    /// Pick a colour for (row, col) uniformly among the legal ones.
    ///
    /// Rejection sampling, capped at [`MAX_ATTEMPTS`]. With three or more colours at
    /// most two are ever forbidden, so the cap only matters for a rigged RNG; the
    /// fallback is then the first legal colour in palette order.
    pub fn choose_color<R: Rng + ?Sized>(
        &self,
        grid: &Grid,
        row: usize,
        col: usize,
        rng: &mut R,
    ) -> TileColor {
        for _ in 0..self.max_attempts {
            let color = self.palette[rng.gen_range(0..self.palette.len())];
            if Self::is_legal(grid, row, col, color) {
                return color;
            }
        }
        let fallback = self
            .palette
            .iter()
            .copied()
            .find(|&color| Self::is_legal(grid, row, col, color))
            .unwrap_or(self.palette[0]);
        warn!(
            "spawn sampling exhausted {} attempts at ({}, {}); using {:?}",
            self.max_attempts, col, row, fallback
        );
        fallback
    }
}
