//! The tile grid: rows x columns of tiles, row 0 on top.
//!
//! Rows are stored in a `VecDeque` so the top row can be recycled and a fresh
//! row pushed at the bottom without shifting the whole matrix.
//!
//! Indices passed to these methods are preconditions. Out-of-range rows or
//! columns are programmer errors and panic rather than reshaping the grid.

use crate::scene::Stage;
use crate::spawn::SpawnPolicy;
use crate::tile::{Position, Tile, TileColor, TileId};
use log::debug;
use rand::{Rng, RngCore};
use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct Grid {
    columns: usize,
    tile_size: u32,
    /// rows[y][x]; rows[0] is top.
    rows: VecDeque<Vec<Tile>>,
}

impl Grid {
    /// Grid of inactive placeholders laid out from pixel (0, 0).
    pub fn new<R: RngCore + ?Sized>(rows: usize, columns: usize, tile_size: u32, rng: &mut R) -> Self {
        let mut grid = Self {
            columns,
            tile_size,
            rows: VecDeque::with_capacity(rows + 1),
        };
        for y in 0..rows {
            let row = grid.placeholder_row(y as i32 * tile_size as i32, rng);
            grid.rows.push_back(row);
        }
        grid
    }

    /// A full row of placeholders with its top edge at pixel `top`.
    pub fn placeholder_row<R: RngCore + ?Sized>(&self, top: i32, rng: &mut R) -> Vec<Tile> {
        (0..self.columns)
            .map(|x| {
                Tile::placeholder(
                    TileId::random(rng),
                    Position::new(x as i32 * self.tile_size as i32, top),
                    self.tile_size,
                )
            })
            .collect()
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn columns(&self) -> usize {
        self.columns
    }

    #[inline]
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<&Tile> {
        self.rows.get(y).and_then(|row| row.get(x))
    }

    /// Colour at (x, y); `None` for placeholders and for cells outside the grid.
    #[inline]
    pub fn color_at(&self, x: usize, y: usize) -> Option<TileColor> {
        self.get(x, y).and_then(|tile| tile.color)
    }

    pub fn row(&self, y: usize) -> &[Tile] {
        self.assert_row(y);
        &self.rows[y]
    }

    /// Colour every tile in row `y` through the spawn policy and put it into play.
    /// Re-spawning a row overwrites whatever it held.
    pub fn spawn_row<R: Rng + ?Sized>(
        &mut self,
        y: usize,
        policy: &SpawnPolicy,
        rng: &mut R,
        stage: &mut Stage<'_>,
    ) {
        self.assert_row(y);
        for x in 0..self.columns {
            let color = policy.choose_color(self, y, x, rng);
            let tile = &mut self.rows[y][x];
            tile.activate(color);
            stage.show(&*tile);
        }
    }

    /// Remove row `y` from the scene and from the matrix; rows below move up one index.
    pub fn destroy_row(&mut self, y: usize, stage: &mut Stage<'_>) {
        self.assert_row(y);
        if let Some(row) = self.rows.remove(y) {
            for tile in &row {
                stage.hide(tile.id.as_str());
            }
        }
    }

    /// Push a full row at the bottom.
    pub fn append_row(&mut self, row: Vec<Tile>) {
        assert_eq!(
            row.len(),
            self.columns,
            "appended row has {} tiles, grid has {} columns",
            row.len(),
            self.columns
        );
        self.rows.push_back(row);
    }

    /// Exchange the tiles at (x, y) and (x + 1, y).
    ///
    /// Ids and positions stay with the cells, so the scene keeps drawing each
    /// slot under the same id and only its sprite changes.
    pub fn swap(&mut self, x: usize, y: usize, stage: &mut Stage<'_>) {
        assert!(
            x + 1 < self.columns,
            "swap at column {} needs a right neighbour ({} columns)",
            x,
            self.columns
        );
        self.assert_row(y);
        let row = &mut self.rows[y];
        row.swap(x, x + 1);
        let (left, right) = row.split_at_mut(x + 1);
        let (a, b) = (&mut left[x], &mut right[0]);
        std::mem::swap(&mut a.id, &mut b.id);
        std::mem::swap(&mut a.position, &mut b.position);

        for tile in [&*a, &*b] {
            if tile.is_active() {
                stage.show(tile);
            } else {
                stage.hide(tile.id.as_str());
            }
        }
        debug!("swapped ({}, {}) <-> ({}, {})", x, y, x + 1, y);
    }

    /// All tiles, row-major.
    pub fn flatten(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.rows.iter().flatten()
    }

    /// Move every tile up by `dy` pixels.
    pub fn shift_up(&mut self, dy: i32) {
        for tile in self.rows.iter_mut().flatten() {
            tile.position.y -= dy;
        }
    }

    /// Top edge of row `y`, in pixels.
    pub fn row_top(&self, y: usize) -> i32 {
        self.row(y)[0].position.y
    }

    fn assert_row(&self, y: usize) {
        assert!(
            y < self.rows.len(),
            "row {} out of range ({} rows)",
            y,
            self.rows.len()
        );
    }

    #[cfg(test)]
    pub(crate) fn paint(&mut self, x: usize, y: usize, color: TileColor) {
        self.rows[y][x].activate(color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::SpriteAtlas;
    use crate::scene::SceneGraph;
    use crate::theme::Theme;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn setup() -> (Grid, ChaCha8Rng, SceneGraph, SpriteAtlas) {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let grid = Grid::new(8, 6, 64, &mut rng);
        (grid, rng, SceneGraph::new(), SpriteAtlas::from_theme(&Theme::default()))
    }

    #[test]
    fn test_new_lays_out_placeholders() {
        let (grid, ..) = setup();
        assert_eq!(grid.rows(), 8);
        assert_eq!(grid.columns(), 6);
        assert!(grid.flatten().all(|t| !t.is_active()));
        assert_eq!(grid.get(3, 2).map(|t| t.position), Some(Position::new(192, 128)));
        assert!(grid.get(6, 0).is_none());
        assert!(grid.get(0, 8).is_none());
    }

    #[test]
    fn test_spawn_row_activates_and_shows() {
        let (mut grid, mut rng, mut scene, atlas) = setup();
        grid.spawn_row(7, &SpawnPolicy::default(), &mut rng, &mut Stage::new(&mut scene, &atlas));
        assert!(grid.row(7).iter().all(Tile::is_active));
        assert_eq!(scene.len(), 6);
        for tile in grid.row(7) {
            assert!(scene.get(tile.id.as_str()).is_some());
        }
    }

    #[test]
    fn test_destroy_row_removes_from_scene_and_matrix() {
        let (mut grid, mut rng, mut scene, atlas) = setup();
        let policy = SpawnPolicy::default();
        let mut stage = Stage::new(&mut scene, &atlas);
        grid.spawn_row(7, &policy, &mut rng, &mut stage);
        grid.spawn_row(6, &policy, &mut rng, &mut stage);
        let below = grid.row(7)[0].id.clone();

        grid.destroy_row(6, &mut stage);

        assert_eq!(grid.rows(), 7);
        assert_eq!(grid.row(6)[0].id, below);
        assert_eq!(scene.len(), 6);
    }

    #[test]
    fn test_append_restores_row_count() {
        let (mut grid, mut rng, mut scene, atlas) = setup();
        grid.destroy_row(0, &mut Stage::new(&mut scene, &atlas));
        let top = grid.row_top(grid.rows() - 1) + 64;
        let row = grid.placeholder_row(top, &mut rng);
        grid.append_row(row);
        assert_eq!(grid.rows(), 8);
        assert_eq!(grid.row_top(7), 7 * 64 + 64);
    }

    #[test]
    #[should_panic(expected = "appended row")]
    fn test_append_short_row_panics() {
        let (mut grid, mut rng, ..) = setup();
        let mut row = grid.placeholder_row(0, &mut rng);
        row.pop();
        grid.append_row(row);
    }

    #[test]
    fn test_swap_exchanges_colours_not_ids() {
        let (mut grid, _, mut scene, atlas) = setup();
        grid.paint(1, 7, TileColor::Red);
        grid.paint(2, 7, TileColor::Blue);
        let (left_id, right_id) = (grid.row(7)[1].id.clone(), grid.row(7)[2].id.clone());

        grid.swap(1, 7, &mut Stage::new(&mut scene, &atlas));

        assert_eq!(grid.color_at(1, 7), Some(TileColor::Blue));
        assert_eq!(grid.color_at(2, 7), Some(TileColor::Red));
        assert_eq!(grid.row(7)[1].id, left_id);
        assert_eq!(grid.row(7)[2].id, right_id);
        assert_eq!(grid.row(7)[1].position, Position::new(64, 448));
        let theme = Theme::default();
        assert_eq!(
            scene.get(left_id.as_str()).map(|o| o.sprite.color),
            Some(theme.tile_color(TileColor::Blue))
        );
    }

    #[test]
    fn test_swap_with_placeholder_hides_empty_slot() {
        let (mut grid, mut rng, mut scene, atlas) = setup();
        let mut stage = Stage::new(&mut scene, &atlas);
        grid.spawn_row(7, &SpawnPolicy::default(), &mut rng, &mut stage);
        // Row 6 is all placeholders; activate one cell of it.
        grid.paint(0, 6, TileColor::Green);
        stage.show(&grid.row(6)[0]);
        let empty_id = grid.row(6)[1].id.clone();
        let full_id = grid.row(6)[0].id.clone();

        grid.swap(0, 6, &mut stage);

        assert!(scene.get(full_id.as_str()).is_none());
        assert!(scene.get(empty_id.as_str()).is_some());
        assert_eq!(grid.color_at(1, 6), Some(TileColor::Green));
    }

    #[test]
    #[should_panic(expected = "needs a right neighbour")]
    fn test_swap_last_column_panics() {
        let (mut grid, _, mut scene, atlas) = setup();
        grid.swap(5, 0, &mut Stage::new(&mut scene, &atlas));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_destroy_missing_row_panics() {
        let (mut grid, _, mut scene, atlas) = setup();
        grid.destroy_row(8, &mut Stage::new(&mut scene, &atlas));
    }

    #[test]
    fn test_shift_up_moves_every_tile() {
        let (mut grid, ..) = setup();
        grid.shift_up(16);
        assert_eq!(grid.row_top(0), -16);
        assert_eq!(grid.row_top(7), 7 * 64 - 16);
        assert_eq!(grid.flatten().count(), 48);
    }
}
