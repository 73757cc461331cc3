//! The 1x2 selector cursor.

use crate::assets::SELECTOR_KEY;
use crate::tile::{Drawable, Layer, Position};

/// Scene id of the selector drawable.
pub const SELECTOR_ID: &str = "SELECTOR";

/// Cells the selector spans horizontally.
pub const SELECTOR_WIDTH: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    x: usize,
    y: usize,
    columns: usize,
    rows: usize,
    tile_size: u32,
    position: Position,
}

impl Selector {
    /// Selector at cell (x, y) of an unscrolled grid.
    pub fn new(start: (usize, usize), columns: usize, rows: usize, tile_size: u32) -> Self {
        let (x, y) = start;
        assert!(
            columns >= SELECTOR_WIDTH && x <= columns - SELECTOR_WIDTH && y < rows,
            "selector start ({}, {}) outside {}x{} grid",
            x,
            y,
            columns,
            rows
        );
        let mut selector = Self {
            x,
            y,
            columns,
            rows,
            tile_size,
            position: Position::default(),
        };
        selector.realign(0);
        selector
    }

    /// Grid index (x, y) of the left cell.
    #[inline]
    pub fn index(&self) -> (usize, usize) {
        (self.x, self.y)
    }

    #[inline]
    pub fn pixel_position(&self) -> Position {
        self.position
    }

    /// Move by one step on one axis.
    ///
    /// Nothing happens when there is no direction, or when more than one key is
    /// held (no diagonals, no combining with a second key). Each axis is clamped
    /// on its own: x to `[0, columns - 2]`, y to `[0, rows - 1]`.
    /// `scroll_offset` is how far the grid has risen above its home position.
    /// Returns true if the selector was moved.
    pub fn move_by(&mut self, direction: (i32, i32), held_keys: usize, scroll_offset: i32) -> bool {
        let (dx, dy) = direction;
        if dx == 0 && dy == 0 {
            return false;
        }
        if held_keys > 1 {
            return false;
        }
        let max_x = (self.columns - SELECTOR_WIDTH) as i32;
        let max_y = (self.rows - 1) as i32;
        self.x = (self.x as i32 + dx).clamp(0, max_x) as usize;
        self.y = (self.y as i32 + dy).clamp(0, max_y) as usize;
        self.realign(scroll_offset);
        true
    }

    /// Rise with the stage; the index is grid-relative and stays put.
    pub fn scroll(&mut self, dy: i32) {
        self.position.y -= dy;
    }

    /// Recompute the pixel position from the index and the grid's scroll offset.
    pub fn realign(&mut self, scroll_offset: i32) {
        let size = self.tile_size as i32;
        self.position = Position::new(self.x as i32 * size, self.y as i32 * size - scroll_offset);
    }
}

impl Drawable for Selector {
    fn object_id(&self) -> &str {
        SELECTOR_ID
    }

    fn position(&self) -> Position {
        self.position
    }

    fn width(&self) -> u32 {
        self.tile_size * SELECTOR_WIDTH as u32
    }

    fn height(&self) -> u32 {
        self.tile_size
    }

    fn layer(&self) -> Layer {
        Layer::Selector
    }

    fn sprite_key(&self) -> Option<&'static str> {
        Some(SELECTOR_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector() -> Selector {
        Selector::new((2, 4), 6, 8, 64)
    }

    #[test]
    fn test_start_position() {
        let s = selector();
        assert_eq!(s.index(), (2, 4));
        assert_eq!(s.pixel_position(), Position::new(128, 256));
        assert_eq!(s.width(), 128);
    }

    #[test]
    fn test_right_clamps_at_second_to_last_column() {
        let mut s = selector();
        for _ in 0..3 {
            s.move_by((1, 0), 1, 0);
        }
        assert_eq!(s.index(), (4, 4));
    }

    #[test]
    fn test_chained_moves_stay_in_bounds() {
        let mut s = selector();
        let moves = [(-1, 0), (0, -1), (1, 0), (0, 1)];
        for step in 0..200 {
            let dir = moves[(step * 7 + step / 3) % 4];
            for _ in 0..(step % 11) {
                s.move_by(dir, 1, 0);
                let (x, y) = s.index();
                assert!(x <= 4 && y <= 7);
            }
        }
    }

    #[test]
    fn test_no_direction_is_noop() {
        let mut s = selector();
        assert!(!s.move_by((0, 0), 1, 0));
        assert_eq!(s.index(), (2, 4));
    }

    #[test]
    fn test_multiple_held_keys_block_movement() {
        let mut s = selector();
        assert!(!s.move_by((1, 0), 2, 0));
        assert!(!s.move_by((1, -1), 2, 0));
        assert!(!s.move_by((0, 0), 2, 0));
        assert_eq!(s.index(), (2, 4));
    }

    #[test]
    fn test_pixel_accounts_for_scroll() {
        let mut s = selector();
        s.scroll(16);
        s.scroll(16);
        assert_eq!(s.pixel_position(), Position::new(128, 224));
        s.move_by((0, 1), 1, 32);
        assert_eq!(s.index(), (2, 5));
        assert_eq!(s.pixel_position(), Position::new(128, 5 * 64 - 32));
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn test_start_on_last_column_panics() {
        Selector::new((5, 0), 6, 8, 64);
    }
}
