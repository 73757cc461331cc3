//! Tiles: colour, lifecycle state, pixel placement, and the drawable capability.

use rand::RngCore;
use std::fmt;

/// Tile colours. Each colour resolves to its own sprite through the asset lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileColor {
    Blue,
    Green,
    Purple,
    Red,
    Yellow,
}

impl TileColor {
    pub const ALL: [Self; 5] = [Self::Blue, Self::Green, Self::Purple, Self::Red, Self::Yellow];

    /// Asset key used to look up the sprite for this colour.
    pub fn asset_key(self) -> &'static str {
        match self {
            Self::Blue => "TILE_BLUE",
            Self::Green => "TILE_GREEN",
            Self::Purple => "TILE_PURPLE",
            Self::Red => "TILE_RED",
            Self::Yellow => "TILE_YELLOW",
        }
    }

    /// Colour index 0..5 for theme.tile_color().
    pub fn index(self) -> usize {
        match self {
            Self::Blue => 0,
            Self::Green => 1,
            Self::Purple => 2,
            Self::Red => 3,
            Self::Yellow => 4,
        }
    }
}

/// Lifecycle of a spawned tile. Only `Default` is produced by the grid today;
/// the other states belong to match/clear handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileState {
    Default,
    Cleared,
    Falling,
    Urgent,
}

/// Draw order. Higher layers are painted on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    Tile = 1,
    Selector = 2,
}

/// Pixel-space coordinate. y grows downward; y <= 0 is at or past the top edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Opaque tile identity the scene keys drawables on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(String);

impl TileId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh id from the game RNG. Collisions are possible but not guarded.
    pub fn random<R: RngCore + ?Sized>(rng: &mut R) -> Self {
        Self(format!("tile-{:016x}", rng.next_u64()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Anything the rendering scene can display.
pub trait Drawable {
    fn object_id(&self) -> &str;
    fn position(&self) -> Position;
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn layer(&self) -> Layer;
    /// Sprite to resolve through the asset lookup; `None` when there is nothing to draw yet.
    fn sprite_key(&self) -> Option<&'static str>;
}

/// One grid cell's game piece.
///
/// A placeholder has neither colour nor state. Once spawned both are set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub id: TileId,
    pub color: Option<TileColor>,
    pub state: Option<TileState>,
    pub position: Position,
    pub size: u32,
}

impl Tile {
    pub fn placeholder(id: TileId, position: Position, size: u32) -> Self {
        Self {
            id,
            color: None,
            state: None,
            position,
            size,
        }
    }

    /// True once the tile has been spawned into play.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }

    /// Give the tile its colour and put it into play.
    pub fn activate(&mut self, color: TileColor) {
        self.color = Some(color);
        self.state = Some(TileState::Default);
    }
}

impl Drawable for Tile {
    fn object_id(&self) -> &str {
        self.id.as_str()
    }

    fn position(&self) -> Position {
        self.position
    }

    fn width(&self) -> u32 {
        self.size
    }

    fn height(&self) -> u32 {
        self.size
    }

    fn layer(&self) -> Layer {
        Layer::Tile
    }

    fn sprite_key(&self) -> Option<&'static str> {
        self.color.map(TileColor::asset_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_placeholder_is_inactive() {
        let tile = Tile::placeholder(TileId::new("a"), Position::new(0, 64), 64);
        assert!(!tile.is_active());
        assert_eq!(tile.sprite_key(), None);
    }

    #[test]
    fn test_activate_sets_colour_and_state() {
        let mut tile = Tile::placeholder(TileId::new("a"), Position::default(), 64);
        tile.activate(TileColor::Purple);
        assert!(tile.is_active());
        assert_eq!(tile.state, Some(TileState::Default));
        assert_eq!(tile.sprite_key(), Some("TILE_PURPLE"));
    }

    #[test]
    fn test_random_ids_differ() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let a = TileId::random(&mut rng);
        let b = TileId::random(&mut rng);
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("tile-"));
    }

    #[test]
    fn test_colour_indices_are_distinct() {
        let mut seen = [false; 5];
        for c in TileColor::ALL {
            assert!(!seen[c.index()]);
            seen[c.index()] = true;
        }
    }
}
