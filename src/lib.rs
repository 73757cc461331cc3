//! panelrise: a rising-stack tile-swap puzzle.
//!
//! A grid of coloured tiles scrolls up one step per tick. The player moves a
//! two-tile selector and swaps the pair under it. When a tile reaches the top
//! edge the game is over. Fresh rows are recycled in at the bottom and never
//! spawn three of a colour in a line.
//!
//! The puzzle itself ([`Puzzle`]) is host-agnostic: it draws through the
//! [`Scene`] and [`Assets`] traits and reads keys through [`InputDevice`].
//! [`app`] and [`ui`] host it in a terminal.

pub mod app;
pub mod assets;
pub mod config;
pub mod controller;
pub mod grid;
pub mod highscores;
pub mod input;
pub mod scene;
pub mod scroll;
pub mod selector;
pub mod spawn;
pub mod theme;
pub mod tile;
pub mod ui;

pub use assets::{AssetError, Assets, Sprite, SpriteAtlas};
pub use config::{ConfigError, GameConfig};
pub use controller::{GameState, Puzzle, Tickable};
pub use grid::Grid;
pub use input::{InputDevice, KeySchema, Keyboard, LogicalKey};
pub use scene::{Scene, SceneGraph, SceneObject, Stage};
pub use scroll::{ScrollEngine, ScrollOutcome, Throttle};
pub use selector::Selector;
pub use spawn::SpawnPolicy;
pub use tile::{Drawable, Layer, Position, Tile, TileColor, TileId, TileState};
