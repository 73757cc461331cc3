//! Sprite lookup: resolve asset keys ("TILE_BLUE", "SELECTOR", …) to drawable sprites.

use crate::theme::Theme;
use crate::tile::TileColor;
use ratatui::style::Color;
use std::collections::HashMap;
use thiserror::Error;

/// Asset key of the selector sprite.
pub const SELECTOR_KEY: &str = "SELECTOR";

/// Terminal sprite: the fill colour a drawable is painted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sprite {
    pub color: Color,
}

impl Sprite {
    /// Drawn in place of a sprite that failed to resolve.
    pub const fn placeholder() -> Self {
        Self {
            color: Color::DarkGray,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssetError {
    #[error("missing asset: {key}")]
    Missing { key: String },
}

/// Asset lookup collaborator.
pub trait Assets {
    fn image_by_id(&self, key: &str) -> Result<Sprite, AssetError>;
}

/// In-memory sprite table keyed by asset key.
#[derive(Debug, Clone, Default)]
pub struct SpriteAtlas {
    sprites: HashMap<String, Sprite>,
}

impl SpriteAtlas {
    /// Tile sprites take the theme's tile colours; the selector uses its accent colour.
    pub fn from_theme(theme: &Theme) -> Self {
        let mut atlas = Self::default();
        for color in TileColor::ALL {
            atlas.insert(
                color.asset_key(),
                Sprite {
                    color: theme.tile_color(color),
                },
            );
        }
        atlas.insert(
            SELECTOR_KEY,
            Sprite {
                color: theme.selector,
            },
        );
        atlas
    }

    pub fn insert(&mut self, key: impl Into<String>, sprite: Sprite) {
        self.sprites.insert(key.into(), sprite);
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}

impl Assets for SpriteAtlas {
    fn image_by_id(&self, key: &str) -> Result<Sprite, AssetError> {
        self.sprites
            .get(key)
            .copied()
            .ok_or_else(|| AssetError::Missing {
                key: key.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_atlas_has_every_tile_and_selector() {
        let atlas = SpriteAtlas::from_theme(&Theme::default());
        assert_eq!(atlas.len(), TileColor::ALL.len() + 1);
        for color in TileColor::ALL {
            assert!(atlas.image_by_id(color.asset_key()).is_ok());
        }
        assert!(atlas.image_by_id(SELECTOR_KEY).is_ok());
    }

    #[test]
    fn test_unknown_key_is_missing() {
        let atlas = SpriteAtlas::default();
        assert_eq!(
            atlas.image_by_id("TILE_ORANGE"),
            Err(AssetError::Missing {
                key: "TILE_ORANGE".to_string()
            })
        );
    }
}
