//! Construction-time game constants.

use std::time::Duration;
use thiserror::Error;

/// Largest grid the terminal host will lay out, per axis.
pub const MAX_ROWS: usize = 64;
pub const MAX_COLUMNS: usize = 64;

/// Grid and pacing constants. Fixed once a puzzle is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub rows: usize,
    pub columns: usize,
    /// Square tile edge in pixels.
    pub tile_size: u32,
    /// Pixels the stage rises per scroll tick.
    pub stage_movement: u32,
    /// Rows filled from the bottom when the stage is set up.
    pub initial_rows: usize,
    /// Selector start (x, y) in grid cells.
    pub selector_start: (usize, usize),
    /// Time between scroll ticks.
    pub scroll_interval: Duration,
    /// RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: 8,
            columns: 6,
            tile_size: 64,
            stage_movement: 16,
            initial_rows: 4,
            selector_start: (2, 4),
            scroll_interval: Duration::from_secs(1),
            seed: None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("grid needs at least 2 columns for the selector, got {0}")]
    TooFewColumns(usize),
    #[error("grid needs at least 3 rows, got {0}")]
    TooFewRows(usize),
    #[error("grid {columns}x{rows} exceeds the 64x64 maximum")]
    TooLarge { columns: usize, rows: usize },
    #[error("cannot fill {initial} initial rows in a {rows}-row grid")]
    InitialRows { initial: usize, rows: usize },
    #[error("tile size must be non-zero")]
    ZeroTileSize,
    #[error("stage movement {step}px must be non-zero and divide the tile size {tile}px")]
    StageMovement { step: u32, tile: u32 },
    #[error("selector start ({x}, {y}) is outside the grid")]
    SelectorStart { x: usize, y: usize },
    #[error("scroll interval must be non-zero")]
    ZeroScrollInterval,
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns < 2 {
            return Err(ConfigError::TooFewColumns(self.columns));
        }
        if self.rows < 3 {
            return Err(ConfigError::TooFewRows(self.rows));
        }
        if self.columns > MAX_COLUMNS || self.rows > MAX_ROWS {
            return Err(ConfigError::TooLarge {
                columns: self.columns,
                rows: self.rows,
            });
        }
        if self.initial_rows > self.rows {
            return Err(ConfigError::InitialRows {
                initial: self.initial_rows,
                rows: self.rows,
            });
        }
        if self.tile_size == 0 {
            return Err(ConfigError::ZeroTileSize);
        }
        if self.stage_movement == 0 || self.tile_size % self.stage_movement != 0 {
            return Err(ConfigError::StageMovement {
                step: self.stage_movement,
                tile: self.tile_size,
            });
        }
        let (x, y) = self.selector_start;
        if x > self.columns - 2 || y >= self.rows {
            return Err(ConfigError::SelectorStart { x, y });
        }
        if self.scroll_interval.is_zero() {
            return Err(ConfigError::ZeroScrollInterval);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_single_column() {
        let config = GameConfig {
            columns: 1,
            selector_start: (0, 0),
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::TooFewColumns(1)));
    }

    #[test]
    fn test_rejects_oversized_grid() {
        let config = GameConfig {
            rows: 100_000,
            ..GameConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::TooLarge {
                columns: 6,
                rows: 100_000
            })
        );
        let config = GameConfig {
            columns: MAX_COLUMNS + 1,
            ..GameConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::TooLarge { .. })));
        let config = GameConfig {
            rows: MAX_ROWS,
            columns: MAX_COLUMNS,
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_rejects_step_not_dividing_tile() {
        let config = GameConfig {
            stage_movement: 24,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::StageMovement { step: 24, tile: 64 })
        ));
    }

    #[test]
    fn test_rejects_selector_on_last_column() {
        let config = GameConfig {
            selector_start: (5, 0),
            ..GameConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::SelectorStart { x: 5, y: 0 })
        );
    }

    #[test]
    fn test_rejects_too_many_initial_rows() {
        let config = GameConfig {
            initial_rows: 9,
            ..GameConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InitialRows { .. })));
    }
}
