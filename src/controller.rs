//! Puzzle controller: owns grid, selector, scroll, and game state, and wires
//! host ticks and key-downs into them.
//!
//! Everything runs on the host's single callback thread. Once the game is over
//! every handler is accepted and ignored.

use crate::assets::Assets;
use crate::config::{ConfigError, GameConfig};
use crate::grid::Grid;
use crate::input::{InputDevice, LogicalKey};
use crate::scene::{Scene, Stage};
use crate::scroll::{ScrollEngine, ScrollOutcome, Throttle};
use crate::selector::Selector;
use crate::spawn::SpawnPolicy;
use log::{debug, info, trace};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Active,
    GameOver,
}

/// Periodic update from the host: elapsed time since the last call and current frame rate.
pub trait Tickable {
    fn on_update(&mut self, delta: Duration, fps: f64);
}

pub struct Puzzle<S: Scene, A: Assets> {
    config: GameConfig,
    grid: Grid,
    selector: Selector,
    scroll: ScrollEngine,
    throttle: Throttle,
    policy: SpawnPolicy,
    rng: ChaCha8Rng,
    state: GameState,
    scene: S,
    assets: A,
}

impl<S: Scene, A: Assets> Puzzle<S, A> {
    /// Build the stage: a grid of placeholders with the bottom rows spawned and the
    /// selector at its start cell, all pushed into `scene`.
    pub fn new(config: GameConfig, scene: S, assets: A) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let grid = Grid::new(config.rows, config.columns, config.tile_size, &mut rng);
        let selector = Selector::new(
            config.selector_start,
            config.columns,
            config.rows,
            config.tile_size,
        );
        let mut puzzle = Self {
            scroll: ScrollEngine::new(config.stage_movement, config.tile_size),
            throttle: Throttle::new(config.scroll_interval),
            policy: SpawnPolicy::default(),
            state: GameState::Active,
            grid,
            selector,
            rng,
            scene,
            assets,
            config,
        };
        puzzle.set_up_stage();
        Ok(puzzle)
    }

    fn set_up_stage(&mut self) {
        let mut stage = Stage::new(&mut self.scene, &self.assets);
        stage.show(&self.selector);
        // Bottom-up, so each row sees the rows beneath it.
        for i in 0..self.config.initial_rows {
            let y = self.config.rows - i - 1;
            self.grid.spawn_row(y, &self.policy, &mut self.rng, &mut stage);
        }
        info!(
            "stage ready: {}x{} grid, {} rows filled, seed {:?}",
            self.config.columns, self.config.rows, self.config.initial_rows, self.config.seed
        );
    }

    /// Handle an actionable key-down. `input` holds the full pressed-key state;
    /// a swap needs the key-down to be the swap action and the device to report it held.
    pub fn on_key_down(&mut self, key: LogicalKey, input: &dyn InputDevice) {
        if self.is_game_over() {
            return;
        }
        let direction = (input.direction_x(), input.direction_y());
        if self
            .selector
            .move_by(direction, input.pressed_count(), self.scroll.offset())
        {
            Stage::new(&mut self.scene, &self.assets).show(&self.selector);
            trace!("selector -> {:?}", self.selector.index());
        }
        if key == LogicalKey::Swap && input.is_pressed(LogicalKey::Swap) {
            self.swap_here();
        }
    }

    /// Swap the two tiles under the selector.
    pub fn swap_here(&mut self) {
        if self.is_game_over() {
            return;
        }
        let (x, y) = self.selector.index();
        let mut stage = Stage::new(&mut self.scene, &self.assets);
        self.grid.swap(x, y, &mut stage);
    }

    /// Run one scroll tick now, bypassing the throttle. `None` once the game is over.
    pub fn advance_stage(&mut self) -> Option<ScrollOutcome> {
        if self.is_game_over() {
            return None;
        }
        let mut stage = Stage::new(&mut self.scene, &self.assets);
        let outcome = self.scroll.tick(
            &mut self.grid,
            &mut self.selector,
            &self.policy,
            &mut self.rng,
            &mut stage,
        );
        if outcome == ScrollOutcome::GameOver {
            self.state = GameState::GameOver;
            info!(
                "game over after {} ticks, {} rows risen",
                self.scroll.ticks(),
                self.scroll.recycled()
            );
        }
        Some(outcome)
    }

    #[inline]
    pub fn state(&self) -> GameState {
        self.state
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.state == GameState::GameOver
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn assets(&self) -> &A {
        &self.assets
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Scroll ticks so far.
    pub fn ticks(&self) -> u64 {
        self.scroll.ticks()
    }

    /// Rows recycled off the top so far.
    pub fn rows_risen(&self) -> u64 {
        self.scroll.recycled()
    }

    /// How far the grid has risen since the last recycle, in pixels.
    pub fn scroll_offset(&self) -> i32 {
        self.scroll.offset()
    }
}

impl<S: Scene, A: Assets> Tickable for Puzzle<S, A> {
    fn on_update(&mut self, delta: Duration, fps: f64) {
        if self.is_game_over() {
            return;
        }
        if self.throttle.advance(delta) {
            debug!("stage tick at {:.1} fps", fps);
            self.advance_stage();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::SpriteAtlas;
    use crate::scene::SceneGraph;
    use crate::selector::SELECTOR_ID;
    use crate::theme::Theme;

    /// Scripted input: a fixed direction, key count and swap flag.
    struct Held {
        dx: i32,
        dy: i32,
        count: usize,
        swap: bool,
    }

    impl Held {
        fn direction(dx: i32, dy: i32) -> Self {
            Self {
                dx,
                dy,
                count: 1,
                swap: false,
            }
        }

        fn swap() -> Self {
            Self {
                dx: 0,
                dy: 0,
                count: 1,
                swap: true,
            }
        }
    }

    impl InputDevice for Held {
        fn direction_x(&self) -> i32 {
            self.dx
        }
        fn direction_y(&self) -> i32 {
            self.dy
        }
        fn pressed_count(&self) -> usize {
            self.count
        }
        fn is_pressed(&self, key: LogicalKey) -> bool {
            key == LogicalKey::Swap && self.swap
        }
    }

    fn puzzle() -> Puzzle<SceneGraph, SpriteAtlas> {
        let config = GameConfig {
            seed: Some(3),
            ..GameConfig::default()
        };
        Puzzle::new(config, SceneGraph::new(), SpriteAtlas::from_theme(&Theme::default()))
            .expect("default config is valid")
    }

    #[test]
    fn test_setup_fills_bottom_four_rows() {
        let p = puzzle();
        for y in 0..8 {
            let active = p.grid().row(y).iter().all(|t| t.is_active());
            assert_eq!(active, y >= 4, "row {}", y);
        }
        assert_eq!(p.scene().len(), 4 * 6 + 1);
        assert!(p.scene().get(SELECTOR_ID).is_some());
        assert_eq!(p.selector().index(), (2, 4));
        assert_eq!(p.state(), GameState::Active);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = GameConfig {
            rows: 2,
            ..GameConfig::default()
        };
        let result = Puzzle::new(config, SceneGraph::new(), SpriteAtlas::default());
        assert!(matches!(result, Err(ConfigError::TooFewRows(2))));
    }

    #[test]
    fn test_key_down_moves_selector() {
        let mut p = puzzle();
        p.on_key_down(LogicalKey::Left, &Held::direction(-1, 0));
        assert_eq!(p.selector().index(), (1, 4));
        let obj = p.scene().get(SELECTOR_ID).expect("selector drawn");
        assert_eq!(obj.position.x, 64);
    }

    #[test]
    fn test_swap_key_swaps_under_selector() {
        let mut p = puzzle();
        let before = (p.grid().color_at(2, 4), p.grid().color_at(3, 4));
        p.on_key_down(LogicalKey::Swap, &Held::swap());
        assert_eq!((p.grid().color_at(3, 4), p.grid().color_at(2, 4)), before);
    }

    #[test]
    fn test_swap_needs_device_to_report_swap_held() {
        let mut p = puzzle();
        let before: Vec<_> = p.grid().flatten().map(|t| t.color).collect();
        p.on_key_down(LogicalKey::Swap, &Held::direction(0, 0));
        let after: Vec<_> = p.grid().flatten().map(|t| t.color).collect();
        assert_eq!(after, before);
    }

    #[test]
    fn test_on_update_is_throttled() {
        let mut p = puzzle();
        p.on_update(Duration::from_millis(500), 60.0);
        assert_eq!(p.ticks(), 0);
        p.on_update(Duration::from_millis(500), 60.0);
        assert_eq!(p.ticks(), 1);
    }

    #[test]
    fn test_game_over_is_sticky() {
        let mut p = puzzle();
        let mut last = None;
        for _ in 0..16 {
            last = p.advance_stage();
        }
        assert_eq!(last, Some(ScrollOutcome::GameOver));
        assert!(p.is_game_over());

        let ticks = p.ticks();
        let index = p.selector().index();
        let colors: Vec<_> = p.grid().flatten().map(|t| t.color).collect();

        assert_eq!(p.advance_stage(), None);
        p.on_update(Duration::from_secs(10), 60.0);
        p.on_key_down(LogicalKey::Right, &Held::direction(1, 0));
        p.on_key_down(LogicalKey::Swap, &Held::swap());

        assert_eq!(p.ticks(), ticks);
        assert_eq!(p.selector().index(), index);
        let after: Vec<_> = p.grid().flatten().map(|t| t.color).collect();
        assert_eq!(after, colors);
        assert_eq!(p.state(), GameState::GameOver);
    }
}
