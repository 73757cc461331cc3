//! Stage scroll: rise the grid at a fixed cadence, detect the loss boundary,
//! and recycle the top row once it has left the board.

use crate::grid::Grid;
use crate::scene::Stage;
use crate::selector::Selector;
use crate::spawn::SpawnPolicy;
use log::{debug, trace};
use rand::Rng;
use std::time::Duration;

/// What one scroll tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollOutcome {
    /// Stage rose; nothing else happened.
    Scrolled,
    /// Stage rose and the top row was swapped for a fresh bottom row.
    Recycled,
    /// An active tile touched the top edge.
    GameOver,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollEngine {
    step: i32,
    tile_size: i32,
    ticks: u64,
    recycled: u64,
}

impl ScrollEngine {
    pub fn new(step: u32, tile_size: u32) -> Self {
        Self {
            step: step as i32,
            tile_size: tile_size as i32,
            ticks: 0,
            recycled: 0,
        }
    }

    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Rows recycled off the top so far.
    #[inline]
    pub fn recycled(&self) -> u64 {
        self.recycled
    }

    #[inline]
    pub fn step(&self) -> i32 {
        self.step
    }

    /// How far row 0 sits above its home position (0 after a fresh recycle).
    pub fn offset(&self) -> i32 {
        (self.ticks as i64 * self.step as i64 - self.recycled as i64 * self.tile_size as i64) as i32
    }

    /// Advance the stage by one step.
    ///
    /// The loss check runs before recycling: once an active tile is at or past
    /// y = 0 the tick stops and no row churn happens.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        grid: &mut Grid,
        selector: &mut Selector,
        policy: &SpawnPolicy,
        rng: &mut R,
        stage: &mut Stage<'_>,
    ) -> ScrollOutcome {
        self.ticks += 1;
        grid.shift_up(self.step);
        selector.scroll(self.step);
        trace!("scroll tick {} (offset {})", self.ticks, self.offset());

        if grid.flatten().any(|tile| tile.is_active() && tile.position.y <= 0) {
            stage.show(&*selector);
            return ScrollOutcome::GameOver;
        }

        if grid.row_top(0) > -self.tile_size {
            stage.show(&*selector);
            return ScrollOutcome::Scrolled;
        }

        grid.destroy_row(0, stage);
        let last = grid.rows() - 1;
        let top = grid.row_top(last) + self.tile_size;
        let row = grid.placeholder_row(top, rng);
        grid.append_row(row);
        grid.spawn_row(last + 1, policy, rng, stage);
        self.recycled += 1;

        selector.realign(self.offset());
        stage.show(&*selector);
        debug!(
            "recycled top row (tick {}, {} rows so far)",
            self.ticks, self.recycled
        );
        ScrollOutcome::Recycled
    }
}

/// Turns a stream of frame deltas into a fixed-cadence trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Throttle {
    interval: Duration,
    elapsed: Duration,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            elapsed: Duration::ZERO,
        }
    }

    /// Add `delta`; true when a full interval has passed. Fires at most once per
    /// call, and a stall longer than two intervals does not queue extra fires.
    pub fn advance(&mut self, delta: Duration) -> bool {
        self.elapsed += delta;
        if self.elapsed < self.interval {
            return false;
        }
        self.elapsed -= self.interval;
        if self.elapsed >= self.interval {
            self.elapsed = Duration::ZERO;
        }
        true
    }
}
