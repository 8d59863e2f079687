// src/core/board/mod.rs

//! The shared game board.
//!
//! `Board` wraps a `Grid` in a single mutex. Every public operation, including
//! the read-only `render`, holds that one lock for its full duration, so calls
//! from different connections are linearizable and no caller can observe a
//! half-finished flood fill.

mod grid;
mod square;

pub use grid::{DigResult, Grid};
pub use square::{Square, Visibility};

use crate::config::BoardConfig;
use crate::core::MinesweeperError;
use parking_lot::Mutex;
use rand::SeedableRng;
use rand::rngs::SmallRng;

#[derive(Debug)]
pub struct Board {
    /// Fixed at construction, so it is readable without the lock.
    size: usize,
    grid: Mutex<Grid>,
}

impl Board {
    /// Builds a random board according to the configuration, seeded if a seed is set.
    pub fn from_config(config: &BoardConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Self::from_grid(Grid::random(
            config.size,
            config.bomb_probability,
            &mut rng,
        ))
    }

    /// Builds a board from explicit bomb placement, `layout[x][y]`.
    pub fn from_layout(layout: &[Vec<bool>]) -> Result<Self, MinesweeperError> {
        Grid::from_layout(layout).map(Self::from_grid)
    }

    pub fn from_grid(grid: Grid) -> Self {
        Self {
            size: grid.size(),
            grid: Mutex::new(grid),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// A consistent snapshot of the whole board, one `\n`-terminated row per `x`.
    pub fn render(&self) -> String {
        self.grid.lock().render()
    }

    pub fn count_bomb_neighbors(&self, x: usize, y: usize) -> Result<usize, MinesweeperError> {
        self.grid.lock().count_bomb_neighbors(x, y)
    }

    pub fn dig(&self, x: usize, y: usize) -> DigResult {
        self.grid.lock().dig(x, y)
    }

    pub fn flag(&self, x: usize, y: usize) -> bool {
        self.grid.lock().flag(x, y)
    }

    pub fn deflag(&self, x: usize, y: usize) -> bool {
        self.grid.lock().deflag(x, y)
    }

    /// Digs and renders under one lock, so the reply reflects this dig and
    /// nothing that happened after it.
    pub fn dig_and_render(&self, x: usize, y: usize) -> (DigResult, String) {
        let mut grid = self.grid.lock();
        let result = grid.dig(x, y);
        (result, grid.render())
    }

    /// Flags and renders under one lock.
    pub fn flag_and_render(&self, x: usize, y: usize) -> (bool, String) {
        let mut grid = self.grid.lock();
        let changed = grid.flag(x, y);
        (changed, grid.render())
    }

    /// Deflags and renders under one lock.
    pub fn deflag_and_render(&self, x: usize, y: usize) -> (bool, String) {
        let mut grid = self.grid.lock();
        let changed = grid.deflag(x, y);
        (changed, grid.render())
    }

    /// A copy of one square, or `None` if out of range.
    pub fn square(&self, x: usize, y: usize) -> Option<Square> {
        self.grid.lock().square(x, y).copied()
    }
}
