// src/core/board/grid.rs

//! The unsynchronized square grid. All game rules live here; `Board` only
//! adds the exclusion domain around it.

use super::square::{Square, Visibility};
use crate::core::MinesweeperError;
use rand::Rng;

/// The outcome of a single `dig` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigResult {
    /// The square held a bomb. It has been defused and marked dug.
    Bomb,
    /// One or more squares were dug, including any flood-filled region.
    Revealed { squares: usize },
    /// Out of range or not untouched. Nothing changed.
    Unchanged,
}

/// A `size x size` grid stored row-major: row `x`, column `y`.
#[derive(Debug, Clone)]
pub struct Grid {
    size: usize,
    squares: Vec<Square>,
}

impl Grid {
    /// Builds a grid where each square independently holds a bomb with
    /// probability `bomb_probability`.
    pub fn random<R: Rng + ?Sized>(size: usize, bomb_probability: f64, rng: &mut R) -> Self {
        let mut squares = Vec::with_capacity(size * size);
        for x in 0..size {
            for y in 0..size {
                squares.push(Square::new(x, y, rng.gen_bool(bomb_probability)));
            }
        }
        Self { size, squares }
    }

    /// Builds a grid from explicit bomb placement, `layout[x][y]`.
    pub fn from_layout(layout: &[Vec<bool>]) -> Result<Self, MinesweeperError> {
        let size = layout.len();
        if size == 0 {
            return Err(MinesweeperError::InvalidLayout("layout is empty".into()));
        }
        if let Some((x, row)) = layout.iter().enumerate().find(|(_, row)| row.len() != size) {
            return Err(MinesweeperError::InvalidLayout(format!(
                "row {x} has {} squares, expected {size}",
                row.len()
            )));
        }

        let squares = layout
            .iter()
            .enumerate()
            .flat_map(|(x, row)| {
                row.iter()
                    .enumerate()
                    .map(move |(y, &bomb)| Square::new(x, y, bomb))
            })
            .collect();
        Ok(Self { size, squares })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.size && y < self.size
    }

    pub fn square(&self, x: usize, y: usize) -> Option<&Square> {
        if !self.contains(x, y) {
            return None;
        }
        self.squares.get(self.index(x, y))
    }

    /// Renders one row per `x`, each `size` glyphs long and `\n`-terminated.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.size * (self.size + 1));
        if self.size == 0 {
            return out;
        }
        for row in self.squares.chunks(self.size) {
            out.extend(row.iter().map(|sq| sq.visibility().glyph()));
            out.push('\n');
        }
        out
    }

    /// Counts bombs among the in-bounds up/down/left/right neighbours.
    /// Diagonals and the square itself are not counted.
    pub fn count_bomb_neighbors(&self, x: usize, y: usize) -> Result<usize, MinesweeperError> {
        if !self.contains(x, y) {
            return Err(MinesweeperError::OutOfBounds {
                x,
                y,
                size: self.size,
            });
        }
        Ok(self.bomb_neighbors(x, y))
    }

    pub fn dig(&mut self, x: usize, y: usize) -> DigResult {
        if !self.contains(x, y) {
            return DigResult::Unchanged;
        }
        let idx = self.index(x, y);
        let had_bomb = self.squares[idx].has_bomb();
        if !self.squares[idx].dig() {
            return DigResult::Unchanged;
        }
        if had_bomb {
            return DigResult::Bomb;
        }

        let mut squares = 1;
        if self.bomb_neighbors(x, y) == 0 {
            squares += self.flood_fill(x, y);
        }
        DigResult::Revealed { squares }
    }

    /// Returns whether the square changed.
    pub fn flag(&mut self, x: usize, y: usize) -> bool {
        self.square_mut(x, y).is_some_and(Square::flag)
    }

    /// Returns whether the square changed.
    pub fn deflag(&mut self, x: usize, y: usize) -> bool {
        self.square_mut(x, y).is_some_and(Square::deflag)
    }

    /// Digs outward from an already-dug zero square. Every untouched,
    /// bomb-free square touching the region (diagonals included) is dug; only
    /// those that are themselves zero squares extend the region. Each square is
    /// dug at most once, so the fill terminates.
    fn flood_fill(&mut self, x: usize, y: usize) -> usize {
        let mut revealed = 0;
        let mut pending = vec![(x, y)];

        while let Some((cx, cy)) = pending.pop() {
            for (nx, ny) in surrounding(cx, cy, self.size) {
                let idx = self.index(nx, ny);
                let square = &mut self.squares[idx];
                if square.has_bomb() || square.visibility() != Visibility::Untouched {
                    continue;
                }
                square.dig();
                revealed += 1;
                if self.bomb_neighbors(nx, ny) == 0 {
                    pending.push((nx, ny));
                }
            }
        }
        revealed
    }

    fn bomb_neighbors(&self, x: usize, y: usize) -> usize {
        orthogonal(x, y, self.size)
            .filter(|&(nx, ny)| self.squares[self.index(nx, ny)].has_bomb())
            .count()
    }

    fn square_mut(&mut self, x: usize, y: usize) -> Option<&mut Square> {
        if !self.contains(x, y) {
            return None;
        }
        let idx = self.index(x, y);
        self.squares.get_mut(idx)
    }

    fn index(&self, x: usize, y: usize) -> usize {
        x * self.size + y
    }
}

const ORTHOGONAL: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

const SURROUNDING: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

fn orthogonal(x: usize, y: usize, size: usize) -> impl Iterator<Item = (usize, usize)> {
    offsets(&ORTHOGONAL, x, y, size)
}

fn surrounding(x: usize, y: usize, size: usize) -> impl Iterator<Item = (usize, usize)> {
    offsets(&SURROUNDING, x, y, size)
}

fn offsets(
    deltas: &'static [(isize, isize)],
    x: usize,
    y: usize,
    size: usize,
) -> impl Iterator<Item = (usize, usize)> {
    deltas.iter().filter_map(move |&(dx, dy)| {
        let nx = x.checked_add_signed(dx)?;
        let ny = y.checked_add_signed(dy)?;
        (nx < size && ny < size).then_some((nx, ny))
    })
}
