use rand::Rng;
use std::fmt;
use std::str::FromStr;

use super::ops;
use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};

/// Value held by one cell: 0 for empty, otherwise a power of two >= 2.
pub type Tile = u32;
/// Running score; grows only by the values produced by merges.
pub type Score = u64;
/// One row (or, after transposition, one column) of four cells.
pub type Line = [Tile; 4];
/// `(row, col)` coordinate, both in `0..4`.
pub type Cell = (usize, usize);

pub(crate) const SIZE: usize = 4;

/// Largest tile a board may hold. Two of them sit side by side without merging,
/// so every move keeps a valid board valid.
pub const MAX_TILE: Tile = 1 << 30;

/// A direction to push tiles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// How a direction is expressed in terms of the trailing-merge line reducer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineTransform {
    /// Reduce columns instead of rows.
    pub transpose: bool,
    /// Push toward index 0 instead of index 3.
    pub reverse: bool,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// The direction -> (transpose, reverse) table shared by every move.
    pub const fn transform(self) -> LineTransform {
        let (transpose, reverse) = match self {
            Direction::Up => (true, true),
            Direction::Down => (true, false),
            Direction::Left => (false, true),
            Direction::Right => (false, false),
        };
        LineTransform { transpose, reverse }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = EngineError;

    /// Accepts the full names plus `wasd` and `hjkl` keys, case-insensitive.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "w" | "k" => Ok(Direction::Up),
            "down" | "s" | "j" => Ok(Direction::Down),
            "left" | "a" | "h" => Ok(Direction::Left),
            "right" | "d" | "l" => Ok(Direction::Right),
            _ => Err(EngineError::InvalidDirection(s.to_string())),
        }
    }
}

/// A 4x4 board in row-major order (`board[r][c]`).
///
/// Boards are small `Copy` values: every operation returns a new board and
/// never touches the one it was given.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u64>>", into = "[[Tile; 4]; 4]")]
pub struct Board(pub(crate) [Line; SIZE]);

impl Board {
    /// A constant empty board (all zeros).
    pub const EMPTY: Board = Board([[0; SIZE]; SIZE]);

    /// Build a board from rows, rejecting cells that are neither 0 nor a power of two
    /// from 2 up to [`MAX_TILE`].
    ///
    /// ```
    /// use twenty48_core::Board;
    /// let b = Board::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0, 0, 0, 4]]).unwrap();
    /// assert_eq!(b.count_empty(), 13);
    /// assert!(Board::from_rows([[3, 0, 0, 0], [0; 4], [0; 4], [0; 4]]).is_err());
    /// ```
    pub fn from_rows(rows: [Line; SIZE]) -> Result<Self> {
        for (r, row) in rows.iter().enumerate() {
            for (c, &value) in row.iter().enumerate() {
                validate_tile(r, c, u64::from(value))?;
            }
        }
        Ok(Board(rows))
    }

    /// Copy of the underlying rows.
    #[inline]
    pub fn rows(&self) -> [Line; SIZE] {
        self.0
    }

    #[inline]
    pub fn row(&self, r: usize) -> Line {
        self.0[r]
    }

    /// Value at `(row, col)`. Panics when either index is outside `0..4`.
    #[inline]
    pub fn get(&self, (r, c): Cell) -> Tile {
        self.0[r][c]
    }

    /// Return a copy of this board with `cell` set to `value`.
    #[inline]
    pub(crate) fn with_tile(mut self, (r, c): Cell, value: Tile) -> Self {
        self.0[r][c] = value;
        self
    }

    /// Empty cells in row-major order.
    pub fn empty_cells(&self) -> Vec<Cell> {
        self.cells().filter(|&(_, v)| v == 0).map(|(cell, _)| cell).collect()
    }

    /// Iterate over `((row, col), value)` in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (Cell, Tile)> + '_ {
        self.0
            .iter()
            .enumerate()
            .flat_map(|(r, row)| row.iter().enumerate().map(move |(c, &v)| ((r, c), v)))
    }

    #[inline]
    pub fn count_empty(&self) -> usize {
        self.cells().filter(|&(_, v)| v == 0).count()
    }

    #[inline]
    pub fn count_tiles(&self) -> usize {
        SIZE * SIZE - self.count_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.count_empty() == 0
    }

    /// Highest tile value on the board, 0 when empty.
    pub fn highest_tile(&self) -> Tile {
        self.cells().map(|(_, v)| v).max().unwrap_or(0)
    }

    /// Sum of every tile value.
    pub fn tile_sum(&self) -> u64 {
        self.cells().map(|(_, v)| u64::from(v)).sum()
    }

    /// Return the board resulting from sliding/merging in `dir` (no random insert)
    /// together with the points gained.
    ///
    /// ```
    /// use twenty48_core::{Board, Direction};
    /// let b = Board::from_rows([[2, 2, 4, 0], [0; 4], [0; 4], [0; 4]]).unwrap();
    /// let (left, gained) = b.shift(Direction::Left);
    /// assert_eq!(left.row(0), [4, 4, 0, 0]);
    /// assert_eq!(gained, 4);
    /// ```
    #[inline]
    pub fn shift(self, dir: Direction) -> (Self, Score) {
        ops::shift(self, dir)
    }

    /// Insert a random 2 (90%) or 4 (10%) tile into a random empty cell, using the provided RNG.
    ///
    /// ```
    /// use twenty48_core::Board;
    /// use rand::{SeedableRng, rngs::StdRng};
    /// let mut rng = StdRng::seed_from_u64(123);
    /// let b = Board::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
    /// assert_eq!(b.count_empty(), 14);
    /// ```
    #[inline]
    pub fn with_random_tile<R: Rng + ?Sized>(self, rng: &mut R) -> Self {
        ops::spawn(self, rng)
    }

    /// True when no empty cell remains (the simplified game-over rule).
    ///
    /// ```
    /// use twenty48_core::Board;
    /// assert!(Board::from_rows([[2; 4]; 4]).unwrap().is_terminal());
    /// assert!(!Board::EMPTY.is_terminal());
    /// ```
    #[inline]
    pub fn is_terminal(self) -> bool {
        ops::is_terminal(self)
    }
}

fn validate_tile(row: usize, col: usize, value: u64) -> Result<Tile> {
    Tile::try_from(value)
        .ok()
        .filter(|&v| v == 0 || (v >= 2 && v <= MAX_TILE && v.is_power_of_two()))
        .ok_or(EngineError::InvalidTile { row, col, value })
}

impl TryFrom<[Line; SIZE]> for Board {
    type Error = EngineError;

    fn try_from(rows: [Line; SIZE]) -> Result<Self> {
        Board::from_rows(rows)
    }
}

impl TryFrom<Vec<Vec<u64>>> for Board {
    type Error = EngineError;

    fn try_from(rows: Vec<Vec<u64>>) -> Result<Self> {
        let bad_row = rows.iter().find(|row| row.len() != SIZE);
        if rows.len() != SIZE || bad_row.is_some() {
            let cols = bad_row.or(rows.first()).map_or(0, Vec::len);
            return Err(EngineError::InvalidDimensions {
                rows: rows.len(),
                cols,
            });
        }
        let mut board = Board::EMPTY;
        for (r, row) in rows.iter().enumerate() {
            for (c, &value) in row.iter().enumerate() {
                board.0[r][c] = validate_tile(r, c, value)?;
            }
        }
        Ok(board)
    }
}

impl From<Board> for [Line; SIZE] {
    fn from(b: Board) -> Self {
        b.0
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Board").field(&self.0).finish()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(CELL_WIDTH * SIZE + SIZE - 1);
        for (r, row) in self.0.iter().enumerate() {
            if r > 0 {
                writeln!(f, "{rule}")?;
            }
            let cells: Vec<String> = row.iter().map(|&v| format_val(v)).collect();
            writeln!(f, "{}", cells.join("|"))?;
        }
        Ok(())
    }
}

const CELL_WIDTH: usize = 7;

fn format_val(val: Tile) -> String {
    match val {
        0 => " ".repeat(CELL_WIDTH),
        x => {
            let mut x = x.to_string();
            while x.len() < CELL_WIDTH {
                match x.len() {
                    6 => x = format!(" {}", x),
                    _ => x = format!(" {} ", x),
                }
            }
            x
        }
    }
}
