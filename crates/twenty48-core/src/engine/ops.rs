use log::trace;
use rand::Rng;

use super::row::{reduce_row, reduce_row_reversed};
use super::state::{Board, Direction, Line, Score, Tile, SIZE};

/// Result of sliding every line of a board in one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Slide {
    pub(crate) board: Board,
    pub(crate) gained: Score,
    pub(crate) changed: bool,
}

/// Swap rows and columns: `t[c][r] == board[r][c]`. Self-inverse.
pub fn transpose(board: Board) -> Board {
    let mut t = [[0; SIZE]; SIZE];
    for (r, row) in board.0.iter().enumerate() {
        for (c, &v) in row.iter().enumerate() {
            t[c][r] = v;
        }
    }
    Board(t)
}

/// Slide/merge tiles in the given direction and report the points gained. No randomness.
pub fn shift(board: Board, direction: Direction) -> (Board, Score) {
    let s = slide(board, direction);
    (s.board, s.gained)
}

pub(crate) fn slide(board: Board, direction: Direction) -> Slide {
    let transform = direction.transform();
    let mut lines = if transform.transpose {
        transpose(board)
    } else {
        board
    };

    let mut gained = 0;
    let mut changed = false;
    for line in lines.0.iter_mut() {
        let before: Line = *line;
        let reduced = if transform.reverse {
            reduce_row_reversed(before)
        } else {
            reduce_row(before)
        };
        gained += reduced.gained;
        changed |= reduced.line != before;
        *line = reduced.line;
    }

    let board = if transform.transpose {
        transpose(lines)
    } else {
        lines
    };
    Slide {
        board,
        gained,
        changed,
    }
}

/// Insert a 2 (90%) or 4 (10%) into a uniformly chosen empty cell.
///
/// A full board comes back unchanged. The input is never modified.
pub fn spawn<R: Rng + ?Sized>(board: Board, rng: &mut R) -> Board {
    let empty = board.empty_cells();
    if empty.is_empty() {
        return board;
    }
    let cell = empty[rng.gen_range(0..empty.len())];
    let tile = generate_random_tile(rng);
    trace!("spawned {tile} at {cell:?}");
    board.with_tile(cell, tile)
}

pub(crate) fn generate_random_tile<R: Rng + ?Sized>(rng: &mut R) -> Tile {
    if rng.gen_range(0..10) < 9 {
        2
    } else {
        4
    }
}

/// True when every cell holds a tile.
///
/// This is the simplified game-over rule: a full board whose neighbours could
/// still merge is reported terminal too. Use `TerminalRule::NoMoves` for the
/// exhaustive check.
pub fn is_terminal(board: Board) -> bool {
    board.is_full()
}

/// True if sliding in `direction` changes the board.
pub fn can_move(board: Board, direction: Direction) -> bool {
    slide(board, direction).changed
}

/// Directions that change the board, in `Direction::ALL` order.
pub fn legal_moves(board: Board) -> Vec<Direction> {
    Direction::ALL
        .into_iter()
        .filter(|&d| can_move(board, d))
        .collect()
}
