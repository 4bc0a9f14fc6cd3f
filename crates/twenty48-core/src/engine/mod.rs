//! Engine module: 4x4 board state, the single-line reducer, board-level
//! operations and the move orchestrator.
//!
//! - `Board` is the plain 4x4 value with useful methods.
//! - `reduce_row` is the only place merges happen; every direction funnels into it.
//! - Free functions mirror the `Engine` methods for the default terminal rule.

mod game;
mod ops;
mod row;
pub mod state;

pub use game::{apply_move, new_game, restart, Engine, GameState, MoveResult, TerminalRule};
pub use ops::{can_move, is_terminal, legal_moves, shift, spawn, transpose};
pub use row::{reduce_row, RowReduction};
pub use state::{Board, Cell, Direction, Line, LineTransform, Score, Tile, MAX_TILE};
