//! Rule engine for the 4x4 sliding-tile merge puzzle.
//!
//! Every operation takes the current board (and score) by value and returns a
//! fresh one, so callers keep ownership of the game and can compare old and new
//! states freely. Randomness is injected through [`rand::Rng`].

pub mod engine;
pub mod error;

pub use engine::{
    apply_move, can_move, is_terminal, legal_moves, new_game, reduce_row, restart, shift, spawn,
    transpose, Board, Cell, Direction, Engine, GameState, Line, LineTransform, MoveResult,
    RowReduction, Score, TerminalRule, Tile, MAX_TILE,
};
pub use error::EngineError;
