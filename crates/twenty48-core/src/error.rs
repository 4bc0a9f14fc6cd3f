//! Errors raised when external data is turned into engine values.
//!
//! The move path itself never fails: once a [`Board`](crate::Board) or
//! [`Direction`](crate::Direction) exists it is valid by construction.

use thiserror::Error;

/// Rejected input at a construction boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A non-zero cell that is not a power of two between 2 and `MAX_TILE`.
    #[error("invalid tile {value} at ({row}, {col}); expected 0 or a power of two from 2 to 2^30")]
    InvalidTile { row: usize, col: usize, value: u64 },

    /// A row set that is not exactly 4x4. `cols` reports the first offending row length.
    #[error("board must be 4x4, got {rows} rows x {cols} columns")]
    InvalidDimensions { rows: usize, cols: usize },

    /// A direction name that none of the accepted spellings match.
    #[error("unrecognised direction '{0}'")]
    InvalidDirection(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
