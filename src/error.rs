//! Error types for the rules engine.
//!
//! Every error here is a caller error: the operation that produced it made no
//! change to the game.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    /// The requested move is not legal in the current position.
    #[error("Illegal move: {uci}")]
    IllegalMove { uci: String },

    /// A move was requested after checkmate, stalemate or a draw.
    #[error("Game is already over")]
    GameOver,

    /// Undo was requested with only the starting position in the record.
    #[error("No move to undo")]
    NoMoveToUndo,

    /// File or rank outside 0..=7.
    #[error("Invalid position: file {file}, rank {rank} (must be 0-7)")]
    InvalidPosition { file: u8, rank: u8 },

    /// A square name such as "e4" could not be parsed.
    #[error("Invalid square: {0:?}")]
    InvalidSquare(String),

    #[error("Invalid FEN: {reason}")]
    InvalidFen { reason: String },

    /// The pieces cannot arise in a legal game: a missing or extra king, or
    /// the side that just moved left in check.
    #[error("Illegal setup: {reason}")]
    IllegalSetup { reason: String },
}

impl ChessError {
    pub(crate) fn fen(reason: impl Into<String>) -> Self {
        ChessError::InvalidFen {
            reason: reason.into(),
        }
    }

    pub(crate) fn setup(reason: impl Into<String>) -> Self {
        ChessError::IllegalSetup {
            reason: reason.into(),
        }
    }
}

/// Result type alias for rules engine operations
pub type ChessResult<T> = Result<T, ChessError>;
