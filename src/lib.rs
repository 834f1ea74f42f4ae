pub mod board;
pub mod engine;
pub mod error;
pub mod eval;
pub mod game;
pub mod movegen;
pub mod moves;
pub mod piece;
pub mod position;

#[cfg(target_arch = "wasm32")]
mod wasm_api;

pub use board::{BoardState, CastlingRights, STARTING_FEN};
pub use engine::{best_move, AiConfig, Difficulty, SearchResult};
pub use error::{ChessError, ChessResult};
pub use eval::evaluate;
pub use game::{game_status, Game, GameStatus, Terminal};
pub use moves::{CastleSide, Move, MoveRequest};
pub use piece::{Color, Piece, PieceType};
pub use position::Position;

/// The standard starting position.
pub fn new_game() -> BoardState {
    BoardState::new()
}

/// Legal moves for the side to move, optionally only those starting on `from`.
pub fn legal_moves(state: &BoardState, from: Option<Position>) -> Vec<Move> {
    match from {
        Some(sq) => movegen::legal_moves_from(state, sq),
        None => movegen::legal_moves(state),
    }
}
