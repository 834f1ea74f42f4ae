//! The game state machine: owns the move record and repetition table,
//! validates and commits moves, and derives check and game-over status.

use std::collections::HashMap;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::board::{BoardState, Signature};
use crate::error::{ChessError, ChessResult};
use crate::movegen::{has_legal_move, legal_moves};
use crate::moves::{Move, MoveRequest};
use crate::piece::{Color, Piece};

/// Ways a game can end.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub enum Terminal {
    Checkmate,
    Stalemate,
    DrawByFiftyMove,
    DrawByRepetition,
    DrawByInsufficientMaterial,
}

impl Terminal {
    pub fn is_draw(self) -> bool {
        !matches!(self, Terminal::Checkmate)
    }
}

/// Check flag plus terminal kind. `in_check` is independent of `terminal`:
/// a checkmated side is also in check.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug, Default)]
pub struct GameStatus {
    pub in_check: bool,
    pub terminal: Option<Terminal>,
}

impl GameStatus {
    pub fn is_over(&self) -> bool {
        self.terminal.is_some()
    }

    /// "White wins", "Black wins", "Draw", or `None` while play continues.
    /// `side_to_move` is the side that was to move in the final position.
    pub fn result_text(&self, side_to_move: Color) -> Option<String> {
        self.terminal.map(|t| match t {
            Terminal::Checkmate => format!("{} wins", side_to_move.opposite()),
            _ => "Draw".to_string(),
        })
    }
}

/// Status of a position on its own. Repetition needs the game's history and
/// is only judged by [`Game::status`].
pub fn game_status(state: &BoardState) -> GameStatus {
    derive_status(state, 1)
}

fn derive_status(state: &BoardState, repetitions: u32) -> GameStatus {
    let in_check = state.in_check(state.side_to_move);
    let terminal = if !has_legal_move(state) {
        Some(if in_check {
            Terminal::Checkmate
        } else {
            Terminal::Stalemate
        })
    } else if state.halfmove_clock >= 100 {
        Some(Terminal::DrawByFiftyMove)
    } else if repetitions >= 3 {
        Some(Terminal::DrawByRepetition)
    } else if state.has_insufficient_material() {
        Some(Terminal::DrawByInsufficientMaterial)
    } else {
        None
    };
    GameStatus { in_check, terminal }
}

struct RecordEntry {
    mv: Option<Move>,
    state: BoardState,
}

/// A game in progress. Entry 0 of the record is the starting position and is
/// never popped.
pub struct Game {
    record: Vec<RecordEntry>,
    repetitions: HashMap<Signature, u32>,
    status: GameStatus,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    pub fn new() -> Self {
        Self::start(BoardState::new())
    }

    /// Start a game from an arbitrary position. Fails with
    /// [`ChessError::IllegalSetup`] when the position breaks
    /// [`BoardState::validate`].
    pub fn from_state(state: BoardState) -> ChessResult<Self> {
        state.validate()?;
        Ok(Self::start(state))
    }

    pub fn from_fen(fen: &str) -> ChessResult<Self> {
        Ok(Self::start(BoardState::from_fen(fen)?))
    }

    fn start(state: BoardState) -> Self {
        let mut repetitions = HashMap::new();
        repetitions.insert(state.signature(), 1);
        let status = derive_status(&state, 1);
        Game {
            record: vec![RecordEntry { mv: None, state }],
            repetitions,
            status,
        }
    }

    pub fn reset(&mut self) {
        debug!("game reset");
        *self = Game::new();
    }

    pub fn state(&self) -> &BoardState {
        // The record always holds the starting entry.
        &self.record[self.record.len() - 1].state
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_over(&self) -> bool {
        self.status.is_over()
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        if self.is_over() {
            Vec::new()
        } else {
            legal_moves(self.state())
        }
    }

    /// How many times the current position has occurred.
    pub fn repetition_count(&self) -> u32 {
        self.repetitions
            .get(&self.state().signature())
            .copied()
            .unwrap_or(0)
    }

    /// Apply `mv` if it is one of the generator's legal moves in the current
    /// position. Every field must match, including `captured`, `castle` and
    /// `en_passant`; use [`Game::apply_request`] to apply a bare
    /// origin/destination pair. Nothing changes on error.
    pub fn apply_move(&mut self, mv: &Move) -> ChessResult<&BoardState> {
        if self.is_over() {
            warn!("rejected {mv}: game is over");
            return Err(ChessError::GameOver);
        }
        if !legal_moves(self.state()).contains(mv) {
            warn!("rejected illegal move {mv:?}");
            return Err(ChessError::IllegalMove { uci: mv.to_uci() });
        }
        Ok(self.commit(*mv))
    }

    /// Apply a move given as origin/destination/promotion. A missing promotion
    /// piece promotes to a queen. The committed move is the generator's own,
    /// so its capture and special-move flags are always right.
    pub fn apply_request(&mut self, req: &MoveRequest) -> ChessResult<&BoardState> {
        if self.is_over() {
            warn!("rejected {req}: game is over");
            return Err(ChessError::GameOver);
        }
        let Some(mv) = legal_moves(self.state()).into_iter().find(|m| m.matches(req)) else {
            warn!("rejected illegal move {req}");
            return Err(ChessError::IllegalMove {
                uci: req.to_string(),
            });
        };
        Ok(self.commit(mv))
    }

    fn commit(&mut self, mv: Move) -> &BoardState {
        let next = self.state().after(&mv);
        let count = self.repetitions.entry(next.signature()).or_insert(0);
        *count += 1;
        let repeated = *count;
        self.status = derive_status(&next, repeated);
        self.record.push(RecordEntry {
            mv: Some(mv),
            state: next,
        });

        debug!("applied {mv} ({} to move)", self.state().side_to_move);
        if let Some(t) = self.status.terminal {
            info!("game over: {t:?} after {} plies", self.ply_count());
        }
        self.state()
    }

    /// Parse coordinate notation ("e2e4", "e7e8n") and apply it.
    pub fn play_uci(&mut self, uci: &str) -> ChessResult<&BoardState> {
        let req: MoveRequest = uci.parse()?;
        self.apply_request(&req)
    }

    pub fn undo_move(&mut self) -> ChessResult<&BoardState> {
        if self.record.len() <= 1 {
            return Err(ChessError::NoMoveToUndo);
        }
        if let Some(popped) = self.record.pop() {
            let sig = popped.state.signature();
            if let Some(count) = self.repetitions.get_mut(&sig) {
                *count -= 1;
                if *count == 0 {
                    self.repetitions.remove(&sig);
                }
            }
            if let Some(mv) = popped.mv {
                debug!("undid {mv}");
            }
        }
        self.status = derive_status(self.state(), self.repetition_count());
        Ok(self.state())
    }

    /// Moves played so far, oldest first.
    pub fn history(&self) -> Vec<Move> {
        self.record.iter().filter_map(|e| e.mv).collect()
    }

    pub fn last_move(&self) -> Option<Move> {
        self.record.last().and_then(|e| e.mv)
    }

    pub fn ply_count(&self) -> usize {
        self.record.len() - 1
    }

    /// Pieces of `color` captured so far, in capture order.
    pub fn captured(&self, color: Color) -> Vec<Piece> {
        self.record
            .iter()
            .filter_map(|e| e.mv.and_then(|m| m.captured))
            .filter(|p| p.color == color)
            .collect()
    }
}
