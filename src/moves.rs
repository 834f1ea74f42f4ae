use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ChessError, ChessResult};
use crate::piece::{Piece, PieceType};
use crate::position::Position;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub enum CastleSide {
    KingSide,
    QueenSide,
}

/// A fully described move, as produced by the move generator. Only meaningful
/// relative to the `BoardState` it was generated from.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub struct Move {
    pub from: Position,
    pub to: Position,
    pub promotion: Option<PieceType>,
    /// The piece removed by this move (the bypassed pawn for en passant).
    pub captured: Option<Piece>,
    pub castle: Option<CastleSide>,
    pub en_passant: bool,
}

/// What a user (or a front end) asks for: origin, destination and optionally a
/// promotion piece. Resolved against the legal moves of a position.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub struct MoveRequest {
    pub from: Position,
    pub to: Position,
    pub promotion: Option<PieceType>,
}

impl Move {
    pub(crate) fn quiet(from: Position, to: Position) -> Move {
        Move {
            from,
            to,
            promotion: None,
            captured: None,
            castle: None,
            en_passant: false,
        }
    }

    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    /// True when `req` asks for this move. A request without a promotion
    /// piece matches the queen promotion.
    pub fn matches(&self, req: &MoveRequest) -> bool {
        self.from == req.from
            && self.to == req.to
            && self.promotion == req.promotion.or(self.promotion.and(Some(PieceType::Queen)))
    }

    pub fn request(&self) -> MoveRequest {
        MoveRequest {
            from: self.from,
            to: self.to,
            promotion: self.promotion,
        }
    }

    /// Convert to UCI coordinate notation, e.g. "e2e4", "a7a8q"
    pub fn to_uci(&self) -> String {
        self.request().to_string()
    }

    /// Parse from UCI coordinate notation
    pub fn from_uci(s: &str) -> ChessResult<MoveRequest> {
        s.parse()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.request())
    }
}

impl fmt::Display for MoveRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(pt) = self.promotion {
            write!(f, "{}", pt.to_char())?;
        }
        Ok(())
    }
}

impl std::str::FromStr for MoveRequest {
    type Err = ChessError;

    fn from_str(s: &str) -> ChessResult<MoveRequest> {
        let illegal = || ChessError::IllegalMove { uci: s.to_string() };
        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return Err(illegal());
        }
        let from: Position = s[0..2].parse()?;
        let to: Position = s[2..4].parse()?;
        let promotion = match s[4..].chars().next() {
            None => None,
            Some(c) => match PieceType::from_char(c) {
                Some(pt) if PieceType::PROMOTIONS.contains(&pt) => Some(pt),
                _ => return Err(illegal()),
            },
        };
        Ok(MoveRequest {
            from,
            to,
            promotion,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Position {
        s.parse().unwrap()
    }

    #[test]
    fn uci_text_round_trips() {
        let req = Move::from_uci("a7a8n").unwrap();
        assert_eq!(req.from, sq("a7"));
        assert_eq!(req.to, sq("a8"));
        assert_eq!(req.promotion, Some(PieceType::Knight));
        assert_eq!(req.to_string(), "a7a8n");
    }

    #[test]
    fn bad_uci_is_rejected() {
        assert!(Move::from_uci("e2").is_err());
        assert!(Move::from_uci("e2e9").is_err());
        assert!(Move::from_uci("e7e8k").is_err());
        assert!(Move::from_uci("e2e4e5").is_err());
    }

    #[test]
    fn missing_promotion_matches_queen() {
        let mut mv = Move::quiet(sq("b7"), sq("b8"));
        mv.promotion = Some(PieceType::Queen);
        let bare = MoveRequest { from: sq("b7"), to: sq("b8"), promotion: None };
        assert!(mv.matches(&bare));

        mv.promotion = Some(PieceType::Rook);
        assert!(!mv.matches(&bare));
        assert!(mv.matches(&MoveRequest { promotion: Some(PieceType::Rook), ..bare }));
    }

    #[test]
    fn quiet_move_ignores_promotion_in_request() {
        let mv = Move::quiet(sq("e2"), sq("e4"));
        assert!(mv.matches(&MoveRequest { from: sq("e2"), to: sq("e4"), promotion: None }));
        assert!(!mv.matches(&MoveRequest {
            from: sq("e2"),
            to: sq("e4"),
            promotion: Some(PieceType::Queen)
        }));
    }
}
