// =============================================================================
// Static evaluation
//
// Scores a position from White's perspective (positive = good for White):
// material plus a small bonus for occupying the four centre squares. This is
// the leaf value of the search.
// =============================================================================

use crate::board::BoardState;
use crate::piece::PieceType;
use crate::position::Position;

/// Bonus per centre square occupied, signed by the occupant's color.
pub const CENTRE_OCCUPY: f64 = 0.5;

/// The four central squares: d4, d5, e4, e5.
const CENTRE_SQUARES: [Position; 4] = [
    Position::at(3, 3),
    Position::at(3, 4),
    Position::at(4, 3),
    Position::at(4, 4),
];

/// Standard piece values in pawns. The king has no material value.
pub fn piece_value(pt: PieceType) -> f64 {
    match pt {
        PieceType::Pawn => 1.0,
        PieceType::Knight => 3.0,
        PieceType::Bishop => 3.0,
        PieceType::Rook => 5.0,
        PieceType::Queen => 9.0,
        PieceType::King => 0.0,
    }
}

pub fn evaluate(state: &BoardState) -> f64 {
    eval_material(state) + eval_centre(state)
}

fn eval_material(state: &BoardState) -> f64 {
    state
        .pieces()
        .map(|(_, p)| p.color.sign() * piece_value(p.piece_type))
        .sum()
}

fn eval_centre(state: &BoardState) -> f64 {
    CENTRE_SQUARES
        .iter()
        .filter_map(|&sq| state.piece_at(sq))
        .map(|p| p.color.sign() * CENTRE_OCCUPY)
        .sum()
}
