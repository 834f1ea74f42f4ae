//! Legal move generation.
//!
//! Pseudo-legal moves are generated per piece, then each one is played on a
//! scratch copy of the state and dropped if it leaves the mover's king
//! attacked. Output order is fixed: origin squares a1..h8, then each piece's
//! direction table in order, so search results are reproducible.

use crate::board::{BoardState, DIAGONAL_DIRS, KING_OFFSETS, KNIGHT_OFFSETS, STRAIGHT_DIRS};
use crate::moves::{CastleSide, Move};
use crate::piece::{Color, Piece, PieceType};
use crate::position::Position;

/// All legal moves for the side to move.
pub fn legal_moves(state: &BoardState) -> Vec<Move> {
    let mut moves = Vec::with_capacity(48);
    for (from, piece) in state.pieces() {
        if piece.color == state.side_to_move {
            pseudo_legal_from(state, from, piece, &mut moves);
        }
    }
    retain_legal(state, &mut moves);
    moves
}

/// Legal moves whose origin is `from`. Empty if `from` holds no piece of the
/// side to move.
pub fn legal_moves_from(state: &BoardState, from: Position) -> Vec<Move> {
    let mut moves = Vec::new();
    if let Some(piece) = state.piece_at(from) {
        if piece.color == state.side_to_move {
            pseudo_legal_from(state, from, piece, &mut moves);
        }
    }
    retain_legal(state, &mut moves);
    moves
}

pub fn has_legal_move(state: &BoardState) -> bool {
    state
        .pieces()
        .filter(|(_, p)| p.color == state.side_to_move)
        .any(|(sq, _)| !legal_moves_from(state, sq).is_empty())
}

/// Count leaf nodes of the legal move tree to `depth` plies.
pub fn perft(state: &BoardState, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = legal_moves(state);
    if depth == 1 {
        return moves.len() as u64;
    }
    moves
        .iter()
        .map(|m| perft(&state.after(m), depth - 1))
        .sum()
}

fn retain_legal(state: &BoardState, moves: &mut Vec<Move>) {
    let mover = state.side_to_move;
    moves.retain(|m| !state.after(m).in_check(mover));
}

fn pseudo_legal_from(state: &BoardState, from: Position, piece: Piece, moves: &mut Vec<Move>) {
    match piece.piece_type {
        PieceType::Pawn => pawn_moves(state, from, piece.color, moves),
        PieceType::Knight => step_moves(state, from, piece.color, &KNIGHT_OFFSETS, moves),
        PieceType::Bishop => sliding_moves(state, from, piece.color, &DIAGONAL_DIRS, moves),
        PieceType::Rook => sliding_moves(state, from, piece.color, &STRAIGHT_DIRS, moves),
        PieceType::Queen => {
            sliding_moves(state, from, piece.color, &STRAIGHT_DIRS, moves);
            sliding_moves(state, from, piece.color, &DIAGONAL_DIRS, moves);
        }
        PieceType::King => {
            step_moves(state, from, piece.color, &KING_OFFSETS, moves);
            castling_moves(state, from, piece.color, moves);
        }
    }
}

/// A move to `to`, recording whatever opposing piece stands there.
fn move_to(state: &BoardState, from: Position, to: Position) -> Move {
    Move {
        captured: state.piece_at(to),
        ..Move::quiet(from, to)
    }
}

fn push_with_promotions(mv: Move, promo_rank: u8, moves: &mut Vec<Move>) {
    if mv.to.rank() == promo_rank {
        for pt in PieceType::PROMOTIONS {
            moves.push(Move {
                promotion: Some(pt),
                ..mv
            });
        }
    } else {
        moves.push(mv);
    }
}

fn pawn_moves(state: &BoardState, from: Position, color: Color, moves: &mut Vec<Move>) {
    let (dir, start_rank, promo_rank): (i8, u8, u8) = match color {
        Color::White => (1, 1, 7),
        Color::Black => (-1, 6, 0),
    };

    // Single push, then double push from the starting rank
    if let Some(one) = from.offset(0, dir) {
        if state.piece_at(one).is_none() {
            push_with_promotions(Move::quiet(from, one), promo_rank, moves);

            if from.rank() == start_rank {
                if let Some(two) = one.offset(0, dir) {
                    if state.piece_at(two).is_none() {
                        moves.push(Move::quiet(from, two));
                    }
                }
            }
        }
    }

    // Captures (including en passant)
    for df in [-1i8, 1] {
        let Some(to) = from.offset(df, dir) else {
            continue;
        };
        match state.piece_at(to) {
            Some(target) if target.color != color => {
                push_with_promotions(move_to(state, from, to), promo_rank, moves);
            }
            None if state.en_passant_target == Some(to) => {
                let victim = Position::new(to.file(), from.rank())
                    .ok()
                    .and_then(|sq| state.piece_at(sq))
                    .filter(|p| p.piece_type == PieceType::Pawn && p.color != color);
                if let Some(victim) = victim {
                    moves.push(Move {
                        captured: Some(victim),
                        en_passant: true,
                        ..Move::quiet(from, to)
                    });
                }
            }
            _ => {}
        }
    }
}

/// Knight and king single steps from an offset table.
fn step_moves(state: &BoardState, from: Position, color: Color, offsets: &[(i8, i8)], moves: &mut Vec<Move>) {
    for &(df, dr) in offsets {
        let Some(to) = from.offset(df, dr) else {
            continue;
        };
        if state.piece_at(to).is_some_and(|p| p.color == color) {
            continue;
        }
        moves.push(move_to(state, from, to));
    }
}

fn sliding_moves(state: &BoardState, from: Position, color: Color, dirs: &[(i8, i8)], moves: &mut Vec<Move>) {
    for &(df, dr) in dirs {
        let mut cur = from.offset(df, dr);
        while let Some(to) = cur {
            if let Some(p) = state.piece_at(to) {
                if p.color != color {
                    moves.push(move_to(state, from, to));
                }
                break;
            }
            moves.push(Move::quiet(from, to));
            cur = to.offset(df, dr);
        }
    }
}

fn castling_moves(state: &BoardState, from: Position, color: Color, moves: &mut Vec<Move>) {
    let rank = color.back_rank();
    if from != Position::at(4, rank) {
        return;
    }
    let enemy = color.opposite();
    if state.is_square_attacked(from, enemy) {
        return;
    }

    // (side, rook file, squares that must be empty, squares the king crosses)
    let sides: [(CastleSide, u8, &[u8], [u8; 2]); 2] = [
        (CastleSide::KingSide, 7, &[5, 6], [5, 6]),
        (CastleSide::QueenSide, 0, &[1, 2, 3], [3, 2]),
    ];

    for (side, rook_file, between, path) in sides {
        if !state.castling_rights.has(color, side) {
            continue;
        }
        let rook_home = state.piece_at(Position::at(rook_file, rank));
        if rook_home != Some(Piece::new(PieceType::Rook, color)) {
            continue;
        }
        if between
            .iter()
            .any(|&f| state.piece_at(Position::at(f, rank)).is_some())
        {
            continue;
        }
        if path
            .iter()
            .any(|&f| state.is_square_attacked(Position::at(f, rank), enemy))
        {
            continue;
        }
        moves.push(Move {
            castle: Some(side),
            ..Move::quiet(from, Position::at(path[1], rank))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Position {
        s.parse().unwrap()
    }

    fn fen(s: &str) -> BoardState {
        BoardState::from_fen(s).unwrap()
    }

    fn has(moves: &[Move], uci: &str) -> bool {
        moves.iter().any(|m| m.to_uci() == uci)
    }

    #[test]
    fn twenty_moves_from_start() {
        assert_eq!(legal_moves(&BoardState::new()).len(), 20);
    }

    #[test]
    fn generation_order_is_stable() {
        let state = fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
        assert_eq!(legal_moves(&state), legal_moves(&state.clone()));
    }

    #[test]
    fn moves_from_single_square() {
        let state = BoardState::new();
        let knight = legal_moves_from(&state, sq("g1"));
        assert_eq!(knight.len(), 2);
        assert!(has(&knight, "g1f3") && has(&knight, "g1h3"));
        assert!(legal_moves_from(&state, sq("e4")).is_empty());
        assert!(legal_moves_from(&state, sq("e7")).is_empty(), "not black's turn");
    }

    #[test]
    fn double_push_needs_both_squares_empty() {
        let state = fen("4k3/8/8/8/8/4n3/4P3/4K3 w - - 0 1");
        let pawn = legal_moves_from(&state, sq("e2"));
        assert!(pawn.is_empty());
        let state = fen("4k3/8/8/8/4n3/8/4P3/4K3 w - - 0 1");
        let pawn = legal_moves_from(&state, sq("e2"));
        assert_eq!(pawn.len(), 1);
        assert!(has(&pawn, "e2e3"));
    }

    #[test]
    fn promotion_offers_four_pieces_queen_first() {
        let state = fen("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1");
        let pawn = legal_moves_from(&state, sq("a7"));
        let uci: Vec<String> = pawn.iter().map(|m| m.to_uci()).collect();
        assert_eq!(
            uci,
            ["a7a8q", "a7a8r", "a7a8b", "a7a8n", "a7b8q", "a7b8r", "a7b8b", "a7b8n"]
        );
        assert!(pawn[4].is_capture());
    }

    #[test]
    fn en_passant_removes_bypassed_pawn() {
        let state = fen("4k3/8/8/3Pp3/8/8/8/4K3 w - e6 0 1");
        let ep = legal_moves_from(&state, sq("d5"))
            .into_iter()
            .find(|m| m.en_passant)
            .expect("en passant available");
        assert_eq!(ep.to, sq("e6"));
        assert_eq!(ep.captured, Some(Piece::new(PieceType::Pawn, Color::Black)));

        let next = state.after(&ep);
        assert_eq!(next.piece_at(sq("e5")), None);
        assert_eq!(next.piece_at(sq("e6")), Some(Piece::new(PieceType::Pawn, Color::White)));
        assert_eq!(next.halfmove_clock, 0);
    }

    #[test]
    fn en_passant_that_exposes_king_is_illegal() {
        // Capturing e.p. would clear the fifth rank between the rook and king.
        let state = fen("8/8/8/K2Pp2r/8/8/8/7k w - e6 0 1");
        assert!(!has(&legal_moves(&state), "d5e6"));
    }

    #[test]
    fn castling_both_sides_when_clear() {
        let state = fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let king = legal_moves_from(&state, sq("e1"));
        let castles: Vec<&Move> = king.iter().filter(|m| m.castle.is_some()).collect();
        assert_eq!(castles.len(), 2);

        let short = king.iter().find(|m| m.castle == Some(CastleSide::KingSide)).unwrap();
        let next = state.after(short);
        assert_eq!(next.piece_at(sq("g1")), Some(Piece::new(PieceType::King, Color::White)));
        assert_eq!(next.piece_at(sq("f1")), Some(Piece::new(PieceType::Rook, Color::White)));
        assert_eq!(next.piece_at(sq("h1")), None);
        assert!(!next.castling_rights.white_kingside && !next.castling_rights.white_queenside);
        assert!(next.castling_rights.black_kingside);
    }

    #[test]
    fn castling_blocked_by_attacked_path() {
        // Black rook on f8 covers f1: no short castle. b1 attacked does not
        // matter for the long castle.
        let state = fen("1r2kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        let king = legal_moves_from(&state, sq("e1"));
        assert!(!has(&king, "e1g1"));
        assert!(has(&king, "e1c1"));
    }

    #[test]
    fn no_castling_out_of_check_or_through_pieces() {
        let state = fen("4k3/8/8/8/8/8/4r3/R3K2R w KQ - 0 1");
        assert!(legal_moves_from(&state, sq("e1")).iter().all(|m| m.castle.is_none()));

        let state = fen("4k3/8/8/8/8/8/8/RN2K1NR w KQ - 0 1");
        assert!(legal_moves_from(&state, sq("e1")).iter().all(|m| m.castle.is_none()));
    }

    #[test]
    fn pinned_piece_cannot_leave_pin_line() {
        let state = fen("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1");
        assert!(legal_moves_from(&state, sq("e2")).is_empty());
    }

    #[test]
    fn no_move_leaves_own_king_attacked() {
        let state = fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
        for m in legal_moves(&state) {
            assert!(!state.after(&m).in_check(Color::White), "{m} leaves king attacked");
            for reply in legal_moves(&state.after(&m)) {
                assert!(!state.after(&m).after(&reply).in_check(Color::Black));
            }
        }
    }

    #[test]
    fn perft_from_start() {
        let state = BoardState::new();
        assert_eq!(perft(&state, 1), 20);
        assert_eq!(perft(&state, 2), 400);
        assert_eq!(perft(&state, 3), 8902);
    }
}
