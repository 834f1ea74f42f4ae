use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ChessError, ChessResult};
use crate::moves::{CastleSide, Move};
use crate::piece::{Color, Piece, PieceType};
use crate::position::Position;

pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

pub(crate) const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-1, -2), (1, -2), (-2, -1), (2, -1),
    (-2, 1), (2, 1), (-1, 2), (1, 2),
];

pub(crate) const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1), (0, -1), (1, -1),
    (-1, 0), (1, 0),
    (-1, 1), (0, 1), (1, 1),
];

pub(crate) const STRAIGHT_DIRS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
pub(crate) const DIAGONAL_DIRS: [(i8, i8); 4] = [(1, 1), (-1, 1), (1, -1), (-1, -1)];

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub struct CastlingRights {
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
}

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights {
        white_kingside: false,
        white_queenside: false,
        black_kingside: false,
        black_queenside: false,
    };

    pub const ALL: CastlingRights = CastlingRights {
        white_kingside: true,
        white_queenside: true,
        black_kingside: true,
        black_queenside: true,
    };

    pub fn has(&self, color: Color, side: CastleSide) -> bool {
        match (color, side) {
            (Color::White, CastleSide::KingSide) => self.white_kingside,
            (Color::White, CastleSide::QueenSide) => self.white_queenside,
            (Color::Black, CastleSide::KingSide) => self.black_kingside,
            (Color::Black, CastleSide::QueenSide) => self.black_queenside,
        }
    }

    fn revoke_color(&mut self, color: Color) {
        match color {
            Color::White => {
                self.white_kingside = false;
                self.white_queenside = false;
            }
            Color::Black => {
                self.black_kingside = false;
                self.black_queenside = false;
            }
        }
    }

    /// A rook leaving or being captured on its home corner loses that right.
    fn revoke_corner(&mut self, sq: Position) {
        match (sq.file(), sq.rank()) {
            (0, 0) => self.white_queenside = false,
            (7, 0) => self.white_kingside = false,
            (0, 7) => self.black_queenside = false,
            (7, 7) => self.black_kingside = false,
            _ => {}
        }
    }
}

/// The part of a `BoardState` that decides whether two positions repeat:
/// placement, side to move, castling rights and en-passant target.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Signature {
    squares: [[Option<Piece>; 8]; 8],
    side_to_move: Color,
    castling_rights: CastlingRights,
    en_passant_target: Option<Position>,
}

/// One ply's worth of position. Never mutated in place once built; moves
/// produce a new state via [`BoardState::after`].
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub struct BoardState {
    /// Indexed `[rank][file]`, rank 0 = rank 1.
    pub squares: [[Option<Piece>; 8]; 8],
    pub side_to_move: Color,
    pub castling_rights: CastlingRights,
    pub en_passant_target: Option<Position>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardState {
    /// An empty board with no pieces. Useful for setting up test positions.
    pub fn empty() -> Self {
        BoardState {
            squares: [[None; 8]; 8],
            side_to_move: Color::White,
            castling_rights: CastlingRights::NONE,
            en_passant_target: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// The standard starting position.
    pub fn new() -> Self {
        const BACK_RANK: [PieceType; 8] = [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ];

        let mut state = BoardState::empty();
        for (file, &pt) in BACK_RANK.iter().enumerate() {
            state.squares[0][file] = Some(Piece::new(pt, Color::White));
            state.squares[1][file] = Some(Piece::new(PieceType::Pawn, Color::White));
            state.squares[6][file] = Some(Piece::new(PieceType::Pawn, Color::Black));
            state.squares[7][file] = Some(Piece::new(pt, Color::Black));
        }
        state.castling_rights = CastlingRights::ALL;
        state
    }

    pub fn piece_at(&self, sq: Position) -> Option<Piece> {
        self.squares[sq.rank() as usize][sq.file() as usize]
    }

    /// Place or clear a square. Intended for building positions, not for play.
    pub fn set_piece(&mut self, sq: Position, piece: Option<Piece>) {
        self.squares[sq.rank() as usize][sq.file() as usize] = piece;
    }

    pub fn pieces(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        Position::all().filter_map(move |sq| self.piece_at(sq).map(|p| (sq, p)))
    }

    pub fn king_position(&self, color: Color) -> Option<Position> {
        self.pieces()
            .find(|(_, p)| p.piece_type == PieceType::King && p.color == color)
            .map(|(sq, _)| sq)
    }

    /// Whether `attacker` attacks `target`. Only capture patterns count:
    /// castling and en-passant rights are not attacks.
    pub fn is_square_attacked(&self, target: Position, attacker: Color) -> bool {
        let is = |sq: Option<Position>, types: &[PieceType]| {
            sq.and_then(|s| self.piece_at(s))
                .is_some_and(|p| p.color == attacker && types.contains(&p.piece_type))
        };

        if KNIGHT_OFFSETS
            .iter()
            .any(|&(df, dr)| is(target.offset(df, dr), &[PieceType::Knight]))
        {
            return true;
        }

        if KING_OFFSETS
            .iter()
            .any(|&(df, dr)| is(target.offset(df, dr), &[PieceType::King]))
        {
            return true;
        }

        // A pawn one rank "behind" the target (from the attacker's side) on an
        // adjacent file attacks it.
        let pawn_dir: i8 = if attacker == Color::White { 1 } else { -1 };
        if [-1i8, 1]
            .iter()
            .any(|&df| is(target.offset(df, -pawn_dir), &[PieceType::Pawn]))
        {
            return true;
        }

        self.ray_hits(target, &STRAIGHT_DIRS, attacker, &[PieceType::Rook, PieceType::Queen])
            || self.ray_hits(target, &DIAGONAL_DIRS, attacker, &[PieceType::Bishop, PieceType::Queen])
    }

    fn ray_hits(&self, from: Position, dirs: &[(i8, i8)], attacker: Color, types: &[PieceType]) -> bool {
        for &(df, dr) in dirs {
            let mut cur = from.offset(df, dr);
            while let Some(sq) = cur {
                if let Some(p) = self.piece_at(sq) {
                    if p.color == attacker && types.contains(&p.piece_type) {
                        return true;
                    }
                    break;
                }
                cur = sq.offset(df, dr);
            }
        }
        false
    }

    pub fn in_check(&self, color: Color) -> bool {
        self.king_position(color)
            .is_some_and(|k| self.is_square_attacked(k, color.opposite()))
    }

    pub fn signature(&self) -> Signature {
        Signature {
            squares: self.squares,
            side_to_move: self.side_to_move,
            castling_rights: self.castling_rights,
            en_passant_target: self.en_passant_target,
        }
    }

    /// K vs K, or K + one minor piece vs K.
    pub fn has_insufficient_material(&self) -> bool {
        let mut white = Vec::new();
        let mut black = Vec::new();
        for (_, p) in self.pieces() {
            if p.piece_type == PieceType::King {
                continue;
            }
            match p.color {
                Color::White => white.push(p.piece_type),
                Color::Black => black.push(p.piece_type),
            }
        }
        match (white.as_slice(), black.as_slice()) {
            ([], []) => true,
            ([minor], []) | ([], [minor]) => minor.is_minor(),
            _ => false,
        }
    }

    /// Derive the state after `m`. `m` must come from the move generator for
    /// this state; `self` is left untouched.
    pub fn after(&self, m: &Move) -> BoardState {
        let mut next = self.clone();
        let Some(piece) = self.piece_at(m.from) else {
            return next;
        };
        let is_pawn_move = piece.piece_type == PieceType::Pawn;

        if m.en_passant {
            // The captured pawn sits beside the destination, on the origin rank.
            if let Ok(victim) = Position::new(m.to.file(), m.from.rank()) {
                next.set_piece(victim, None);
            }
        }

        let placed = match m.promotion {
            Some(pt) => Piece::new(pt, piece.color),
            None => piece,
        };
        next.set_piece(m.from, None);
        next.set_piece(m.to, Some(placed));

        if let Some(side) = m.castle {
            let rank = m.from.rank();
            let (rook_from, rook_to) = match side {
                CastleSide::KingSide => (7, 5),
                CastleSide::QueenSide => (0, 3),
            };
            let rook_from = Position::at(rook_from, rank);
            next.set_piece(Position::at(rook_to, rank), self.piece_at(rook_from));
            next.set_piece(rook_from, None);
        }

        if piece.piece_type == PieceType::King {
            next.castling_rights.revoke_color(piece.color);
        }
        next.castling_rights.revoke_corner(m.from);
        next.castling_rights.revoke_corner(m.to);

        next.en_passant_target = if is_pawn_move && m.from.rank().abs_diff(m.to.rank()) == 2 {
            Some(Position::at(m.from.file(), (m.from.rank() + m.to.rank()) / 2))
        } else {
            None
        };

        if is_pawn_move || m.captured.is_some() {
            next.halfmove_clock = 0;
        } else {
            next.halfmove_clock += 1;
        }

        if self.side_to_move == Color::Black {
            next.fullmove_number += 1;
        }
        next.side_to_move = self.side_to_move.opposite();
        next
    }

    /// Parse a FEN string. Requires exactly one king per side.
    pub fn from_fen(fen: &str) -> ChessResult<BoardState> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() < 4 || fields.len() > 6 {
            return Err(ChessError::fen(format!("expected 4-6 fields, got {}", fields.len())));
        }

        let mut state = BoardState::empty();
        let ranks: Vec<&str> = fields[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(ChessError::fen("placement must have 8 ranks"));
        }
        for (i, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - i as u8;
            let mut file = 0u8;
            for c in rank_str.chars() {
                if let Some(n) = c.to_digit(10) {
                    if !(1..=8).contains(&n) {
                        return Err(ChessError::fen(format!("bad empty-square count {c}")));
                    }
                    file += n as u8;
                } else {
                    let piece = Piece::from_fen_char(c)
                        .ok_or_else(|| ChessError::fen(format!("unknown piece {c:?}")))?;
                    let sq = Position::new(file, rank)
                        .map_err(|_| ChessError::fen(format!("rank {} overflows", rank + 1)))?;
                    state.set_piece(sq, Some(piece));
                    file += 1;
                }
                if file > 8 {
                    return Err(ChessError::fen(format!("rank {} overflows", rank + 1)));
                }
            }
            if file != 8 {
                return Err(ChessError::fen(format!("rank {} has {file} squares", rank + 1)));
            }
        }

        state.side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(ChessError::fen(format!("bad side to move {other:?}"))),
        };

        state.castling_rights = CastlingRights::NONE;
        if fields[2] != "-" {
            for c in fields[2].chars() {
                match c {
                    'K' => state.castling_rights.white_kingside = true,
                    'Q' => state.castling_rights.white_queenside = true,
                    'k' => state.castling_rights.black_kingside = true,
                    'q' => state.castling_rights.black_queenside = true,
                    _ => return Err(ChessError::fen(format!("bad castling flag {c:?}"))),
                }
            }
        }

        state.en_passant_target = match fields[3] {
            "-" => None,
            sq => Some(
                sq.parse()
                    .map_err(|_| ChessError::fen(format!("bad en-passant square {sq:?}")))?,
            ),
        };

        if let Some(hm) = fields.get(4) {
            state.halfmove_clock = hm
                .parse()
                .map_err(|_| ChessError::fen(format!("bad halfmove clock {hm:?}")))?;
        }
        if let Some(fm) = fields.get(5) {
            state.fullmove_number = fm
                .parse()
                .map_err(|_| ChessError::fen(format!("bad fullmove number {fm:?}")))?;
        }

        state.validate()?;
        Ok(state)
    }

    /// Check that play can start here: one king per side, and the side that
    /// is not to move is not in check (its king could be captured).
    pub fn validate(&self) -> ChessResult<()> {
        for color in [Color::White, Color::Black] {
            let kings = self
                .pieces()
                .filter(|(_, p)| p.piece_type == PieceType::King && p.color == color)
                .count();
            if kings != 1 {
                return Err(ChessError::setup(format!("{color} has {kings} kings")));
            }
        }
        let waiting = self.side_to_move.opposite();
        if self.in_check(waiting) {
            return Err(ChessError::setup(format!(
                "{waiting} is in check with {} to move",
                self.side_to_move
            )));
        }
        Ok(())
    }

    pub fn to_fen(&self) -> String {
        let mut placement = String::new();
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                match self.squares[rank][file] {
                    Some(p) => {
                        if empty > 0 {
                            placement.push_str(&empty.to_string());
                            empty = 0;
                        }
                        placement.push(p.to_fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                placement.push_str(&empty.to_string());
            }
            if rank > 0 {
                placement.push('/');
            }
        }

        let side = match self.side_to_move {
            Color::White => "w",
            Color::Black => "b",
        };

        let cr = &self.castling_rights;
        let mut castling: String = [
            (cr.white_kingside, 'K'),
            (cr.white_queenside, 'Q'),
            (cr.black_kingside, 'k'),
            (cr.black_queenside, 'q'),
        ]
        .iter()
        .filter(|(on, _)| *on)
        .map(|(_, c)| *c)
        .collect();
        if castling.is_empty() {
            castling.push('-');
        }

        let ep = self
            .en_passant_target
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());

        format!(
            "{placement} {side} {castling} {ep} {} {}",
            self.halfmove_clock, self.fullmove_number
        )
    }
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8 {
                let c = self.squares[rank][file].map_or('.', |p| p.to_fen_char());
                write!(f, " {c}")?;
            }
            writeln!(f)?;
        }
        write!(f, "   a b c d e f g h")
    }
}
