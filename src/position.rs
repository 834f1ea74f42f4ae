use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ChessError, ChessResult};

/// A square on the board. File 0 = a, rank 0 = rank 1.
///
/// Fields are private so a `Position` is always inside the 8x8 grid.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Debug)]
#[serde(try_from = "String", into = "String")]
pub struct Position {
    file: u8,
    rank: u8,
}

impl Position {
    pub fn new(file: u8, rank: u8) -> ChessResult<Position> {
        if file < 8 && rank < 8 {
            Ok(Position { file, rank })
        } else {
            Err(ChessError::InvalidPosition { file, rank })
        }
    }

    /// Offset by (file, rank) deltas, or `None` when that leaves the board.
    pub fn offset(self, df: i8, dr: i8) -> Option<Position> {
        let f = self.file as i8 + df;
        let r = self.rank as i8 + dr;
        if (0..8).contains(&f) && (0..8).contains(&r) {
            Some(Position {
                file: f as u8,
                rank: r as u8,
            })
        } else {
            None
        }
    }

    pub fn file(self) -> u8 {
        self.file
    }

    pub fn rank(self) -> u8 {
        self.rank
    }

    /// Every square, a1, b1, ..., h1, a2, ..., h8.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..8u8).flat_map(|rank| (0..8u8).map(move |file| Position { file, rank }))
    }

    /// Used by const tables; callers guarantee the range.
    pub(crate) const fn at(file: u8, rank: u8) -> Position {
        Position { file, rank }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file) as char, (b'1' + self.rank) as char)
    }
}

impl FromStr for Position {
    type Err = ChessError;

    fn from_str(s: &str) -> ChessResult<Position> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(ChessError::InvalidSquare(s.to_string()));
        }
        let file = bytes[0].wrapping_sub(b'a');
        let rank = bytes[1].wrapping_sub(b'1');
        if file < 8 && rank < 8 {
            Ok(Position { file, rank })
        } else {
            Err(ChessError::InvalidSquare(s.to_string()))
        }
    }
}

impl TryFrom<String> for Position {
    type Error = ChessError;

    fn try_from(s: String) -> ChessResult<Position> {
        s.parse()
    }
}

impl From<Position> for String {
    fn from(p: Position) -> String {
        p.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_prints_algebraic() {
        let e4: Position = "e4".parse().unwrap();
        assert_eq!((e4.file(), e4.rank()), (4, 3));
        assert_eq!(e4.to_string(), "e4");
        assert_eq!(Position::new(0, 7).unwrap().to_string(), "a8");
    }

    #[test]
    fn rejects_off_board() {
        assert_eq!(
            Position::new(8, 0),
            Err(ChessError::InvalidPosition { file: 8, rank: 0 })
        );
        assert!("i1".parse::<Position>().is_err());
        assert!("a9".parse::<Position>().is_err());
        assert!("a".parse::<Position>().is_err());
        assert!("".parse::<Position>().is_err());
    }

    #[test]
    fn offset_stays_on_board() {
        let h8: Position = "h8".parse().unwrap();
        assert_eq!(h8.offset(1, 0), None);
        assert_eq!(h8.offset(-1, -2).map(|p| p.to_string()), Some("g6".to_string()));
    }

    #[test]
    fn serde_uses_square_names() {
        let d5: Position = "d5".parse().unwrap();
        assert_eq!(serde_json::to_string(&d5).unwrap(), "\"d5\"");
        let back: Position = serde_json::from_str("\"d5\"").unwrap();
        assert_eq!(back, d5);
        assert!(serde_json::from_str::<Position>("\"z0\"").is_err());
    }
}
