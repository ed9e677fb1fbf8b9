// Copyright 2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::{convert::TryFrom, fmt};

use derive_more::{Add, Sub};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SquareParseError {
    #[error("invalid notation: {0:?}")]
    InvalidNotation(String),
}

/// A coordinate on the chessboard.
///
/// Coordinates are stored as a row index and a column index, both counted from the top-left corner of the board
/// as White sees it: rank 0 is the eighth rank (Black's back rank) and file 0 is the a-file. A square is only
/// meaningful when both components lie in `0..8`; squares produced by arithmetic may fall off the board and must
/// be checked with [`Square::is_valid`] before use.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Add, Sub, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Square {
    rank: i8,
    file: i8,
}

impl Square {
    pub const fn new(rank: i8, file: i8) -> Square {
        Square { rank, file }
    }

    /// Row index, 0 being the eighth rank.
    pub const fn rank(self) -> i8 {
        self.rank
    }

    /// Column index, 0 being the a-file.
    pub const fn file(self) -> i8 {
        self.file
    }

    pub const fn is_valid(self) -> bool {
        self.rank >= 0 && self.rank < 8 && self.file >= 0 && self.file < 8
    }

    /// Index of this square in row-major order, a8 = 0 and h1 = 63. Only defined for valid squares.
    pub(crate) const fn index(self) -> usize {
        (self.rank * 8 + self.file) as usize
    }

    pub(crate) const fn from_index(index: usize) -> Square {
        Square::new((index / 8) as i8, (index % 8) as i8)
    }

    /// The algebraic name of this square, e.g. "e4".
    pub fn to_notation(self) -> String {
        debug_assert!(self.is_valid(), "notation requested for off-board square");
        format!("{}", self)
    }

    pub fn from_notation(notation: &str) -> Result<Square, SquareParseError> {
        let invalid = || SquareParseError::InvalidNotation(notation.to_owned());
        let mut chars = notation.chars();
        let (file, rank) = match (chars.next(), chars.next(), chars.next()) {
            (Some(file @ 'a'..='h'), Some(rank @ '1'..='8'), None) => (file, rank),
            _ => return Err(invalid()),
        };

        let file = (file as u8 - b'a') as i8;
        let rank = 8 - (rank as u8 - b'0') as i8;
        Ok(Square::new(rank, file))
    }
}

impl TryFrom<String> for Square {
    type Error = SquareParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Square::from_notation(&value)
    }
}

impl From<Square> for String {
    fn from(square: Square) -> String {
        square.to_notation()
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return write!(f, "({}, {})", self.rank, self.file);
        }

        let file = (b'a' + self.file as u8) as char;
        write!(f, "{}{}", file, 8 - self.rank)
    }
}

/// Iterator over every square of the board, from a8 through h1.
pub struct AllSquares(usize, usize);

impl Iterator for AllSquares {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        if self.0 >= self.1 {
            None
        } else {
            let next = self.0;
            self.0 += 1;
            Some(Square::from_index(next))
        }
    }
}

impl DoubleEndedIterator for AllSquares {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.0 >= self.1 {
            None
        } else {
            self.1 -= 1;
            Some(Square::from_index(self.1))
        }
    }
}

impl Default for AllSquares {
    fn default() -> Self {
        AllSquares(0, 64)
    }
}

pub fn squares() -> AllSquares {
    AllSquares::default()
}

pub const A8: Square = Square::new(0, 0);
pub const B8: Square = Square::new(0, 1);
pub const C8: Square = Square::new(0, 2);
pub const D8: Square = Square::new(0, 3);
pub const E8: Square = Square::new(0, 4);
pub const F8: Square = Square::new(0, 5);
pub const G8: Square = Square::new(0, 6);
pub const H8: Square = Square::new(0, 7);
pub const A7: Square = Square::new(1, 0);
pub const B7: Square = Square::new(1, 1);
pub const C7: Square = Square::new(1, 2);
pub const D7: Square = Square::new(1, 3);
pub const E7: Square = Square::new(1, 4);
pub const F7: Square = Square::new(1, 5);
pub const G7: Square = Square::new(1, 6);
pub const H7: Square = Square::new(1, 7);
pub const A6: Square = Square::new(2, 0);
pub const B6: Square = Square::new(2, 1);
pub const C6: Square = Square::new(2, 2);
pub const D6: Square = Square::new(2, 3);
pub const E6: Square = Square::new(2, 4);
pub const F6: Square = Square::new(2, 5);
pub const G6: Square = Square::new(2, 6);
pub const H6: Square = Square::new(2, 7);
pub const A5: Square = Square::new(3, 0);
pub const B5: Square = Square::new(3, 1);
pub const C5: Square = Square::new(3, 2);
pub const D5: Square = Square::new(3, 3);
pub const E5: Square = Square::new(3, 4);
pub const F5: Square = Square::new(3, 5);
pub const G5: Square = Square::new(3, 6);
pub const H5: Square = Square::new(3, 7);
pub const A4: Square = Square::new(4, 0);
pub const B4: Square = Square::new(4, 1);
pub const C4: Square = Square::new(4, 2);
pub const D4: Square = Square::new(4, 3);
pub const E4: Square = Square::new(4, 4);
pub const F4: Square = Square::new(4, 5);
pub const G4: Square = Square::new(4, 6);
pub const H4: Square = Square::new(4, 7);
pub const A3: Square = Square::new(5, 0);
pub const B3: Square = Square::new(5, 1);
pub const C3: Square = Square::new(5, 2);
pub const D3: Square = Square::new(5, 3);
pub const E3: Square = Square::new(5, 4);
pub const F3: Square = Square::new(5, 5);
pub const G3: Square = Square::new(5, 6);
pub const H3: Square = Square::new(5, 7);
pub const A2: Square = Square::new(6, 0);
pub const B2: Square = Square::new(6, 1);
pub const C2: Square = Square::new(6, 2);
pub const D2: Square = Square::new(6, 3);
pub const E2: Square = Square::new(6, 4);
pub const F2: Square = Square::new(6, 5);
pub const G2: Square = Square::new(6, 6);
pub const H2: Square = Square::new(6, 7);
pub const A1: Square = Square::new(7, 0);
pub const B1: Square = Square::new(7, 1);
pub const C1: Square = Square::new(7, 2);
pub const D1: Square = Square::new(7, 3);
pub const E1: Square = Square::new(7, 4);
pub const F1: Square = Square::new(7, 5);
pub const G1: Square = Square::new(7, 6);
pub const H1: Square = Square::new(7, 7);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notation_convention() {
        assert_eq!(Square::new(0, 4).to_notation(), "e8");
        assert_eq!(Square::new(7, 0).to_notation(), "a1");
        assert_eq!(E2, Square::from_notation("e2").unwrap());
        assert_eq!(H1, Square::new(7, 7));
    }

    #[test]
    fn notation_roundtrip() {
        for sq in squares() {
            assert_eq!(sq, Square::from_notation(&sq.to_notation()).unwrap());
        }
    }

    #[test]
    fn bad_notation() {
        for bad in ["", "e", "e9", "i1", "e0", "E2", "e22", "2e", "é1"] {
            assert_eq!(
                Err(SquareParseError::InvalidNotation(bad.to_owned())),
                Square::from_notation(bad),
                "{:?} should not parse",
                bad
            );
        }
    }

    #[test]
    fn validity() {
        assert!(A8.is_valid());
        assert!(H1.is_valid());
        assert!(!Square::new(-1, 0).is_valid());
        assert!(!Square::new(0, 8).is_valid());
    }

    #[test]
    fn arithmetic() {
        assert_eq!(E4, E2 + Square::new(-2, 0));
        assert_eq!(Square::new(2, 0), E4 - E6);
        assert!(!(A1 + Square::new(1, 0)).is_valid());
    }

    #[test]
    fn iteration_order() {
        let all: Vec<_> = squares().collect();
        assert_eq!(64, all.len());
        assert_eq!(A8, all[0]);
        assert_eq!(H1, all[63]);
        assert_eq!(Some(H1), squares().next_back());
    }

    #[test]
    fn serializes_as_notation() {
        assert_eq!("\"c6\"", serde_json::to_string(&C6).unwrap());
        assert_eq!(C6, serde_json::from_str::<Square>("\"c6\"").unwrap());
        assert!(serde_json::from_str::<Square>("\"z9\"").is_err());
    }
}
