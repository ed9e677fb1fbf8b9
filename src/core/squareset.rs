// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::core::{self, Square};
use std::fmt;
use std::iter::FromIterator;
use std::ops;

/// A set of squares on the chessboard. The implementation of SquareSet is designed to mirror
/// [`std::collections::HashSet`], but stores its members as a single 64-bit word indexed by row-major square
/// index. Only valid squares can be members; off-board squares are never contained.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct SquareSet(u64);

impl SquareSet {
    /// Creates a new, empty SquareSet.
    pub const fn empty() -> SquareSet {
        SquareSet(0)
    }

    /// Creates a new SquareSet with all squares present in the set.
    pub const fn all() -> SquareSet {
        SquareSet(0xFFFFFFFFFFFFFFFF)
    }

    /// Tests whether or not the given square is contained within this SquareSet.
    pub const fn contains(&self, square: Square) -> bool {
        square.is_valid() && self.0 & (1u64 << square.index()) != 0
    }

    pub fn insert(&mut self, square: Square) {
        debug_assert!(square.is_valid(), "inserting off-board square {}", square);
        if square.is_valid() {
            self.0 |= 1u64 << square.index();
        }
    }

    pub fn remove(&mut self, square: Square) {
        if square.is_valid() {
            self.0 &= !(1u64 << square.index());
        }
    }

    pub const fn len(&self) -> u32 {
        self.0.count_ones()
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub const fn and(self, other: SquareSet) -> SquareSet {
        SquareSet(self.0 & other.0)
    }

    pub const fn or(self, other: SquareSet) -> SquareSet {
        SquareSet(self.0 | other.0)
    }

    pub const fn not(self) -> SquareSet {
        SquareSet(!self.0)
    }

    pub fn iter(&self) -> SquareSetIterator {
        SquareSetIterator(self.0)
    }
}

impl ops::BitOr for SquareSet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.or(rhs)
    }
}

impl ops::BitOrAssign for SquareSet {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.or(rhs);
    }
}

impl ops::Not for SquareSet {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.not()
    }
}

impl ops::BitAnd for SquareSet {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.and(rhs)
    }
}

impl IntoIterator for SquareSet {
    type Item = Square;
    type IntoIter = SquareSetIterator;

    fn into_iter(self) -> Self::IntoIter {
        SquareSetIterator(self.0)
    }
}

impl FromIterator<Square> for SquareSet {
    fn from_iter<I: IntoIterator<Item = Square>>(iter: I) -> Self {
        let mut set = SquareSet::empty();
        for square in iter {
            set.insert(square);
        }
        set
    }
}

impl fmt::Display for SquareSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for sq in core::squares() {
            if self.contains(sq) {
                write!(f, " 1 ")?;
            } else {
                write!(f, " . ")?;
            }

            if sq.file() == 7 {
                writeln!(f, "| {}", 8 - sq.rank())?;
            }
        }

        writeln!(f, "{}", "---".repeat(8))?;
        for file in "abcdefgh".chars() {
            write!(f, " {} ", file)?;
        }

        writeln!(f)
    }
}

/// An iterator over squares stored in a [`SquareSet`], yielding them from a8 through h1.
pub struct SquareSetIterator(u64);

impl Iterator for SquareSetIterator {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        if self.0 == 0 {
            None
        } else {
            let next = self.0.trailing_zeros() as usize;
            self.0 &= self.0 - 1;
            Some(Square::from_index(next))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SquareSet;
    use crate::core::*;

    #[test]
    fn test_set_clear() {
        let mut set = SquareSet::empty();
        assert!(!set.contains(A1));
        set.insert(A1);
        assert!(set.contains(A1));
        set.remove(A1);
        assert!(!set.contains(A1));
    }

    #[test]
    fn count() {
        let mut set = SquareSet::empty();
        set.insert(A3);
        set.insert(A4);
        set.insert(A5);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn iter() {
        let set: SquareSet = [A3, A5, A4].iter().copied().collect();
        let squares: Vec<_> = set.into_iter().collect();
        assert_eq!(squares, vec![A5, A4, A3]);
    }

    #[test]
    fn off_board_never_contained() {
        let set = SquareSet::all();
        assert!(!set.contains(Square::new(8, 0)));
        assert!(!set.contains(Square::new(0, -1)));
        assert_eq!(64, set.len());
    }
}
