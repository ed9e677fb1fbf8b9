// Copyright 2017-2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{board::SetupError, core::*, movegen};

const BACK_ROW: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// The placement of every piece on the board together with the en-passant target square. This is everything move
/// generation reads, and it is a plain value: legality testing applies a move to a copy and never touches the
/// original.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PositionParts", into = "PositionParts")]
pub struct Position {
    /// Cells indexed `[rank][file]`. A cell holding a piece always holds one whose `square` names the cell.
    cells: [[Option<Piece>; 8]; 8],
    /// The square skipped by a pawn double push on the previous move, if that move was one.
    en_passant_target: Option<Square>,
}

/// Serialized form of a `Position`. Each piece carries its own square, so the grid is rebuilt from the pieces
/// and a stored square can never disagree with the cell holding it.
#[derive(Serialize, Deserialize)]
struct PositionParts {
    pieces: Vec<Piece>,
    en_passant_target: Option<Square>,
}

impl From<Position> for PositionParts {
    fn from(pos: Position) -> PositionParts {
        PositionParts {
            pieces: pos.all_pieces().collect(),
            en_passant_target: pos.en_passant_target,
        }
    }
}

impl TryFrom<PositionParts> for Position {
    type Error = SetupError;

    fn try_from(parts: PositionParts) -> Result<Position, SetupError> {
        Position::from_pieces(parts.pieces, parts.en_passant_target)
    }
}

impl Position {
    /// An empty board.
    pub fn new() -> Position {
        Position {
            cells: [[None; 8]; 8],
            en_passant_target: None,
        }
    }

    /// The standard initial setup.
    pub fn from_start_position() -> Position {
        let mut pos = Position::new();
        for color in colors() {
            for (file, &kind) in BACK_ROW.iter().enumerate() {
                let square = Square::new(color.back_row(), file as i8);
                pos.place(Piece::new(kind, color, square));
                let square = Square::new(color.pawn_row(), file as i8);
                pos.place(Piece::new(PieceKind::Pawn, color, square));
            }
        }

        pos
    }

    /// Places `pieces` on an empty board. Fails if a piece is off the board or shares a square with another.
    /// No other validation is done here; see [`crate::Board::from_parts`].
    pub fn from_pieces(
        pieces: impl IntoIterator<Item = Piece>,
        en_passant_target: Option<Square>,
    ) -> Result<Position, SetupError> {
        let mut pos = Position::new();
        for piece in pieces {
            let sq = piece.square;
            if !sq.is_valid() {
                return Err(SetupError::InvalidSquare {
                    rank: sq.rank(),
                    file: sq.file(),
                });
            }

            if pos.place(piece).is_some() {
                return Err(SetupError::SquareOccupied(sq));
            }
        }

        pos.en_passant_target = en_passant_target;
        Ok(pos)
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        if !square.is_valid() {
            return None;
        }

        self.cells[square.rank() as usize][square.file() as usize]
    }

    pub fn is_empty(&self, square: Square) -> bool {
        self.piece_at(square).is_none()
    }

    /// True if `square` holds a piece of the color opposing `color`.
    pub fn is_enemy(&self, square: Square, color: Color) -> bool {
        matches!(self.piece_at(square), Some(piece) if piece.color != color)
    }

    /// True if `square` holds a piece of `color`.
    pub fn is_friendly(&self, square: Square, color: Color) -> bool {
        matches!(self.piece_at(square), Some(piece) if piece.color == color)
    }

    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant_target
    }

    /// Every piece on the board, a8 through h1.
    pub fn all_pieces(&self) -> impl Iterator<Item = Piece> + '_ {
        self.cells.iter().flatten().filter_map(|cell| *cell)
    }

    pub fn pieces(&self, color: Color) -> impl Iterator<Item = Piece> + '_ {
        self.all_pieces().filter(move |piece| piece.color == color)
    }

    pub fn king(&self, color: Color) -> Option<Square> {
        self.pieces(color)
            .find(|piece| piece.kind == PieceKind::King)
            .map(|king| king.square)
    }

    /// Puts a piece on the cell named by its own `square`, returning whatever was there before.
    pub(crate) fn place(&mut self, piece: Piece) -> Option<Piece> {
        let sq = piece.square;
        assert!(sq.is_valid(), "placing piece off the board at {}", sq);
        self.cells[sq.rank() as usize][sq.file() as usize].replace(piece)
    }

    /// Removes and returns the piece on `square`.
    pub(crate) fn take(&mut self, square: Square) -> Option<Piece> {
        if !square.is_valid() {
            return None;
        }

        self.cells[square.rank() as usize][square.file() as usize].take()
    }
}

//
// Attack and check queries.
//

impl Position {
    /// True if any piece of color `by` attacks `square`.
    pub fn square_under_attack(&self, square: Square, by: Color) -> bool {
        self.pieces(by)
            .any(|piece| movegen::attacks(self, piece.square).contains(square))
    }

    /// True if the king of color `us` is attacked.
    ///
    /// Panics if `us` has no king on the board; every position reachable through the public API has one king of
    /// each color.
    pub fn is_check(&self, us: Color) -> bool {
        let king = self
            .king(us)
            .unwrap_or_else(|| panic!("no king present for {}", us));
        self.square_under_attack(king, us.toggle())
    }

    /// Legality test for moves that are already known to be pseudolegal. The move is applied to a copy of this
    /// position and the mover's king is tested for check; this position is left untouched.
    pub fn is_legal_given_pseudolegal(&self, from: Square, to: Square) -> bool {
        let side = match self.piece_at(from) {
            Some(piece) => piece.color,
            None => return false,
        };

        let mut scratch = *self;
        scratch.make_move(from, to);
        let legal = !scratch.is_check(side);
        trace!(%from, %to, legal, "speculative move");
        legal
    }

    /// Destinations of the piece on `square` that do not leave its own king in check.
    pub fn legal_moves(&self, square: Square) -> SquareSet {
        movegen::pseudo_legal_moves(self, square)
            .into_iter()
            .filter(|&to| self.is_legal_given_pseudolegal(square, to))
            .collect()
    }

    /// True if some piece of color `us` has a legal move.
    pub fn has_legal_move(&self, us: Color) -> bool {
        self.pieces(us)
            .any(|piece| !self.legal_moves(piece.square).is_empty())
    }
}

//
// Move application.
//

impl Position {
    /// Applies a move without checking it for legality, performing its side effects: the castling rook's
    /// relocation, removal of a pawn captured en passant, promotion to a queen, and the en-passant target update.
    /// Side to move is not tracked here.
    ///
    /// Panics if `from` holds no piece.
    pub fn make_move(&mut self, from: Square, to: Square) -> MoveRecord {
        let piece = self
            .take(from)
            .expect("invalid move: no piece at source square");
        let mut captured = self.take(to).map(|capture| capture.view());
        let mut kind = if captured.is_some() {
            MoveKind::Capture
        } else {
            MoveKind::Quiet
        };

        match piece.kind {
            PieceKind::King if (to.file() - from.file()).abs() == 2 => {
                // The rook lands on the square the king crossed.
                let (rook_file, castle) = if to.file() > from.file() {
                    (7, MoveKind::KingsideCastle)
                } else {
                    (0, MoveKind::QueensideCastle)
                };

                let rook = self
                    .take(Square::new(from.rank(), rook_file))
                    .expect("invalid move: castle without rook");
                let rook_target = Square::new(from.rank(), (from.file() + to.file()) / 2);
                self.place(rook.moved_to(rook_target));
                kind = castle;
            }
            PieceKind::Pawn
                if Some(to) == self.en_passant_target
                    && captured.is_none()
                    && to.file() != from.file() =>
            {
                // The captured pawn sits beside the mover's origin, not on the destination.
                let victim = Square::new(from.rank(), to.file());
                captured = self.take(victim).map(|capture| capture.view());
                kind = MoveKind::EnPassant;
            }
            _ => {}
        }

        let double_push = piece.kind == PieceKind::Pawn && (to.rank() - from.rank()).abs() == 2;
        self.en_passant_target = if double_push {
            kind = MoveKind::DoublePawnPush;
            Some(Square::new((from.rank() + to.rank()) / 2, from.file()))
        } else {
            None
        };

        let mut moved = piece.moved_to(to);
        if piece.kind == PieceKind::Pawn && (to.rank() == 0 || to.rank() == 7) {
            moved.kind = PieceKind::Queen;
            kind = if captured.is_some() {
                MoveKind::PromotionCapture
            } else {
                MoveKind::Promotion
            };
        }

        self.place(moved);
        MoveRecord {
            from,
            to,
            piece: piece.view(),
            kind,
            captured,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for sq in squares() {
            if let Some(piece) = self.piece_at(sq) {
                write!(f, " {} ", piece.view())?;
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

impl Default for Position {
    fn default() -> Self {
        Position::new()
    }
}
