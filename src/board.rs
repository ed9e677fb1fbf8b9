// Copyright 2017-2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::{
    convert::TryFrom,
    fmt::{self, Write},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, Level};

use crate::{core::*, Position};

/// A game of chess in progress: the piece placement, the side to move and every move made so far.
///
/// A `Board` is exclusively owned by whoever drives the game. Every query takes `&self` and is a pure function
/// of the board's state; only [`Board::try_move`] and [`Board::attempt_move`] mutate it, and they do so only when
/// the move is legal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BoardParts", into = "BoardParts")]
pub struct Board {
    position: Position,
    current_player: Color,
    move_history: Vec<MoveRecord>,
    /// Plies since the last capture or pawn move.
    halfmove_clock: u16,
    /// Starts at 1 and is incremented after every Black move.
    fullmove_number: u16,
}

/// Serialized form of a `Board`. Loading it runs the same checks as [`Board::from_parts`].
#[derive(Serialize, Deserialize)]
struct BoardParts {
    position: Position,
    current_player: Color,
    #[serde(default)]
    move_history: Vec<MoveRecord>,
    #[serde(default)]
    halfmove_clock: u16,
    #[serde(default = "first_move")]
    fullmove_number: u16,
}

fn first_move() -> u16 {
    1
}

impl From<Board> for BoardParts {
    fn from(board: Board) -> BoardParts {
        BoardParts {
            position: board.position,
            current_player: board.current_player,
            move_history: board.move_history,
            halfmove_clock: board.halfmove_clock,
            fullmove_number: board.fullmove_number,
        }
    }
}

impl TryFrom<BoardParts> for Board {
    type Error = SetupError;

    fn try_from(parts: BoardParts) -> Result<Board, SetupError> {
        let mut board = Board::from_position(parts.position, parts.current_player)?;
        board.move_history = parts.move_history;
        board.halfmove_clock = parts.halfmove_clock;
        board.fullmove_number = parts.fullmove_number;
        Ok(board)
    }
}

/// Reasons a move attempt was rejected. A rejected attempt leaves the board unmodified.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("no piece on {0}")]
    EmptySquare(Square),
    #[error("piece on {square} belongs to {color}")]
    WrongColor { square: Square, color: Color },
    #[error("{from}{to} is not a legal move")]
    IllegalDestination { from: Square, to: Square },
}

/// Reasons a set of pieces does not form a playable board.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("piece placed off the board at ({rank}, {file})")]
    InvalidSquare { rank: i8, file: i8 },
    #[error("more than one piece on {0}")]
    SquareOccupied(Square),
    #[error("no {0} king present")]
    NoKingPresent(Color),
    #[error("more than one {0} king present")]
    DuplicateKing(Color),
    #[error("invalid en-passant target {0}")]
    InvalidEnPassant(Square),
    #[error("{0} is in check but it is not their move")]
    OpponentInCheck(Color),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    Ongoing,
    Check,
    Checkmate,
    Stalemate,
}

impl Board {
    /// A board with the standard initial setup, White to move.
    pub fn new() -> Board {
        Board {
            position: Position::from_start_position(),
            current_player: Color::White,
            move_history: vec![],
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Reconstructs a board from its pieces (with their squares and moved flags), the side to move and the
    /// en-passant target. The move history of the result is empty.
    pub fn from_parts(
        pieces: impl IntoIterator<Item = Piece>,
        current_player: Color,
        en_passant_target: Option<Square>,
    ) -> Result<Board, SetupError> {
        let position = Position::from_pieces(pieces, en_passant_target)?;
        Board::from_position(position, current_player)
    }

    fn from_position(position: Position, current_player: Color) -> Result<Board, SetupError> {
        for color in colors() {
            match position
                .pieces(color)
                .filter(|piece| piece.kind == PieceKind::King)
                .count()
            {
                0 => return Err(SetupError::NoKingPresent(color)),
                1 => {}
                _ => return Err(SetupError::DuplicateKing(color)),
            }
        }

        if let Some(target) = position.en_passant_target() {
            // The target must sit behind an enemy pawn that could just have double-pushed.
            let them = current_player.toggle();
            let pusher = target + Square::new(them.pawn_direction(), 0);
            let pusher_ok = matches!(
                position.piece_at(pusher),
                Some(pawn) if pawn.kind == PieceKind::Pawn && pawn.color == them
            );
            if !target.is_valid()
                || target.rank() != current_player.en_passant_row()
                || !position.is_empty(target)
                || !pusher_ok
            {
                return Err(SetupError::InvalidEnPassant(target));
            }
        }

        if position.is_check(current_player.toggle()) {
            return Err(SetupError::OpponentInCheck(current_player.toggle()));
        }

        Ok(Board {
            position,
            current_player,
            move_history: vec![],
            halfmove_clock: 0,
            fullmove_number: 1,
        })
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn current_player(&self) -> Color {
        self.current_player
    }

    pub fn move_history(&self) -> &[MoveRecord] {
        &self.move_history
    }

    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    pub fn en_passant_target(&self) -> Option<Square> {
        self.position.en_passant_target()
    }

    pub fn piece_at(&self, square: Square) -> Option<PieceView> {
        self.position.piece_at(square).map(|piece| piece.view())
    }

    /// Every piece on the board, with its square and moved flag. Feeding these back into [`Board::from_parts`]
    /// with the side to move and en-passant target reproduces this board's legal moves exactly.
    pub fn pieces(&self) -> impl Iterator<Item = Piece> + '_ {
        self.position.all_pieces()
    }

    /// Legal destinations of the piece on `square`, whichever side it belongs to.
    pub fn legal_moves(&self, square: Square) -> SquareSet {
        self.position.legal_moves(square)
    }

    /// All legal moves of the side to move as (from, to) pairs.
    pub fn all_legal_moves(&self) -> Vec<(Square, Square)> {
        self.position
            .pieces(self.current_player)
            .flat_map(|piece| {
                self.legal_moves(piece.square)
                    .into_iter()
                    .map(move |to| (piece.square, to))
            })
            .collect()
    }

    /// True if any piece of color `by` attacks `square`.
    pub fn square_under_attack(&self, square: Square, by: Color) -> bool {
        self.position.square_under_attack(square, by)
    }

    /// True if the side to move is in check.
    pub fn is_check(&self) -> bool {
        self.position.is_check(self.current_player)
    }

    /// True if the side to move is in check and has no legal move.
    pub fn is_checkmate(&self) -> bool {
        self.is_check() && !self.position.has_legal_move(self.current_player)
    }

    /// True if the side to move is not in check and has no legal move.
    pub fn is_stalemate(&self) -> bool {
        !self.is_check() && !self.position.has_legal_move(self.current_player)
    }

    pub fn status(&self) -> GameStatus {
        let check = self.is_check();
        let can_move = self.position.has_legal_move(self.current_player);
        match (check, can_move) {
            (true, false) => GameStatus::Checkmate,
            (true, true) => GameStatus::Check,
            (false, false) => GameStatus::Stalemate,
            (false, true) => GameStatus::Ongoing,
        }
    }

    /// Castling rights implied by the moved flags of the kings and rooks. A right being present does not mean
    /// castling is legal right now; the path may be blocked or attacked.
    pub fn castle_status(&self) -> CastleStatus {
        let mut status = CastleStatus::NONE;
        for color in colors() {
            let row = color.back_row();
            let unmoved = |file: i8, kind: PieceKind| {
                matches!(
                    self.position.piece_at(Square::new(row, file)),
                    Some(piece) if piece.kind == kind && piece.color == color && !piece.has_moved
                )
            };

            if !unmoved(4, PieceKind::King) {
                continue;
            }
            if unmoved(7, PieceKind::Rook) {
                status |= CastleStatus::kingside(color);
            }
            if unmoved(0, PieceKind::Rook) {
                status |= CastleStatus::queenside(color);
            }
        }

        status
    }

    /// Applies a move for the side to move if it is legal, returning its history record.
    pub fn try_move(&mut self, from: Square, to: Square) -> Result<MoveRecord, MoveError> {
        let result = self.validate_move(from, to);
        if let Err(err) = result {
            debug!(%from, %to, %err, "move rejected");
            return Err(err);
        }

        let record = self.position.make_move(from, to);
        self.move_history.push(record);
        if record.piece.kind == PieceKind::Pawn || record.is_capture() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }
        if self.current_player == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }

        self.current_player = self.current_player.toggle();
        debug!(mov = %record, kind = ?record.kind, "move applied");
        if !tracing::enabled!(Level::INFO) {
            return Ok(record);
        }

        match self.status() {
            GameStatus::Check => info!(mov = %record, side = %self.current_player, "check"),
            GameStatus::Checkmate => {
                info!(mov = %record, side = %self.current_player, "checkmate")
            }
            GameStatus::Stalemate => {
                info!(mov = %record, side = %self.current_player, "stalemate")
            }
            GameStatus::Ongoing => {}
        }

        Ok(record)
    }

    /// Applies a move for the side to move if it is legal. Returns false, leaving the board untouched, otherwise.
    pub fn attempt_move(&mut self, from: Square, to: Square) -> bool {
        self.try_move(from, to).is_ok()
    }

    fn validate_move(&self, from: Square, to: Square) -> Result<(), MoveError> {
        let piece = self
            .position
            .piece_at(from)
            .ok_or(MoveError::EmptySquare(from))?;
        if piece.color != self.current_player {
            return Err(MoveError::WrongColor {
                square: from,
                color: piece.color,
            });
        }

        if !self.legal_moves(from).contains(to) {
            return Err(MoveError::IllegalDestination { from, to });
        }

        Ok(())
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.position)?;
        writeln!(f, "{} to move", self.current_player)
    }
}

//
// FEN parsing and generation.
//
// FEN carries placement, side to move, castling rights and the en-passant square. Moved flags are derived from
// it: pawns off their home row have moved, and a king or rook has moved unless a castling right vouches for it.
// The halfmove and fullmove clocks default to 0 and 1 when absent.
//

/// Possible errors that can arise when parsing a FEN string into a `Board`.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum FenParseError {
    #[error("unexpected EOF while reading")]
    UnexpectedEnd,
    #[error("wrong number of ranks")]
    WrongRankCount,
    #[error("invalid digit")]
    InvalidDigit,
    #[error("file does not sum to 8")]
    FileDoesNotSumToEight,
    #[error("unknown piece: {0}")]
    UnknownPiece(char),
    #[error("invalid side to move")]
    InvalidSideToMove,
    #[error("invalid castle")]
    InvalidCastle,
    #[error("invalid en-passant")]
    InvalidEnPassant,
    #[error("invalid halfmove")]
    InvalidHalfmove,
    #[error("invalid fullmove")]
    InvalidFullmove,
    #[error("unexpected trailing input")]
    TrailingInput,
    #[error(transparent)]
    Setup(#[from] SetupError),
}

impl Board {
    /// Constructs a new board from a FEN representation of a position.
    pub fn from_fen(fen: impl AsRef<str>) -> Result<Board, FenParseError> {
        let mut fields = fen.as_ref().split_whitespace();
        let placement = fields.next().ok_or(FenParseError::UnexpectedEnd)?;
        let side = fields.next().ok_or(FenParseError::UnexpectedEnd)?;
        let castle = fields.next().ok_or(FenParseError::UnexpectedEnd)?;
        let en_passant = fields.next().ok_or(FenParseError::UnexpectedEnd)?;
        let halfmove_clock = match fields.next() {
            Some(halfmove) => halfmove
                .parse::<u16>()
                .map_err(|_| FenParseError::InvalidHalfmove)?,
            None => 0,
        };
        let fullmove_number = match fields.next() {
            Some(fullmove) => fullmove
                .parse::<u16>()
                .map_err(|_| FenParseError::InvalidFullmove)?,
            None => 1,
        };
        if fields.next().is_some() {
            return Err(FenParseError::TrailingInput);
        }

        let current_player = match side {
            "w" => Color::White,
            "b" => Color::Black,
            _ => return Err(FenParseError::InvalidSideToMove),
        };

        let mut castle_status = CastleStatus::NONE;
        if castle != "-" {
            for c in castle.chars() {
                castle_status |= match c {
                    'K' => CastleStatus::WHITE_KINGSIDE,
                    'Q' => CastleStatus::WHITE_QUEENSIDE,
                    'k' => CastleStatus::BLACK_KINGSIDE,
                    'q' => CastleStatus::BLACK_QUEENSIDE,
                    _ => return Err(FenParseError::InvalidCastle),
                };
            }
        }

        let en_passant_target = match en_passant {
            "-" => None,
            ep => Some(Square::from_notation(ep).map_err(|_| FenParseError::InvalidEnPassant)?),
        };

        let mut pieces = vec![];
        let ranks: Vec<_> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenParseError::WrongRankCount);
        }

        for (rank, row) in ranks.iter().enumerate() {
            let rank = rank as i8;
            let mut file = 0i8;
            for c in row.chars() {
                // digits 1 through 8 indicate empty squares.
                if let Some(skip) = c.to_digit(10) {
                    if !(1..=8).contains(&skip) {
                        return Err(FenParseError::InvalidDigit);
                    }

                    file += skip as i8;
                } else {
                    let view =
                        PieceView::try_from(c).map_err(|_| FenParseError::UnknownPiece(c))?;
                    if file >= 8 {
                        return Err(FenParseError::FileDoesNotSumToEight);
                    }

                    let square = Square::new(rank, file);
                    let piece = Piece::new(view.kind, view.color, square);
                    pieces.push(piece.moved(derived_moved_flag(piece, castle_status)));
                    file += 1;
                }

                if file > 8 {
                    return Err(FenParseError::FileDoesNotSumToEight);
                }
            }

            if file != 8 {
                return Err(FenParseError::FileDoesNotSumToEight);
            }
        }

        let mut board = Board::from_parts(pieces, current_player, en_passant_target)?;
        board.halfmove_clock = halfmove_clock;
        board.fullmove_number = fullmove_number;
        Ok(board)
    }

    /// FEN for this board, including both clocks.
    pub fn as_fen(&self) -> String {
        let mut buf = String::new();
        for rank in 0..8 {
            let mut empty_squares = 0;
            for file in 0..8 {
                if let Some(piece) = self.piece_at(Square::new(rank, file)) {
                    if empty_squares != 0 {
                        write!(&mut buf, "{}", empty_squares).unwrap();
                    }
                    write!(&mut buf, "{}", piece).unwrap();
                    empty_squares = 0;
                } else {
                    empty_squares += 1;
                }
            }

            if empty_squares != 0 {
                write!(&mut buf, "{}", empty_squares).unwrap();
            }

            if rank != 7 {
                buf.push('/');
            }
        }

        buf.push(' ');
        match self.current_player {
            Color::White => buf.push('w'),
            Color::Black => buf.push('b'),
        }

        buf.push(' ');
        let castle_status = self.castle_status();
        if castle_status.is_empty() {
            buf.push('-');
        }
        for (flag, c) in [
            (CastleStatus::WHITE_KINGSIDE, 'K'),
            (CastleStatus::WHITE_QUEENSIDE, 'Q'),
            (CastleStatus::BLACK_KINGSIDE, 'k'),
            (CastleStatus::BLACK_QUEENSIDE, 'q'),
        ] {
            if castle_status.contains(flag) {
                buf.push(c);
            }
        }

        buf.push(' ');
        if let Some(ep_square) = self.en_passant_target() {
            write!(&mut buf, "{}", ep_square).unwrap();
        } else {
            buf.push('-');
        }

        write!(
            &mut buf,
            " {} {}",
            self.halfmove_clock, self.fullmove_number
        )
        .unwrap();
        buf
    }
}

fn derived_moved_flag(piece: Piece, castle_status: CastleStatus) -> bool {
    let color = piece.color;
    let home = piece.square.rank() == color.back_row();
    match piece.kind {
        PieceKind::Pawn => piece.square.rank() != color.pawn_row(),
        PieceKind::King => {
            !(home
                && piece.square.file() == 4
                && castle_status
                    .intersects(CastleStatus::kingside(color) | CastleStatus::queenside(color)))
        }
        PieceKind::Rook => match piece.square.file() {
            7 if home => !castle_status.contains(CastleStatus::kingside(color)),
            0 if home => !castle_status.contains(CastleStatus::queenside(color)),
            _ => true,
        },
        _ => false,
    }
}
