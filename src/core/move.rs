// Copyright 2017-2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{PieceKind, PieceView, Square};

/// The shape of an applied move, as determined by the piece that moved and the squares it moved between.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveKind {
    Quiet,
    Capture,
    DoublePawnPush,
    EnPassant,
    KingsideCastle,
    QueensideCastle,
    Promotion,
    PromotionCapture,
}

/// An entry in a board's move history.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveRecord {
    pub from: Square,
    pub to: Square,
    /// The moving piece as it was before the move.
    pub piece: PieceView,
    pub kind: MoveKind,
    /// The captured piece, if any. For en-passant this is the pawn removed beside the destination.
    pub captured: Option<PieceView>,
}

impl MoveRecord {
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    pub fn is_castle(&self) -> bool {
        matches!(self.kind, MoveKind::KingsideCastle | MoveKind::QueensideCastle)
    }

    pub fn is_promotion(&self) -> bool {
        matches!(self.kind, MoveKind::Promotion | MoveKind::PromotionCapture)
    }

    /// Coordinate notation for this move, e.g. "e2e4" or "a7a8q".
    pub fn as_uci(&self) -> String {
        format!("{}", self)
    }
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if self.is_promotion() {
            write!(f, "{}", PieceKind::Queen)?;
        }

        Ok(())
    }
}
