// Copyright 2017-2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! `chessrules` is a chess rules engine: board state, per-piece move generation, legality filtering and
//! check/checkmate detection.
//!
//! The entry point for most users is [`Board`], which owns a game in progress and accepts moves for the side
//! to move. [`Position`] is the piece placement underneath it and is what [`movegen`] generates moves from.

pub mod board;
pub mod core;
pub mod movegen;
pub mod position;

pub use board::Board;
pub use position::Position;
