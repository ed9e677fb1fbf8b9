// Copyright 2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use serde::Serialize;
use structopt::StructOpt;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use chessrules::board::GameStatus;
use chessrules::core::Square;
use chessrules::Board;

const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Lists the legal moves in a position.
#[derive(Debug, StructOpt)]
struct Options {
    /// Only list moves of the piece on this square.
    #[structopt(short, long, parse(try_from_str = Square::from_notation))]
    square: Option<Square>,

    /// Print the moves and the game status as JSON.
    #[structopt(long)]
    json: bool,

    /// FEN representation of the position to analyze. Defaults to the starting position.
    #[structopt(name = "FEN")]
    fen: Option<String>,
}

#[derive(Serialize)]
struct Report {
    fen: String,
    status: GameStatus,
    moves: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_env("CHESSRULES_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let ops = Options::from_args();
    let board = Board::from_fen(ops.fen.as_deref().unwrap_or(START_FEN))?;
    let moves: Vec<String> = match ops.square {
        Some(from) => board
            .legal_moves(from)
            .into_iter()
            .map(|to| format!("{}{}", from, to))
            .collect(),
        None => board
            .all_legal_moves()
            .into_iter()
            .map(|(from, to)| format!("{}{}", from, to))
            .collect(),
    };

    if ops.json {
        let report = Report {
            fen: board.as_fen(),
            status: board.status(),
            moves,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for mov in moves {
            println!("{}", mov);
        }
    }

    Ok(())
}
