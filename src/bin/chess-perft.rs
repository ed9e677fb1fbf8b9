// Copyright 2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use structopt::StructOpt;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use chessrules::Board;

const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Counts the leaf nodes of the legal move tree to a fixed depth.
#[derive(Debug, StructOpt)]
struct Options {
    /// The depth to search to.
    #[structopt(short, long)]
    depth: u32,

    /// FEN representation of the position to analyze. Defaults to the starting position.
    #[structopt(name = "FEN")]
    fen: Option<String>,

    /// If set, print the node count below each root move.
    #[structopt(long)]
    divide: bool,
}

pub fn perft(board: &Board, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    board
        .all_legal_moves()
        .into_iter()
        .map(|(from, to)| {
            let mut child = board.clone();
            if child.attempt_move(from, to) {
                perft(&child, depth - 1)
            } else {
                panic!("generated move {}{} was rejected\n{}", from, to, board);
            }
        })
        .sum()
}

fn main() -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_env("CHESSRULES_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let ops = Options::from_args();
    let board = Board::from_fen(ops.fen.as_deref().unwrap_or(START_FEN))?;
    if ops.divide && ops.depth > 0 {
        let mut total = 0;
        for (from, to) in board.all_legal_moves() {
            let mut child = board.clone();
            child.try_move(from, to)?;
            let count = perft(&child, ops.depth - 1);
            println!("{}{}: {}", from, to, count);
            total += count;
        }
        println!();
        println!("{}", total);
    } else {
        println!("{}", perft(&board, ops.depth));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::perft;
    use chessrules::Board;

    #[test]
    fn start_position() {
        let board = Board::new();
        assert_eq!(1, perft(&board, 0));
        assert_eq!(20, perft(&board, 1));
        assert_eq!(400, perft(&board, 2));
        assert_eq!(8902, perft(&board, 3));
    }

    #[test]
    fn kiwipete_shallow() {
        let board = Board::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .unwrap();
        assert_eq!(48, perft(&board, 1));
        assert_eq!(2039, perft(&board, 2));
    }
}
