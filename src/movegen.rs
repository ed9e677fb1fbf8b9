// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Per-piece move generation.
//!
//! Two entry points read a [`Position`] without ever mutating it:
//!
//!  * [`pseudo_legal_moves`] yields the destinations a piece's movement pattern reaches given board occupancy,
//!    including castling, without asking whether the mover's king is left in check.
//!  * [`attacks`] yields the squares a piece threatens. It differs from the pseudo-legal set in that pawns attack
//!    both forward diagonals whether or not anything stands there, pawn pushes are not attacks, and castling is
//!    never an attack.
//!
//! Check detection is built on `attacks` only, so castling generation can ask whether the king's path is attacked
//! without recursing back into itself. Filtering down to fully legal moves happens in
//! [`Position::legal_moves`].
use crate::core::*;
use crate::Position;

const KNIGHT_OFFSETS: [Square; 8] = [
    Square::new(-2, -1),
    Square::new(-2, 1),
    Square::new(-1, -2),
    Square::new(-1, 2),
    Square::new(1, -2),
    Square::new(1, 2),
    Square::new(2, -1),
    Square::new(2, 1),
];

const KING_OFFSETS: [Square; 8] = [
    Square::new(-1, -1),
    Square::new(-1, 0),
    Square::new(-1, 1),
    Square::new(0, -1),
    Square::new(0, 1),
    Square::new(1, -1),
    Square::new(1, 0),
    Square::new(1, 1),
];

const DIAGONALS: [Square; 4] = [
    Square::new(-1, -1),
    Square::new(-1, 1),
    Square::new(1, -1),
    Square::new(1, 1),
];

const ORTHOGONALS: [Square; 4] = [
    Square::new(-1, 0),
    Square::new(1, 0),
    Square::new(0, -1),
    Square::new(0, 1),
];

/// Destinations reachable by the piece on `square`, ignoring the safety of its own king. Empty if `square` holds
/// no piece.
pub fn pseudo_legal_moves(pos: &Position, square: Square) -> SquareSet {
    let piece = match pos.piece_at(square) {
        Some(piece) => piece,
        None => return SquareSet::empty(),
    };

    match piece.kind {
        PieceKind::Pawn => pawn_moves(pos, piece),
        PieceKind::Knight => step_moves(pos, piece, &KNIGHT_OFFSETS),
        PieceKind::Bishop => sliding_moves(pos, piece, &DIAGONALS),
        PieceKind::Rook => sliding_moves(pos, piece, &ORTHOGONALS),
        PieceKind::Queen => {
            sliding_moves(pos, piece, &DIAGONALS) | sliding_moves(pos, piece, &ORTHOGONALS)
        }
        PieceKind::King => step_moves(pos, piece, &KING_OFFSETS) | castling_moves(pos, piece),
    }
}

/// Squares threatened by the piece on `square`. Empty if `square` holds no piece.
pub fn attacks(pos: &Position, square: Square) -> SquareSet {
    let piece = match pos.piece_at(square) {
        Some(piece) => piece,
        None => return SquareSet::empty(),
    };

    match piece.kind {
        PieceKind::Pawn => pawn_attacks(piece),
        PieceKind::King => step_moves(pos, piece, &KING_OFFSETS),
        _ => pseudo_legal_moves(pos, square),
    }
}

/// The two forward diagonals of a pawn, whether or not they are occupied.
fn pawn_attacks(pawn: Piece) -> SquareSet {
    let forward = pawn.color.pawn_direction();
    [-1, 1]
        .iter()
        .map(|&side| pawn.square + Square::new(forward, side))
        .filter(|target| target.is_valid())
        .collect()
}

fn pawn_moves(pos: &Position, pawn: Piece) -> SquareSet {
    let mut moves = SquareSet::empty();
    let forward = Square::new(pawn.color.pawn_direction(), 0);

    // Single and double pushes. The double push needs both squares clear and an unmoved pawn on its home row.
    let single = pawn.square + forward;
    if single.is_valid() && pos.is_empty(single) {
        moves.insert(single);
        let double = single + forward;
        if !pawn.has_moved
            && pawn.square.rank() == pawn.color.pawn_row()
            && double.is_valid()
            && pos.is_empty(double)
        {
            moves.insert(double);
        }
    }

    // Captures, including en-passant onto the empty square the enemy pawn skipped over.
    for target in pawn_attacks(pawn) {
        if pos.is_enemy(target, pawn.color) {
            moves.insert(target);
        } else if pos.en_passant_target() == Some(target)
            && target.rank() == pawn.color.en_passant_row()
        {
            moves.insert(target);
        }
    }

    moves
}

/// Single-step movement used by knights and kings.
fn step_moves(pos: &Position, piece: Piece, offsets: &[Square]) -> SquareSet {
    offsets
        .iter()
        .map(|&offset| piece.square + offset)
        .filter(|&target| target.is_valid() && !pos.is_friendly(target, piece.color))
        .collect()
}

fn sliding_moves(pos: &Position, piece: Piece, directions: &[Square]) -> SquareSet {
    let mut moves = SquareSet::empty();
    for &dir in directions {
        let mut target = piece.square + dir;
        while target.is_valid() {
            match pos.piece_at(target) {
                None => moves.insert(target),
                Some(blocker) => {
                    if blocker.color != piece.color {
                        moves.insert(target);
                    }
                    break;
                }
            }

            target = target + dir;
        }
    }

    moves
}

fn castling_moves(pos: &Position, king: Piece) -> SquareSet {
    let mut moves = SquareSet::empty();
    let home = Square::new(king.color.back_row(), 4);
    if king.has_moved || king.square != home {
        return moves;
    }

    let them = king.color.toggle();
    if pos.square_under_attack(king.square, them) {
        return moves;
    }

    // (rook file, direction of travel)
    for &(rook_file, dir) in &[(7i8, 1i8), (0, -1)] {
        let rook_square = Square::new(home.rank(), rook_file);
        let rook_ready = matches!(
            pos.piece_at(rook_square),
            Some(rook) if rook.kind == PieceKind::Rook && rook.color == king.color && !rook.has_moved
        );
        if !rook_ready {
            continue;
        }

        let mut between = home + Square::new(0, dir);
        let mut path_clear = true;
        while between != rook_square {
            if !pos.is_empty(between) {
                path_clear = false;
                break;
            }
            between = between + Square::new(0, dir);
        }

        if !path_clear {
            continue;
        }

        // The king may not pass through or land on an attacked square. Its start square was checked above.
        let passing = home + Square::new(0, dir);
        let destination = passing + Square::new(0, dir);
        if pos.square_under_attack(passing, them) || pos.square_under_attack(destination, them) {
            continue;
        }

        moves.insert(destination);
    }

    moves
}

#[cfg(test)]
mod tests {
    use super::{attacks, pseudo_legal_moves};
    use crate::core::*;
    use crate::Board;

    fn pseudo(fen: &'static str, square: Square) -> SquareSet {
        let board = Board::from_fen(fen).unwrap();
        pseudo_legal_moves(board.position(), square)
    }

    fn assert_moves_eq(fen: &'static str, square: Square, expected: &[Square]) {
        let moves = pseudo(fen, square);
        let expected: SquareSet = expected.iter().copied().collect();
        if moves != expected {
            println!("{}", Board::from_fen(fen).unwrap());
            println!("generated:\n{}", moves);
            println!("expected:\n{}", expected);
            panic!("move sets differ for piece on {}", square);
        }
    }

    fn assert_moves_contain(fen: &'static str, square: Square, expected: &[Square]) {
        let moves = pseudo(fen, square);
        for &sq in expected {
            assert!(moves.contains(sq), "{} was not generated:\n{}", sq, moves);
        }
    }

    fn assert_moves_exclude(fen: &'static str, square: Square, banned: &[Square]) {
        let moves = pseudo(fen, square);
        for &sq in banned {
            assert!(!moves.contains(sq), "banned move to {} generated:\n{}", sq, moves);
        }
    }

    #[test]
    fn empty_square_has_no_moves() {
        assert!(pseudo("4k3/8/8/8/8/8/8/4K3 w - - 0 1", D4).is_empty());
    }

    mod pawns {
        use super::*;

        #[test]
        fn white_pawn_single_push() {
            assert_moves_eq("4k3/8/8/8/5P2/8/8/4K3 w - - 0 1", F4, &[F5]);
        }

        #[test]
        fn black_pawn_moves_down_the_board() {
            assert_moves_eq("4k3/8/8/5p2/8/8/8/4K3 b - - 0 1", F5, &[F4]);
        }

        #[test]
        fn double_push_from_home_row() {
            assert_moves_eq("4k3/8/8/8/8/8/2P5/4K3 w - - 0 1", C2, &[C3, C4]);
            assert_moves_eq("4k3/2p5/8/8/8/8/8/4K3 b - - 0 1", C7, &[C6, C5]);
        }

        #[test]
        fn no_double_push_when_blocked() {
            assert_moves_eq("4k3/8/8/8/8/4p3/4P3/4K3 w - - 0 1", E2, &[]);
            assert_moves_eq("4k3/8/8/8/4p3/8/4P3/4K3 w - - 0 1", E2, &[E3]);
        }

        #[test]
        fn blocked_pawn() {
            assert_moves_eq("4k3/8/6p1/6P1/8/8/8/4K3 w - - 0 1", G5, &[]);
        }

        #[test]
        fn captures_enemies_only() {
            assert_moves_eq("4k3/8/8/8/8/3p1N2/4P3/4K3 w - - 0 1", E2, &[D3, E3, E4]);
        }

        #[test]
        fn en_passant_target() {
            assert_moves_contain("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1", E5, &[D6, E6]);
        }

        #[test]
        fn en_passant_only_for_the_capturing_side() {
            // the target was left by a white double push, so a white pawn next to it may not take it.
            assert_moves_exclude("4k3/8/8/8/1P6/8/P7/4K3 b - b3 0 1", A2, &[B3]);
        }

        #[test]
        fn reaches_last_row() {
            assert_moves_eq("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1", A7, &[A8, B8]);
        }
    }

    mod knights {
        use super::*;

        #[test]
        fn center() {
            assert_moves_eq(
                "4k3/8/8/8/3N4/8/8/4K3 w - - 0 1",
                D4,
                &[B3, B5, C2, C6, E2, E6, F3, F5],
            );
        }

        #[test]
        fn corner_with_friends_and_enemies() {
            assert_moves_eq("4k3/8/8/8/8/1p6/2P5/N3K3 w - - 0 1", A1, &[B3]);
        }
    }

    mod sliders {
        use super::*;

        #[test]
        fn bishop_smoke_test() {
            assert_moves_eq(
                "4k3/8/8/8/3B4/8/8/K7 w - - 0 1",
                D4,
                &[E5, F6, G7, H8, E3, F2, G1, C3, B2, C5, B6, A7],
            );
        }

        #[test]
        fn bishop_captures_stop_the_ray() {
            assert_moves_eq(
                "4k3/8/8/2p1p3/3B4/2p1P3/8/K7 w - - 0 1",
                D4,
                &[E5, C5, C3],
            );
        }

        #[test]
        fn rook_rays() {
            assert_moves_eq(
                "4k3/8/8/3p4/1P1R2n1/8/8/K2Q4 w - - 0 1",
                D4,
                &[D5, C4, E4, F4, G4, D3, D2],
            );
        }

        #[test]
        fn queen_is_rook_and_bishop() {
            let fen = "4k3/8/8/8/3Q4/8/8/7K w - - 0 1";
            assert_eq!(27, pseudo(fen, D4).len());
            assert_moves_contain(fen, D4, &[D8, A4, H4, D1, A7, H8, G1]);
            assert_moves_exclude(fen, D4, &[E6, C2]);
        }
    }

    mod kings {
        use super::*;

        #[test]
        fn steps() {
            assert_moves_eq(
                "4k3/8/8/8/8/8/3pP3/4K3 w - - 0 1",
                E1,
                &[D1, F1, D2, F2],
            );
        }

        #[test]
        fn castles_both_sides() {
            assert_moves_contain("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", E1, &[G1, C1]);
            assert_moves_contain("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1", E8, &[G8, C8]);
        }

        #[test]
        fn no_castle_when_blocked() {
            assert_moves_exclude("4k3/8/8/8/8/8/8/RN2K1NR w KQ - 0 1", E1, &[G1, C1]);
        }

        #[test]
        fn no_castle_after_rook_moved() {
            assert_moves_exclude("4k3/8/8/8/8/8/8/R3K2R w - - 0 1", E1, &[G1, C1]);
        }

        #[test]
        fn no_castle_without_rook() {
            let fen = "4k3/8/8/8/8/8/8/4K2R w KQ - 0 1";
            assert_moves_exclude(fen, E1, &[C1]);
            assert_moves_contain(fen, E1, &[G1]);
        }

        #[test]
        fn no_castle_with_other_piece_on_rook_square() {
            let enemy = "4k3/8/8/8/8/8/8/n3K2R w KQ - 0 1";
            assert_moves_exclude(enemy, E1, &[C1]);
            assert_moves_contain(enemy, E1, &[G1]);

            let friendly = "4k3/8/8/8/8/8/8/N3K2R w KQ - 0 1";
            assert_moves_exclude(friendly, E1, &[C1]);
            assert_moves_contain(friendly, E1, &[G1]);
        }

        #[test]
        fn no_castle_out_of_check() {
            assert_moves_exclude("4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1", E1, &[G1, C1]);
        }

        #[test]
        fn no_castle_through_check() {
            // f1 is covered by the rook, so kingside is out, queenside is fine.
            let fen = "5rk1/8/8/8/8/8/8/R3K2R w KQ - 0 1";
            assert_moves_exclude(fen, E1, &[G1]);
            assert_moves_contain(fen, E1, &[C1]);
        }

        #[test]
        fn no_castle_into_check() {
            assert_moves_exclude("6r1/k7/8/8/8/8/8/4K2R w K - 0 1", E1, &[G1]);
        }

        #[test]
        fn no_castle_through_pawn_attack() {
            // the pawn on e2 attacks f1 and d1 even though it could never move there.
            let fen = "4k3/8/8/8/8/8/4p3/R3K2R w KQ - 0 1";
            assert_moves_exclude(fen, E1, &[G1, C1]);
        }

        #[test]
        fn queenside_b_file_may_be_attacked() {
            // b1 lies between king and rook but the king never crosses it.
            assert_moves_contain("1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1", E1, &[C1]);
        }
    }

    mod attack_sets {
        use super::*;

        #[test]
        fn pawn_attacks_diagonals_not_pushes() {
            let board = Board::from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1").unwrap();
            let set = attacks(board.position(), E2);
            let expected: SquareSet = [D3, F3].iter().copied().collect();
            assert_eq!(expected, set);
        }

        #[test]
        fn king_attacks_exclude_castling() {
            let board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
            let set = attacks(board.position(), E1);
            assert!(!set.contains(G1));
            assert!(!set.contains(C1));
            assert!(set.contains(F1));
        }
    }
}
