/*
 * Krill, a chess board representation and move generation library
 * Copyright (C) 2025 Jasper Shovelton
 *
 * Krill is free software: you can redistribute it and/or modify it under the
 * terms of the GNU General Public License as published by the Free Software
 * Foundation, either version 3 of the License, or (at your option) any later
 * version.
 *
 * Krill is distributed in the hope that it will be useful, but WITHOUT ANY
 * WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
 * FOR A PARTICULAR PURPOSE. See the GNU General Public License for more
 * details.
 *
 * You should have received a copy of the GNU General Public License along with
 * Krill. If not, see <https://www.gnu.org/licenses/>.
 */

#![cfg(test)]

use lazy_static::lazy_static;

use crate::{
    board::Board,
    defs::{Nums, PieceType, Side, Square},
};

/// A position along with the fields its FEN states explicitly.
#[derive(Clone, Copy)]
struct TestPosition<'a> {
    /// The FEN of the position.
    position: &'a str,
    /// How many pieces are on the board.
    piece_count: u32,
    /// The halfmove clock stated in the FEN.
    halfmoves: u16,
    /// The fullmove number stated in the FEN.
    fullmoves: u16,
}

lazy_static! {
    /// Positions used to check FEN parsing, FEN emission and the derived
    /// bitboards against each other.
    static ref TEST_POSITIONS: Vec<TestPosition<'static>> = vec![
        // startpos
        TestPosition::new("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", 32, 0, 1),
        // kiwipete: castling rights everywhere, interleaved pieces
        TestPosition::new(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            32, 0, 1,
        ),
        // sparse endgame
        TestPosition::new("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 3 54", 10, 3, 54),
        // en passant target set
        TestPosition::new(
            "r3k2r/2pb1ppp/2pp1q2/p7/1nP1B3/1P2P3/P2N1PPP/R2QK2R b KQkq c3 0 14",
            26, 0, 14,
        ),
        // promotion-heavy middlegame
        TestPosition::new(
            "r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1",
            31, 0, 1,
        ),
        // black to move with only kings
        TestPosition::new("4k3/8/8/8/8/8/8/4K3 b - - 12 61", 2, 12, 61),
    ];
}

impl<'a> TestPosition<'a> {
    /// Creates a new [`TestPosition`].
    const fn new(
        position: &'a str,
        piece_count: u32,
        halfmoves: u16,
        fullmoves: u16,
    ) -> Self {
        Self {
            position,
            piece_count,
            halfmoves,
            fullmoves,
        }
    }

    /// Parses the position, round-trips it through FEN emission and checks
    /// that the derived bitboards agree with the mailbox everywhere.
    fn run_test(&self) {
        let board: Board = self.position.parse().expect(self.position);

        assert_eq!(board.occupancies().count_ones(), self.piece_count);
        assert_eq!(board.halfmoves(), self.halfmoves);
        assert_eq!(board.fullmoves(), self.fullmoves);
        assert_eq!(board.fen(), self.position);

        // emitting the FEN back out and reparsing must give the same state
        let emitted = board.to_string();
        assert_eq!(emitted, self.position);
        let reparsed: Board = emitted.parse().expect("emitted FEN failed to parse");
        assert_eq!(board, reparsed);

        // the twelve color-piece bitboards are pairwise disjoint and their
        // union is exactly the set of occupied mailbox squares
        let mut union = crate::bitboard::Bitboard::EMPTY;
        for side in 0..Nums::SIDES {
            for piece_type in 0..Nums::PIECES {
                #[allow(clippy::cast_possible_truncation)]
                let bb = board.piece_bb(Side(side as u8), PieceType(piece_type as u8));
                assert!((union & bb).is_empty(), "overlapping bitboards");
                union |= bb;
            }
        }
        assert_eq!(union, board.occupancies());
        for square in 0..Nums::SQUARES {
            #[allow(clippy::cast_possible_truncation)]
            let square = Square(square as u8);
            let piece = board.piece_on(square);
            assert_eq!(
                union.contains(square),
                piece != crate::defs::Piece::NONE,
                "mailbox and bitboards disagree on {square}"
            );
            if piece != crate::defs::Piece::NONE {
                assert!(board
                    .piece_bb(piece.side(), piece.piece_type())
                    .contains(square));
            }
        }
    }
}

#[test]
fn test_positions() {
    for position in TEST_POSITIONS.iter() {
        position.run_test();
    }
}
