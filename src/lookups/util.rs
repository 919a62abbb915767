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

use arrayvec::ArrayVec;

use super::magic::MAX_BLOCKERS;
use crate::{
    bitboard::Bitboard,
    defs::{Direction, PieceType, Square},
};

/// Checks if `square` can step in the given direction without leaving the
/// board.
fn is_valid_step<const DIRECTION: i8>(square: Square) -> bool {
    #[allow(clippy::cast_sign_loss)]
    let dest = Square(square.inner().wrapping_add(DIRECTION as u8));
    // It checks if `dest` is still within the board, and if it is, it checks
    // if it hasn't wrapped round the side (because if it has wrapped, the
    // horizontal distance will be larger than 1).
    dest.is_valid() && square.horizontal_distance(dest) <= 1
}

/// Generates an attack from `square` in the given direction up to and
/// including the first encountered bit set in `blockers`. `blockers` is
/// assumed not to include `square` itself.
fn ray_attack<const DIRECTION: i8>(mut square: Square, blockers: Bitboard) -> Bitboard {
    let mut attacks = Bitboard::EMPTY;
    // stop when the current square is blocked or the next square would be
    // off the board
    while is_valid_step::<DIRECTION>(square) && !blockers.contains(square) {
        #[allow(clippy::cast_sign_loss)]
        {
            square = Square(square.inner().wrapping_add(DIRECTION as u8));
        }
        attacks |= Bitboard::from_square(square);
    }
    attacks
}

/// Generates the attack set for `PIECE` on `square` up to and including the
/// given blockers and/or the edge.
///
/// # Panics
///
/// Panics if `PIECE` is not the piece type of a bishop or rook.
#[must_use]
pub fn sliding_attacks<const PIECE: u8>(square: Square, blockers: Bitboard) -> Bitboard {
    let piece = PieceType(PIECE);
    let mut ray = Bitboard::EMPTY;
    if piece == PieceType::BISHOP {
        ray |= ray_attack::<{ Direction::NE.0 }>(square, blockers);
        ray |= ray_attack::<{ Direction::SE.0 }>(square, blockers);
        ray |= ray_attack::<{ Direction::SW.0 }>(square, blockers);
        ray |= ray_attack::<{ Direction::NW.0 }>(square, blockers);
    } else if piece == PieceType::ROOK {
        ray |= ray_attack::<{ Direction::N.0 }>(square, blockers);
        ray |= ray_attack::<{ Direction::E.0 }>(square, blockers);
        ray |= ray_attack::<{ Direction::S.0 }>(square, blockers);
        ray |= ray_attack::<{ Direction::W.0 }>(square, blockers);
    } else {
        panic!("sliding piece type not a bishop or rook");
    }
    ray
}

/// Returns the blocker mask of `PIECE` on `square`: the squares along its
/// rays whose occupancy can change where the rays stop.
///
/// A ray terminates at the edge of the board whether or not the edge square
/// is occupied, so the terminal edge squares are left out.
#[must_use]
pub fn blocker_mask<const PIECE: u8>(square: Square) -> Bitboard {
    sliding_attacks::<PIECE>(square, Bitboard::EMPTY) & !Bitboard::edges_without(square)
}

/// Maps `index` to one subset of the set bits of `mask`.
///
/// Bit `k` of `index` decides whether the `k`-th relevant square of the
/// mask, counted from the least significant bit, is occupied. Indexes in
/// `0..(1 << mask.count_ones())` enumerate every subset exactly once.
#[must_use]
pub fn occupancy_from_index(index: usize, mask: Bitboard) -> Bitboard {
    let mut occupancy = Bitboard::EMPTY;
    let mut mask = mask;
    let mut count = 0;
    while !mask.is_empty() {
        let square_bb = mask.pop_lsb();
        if index & (1 << count) != 0 {
            occupancy |= square_bb;
        }
        count += 1;
    }
    occupancy
}

/// Enumerates every blocker subset of the mask of `square`, in index order,
/// along with the attack set each subset produces.
pub fn gen_all_sliding_attacks<const PIECE: u8>(
    square: Square,
    occupancies: &mut ArrayVec<Bitboard, MAX_BLOCKERS>,
    attacks: &mut ArrayVec<Bitboard, MAX_BLOCKERS>,
) {
    let mask = blocker_mask::<PIECE>(square);
    let perms = 1_usize << mask.count_ones();

    occupancies.clear();
    attacks.clear();
    for index in 0..perms {
        let occupancy = occupancy_from_index(index, mask);
        occupancies.push(occupancy);
        attacks.push(sliding_attacks::<PIECE>(square, occupancy));
    }
}

#[cfg(test)]
mod tests {
    use super::{blocker_mask, occupancy_from_index, sliding_attacks};
    use crate::{
        bitboard::Bitboard,
        defs::{Nums, PieceType, Square},
    };

    /// Builds a bitboard out of a list of squares.
    fn bb_of(squares: &[Square]) -> Bitboard {
        let mut bb = Bitboard::EMPTY;
        for &square in squares {
            bb.set_bit(square);
        }
        bb
    }

    #[test]
    fn bishop_rays_stop_at_blockers() {
        let blockers = bb_of(&[Square::B2, Square::G7]);
        let attacks = sliding_attacks::<{ PieceType::BISHOP.0 }>(Square::D4, blockers);
        let expected = bb_of(&[
            // north-east, stopping on the blocker
            Square::E5,
            Square::F6,
            Square::G7,
            // north-west to the edge
            Square::C5,
            Square::B6,
            Square::A7,
            // south-east to the edge
            Square::E3,
            Square::F2,
            Square::G1,
            // south-west, stopping on the blocker
            Square::C3,
            Square::B2,
        ]);
        assert_eq!(attacks, expected);
        assert!(attacks.contains(Square::G7));
        assert!(attacks.contains(Square::B2));
        assert!(!attacks.contains(Square::H8));
        assert!(!attacks.contains(Square::A1));
    }

    #[test]
    fn rook_rays_reach_the_edge_when_unblocked() {
        let attacks = sliding_attacks::<{ PieceType::ROOK.0 }>(Square::A1, Bitboard::EMPTY);
        let expected = (Bitboard::file_bb(Square::A1.file_of())
            | Bitboard::rank_bb(Square::A1.rank_of()))
            ^ Bitboard::from_square(Square::A1);
        assert_eq!(attacks, expected);
        assert_eq!(attacks.count_ones(), 14);
    }

    #[test]
    fn blocker_masks_exclude_the_edges() {
        for square in 0..Nums::SQUARES {
            #[allow(clippy::cast_possible_truncation)]
            let square = Square(square as u8);
            let edges = Bitboard::edges_without(square);
            assert!(
                (blocker_mask::<{ PieceType::BISHOP.0 }>(square) & edges).is_empty(),
                "bishop mask for {square} touches an edge"
            );
            assert!(
                (blocker_mask::<{ PieceType::ROOK.0 }>(square) & edges).is_empty(),
                "rook mask for {square} touches an edge"
            );
        }
        // spot checks against well-known relevant-bit counts
        assert_eq!(blocker_mask::<{ PieceType::ROOK.0 }>(Square::A1).count_ones(), 12);
        assert_eq!(blocker_mask::<{ PieceType::ROOK.0 }>(Square::E4).count_ones(), 10);
        assert_eq!(blocker_mask::<{ PieceType::BISHOP.0 }>(Square::A1).count_ones(), 6);
        assert_eq!(blocker_mask::<{ PieceType::BISHOP.0 }>(Square::D4).count_ones(), 9);
    }

    #[test]
    fn occupancy_enumeration_is_a_bijection() {
        let mask = bb_of(&[Square::B3, Square::C4, Square::F1]);
        let perms = 1_usize << mask.count_ones();
        let mut seen = Vec::new();
        for index in 0..perms {
            let occupancy = occupancy_from_index(index, mask);
            assert_eq!(occupancy & !mask, Bitboard::EMPTY);
            assert!(!seen.contains(&occupancy), "index {index} repeats a subset");
            seen.push(occupancy);
        }
        assert_eq!(occupancy_from_index(0, mask), Bitboard::EMPTY);
        assert_eq!(occupancy_from_index(perms - 1, mask), mask);
    }

    // Carry-Rippler trick: `(blockers - 1) & mask` steps through every
    // subset of the mask. An independent enumeration, so it cross-checks
    // the index mapping: both must visit exactly the same subsets.
    #[test]
    fn carry_rippler_walk_visits_the_same_subsets() {
        let masks = [
            blocker_mask::<{ PieceType::BISHOP.0 }>(Square::D4),
            blocker_mask::<{ PieceType::ROOK.0 }>(Square::E4),
        ];
        for mask in masks {
            let perms = 1_usize << mask.count_ones();

            let mut indexed: Vec<u64> = (0..perms)
                .map(|index| occupancy_from_index(index, mask).inner())
                .collect();
            indexed.sort_unstable();

            let mut walked = Vec::with_capacity(perms);
            let mut blockers = mask;
            while !blockers.is_empty() {
                walked.push(blockers.inner());
                blockers = Bitboard(blockers.inner().wrapping_sub(1)) & mask;
            }
            walked.push(Bitboard::EMPTY.inner());
            walked.sort_unstable();

            assert_eq!(walked, indexed);
        }
    }
}
