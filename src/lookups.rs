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
use lazy_static::lazy_static;
use oorandom::Rand64;

use self::magic::{find_magic, Magic, BISHOP_MAGICS, MAGIC_SEED, MAX_BLOCKERS, ROOK_MAGICS};
use self::util::gen_all_sliding_attacks;

use crate::{
    bitboard::Bitboard,
    defs::{Nums, PieceType, Side, Square},
};

/// Items related to magic bitboards.
pub mod magic;
/// Useful functions for the lookup tables specifically.
pub mod util;

/// The number of bitboards required to store all bishop attacks, where each
/// element corresponds to one permutation of blockers.
///
/// Some elements are duplicates, as different blockers can produce the same
/// attacks. Repeated once per quadrant: `2.pow(6)` blocker permutations for
/// the corner, `2.pow(5)` for each non-corner edge and each square adjacent
/// to an edge, `2.pow(7)` for the squares adjacent or diagonal to a corner
/// and `2.pow(9)` for the centre.
pub const BISHOP_SIZE: usize = 5_248;

/// The number of bitboards required to store all rook attacks, where each
/// element corresponds to one permutation of blockers.
///
/// Some elements are duplicates, as different blockers can produce the same
/// attacks. There are `2.pow(12)` blocker permutations for each corner,
/// `2.pow(11)` for each non-corner edge and `2.pow(10)` for all others.
pub const ROOK_SIZE: usize = 102_400;

/// Contains lookup tables for each piece.
///
/// Built once behind [`struct@ATTACK_LOOKUPS`] and never mutated afterwards,
/// so shared reads from any number of threads are fine.
pub struct Lookups {
    /// Destination squares of a pawn on each square, for each side.
    pawn_attacks: [[Bitboard; Nums::SQUARES]; Nums::SIDES],
    /// Destination squares of a knight on each square.
    knight_attacks: [Bitboard; Nums::SQUARES],
    /// Destination squares of a king on each square.
    king_attacks: [Bitboard; Nums::SQUARES],
    /// The [`Magic`] of each square, for the bishop.
    bishop_magics: [Magic; Nums::SQUARES],
    /// The [`Magic`] of each square, for the rook.
    rook_magics: [Magic; Nums::SQUARES],
    /// Bishop attack sets for every blocker permutation of every square,
    /// indexed through [`Magic::get_table_index`].
    bishop_magic_table: Vec<Bitboard>,
    /// Rook attack sets for every blocker permutation of every square,
    /// indexed through [`Magic::get_table_index`].
    rook_magic_table: Vec<Bitboard>,
}

lazy_static! {
    /// The attack lookup tables used at runtime.
    pub static ref ATTACK_LOOKUPS: Lookups = Lookups::new();
}

impl Lookups {
    /// Builds all tables: the leaper attacks from shift compositions and the
    /// slider attacks through the magics.
    fn new() -> Self {
        let mut lookups = Self {
            pawn_attacks: [[Bitboard::EMPTY; Nums::SQUARES]; Nums::SIDES],
            knight_attacks: [Bitboard::EMPTY; Nums::SQUARES],
            king_attacks: [Bitboard::EMPTY; Nums::SQUARES],
            bishop_magics: [Magic::default(); Nums::SQUARES],
            rook_magics: [Magic::default(); Nums::SQUARES],
            bishop_magic_table: vec![Bitboard::EMPTY; BISHOP_SIZE],
            rook_magic_table: vec![Bitboard::EMPTY; ROOK_SIZE],
        };
        lookups.init_pawn_attacks();
        lookups.init_knight_attacks();
        lookups.init_king_attacks();
        lookups.init_magics();
        lookups
    }

    /// Forces construction of [`struct@ATTACK_LOOKUPS`].
    ///
    /// Lookups are built on first use anyway; this just moves the one-off
    /// cost to a point of the caller's choosing.
    #[inline]
    pub fn init() {
        lazy_static::initialize(&ATTACK_LOOKUPS);
    }

    /// Initialises the pawn attack lookup table.
    fn init_pawn_attacks(&mut self) {
        for (side, table) in self.pawn_attacks.iter_mut().enumerate() {
            for (square, bb) in table.iter_mut().enumerate() {
                #[allow(clippy::cast_possible_truncation)]
                let pawn = Bitboard::from_square(Square(square as u8));
                *bb = if side == Side::WHITE.to_index() {
                    pawn.north_east() | pawn.north_west()
                } else {
                    pawn.south_east() | pawn.south_west()
                };
            }
        }
    }

    /// Initialises the knight attack lookup table.
    fn init_knight_attacks(&mut self) {
        for (square, bb) in self.knight_attacks.iter_mut().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            let knight = Bitboard::from_square(Square(square as u8));
            *bb = knight.north_north_east()
                | knight.north_north_west()
                | knight.north_east_east()
                | knight.north_west_west()
                | knight.south_south_east()
                | knight.south_south_west()
                | knight.south_east_east()
                | knight.south_west_west();
        }
    }

    /// Initialises the king attack lookup table.
    ///
    /// Castling destinations are not included; castling is not an attack.
    fn init_king_attacks(&mut self) {
        for (square, bb) in self.king_attacks.iter_mut().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            let king = Bitboard::from_square(Square(square as u8));
            *bb = king.north()
                | king.south()
                | king.east()
                | king.west()
                | king.north_east()
                | king.north_west()
                | king.south_east()
                | king.south_west();
        }
    }

    /// Initialises a [`Magic`] for each square and fills the slider attack
    /// tables.
    ///
    /// The compiled-in constants are verified while the tables fill; any
    /// constant that hashes two subsets with different attack sets into one
    /// slot is replaced by a freshly searched number. The search generator
    /// is seeded with a fixed constant so construction stays reproducible.
    ///
    /// # Panics
    ///
    /// Panics if a compiled-in magic fails and the search exhausts its retry
    /// bound, which leaves no way to build a correct table.
    fn init_magics(&mut self) {
        let mut rand_gen = Rand64::new(MAGIC_SEED);
        let mut b_offset = 0;
        let mut r_offset = 0;

        for square in 0..Nums::SQUARES {
            #[allow(clippy::cast_possible_truncation)]
            let square = Square(square as u8);

            let (b_magic, b_perms) = build_square_magic::<{ PieceType::BISHOP.0 }>(
                square,
                b_offset,
                BISHOP_MAGICS[square.to_index()],
                &mut self.bishop_magic_table,
                &mut rand_gen,
            );
            self.bishop_magics[square.to_index()] = b_magic;
            b_offset += b_perms;

            let (r_magic, r_perms) = build_square_magic::<{ PieceType::ROOK.0 }>(
                square,
                r_offset,
                ROOK_MAGICS[square.to_index()],
                &mut self.rook_magic_table,
                &mut rand_gen,
            );
            self.rook_magics[square.to_index()] = r_magic;
            r_offset += r_perms;
        }

        debug_assert_eq!(b_offset, BISHOP_SIZE);
        debug_assert_eq!(r_offset, ROOK_SIZE);
    }

    /// Finds the pawn attacks of `side` from `square`.
    #[inline]
    #[must_use]
    pub fn pawn_attacks(&self, side: Side, square: Square) -> Bitboard {
        self.pawn_attacks[side.to_index()][square.to_index()]
    }

    /// Finds the knight attacks from `square`.
    #[inline]
    #[must_use]
    pub fn knight_attacks(&self, square: Square) -> Bitboard {
        self.knight_attacks[square.to_index()]
    }

    /// Finds the king attacks from `square`.
    #[inline]
    #[must_use]
    pub fn king_attacks(&self, square: Square) -> Bitboard {
        self.king_attacks[square.to_index()]
    }

    /// Finds the bishop attacks from `square` with the given blockers.
    #[inline]
    #[must_use]
    pub fn bishop_attacks(&self, square: Square, blockers: Bitboard) -> Bitboard {
        self.bishop_magic_table[self.bishop_magics[square.to_index()].get_table_index(blockers)]
    }

    /// Finds the rook attacks from `square` with the given blockers.
    #[inline]
    #[must_use]
    pub fn rook_attacks(&self, square: Square, blockers: Bitboard) -> Bitboard {
        self.rook_magic_table[self.rook_magics[square.to_index()].get_table_index(blockers)]
    }

    /// Finds the queen attacks from `square` with the given blockers.
    #[inline]
    #[must_use]
    pub fn queen_attacks(&self, square: Square, blockers: Bitboard) -> Bitboard {
        self.bishop_attacks(square, blockers) | self.rook_attacks(square, blockers)
    }
}

/// Builds the [`Magic`] of one square and fills its slice of the flat attack
/// table, trying `compiled_magic` first and searching a replacement if it
/// fails.
///
/// Returns the entry and the number of blocker permutations it covers.
fn build_square_magic<const PIECE: u8>(
    square: Square,
    offset: usize,
    compiled_magic: u64,
    table: &mut [Bitboard],
    rand_gen: &mut Rand64,
) -> (Magic, usize) {
    let mask = util::blocker_mask::<PIECE>(square);
    let shift = 64 - mask.count_ones();
    let mut occupancies = ArrayVec::<Bitboard, MAX_BLOCKERS>::new();
    let mut attacks = ArrayVec::<Bitboard, MAX_BLOCKERS>::new();
    gen_all_sliding_attacks::<PIECE>(square, &mut occupancies, &mut attacks);
    let perms = occupancies.len();

    if compiled_magic != 0 {
        let magic = Magic::new(compiled_magic, mask, offset, shift);
        if fill_attack_table(table, &magic, &occupancies, &attacks) {
            return (magic, perms);
        }
    }

    let found = find_magic(mask, &occupancies, &attacks, rand_gen)
        .unwrap_or_else(|| panic!("magic search exhausted for square {square}"));
    let magic = Magic::new(found, mask, offset, shift);
    // a candidate that just survived verification cannot fail to fill
    let filled = fill_attack_table(table, &magic, &occupancies, &attacks);
    assert!(filled, "verified magic collided for square {square}");
    (magic, perms)
}

/// Writes the attack set of every blocker subset into the slots `magic`
/// hashes them to.
///
/// Returns `false` on a destructive collision: two subsets sharing a slot
/// with different attack sets. A shared slot with the same attack set is
/// fine. The slice is cleared first, so a failed fill can simply be retried
/// with another magic.
fn fill_attack_table(
    table: &mut [Bitboard],
    magic: &Magic,
    occupancies: &[Bitboard],
    attacks: &[Bitboard],
) -> bool {
    let base = magic.offset();
    for slot in &mut table[base..base + occupancies.len()] {
        *slot = Bitboard::EMPTY;
    }

    for (occupancy, attack) in occupancies.iter().zip(attacks) {
        let slot = &mut table[magic.get_table_index(*occupancy)];
        // an attack set is never empty, so an empty slot is an unwritten one
        if slot.is_empty() {
            *slot = *attack;
        } else if *slot != *attack {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::{util::gen_all_sliding_attacks, ATTACK_LOOKUPS};
    use crate::{
        bitboard::Bitboard,
        defs::{Nums, PieceType, Side, Square},
    };

    #[test]
    fn king_attacks_from_e4() {
        // D3, D4, D5, E3, E5, F3, F4 and F5
        let mut expected = Bitboard::EMPTY;
        for square in [
            Square::D3,
            Square::D4,
            Square::D5,
            Square::E3,
            Square::E5,
            Square::F3,
            Square::F4,
            Square::F5,
        ] {
            expected.set_bit(square);
        }
        assert_eq!(expected, Bitboard(0x0000_0038_2838_0000));
        assert_eq!(ATTACK_LOOKUPS.king_attacks(Square::E4), expected);
    }

    #[test]
    fn king_attack_counts() {
        for square in 0..Nums::SQUARES {
            #[allow(clippy::cast_possible_truncation)]
            let square = Square(square as u8);
            let count = ATTACK_LOOKUPS.king_attacks(square).count_ones();
            assert!(
                count == 3 || count == 5 || count == 8,
                "king on {square} attacks {count} squares"
            );
        }
        assert_eq!(ATTACK_LOOKUPS.king_attacks(Square::A1).count_ones(), 3);
        assert_eq!(ATTACK_LOOKUPS.king_attacks(Square::E1).count_ones(), 5);
        assert_eq!(ATTACK_LOOKUPS.king_attacks(Square::D5).count_ones(), 8);
    }

    #[test]
    fn knight_attacks_from_a1() {
        assert_eq!(
            ATTACK_LOOKUPS.knight_attacks(Square::A1),
            Bitboard(0x0000_0000_0002_0400)
        );
    }

    #[test]
    fn knight_attack_counts() {
        for square in 0..Nums::SQUARES {
            #[allow(clippy::cast_possible_truncation)]
            let square = Square(square as u8);
            let count = ATTACK_LOOKUPS.knight_attacks(square).count_ones();
            assert!(
                (2..=8).contains(&count),
                "knight on {square} attacks {count} squares"
            );
        }
        assert_eq!(ATTACK_LOOKUPS.knight_attacks(Square::H8).count_ones(), 2);
        assert_eq!(ATTACK_LOOKUPS.knight_attacks(Square::B1).count_ones(), 3);
        assert_eq!(ATTACK_LOOKUPS.knight_attacks(Square::E4).count_ones(), 8);
    }

    #[test]
    fn pawn_attacks_follow_the_diagonals() {
        let mut a2 = Bitboard::EMPTY;
        a2.set_bit(Square::B3);
        assert_eq!(ATTACK_LOOKUPS.pawn_attacks(Side::WHITE, Square::A2), a2);

        let mut e4 = Bitboard::EMPTY;
        e4.set_bit(Square::D5);
        e4.set_bit(Square::F5);
        assert_eq!(ATTACK_LOOKUPS.pawn_attacks(Side::WHITE, Square::E4), e4);

        let mut h7 = Bitboard::EMPTY;
        h7.set_bit(Square::G6);
        assert_eq!(ATTACK_LOOKUPS.pawn_attacks(Side::BLACK, Square::H7), h7);

        // a pawn shifted off the top of the board attacks nothing
        assert_eq!(
            ATTACK_LOOKUPS.pawn_attacks(Side::WHITE, Square::E8),
            Bitboard::EMPTY
        );
    }

    // The heavyweight check: for every square, the magic lookup must agree
    // with the ray walker on every single blocker subset of the mask.
    #[test]
    fn magic_lookups_match_the_ray_walker() {
        let mut occupancies = arrayvec::ArrayVec::new();
        let mut attacks = arrayvec::ArrayVec::new();

        for square in 0..Nums::SQUARES {
            #[allow(clippy::cast_possible_truncation)]
            let square = Square(square as u8);

            gen_all_sliding_attacks::<{ PieceType::BISHOP.0 }>(
                square,
                &mut occupancies,
                &mut attacks,
            );
            for (occupancy, attack) in occupancies.iter().zip(&attacks) {
                assert_eq!(
                    ATTACK_LOOKUPS.bishop_attacks(square, *occupancy),
                    *attack,
                    "bishop on {square} with blockers {occupancy:?}"
                );
            }

            gen_all_sliding_attacks::<{ PieceType::ROOK.0 }>(
                square,
                &mut occupancies,
                &mut attacks,
            );
            for (occupancy, attack) in occupancies.iter().zip(&attacks) {
                assert_eq!(
                    ATTACK_LOOKUPS.rook_attacks(square, *occupancy),
                    *attack,
                    "rook on {square} with blockers {occupancy:?}"
                );
            }
        }
    }

    #[test]
    fn lookups_ignore_irrelevant_blockers() {
        use crate::lookups::util::sliding_attacks;

        // a busy middlegame-ish occupancy, full of edge squares the magics
        // must mask away
        let occupancy = Bitboard(0x91ff_0024_0018_ff89);
        for square in [Square::A1, Square::D4, Square::E5, Square::H8, Square::C7] {
            // the ray walker assumes the source square is not a blocker
            let blockers = occupancy & !Bitboard::from_square(square);
            assert_eq!(
                ATTACK_LOOKUPS.bishop_attacks(square, blockers),
                sliding_attacks::<{ PieceType::BISHOP.0 }>(square, blockers),
            );
            assert_eq!(
                ATTACK_LOOKUPS.rook_attacks(square, blockers),
                sliding_attacks::<{ PieceType::ROOK.0 }>(square, blockers),
            );
        }
    }

    #[test]
    fn queen_is_bishop_and_rook_combined() {
        let occupancy = Bitboard(0x0042_0010_8800_2400);
        for square in [Square::A8, Square::D4, Square::G2] {
            assert_eq!(
                ATTACK_LOOKUPS.queen_attacks(square, occupancy),
                ATTACK_LOOKUPS.bishop_attacks(square, occupancy)
                    | ATTACK_LOOKUPS.rook_attacks(square, occupancy),
            );
        }
    }
}
