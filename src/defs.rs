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

// all of the wrapper structs here contain only one field, so documentation
// isn't necessary
#![allow(clippy::missing_docs_in_private_items)]

use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use crate::error::ParseError;

/// A wrapper for an `i8`, since a single step can change a square index by
/// -9 to 9.
#[derive(Clone, Copy)]
pub struct Direction(pub i8);

/// A wrapper for a `u8`, since a file can go from 0 to 7.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct File(pub u8);

/// The state a game can be in after a move, as far as this crate's consumers
/// are concerned.
///
/// The FEN parser only ever produces the two turn variants; everything else
/// is decided by a consumer that can see checks and move history. Both the
/// 50-move and the 75-move rule have a variant because the core does not
/// decide which of the two applies to a game.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GameStatus {
    /// White to play.
    WhiteTurn,
    /// Black to play.
    BlackTurn,
    /// White to move out of check.
    WhiteUnderCheck,
    /// Black to move out of check.
    BlackUnderCheck,
    /// White wins by checkmate.
    WhiteWinsByCheckmate,
    /// Black wins by checkmate.
    BlackWinsByCheckmate,
    /// Draw by mutual agreement.
    DrawByAgreement,
    /// Draw by threefold repetition.
    DrawByThreefoldRepetition,
    /// Draw by fivefold repetition.
    DrawByFivefoldRepetition,
    /// Draw by the 50-move rule.
    DrawByFiftyMoveRule,
    /// Draw by the 75-move rule.
    DrawBySeventyFiveMoveRule,
    /// Draw due to insufficient material.
    DrawByInsufficientMaterial,
    /// Draw by stalemate.
    DrawByStalemate,
}

/// Miscellaneous constants associated with chess (`SIDES == 2`, etc.)
#[allow(clippy::exhaustive_structs)]
pub struct Nums;

/// A wrapper for a `u8`, since a colored piece can go from 0 to 12.
///
/// The encoding is `piece_type << 1 | side`, so e.g. a White knight is
/// `0b011` and a Black knight `0b010`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Piece(pub u8);

/// A wrapper for a `u8`, since a piece type can go from 0 to 6.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PieceType(pub u8);

/// A wrapper for a `u8`, since a rank can go from 0 to 7.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Rank(pub u8);

/// A wrapper for a `u8`, since a side is just 0, 1 or 2.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Side(pub u8);

/// A wrapper for a `u8`, since a square can go from 0 to 64.
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd)]
pub struct Square(pub u8);

/// An array of character constants associated with each piece type on both
/// sides.
///
/// e.g. `PIECE_CHARS[Side::WHITE.to_index()][PieceType::KNIGHT.to_index()]
/// == 'N'`.
pub const PIECE_CHARS: [[char; Nums::PIECES]; Nums::SIDES] = [
    ['p', 'n', 'b', 'r', 'q', 'k'],
    ['P', 'N', 'B', 'R', 'Q', 'K'],
];

/// The square difference in each of the 8 directions.
impl Direction {
    /// North.
    pub const N: Self = Self(8);
    /// North-east.
    pub const NE: Self = Self(9);
    /// East.
    pub const E: Self = Self(1);
    /// South-east.
    pub const SE: Self = Self(-7);
    /// South.
    pub const S: Self = Self(-8);
    /// South-west.
    pub const SW: Self = Self(-9);
    /// West.
    pub const W: Self = Self(-1);
    /// North-west.
    pub const NW: Self = Self(7);
}

/// Enumerates files.
///
/// To avoid casting everywhere, this isn't an enum.
#[allow(missing_docs)]
impl File {
    pub const FILE1: Self = Self(0);
    pub const FILE2: Self = Self(1);
    pub const FILE3: Self = Self(2);
    pub const FILE4: Self = Self(3);
    pub const FILE5: Self = Self(4);
    pub const FILE6: Self = Self(5);
    pub const FILE7: Self = Self(6);
    pub const FILE8: Self = Self(7);
}

impl Nums {
    /// The number of files.
    pub const FILES: usize = 8;
    /// The number of ranks.
    pub const RANKS: usize = 8;
    /// The number of squares.
    pub const SQUARES: usize = 64;
    /// The number of piece types.
    pub const PIECES: usize = 6;
    /// The number of sides.
    pub const SIDES: usize = 2;
}

impl Piece {
    /// No piece; an empty square.
    pub const NONE: Self = Self(12);
}

/// Enumerates piece types.
///
/// To avoid casting everywhere, this isn't an enum.
#[allow(missing_docs)]
impl PieceType {
    pub const PAWN: Self = Self(0);
    pub const KNIGHT: Self = Self(1);
    pub const BISHOP: Self = Self(2);
    pub const ROOK: Self = Self(3);
    pub const QUEEN: Self = Self(4);
    pub const KING: Self = Self(5);
    pub const NONE: Self = Self(6);
}

/// Enumerates ranks.
///
/// To avoid casting everywhere, this isn't an enum.
#[allow(missing_docs)]
impl Rank {
    pub const RANK1: Self = Self(0);
    pub const RANK2: Self = Self(1);
    pub const RANK3: Self = Self(2);
    pub const RANK4: Self = Self(3);
    pub const RANK5: Self = Self(4);
    pub const RANK6: Self = Self(5);
    pub const RANK7: Self = Self(6);
    pub const RANK8: Self = Self(7);
}

/// Enumerates sides.
///
/// To avoid casting everywhere, this isn't an enum.
#[allow(missing_docs)]
impl Side {
    pub const BLACK: Self = Self(0);
    pub const WHITE: Self = Self(1);
    pub const NONE: Self = Self(2);
}

/// Enumerates squares. This crate uses little-endian rank-file mapping:
/// the index of a square is `rank * 8 + file`, so A1 is 0 and H8 is 63.
///
/// To avoid casting everywhere, this isn't an enum.
#[allow(missing_docs)]
#[rustfmt::skip]
impl Square {
    pub const A1: Self = Self(0);
    pub const B1: Self = Self(1);
    pub const C1: Self = Self(2);
    pub const D1: Self = Self(3);
    pub const E1: Self = Self(4);
    pub const F1: Self = Self(5);
    pub const G1: Self = Self(6);
    pub const H1: Self = Self(7);
    pub const A2: Self = Self(8);
    pub const B2: Self = Self(9);
    pub const C2: Self = Self(10);
    pub const D2: Self = Self(11);
    pub const E2: Self = Self(12);
    pub const F2: Self = Self(13);
    pub const G2: Self = Self(14);
    pub const H2: Self = Self(15);
    pub const A3: Self = Self(16);
    pub const B3: Self = Self(17);
    pub const C3: Self = Self(18);
    pub const D3: Self = Self(19);
    pub const E3: Self = Self(20);
    pub const F3: Self = Self(21);
    pub const G3: Self = Self(22);
    pub const H3: Self = Self(23);
    pub const A4: Self = Self(24);
    pub const B4: Self = Self(25);
    pub const C4: Self = Self(26);
    pub const D4: Self = Self(27);
    pub const E4: Self = Self(28);
    pub const F4: Self = Self(29);
    pub const G4: Self = Self(30);
    pub const H4: Self = Self(31);
    pub const A5: Self = Self(32);
    pub const B5: Self = Self(33);
    pub const C5: Self = Self(34);
    pub const D5: Self = Self(35);
    pub const E5: Self = Self(36);
    pub const F5: Self = Self(37);
    pub const G5: Self = Self(38);
    pub const H5: Self = Self(39);
    pub const A6: Self = Self(40);
    pub const B6: Self = Self(41);
    pub const C6: Self = Self(42);
    pub const D6: Self = Self(43);
    pub const E6: Self = Self(44);
    pub const F6: Self = Self(45);
    pub const G6: Self = Self(46);
    pub const H6: Self = Self(47);
    pub const A7: Self = Self(48);
    pub const B7: Self = Self(49);
    pub const C7: Self = Self(50);
    pub const D7: Self = Self(51);
    pub const E7: Self = Self(52);
    pub const F7: Self = Self(53);
    pub const G7: Self = Self(54);
    pub const H7: Self = Self(55);
    pub const A8: Self = Self(56);
    pub const B8: Self = Self(57);
    pub const C8: Self = Self(58);
    pub const D8: Self = Self(59);
    pub const E8: Self = Self(60);
    pub const F8: Self = Self(61);
    pub const G8: Self = Self(62);
    pub const H8: Self = Self(63);
    pub const NONE: Self = Self(64);
}

impl Direction {
    /// Returns the contents of `self`.
    #[inline]
    #[must_use]
    pub const fn inner(self) -> i8 {
        self.0
    }
}

impl File {
    /// Converts a file letter (`'a'` to `'h'`) into a [`File`]. Returns
    /// [`None`] for any other character.
    #[inline]
    #[must_use]
    pub const fn from_char(file: char) -> Option<Self> {
        match file {
            'a'..='h' => Some(Self(file as u8 - b'a')),
            _ => None,
        }
    }

    /// Returns the contents of `self`.
    #[inline]
    #[must_use]
    pub const fn inner(self) -> u8 {
        self.0
    }

    /// Returns the contents of `self` as a `usize`.
    #[inline]
    #[must_use]
    pub const fn to_index(self) -> usize {
        self.0 as usize
    }
}

impl Piece {
    /// Creates a [`Piece`] from a side and a piece type.
    #[inline]
    #[must_use]
    pub const fn new(side: Side, piece_type: PieceType) -> Self {
        Self(piece_type.0 << 1 | side.0)
    }

    /// Converts a FEN piece letter into a [`Piece`]: uppercase is White,
    /// lowercase is Black. Returns [`None`] if the letter is not a piece.
    #[inline]
    #[must_use]
    pub fn from_char(piece: char) -> Option<Self> {
        let piece_type = PieceType::from_char(piece.to_ascii_lowercase())?;
        let side = Side(u8::from(piece.is_ascii_uppercase()));
        Some(Self::new(side, piece_type))
    }

    /// Returns the type of `self`.
    ///
    /// [`Piece::NONE`] maps to [`PieceType::NONE`].
    #[inline]
    #[must_use]
    pub const fn piece_type(self) -> PieceType {
        PieceType(self.0 >> 1)
    }

    /// Returns the side of `self`.
    ///
    /// The result is undefined if `self` is [`Piece::NONE`].
    #[inline]
    #[must_use]
    pub const fn side(self) -> Side {
        Side(self.0 & 1)
    }

    /// Converts `self` into its FEN letter.
    ///
    /// # Panics
    ///
    /// Panics if `self` is [`Piece::NONE`].
    #[inline]
    #[must_use]
    pub fn to_char(self) -> char {
        PIECE_CHARS[self.side().to_index()][self.piece_type().to_index()]
    }
}

impl PieceType {
    /// Converts a lowercase piece letter into a [`PieceType`]. Returns
    /// [`None`] if the letter is not a piece.
    #[inline]
    #[must_use]
    pub const fn from_char(piece: char) -> Option<Self> {
        match piece {
            'p' => Some(Self::PAWN),
            'n' => Some(Self::KNIGHT),
            'b' => Some(Self::BISHOP),
            'r' => Some(Self::ROOK),
            'q' => Some(Self::QUEEN),
            'k' => Some(Self::KING),
            _ => None,
        }
    }

    /// Converts an uppercase SAN piece letter into a [`PieceType`]. Returns
    /// [`None`] if the letter is not a piece.
    #[inline]
    #[must_use]
    pub const fn from_san_char(piece: char) -> Option<Self> {
        match piece {
            'K' => Some(Self::KING),
            'Q' => Some(Self::QUEEN),
            'B' => Some(Self::BISHOP),
            'N' => Some(Self::KNIGHT),
            'R' => Some(Self::ROOK),
            'P' => Some(Self::PAWN),
            _ => None,
        }
    }

    /// Returns the contents of `self`.
    #[inline]
    #[must_use]
    pub const fn inner(self) -> u8 {
        self.0
    }

    /// Returns the contents of `self` as a `usize`.
    #[inline]
    #[must_use]
    pub const fn to_index(self) -> usize {
        self.0 as usize
    }
}

impl Rank {
    /// Converts a rank digit (`'1'` to `'8'`) into a [`Rank`]. Returns
    /// [`None`] for any other character.
    #[inline]
    #[must_use]
    pub const fn from_char(rank: char) -> Option<Self> {
        match rank {
            '1'..='8' => Some(Self(rank as u8 - b'1')),
            _ => None,
        }
    }

    /// Returns the contents of `self`.
    #[inline]
    #[must_use]
    pub const fn inner(self) -> u8 {
        self.0
    }

    /// Returns the contents of `self` as a `usize`.
    #[inline]
    #[must_use]
    pub const fn to_index(self) -> usize {
        self.0 as usize
    }
}

impl Side {
    /// Flips the contents of `self`.
    ///
    /// e.g. `Side::WHITE.flip() == Side::BLACK`.
    ///
    /// The result is undefined if `self` isn't [`Side::WHITE`] or
    /// [`Side::BLACK`].
    #[inline]
    #[must_use]
    pub const fn flip(self) -> Self {
        Self(self.0 ^ 1)
    }

    /// Returns the contents of `self`.
    #[inline]
    #[must_use]
    pub const fn inner(self) -> u8 {
        self.0
    }

    /// Returns the contents of `self` as a `usize`.
    #[inline]
    #[must_use]
    pub const fn to_index(self) -> usize {
        self.0 as usize
    }
}

impl Square {
    /// Converts `rank` and `file` into a [`Square`].
    #[inline]
    #[must_use]
    pub const fn from_pos(rank: Rank, file: File) -> Self {
        Self(rank.0 * 8 + file.0)
    }

    /// Calculates the file that `self` is on.
    #[inline]
    #[must_use]
    pub const fn file_of(self) -> File {
        File(self.0 & 7)
    }

    /// Calculates the rank that `self` is on.
    #[inline]
    #[must_use]
    pub const fn rank_of(self) -> Rank {
        Rank(self.0 >> 3)
    }

    /// Returns the contents of `self`.
    #[inline]
    #[must_use]
    pub const fn inner(self) -> u8 {
        self.0
    }

    /// Finds the horizontal distance between `self` and `other_square`.
    #[inline]
    #[must_use]
    pub const fn horizontal_distance(self, other_square: Self) -> u8 {
        #[allow(clippy::cast_possible_wrap)]
        let distance = self.file_of().0 as i8 - other_square.file_of().0 as i8;
        distance.unsigned_abs()
    }

    /// Checks if `self` is within the board.
    #[inline]
    #[must_use]
    pub const fn is_valid(self) -> bool {
        // `self.0` is unsigned so it can't be less than 0
        self.0 <= Self::H8.0
    }

    /// Returns the contents of `self` as a `usize`.
    #[inline]
    #[must_use]
    pub const fn to_index(self) -> usize {
        self.0 as usize
    }
}

impl Display for Square {
    /// Writes `self` in coordinate notation, or `-` for [`Square::NONE`].
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if *self == Self::NONE {
            return f.write_str("-");
        }
        write!(
            f,
            "{}{}",
            (b'a' + self.file_of().0) as char,
            (b'1' + self.rank_of().0) as char,
        )
    }
}

impl FromStr for Square {
    type Err = ParseError;

    /// Converts a string representation of a square (e.g. "e4") into a
    /// [`Square`].
    fn from_str(string: &str) -> Result<Self, Self::Err> {
        let mut chars = string.chars();
        let file = chars
            .next()
            .and_then(File::from_char)
            .ok_or(ParseError::InvalidSquare)?;
        let rank = chars
            .next()
            .and_then(Rank::from_char)
            .ok_or(ParseError::InvalidSquare)?;
        if chars.next().is_some() {
            return Err(ParseError::InvalidSquare);
        }
        Ok(Self::from_pos(rank, file))
    }
}

#[cfg(test)]
mod tests {
    use super::{Piece, PieceType, Side, Square};

    #[test]
    fn square_strings() {
        assert_eq!("a1".parse::<Square>(), Ok(Square::A1));
        assert_eq!("h8".parse::<Square>(), Ok(Square::H8));
        assert_eq!("e4".parse::<Square>(), Ok(Square::E4));
        assert!("e9".parse::<Square>().is_err());
        assert!("i4".parse::<Square>().is_err());
        assert!("e44".parse::<Square>().is_err());
        assert!("".parse::<Square>().is_err());
        assert_eq!(Square::C6.to_string(), "c6");
        assert_eq!(Square::NONE.to_string(), "-");
    }

    #[test]
    fn square_mapping() {
        assert_eq!(Square::A1.inner(), 0);
        assert_eq!(Square::H1.inner(), 7);
        assert_eq!(Square::A8.inner(), 56);
        assert_eq!(Square::H8.inner(), 63);
        assert_eq!(Square::E4.inner(), 28);
    }

    #[test]
    fn piece_chars() {
        assert_eq!(Piece::from_char('N'), Some(Piece::new(Side::WHITE, PieceType::KNIGHT)));
        assert_eq!(Piece::from_char('k'), Some(Piece::new(Side::BLACK, PieceType::KING)));
        assert_eq!(Piece::from_char('z'), None);
        assert_eq!(Piece::new(Side::WHITE, PieceType::QUEEN).to_char(), 'Q');
        assert_eq!(Piece::new(Side::BLACK, PieceType::PAWN).to_char(), 'p');
    }

    #[test]
    fn piece_decomposition() {
        let piece = Piece::new(Side::BLACK, PieceType::ROOK);
        assert_eq!(piece.piece_type(), PieceType::ROOK);
        assert_eq!(piece.side(), Side::BLACK);
        assert_eq!(Piece::NONE.piece_type(), PieceType::NONE);
    }
}
