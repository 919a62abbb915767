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

//! Classifying user move text.
//!
//! Move text arrives in many shapes: SAN (`Nf3`, `exd5`, `O-O`), long
//! algebraic (`d3-d7`), UCI (`e2e4`, `e7e8q`), with or without annotations
//! (`!?`, `+`, `(=)`, `e.p.`). [`MoveToken::parse`] strips the decorations,
//! records what they claimed, and classifies whatever is left. It is purely
//! syntactic: no board is consulted, so a well-formed token for an absurd
//! move still parses. Whether the move is playable is the caller's problem.

use std::str::FromStr;

use crate::{
    defs::{File, PieceType, Rank},
    error::ParseError,
};

/// The result of classifying one piece of move text.
///
/// Files and ranks are [`None`] when the text does not pin them down, which
/// is the norm for SAN (`Nf3` says where the knight lands, not where it
/// started). The boolean fields record *claims* made by the text; none of
/// them are verified against a position.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MoveToken {
    /// The original text, untouched.
    text: String,
    /// The kind of piece making the move, or [`PieceType::NONE`] when the
    /// text never says.
    pub piece: PieceType,
    /// The promotion piece, or [`PieceType::NONE`] for a non-promotion.
    pub promotion: PieceType,
    /// The file the move starts from, if given.
    pub from_file: Option<File>,
    /// The rank the move starts from, if given.
    pub from_rank: Option<Rank>,
    /// The file the move ends on, if given.
    pub to_file: Option<File>,
    /// The rank the move ends on, if given.
    pub to_rank: Option<Rank>,
    /// Kingside castling.
    pub castle_ks: bool,
    /// Queenside castling.
    pub castle_qs: bool,
    /// A null move: just passes the turn.
    pub null: bool,
    /// The text could not be classified; no other field is meaningful.
    pub invalid: bool,
    /// The player offered a draw with this move.
    pub draw_offered: bool,
    /// The move claims to capture en passant.
    pub ep: bool,
    /// The move claims to capture something.
    pub capture: bool,
    /// The move claims to give check.
    pub check: bool,
    /// The move claims to give checkmate.
    pub checkmate: bool,
}

/// Tokens that stand for a null move.
///
/// No notation standard pins this down, so everything the usual suspects
/// emit is accepted: Stockfish's `null`, WinBoard's `@@@@`, ChessAssistant's
/// `Z0`, the PGN/SCID `--`, the NAG `$0` and the UCI `0000` among them.
const NULL_TOKENS: [&str; 11] = [
    "(null)", "00-00", "null", "0000", "pass", "@@@@", "any", "Z0", "<>", "--", "$0",
];

/// Evaluation annotation symbols, in descending length order so that a long
/// symbol is never shadowed by one of its prefixes.
const EVAL_ANNOTATIONS: [&str; 23] = [
    "????", "!!!!", "??!", "!!?", "?!?", "!?!", "(?)", "(!)", "!!!", "???", "+/=", "=/+", "+/-",
    "-/+", "+-", "-+", "??", "?!", "!?", "!!", "TN", "?", "!",
];

/// End-of-game indicators.
const EOG_INDICATORS: [&str; 8] = [
    "White Resigns",
    "Black Resigns",
    "1-0",
    "0-1",
    "+/-",
    "-/+",
    "+/+",
    "-/-",
];

/// The FIDE way of recording a draw offer on the score sheet.
const DRAW_OFFER: [&str; 1] = ["(=)"];

/// Check suffixes. `ch.` must come before `ch` and `++` before `+`.
const CHECK_SUFFIXES: [&str; 6] = ["dis. ch.", "dbl. ch.", "ch.", "ch", "++", "+"];

/// Checkmate suffixes.
const CHECKMATE_SUFFIXES: [&str; 3] = ["mate", "++", "#"];

/// Queenside castling. Digit zero is the FIDE standard, letter O the PGN
/// specification.
const QS_CASTLING: [&str; 2] = ["0-0-0", "O-O-O"];

/// Kingside castling. Must only be tried after [`QS_CASTLING`]: stripping
/// `0-0` out of `0-0-0` would leave `-0` behind and a false positive.
const KS_CASTLING: [&str; 2] = ["0-0", "O-O"];

/// En passant suffixes.
const EP_SUFFIXES: [&str; 3] = ["e.p.", "ep.", "ep"];

/// The rank-digit/punctuation pairs that can introduce a promotion piece:
/// FIDE `e8Q`, PGN `e8=Q`, plus the parenthesis and slash formulations.
const PROMOTION_MARKS: [&str; 8] = ["8=", "8(", "8/", "8", "1=", "1(", "1/", "1"];

/// The only characters that may survive in move text once every annotation
/// is stripped.
const MOVE_CHARSET: &str = "KQBNRabcdefghx12345678";

impl MoveToken {
    /// Returns a [`MoveToken`] that records `text` and claims nothing.
    fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            piece: PieceType::NONE,
            promotion: PieceType::NONE,
            from_file: None,
            from_rank: None,
            to_file: None,
            to_rank: None,
            castle_ks: false,
            castle_qs: false,
            null: false,
            invalid: false,
            draw_offered: false,
            ep: false,
            capture: false,
            check: false,
            checkmate: false,
        }
    }

    /// Returns the original text of the token.
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Parses one piece of move text into a [`MoveToken`].
    ///
    /// The shorter SAN notation `Nc3` and the longer UCI notation `b1c3`
    /// are handled interchangeably, along with annotated forms of either.
    /// A token that cannot be classified comes back with `invalid` set and
    /// no further guarantees about the other fields.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut token = Self::new(text);
        let mut buf = text.trim().to_string();

        if buf.is_empty() {
            token.invalid = true;
            return token;
        }

        if strip_text(&mut buf, &NULL_TOKENS) {
            token.null = true;
            return token;
        }

        strip_annotations(&mut buf, &mut token);

        if detect_castling(&mut buf, &mut token) {
            return token;
        }

        if pawn_promotion(&mut buf, &mut token) || strip_ep_suffix(&mut buf, &mut token) {
            // a promoting or en-passant-capturing move can only be made by
            // a pawn
            if buf.chars().any(|c| matches!(c, 'K' | 'Q' | 'B' | 'N' | 'R')) {
                token.invalid = true;
                return token;
            }
            token.piece = PieceType::PAWN;
        }

        // `P` for a pawn and `-` between squares carry no information
        strip_char(&mut buf, 'P');
        strip_char(&mut buf, '-');

        if !has_valid_chars(&buf, &mut token) {
            return token;
        }

        if is_uci_shape(&buf) {
            parse_uci_move(&mut buf, &mut token);
        } else {
            parse_san_move(&buf, &mut token);
        }

        token
    }
}

impl FromStr for MoveToken {
    type Err = ParseError;

    /// Like [`MoveToken::parse`], except an unclassifiable token becomes an
    /// error instead of a descriptor with `invalid` set.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let token = Self::parse(text);
        if token.invalid {
            Err(ParseError::InvalidMove)
        } else {
            Ok(token)
        }
    }
}

/// Removes the first occurrence of the first of `patterns` found in `buf`,
/// comparing case-insensitively. Returns whether anything was removed.
fn strip_text(buf: &mut String, patterns: &[&str]) -> bool {
    let haystack = buf.to_ascii_lowercase();
    for pattern in patterns {
        let needle = pattern.to_ascii_lowercase();
        if let Some(at) = haystack.find(&needle) {
            buf.replace_range(at..at + needle.len(), "");
            return true;
        }
    }
    false
}

/// Removes the first of `patterns` that ends `buf`, comparing
/// case-insensitively. Returns whether anything was removed.
fn strip_suffix_text(buf: &mut String, patterns: &[&str]) -> bool {
    for pattern in patterns {
        if buf.len() < pattern.len() {
            continue;
        }
        let tail = &buf.as_bytes()[buf.len() - pattern.len()..];
        if tail.eq_ignore_ascii_case(pattern.as_bytes()) {
            buf.truncate(buf.len() - pattern.len());
            return true;
        }
    }
    false
}

/// Removes the first occurrence of `ch` from `buf`. Returns whether
/// anything was removed.
fn strip_char(buf: &mut String, ch: char) -> bool {
    if let Some(at) = buf.find(ch) {
        buf.remove(at);
        true
    } else {
        false
    }
}

/// Strips evaluation symbols, end-of-game indicators, draw offers and
/// check/checkmate suffixes, recording on `token` what the text claimed.
fn strip_annotations(buf: &mut String, token: &mut MoveToken) {
    strip_text(buf, &EVAL_ANNOTATIONS);
    strip_eq_pos_annotation(buf);
    strip_text(buf, &EOG_INDICATORS);

    if strip_text(buf, &DRAW_OFFER) {
        token.draw_offered = true;
    }
    if strip_suffix_text(buf, &CHECK_SUFFIXES) {
        token.check = true;
    }
    if strip_suffix_text(buf, &CHECKMATE_SUFFIXES) {
        token.checkmate = true;
    }
}

/// Strips a trailing equal-position annotation.
///
/// Only a `=` that ends the text counts: `e8=Q` keeps its `=`, which is
/// part of the promotion notation instead.
fn strip_eq_pos_annotation(buf: &mut String) {
    if let Some(at) = buf.rfind('=') {
        let next = buf.as_bytes().get(at + 1);
        if next.is_none() || next == Some(&b' ') {
            buf.truncate(at);
        }
    }
}

/// Detects a castling move. On a match the castle flags and piece kind are
/// set and the text must have nothing else left in it.
fn detect_castling(buf: &mut String, token: &mut MoveToken) -> bool {
    if strip_text(buf, &QS_CASTLING) {
        token.castle_qs = true;
    } else if strip_text(buf, &KS_CASTLING) {
        token.castle_ks = true;
    } else {
        return false;
    }

    token.piece = PieceType::KING;
    if !buf.is_empty() {
        token.invalid = true;
    }
    true
}

/// Detects a pawn promotion in any of its notations and truncates the text
/// back to the destination square.
///
/// The promotion piece may be lowercase, as UCI prescribes. That makes `b`
/// ambiguous with a file letter, so a bare `b` only counts as a bishop when
/// it ends the text: `e8b` promotes, `f8b4` is a bishop move.
fn pawn_promotion(buf: &mut String, token: &mut MoveToken) -> bool {
    for mark in PROMOTION_MARKS {
        let Some(at) = buf.find(mark) else { continue };
        let next = at + 1;
        if next >= buf.len() {
            continue;
        }
        let bytes = buf.as_bytes();
        let c1 = bytes[next] as char;

        let promoted = match c1 {
            'b' => (next == buf.len() - 1).then_some(PieceType::BISHOP),
            'Q' | 'q' | 'R' | 'r' | 'N' | 'n' | 'B' => {
                PieceType::from_san_char(c1.to_ascii_uppercase())
            }
            '=' | '(' | '/' => {
                let Some(&c2) = bytes.get(next + 1) else {
                    return false;
                };
                let Some(kind) = PieceType::from_san_char((c2 as char).to_ascii_uppercase())
                else {
                    return false;
                };
                if kind == PieceType::PAWN || kind == PieceType::KING {
                    return false;
                }
                Some(kind)
            }
            _ => None,
        };

        if let Some(kind) = promoted {
            token.promotion = kind;
            token.piece = PieceType::PAWN;
            buf.truncate(next);
            return true;
        }
    }
    false
}

/// Strips an en passant suffix, recording the claim on `token`.
fn strip_ep_suffix(buf: &mut String, token: &mut MoveToken) -> bool {
    if strip_text(buf, &EP_SUFFIXES) {
        token.ep = true;
        true
    } else {
        false
    }
}

/// Checks that the stripped text contains only characters that can appear
/// in a move, at most one moving-piece letter and at most one capture.
///
/// Marks `token` invalid and returns `false` otherwise.
fn has_valid_chars(buf: &str, token: &mut MoveToken) -> bool {
    if buf.chars().any(|c| !MOVE_CHARSET.contains(c)) {
        token.invalid = true;
        return false;
    }

    let piece_letters = buf
        .chars()
        .filter(|&c| PieceType::from_san_char(c).is_some())
        .count();
    if piece_letters > 1 {
        token.invalid = true;
        return false;
    }

    if buf.chars().filter(|&c| c == 'x').count() > 1 {
        token.invalid = true;
        return false;
    }

    true
}

/// Checks for UCI from-to square notation: `d3d7`, or `d3xd7` with the
/// capture marker still in (the `-` of `d3-d7` is stripped by this point).
fn is_uci_shape(buf: &str) -> bool {
    let mut stripped = buf.to_string();
    strip_char(&mut stripped, 'x');

    let chars: Vec<char> = stripped.chars().collect();
    chars.len() == 4
        && File::from_char(chars[0]).is_some()
        && Rank::from_char(chars[1]).is_some()
        && File::from_char(chars[2]).is_some()
        && Rank::from_char(chars[3]).is_some()
}

/// Extracts the from- and to-squares of a UCI-shaped move.
///
/// UCI never names the moving piece. An unadorned from-square token is how
/// pawn moves are written in long algebraic notation, so the piece kind is
/// recorded as a pawn unless an earlier step already decided it.
fn parse_uci_move(buf: &mut String, token: &mut MoveToken) {
    if buf.len() > 4 && strip_char(buf, 'x') {
        token.capture = true;
    }

    let chars: Vec<char> = buf.chars().collect();
    if chars.len() != 4 {
        token.invalid = true;
        return;
    }

    token.from_file = File::from_char(chars[0]);
    token.from_rank = Rank::from_char(chars[1]);
    token.to_file = File::from_char(chars[2]);
    token.to_rank = Rank::from_char(chars[3]);
    if token.piece == PieceType::NONE {
        token.piece = PieceType::PAWN;
    }
}

/// Classifies a SAN move: captures split at the `x`, everything else by
/// symbol count.
fn parse_san_move(buf: &str, token: &mut MoveToken) {
    if buf.contains('x') {
        parse_san_capture(buf, token);
    } else {
        parse_san_non_capture(buf, token);
    }
}

/// Parses a non-capture SAN move: 2 symbols for a pawn push (`e4`), 3 for a
/// piece move (`Nf3`), 4 with a one-dimension disambiguator (`Nbd7`,
/// `R7e1`), 5 with both (`Qh4e1`).
fn parse_san_non_capture(buf: &str, token: &mut MoveToken) {
    let chars: Vec<char> = buf.chars().collect();
    match chars.len() {
        2 => {
            let (Some(file), Some(rank)) = (File::from_char(chars[0]), Rank::from_char(chars[1]))
            else {
                token.invalid = true;
                return;
            };
            token.piece = PieceType::PAWN;
            token.to_file = Some(file);
            token.to_rank = Some(rank);
        }
        3 => {
            let Some(piece) = PieceType::from_san_char(chars[0]) else {
                token.invalid = true;
                return;
            };
            let (Some(file), Some(rank)) = (File::from_char(chars[1]), Rank::from_char(chars[2]))
            else {
                token.invalid = true;
                return;
            };
            token.piece = piece;
            token.to_file = Some(file);
            token.to_rank = Some(rank);
        }
        4 => {
            let Some(piece) = PieceType::from_san_char(chars[0]) else {
                token.invalid = true;
                return;
            };
            token.piece = piece;
            if let Some(file) = File::from_char(chars[1]) {
                token.from_file = Some(file);
            } else if let Some(rank) = Rank::from_char(chars[1]) {
                token.from_rank = Some(rank);
            } else {
                token.invalid = true;
                return;
            }
            let (Some(file), Some(rank)) = (File::from_char(chars[2]), Rank::from_char(chars[3]))
            else {
                token.invalid = true;
                return;
            };
            token.to_file = Some(file);
            token.to_rank = Some(rank);
        }
        5 => {
            let Some(piece) = PieceType::from_san_char(chars[0]) else {
                token.invalid = true;
                return;
            };
            let (Some(from_file), Some(from_rank), Some(to_file), Some(to_rank)) = (
                File::from_char(chars[1]),
                Rank::from_char(chars[2]),
                File::from_char(chars[3]),
                Rank::from_char(chars[4]),
            ) else {
                token.invalid = true;
                return;
            };
            token.piece = piece;
            token.from_file = Some(from_file);
            token.from_rank = Some(from_rank);
            token.to_file = Some(to_file);
            token.to_rank = Some(to_rank);
        }
        _ => token.invalid = true,
    }
}

/// Parses a SAN capture: the from-token before the `x` names the moving
/// piece and an optional disambiguator (`e`, `Qg`, `R7`, `b4`, `Qh4`), the
/// to-token after it the destination.
fn parse_san_capture(buf: &str, token: &mut MoveToken) {
    let Some((from_token, to_token)) = buf.split_once('x') else {
        token.invalid = true;
        return;
    };

    let from: Vec<char> = from_token.chars().collect();
    match from.len() {
        1 => {
            if let Some(piece) = PieceType::from_san_char(from[0]) {
                token.piece = piece;
            } else if let Some(file) = File::from_char(from[0]) {
                token.piece = PieceType::PAWN;
                token.from_file = Some(file);
            } else {
                token.invalid = true;
                return;
            }
        }
        2 => {
            if let Some(piece) = PieceType::from_san_char(from[0]) {
                token.piece = piece;
            } else if let Some(file) = File::from_char(from[0]) {
                token.piece = PieceType::PAWN;
                token.from_file = Some(file);
            } else {
                token.invalid = true;
                return;
            }
            if let Some(file) = File::from_char(from[1]) {
                token.from_file = Some(file);
            } else if let Some(rank) = Rank::from_char(from[1]) {
                if token.piece == PieceType::NONE {
                    token.piece = PieceType::PAWN;
                }
                token.from_rank = Some(rank);
            } else {
                token.invalid = true;
                return;
            }
        }
        3 => {
            let Some(piece) = PieceType::from_san_char(from[0]) else {
                token.invalid = true;
                return;
            };
            let (Some(file), Some(rank)) = (File::from_char(from[1]), Rank::from_char(from[2]))
            else {
                token.invalid = true;
                return;
            };
            token.piece = piece;
            token.from_file = Some(file);
            token.from_rank = Some(rank);
        }
        _ => {
            token.invalid = true;
            return;
        }
    }

    let to: Vec<char> = to_token.chars().collect();
    match to.len() {
        1 => {
            let Some(file) = File::from_char(to[0]) else {
                token.invalid = true;
                return;
            };
            token.to_file = Some(file);
        }
        2 => {
            let (Some(file), Some(rank)) = (File::from_char(to[0]), Rank::from_char(to[1])) else {
                token.invalid = true;
                return;
            };
            token.to_file = Some(file);
            token.to_rank = Some(rank);
        }
        _ => {
            token.invalid = true;
            return;
        }
    }

    token.capture = true;
}
