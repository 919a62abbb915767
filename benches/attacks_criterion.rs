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

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use krill::{
    bitboard::Bitboard,
    board::Board,
    defs::{Nums, Square},
    lookups::{Lookups, ATTACK_LOOKUPS},
    parse::MoveToken,
};

/// A scattering of occupancies of varying density.
const OCCUPANCIES: [u64; 4] = [
    0x0000_0000_0000_0000,
    0x0000_0018_1800_0000,
    0x0042_0010_8800_2400,
    0x91ff_0024_0018_ff89,
];

/// Measures slider attack lookups for every square against each sample
/// occupancy.
fn bench_slider_lookups(c: &mut Criterion) {
    Lookups::init();

    c.bench_function("rook_attacks_all_squares", |b| {
        b.iter(|| {
            let mut acc = Bitboard::EMPTY;
            for occupancy in OCCUPANCIES {
                for square in 0..Nums::SQUARES {
                    acc |= ATTACK_LOOKUPS
                        .rook_attacks(black_box(Square(square as u8)), Bitboard(occupancy));
                }
            }
            acc
        });
    });

    c.bench_function("queen_attacks_all_squares", |b| {
        b.iter(|| {
            let mut acc = Bitboard::EMPTY;
            for occupancy in OCCUPANCIES {
                for square in 0..Nums::SQUARES {
                    acc |= ATTACK_LOOKUPS
                        .queen_attacks(black_box(Square(square as u8)), Bitboard(occupancy));
                }
            }
            acc
        });
    });
}

/// Measures FEN parsing of the starting position.
fn bench_fen_parsing(c: &mut Criterion) {
    c.bench_function("parse_startpos_fen", |b| {
        b.iter(|| {
            black_box("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
                .parse::<Board>()
                .unwrap()
        });
    });
}

/// Measures move-token classification across the notational forms.
fn bench_move_parsing(c: &mut Criterion) {
    const TOKENS: [&str; 6] = ["Nf3", "exd5", "O-O-O+", "e8=Q#", "e2e4", "Qh4xe1!?"];

    c.bench_function("parse_move_tokens", |b| {
        b.iter(|| {
            TOKENS
                .iter()
                .filter(|token| !MoveToken::parse(black_box(token)).invalid)
                .count()
        });
    });
}

criterion_group!(
    benches,
    bench_slider_lookups,
    bench_fen_parsing,
    bench_move_parsing
);
criterion_main!(benches);
