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

use std::{
    process,
    time::{SystemTime, UNIX_EPOCH},
};

use oorandom::Rand64;

/// Generates a random number with few set bits, as needed for magic number
/// candidates.
///
/// ANDing three draws together empirically finds magics faster than taking
/// single draws.
#[inline]
pub fn gen_sparse_rand(rand_gen: &mut Rand64) -> u64 {
    rand_gen.rand_u64() & rand_gen.rand_u64() & rand_gen.rand_u64()
}

/// Mixes the clock and the process id into a seed.
///
/// Used by the magic finder utility so that repeated runs explore different
/// candidates; table construction itself uses a fixed seed instead.
#[must_use]
pub fn mix_seed() -> u128 {
    let clock = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |since_epoch| since_epoch.as_millis());
    clock ^ (u128::from(process::id()) << 64)
}
