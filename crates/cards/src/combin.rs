// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Binomial coefficients and combination ranking.

/// Largest k supported by the binomial table.
const MAX_K: usize = 7;

/// Creates table for nck(n, k) for n <= 52 and k <= 7.
const fn make_binomials() -> [[u32; MAX_K + 1]; 53] {
    let mut t = [[0u32; MAX_K + 1]; 53];
    let mut n = 0;

    while n <= 52 {
        // base case nck(n, 0) = 1
        t[n][0] = 1;

        let mut k = 1;
        while k <= MAX_K && k <= n {
            // nck(n, k) = nck(n-1, k-1) + nck(n-1, k)
            t[n][k] = t[n - 1][k - 1] + t[n - 1][k];
            k += 1;
        }

        n += 1;
    }

    t
}

const BINOMIALS: [[u32; MAX_K + 1]; 53] = make_binomials();

/// Returns the binomial coefficient for n choose k.
///
/// Panics if n > 52 or k > 7.
#[inline]
pub fn binomial(n: usize, k: usize) -> usize {
    assert!(n <= 52, "n={n} must be 0 <= n <= 52");
    assert!(k <= MAX_K, "k={k} must be 0 <= k <= 7");

    BINOMIALS[n][k] as usize
}

/// Returns the colexicographic rank of a combination of card indexes.
///
/// The combination is given as a mask with bit `i` set for card index `i`,
/// its rank is `sum(nck(a_j, j))` over the ascending elements `a_1 < a_2 <
/// ...`, so that the `nck(52, k)` combinations of size k map one to one to
/// `0..nck(52, k)`.
///
/// Panics if the mask has more than 7 bits set or bits above 51.
#[inline]
pub fn colex_rank(mut index_bits: u64) -> usize {
    let mut rank = 0;
    let mut j = 1;
    while index_bits != 0 {
        let a = index_bits.trailing_zeros() as usize;
        rank += binomial(a, j);
        index_bits &= index_bits - 1;
        j += 1;
    }

    rank
}
