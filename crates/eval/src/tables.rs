// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Lookup tables keyed by a 13-bit ranks mask.

/// The number of 13-bit ranks masks.
const MASKS: usize = 1 << 13;

/// Straight masks from the ace high straight down to the wheel.
const STRAIGHTS: [(u32, u32); 10] = [
    (0x1F00, 12),
    (0x0F80, 11),
    (0x07C0, 10),
    (0x03E0, 9),
    (0x01F0, 8),
    (0x00F8, 7),
    (0x007C, 6),
    (0x003E, 5),
    (0x001F, 4),
    // A-2-3-4-5, the ace plays low.
    (0x100F, 3),
];

const fn make_bit_count() -> [u32; MASKS] {
    let mut t = [0; MASKS];
    let mut mask = 0;
    while mask < MASKS {
        t[mask] = (mask as u32).count_ones();
        mask += 1;
    }

    t
}

const fn make_straight() -> [u32; MASKS] {
    let mut t = [0; MASKS];
    let mut mask = 0;
    while mask < MASKS {
        let mut idx = 0;
        while idx < STRAIGHTS.len() {
            let (bits, high) = STRAIGHTS[idx];
            if mask as u32 & bits == bits {
                t[mask] = high;
                break;
            }
            idx += 1;
        }
        mask += 1;
    }

    t
}

const fn make_top_card() -> [u32; MASKS] {
    let mut t = [0; MASKS];
    // The empty mask maps to 0.
    let mut mask = 1;
    while mask < MASKS {
        t[mask] = 31 - (mask as u32).leading_zeros();
        mask += 1;
    }

    t
}

const fn make_top_five_cards() -> [u32; MASKS] {
    let mut t = [0; MASKS];
    let mut mask = 1;
    while mask < MASKS {
        let mut bits = mask as u32;
        let mut value = 0;
        let mut n = 0;
        while bits != 0 && n < 5 {
            let top = 31 - bits.leading_zeros();
            value |= top << (16 - 4 * n);
            bits ^= 1 << top;
            n += 1;
        }
        t[mask] = value;
        mask += 1;
    }

    t
}

/// The number of ranks in a mask.
pub(crate) static BIT_COUNT: [u32; MASKS] = make_bit_count();

/// The high rank of the best straight in a mask or 0 if there is no straight,
/// the wheel high rank is 3 (five).
pub(crate) static STRAIGHT: [u32; MASKS] = make_straight();

/// The highest rank in a mask.
pub(crate) static TOP_CARD: [u32; MASKS] = make_top_card();

/// The five highest ranks in a mask in the hand rank tie-break fields.
pub(crate) static TOP_FIVE_CARDS: [u32; MASKS] = make_top_five_cards();
