// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! State keys for the table builder.
//!
//! Two partial hands with the same key have the same hand rank for any set of
//! cards that completes them, so they can share a state.
use lutpoker_cards::CardSet;

use crate::BitEvaluator;

/// The fingerprint of a partial hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct StateKey {
    size: u8,
    ranks: CardSet,
    flush: CardSet,
    rank: u32,
}

impl StateKey {
    /// Creates the key for a partial hand of a table that evaluates hands of
    /// `hand_size` cards.
    pub fn new(cards: CardSet, hand_size: usize) -> Self {
        let size = cards.len();
        let rank = if size >= 5 {
            BitEvaluator::eval(cards).raw()
        } else {
            0
        };

        Self {
            size: size as u8,
            ranks: normalize_ranks(cards),
            flush: flush_cards(cards, hand_size),
            rank,
        }
    }
}

/// Drops the suits from a set of cards.
///
/// The result lane `k` has the ranks that are present in at least `k + 1`
/// suits, so for example `Ac Ks` and `Ah Kh` both map to `Ac Kc` and `2s 2h`
/// maps to `2c 2d`.
pub(crate) fn normalize_ranks(cards: CardSet) -> CardSet {
    let [c, d, h, s] = cards.lanes();
    CardSet::from_lanes([
        c | d | h | s,
        (c & d) | (c & h) | (c & s) | (d & h) | (d & s) | (h & s),
        (c & d & h) | (c & d & s) | (c & h & s) | (d & h & s),
        c & d & h & s,
    ])
}

/// Keeps the cards of the suits that can still make a flush.
///
/// A suit lane is kept if its cards plus the cards still to be dealt to reach
/// `hand_size` cards are at least five, a lane with more than five cards keeps
/// only its five highest ranks, so that `Ac Qc Jc Tc 9c 2c` and `Ac Qc Jc Tc
/// 9c 3c` have the same flush cards.
pub(crate) fn flush_cards(cards: CardSet, hand_size: usize) -> CardSet {
    let to_deal = hand_size.saturating_sub(cards.len()) as u32;
    let lanes = cards.lanes().map(|mut lane| {
        if lane.count_ones() + to_deal < 5 {
            return 0;
        }

        while lane.count_ones() > 5 {
            // Clear the lowest rank.
            lane &= lane - 1;
        }

        lane
    });

    CardSet::from_lanes(lanes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards(s: &str) -> CardSet {
        s.parse().unwrap()
    }

    #[test]
    fn normalize_ranks_drops_suits() {
        assert_eq!(normalize_ranks(cards("Ac Ks")), cards("Ac Kc"));
        assert_eq!(normalize_ranks(cards("Ah Kh")), cards("Ac Kc"));
        assert_eq!(normalize_ranks(cards("2s 2h")), cards("2c 2d"));
        assert_eq!(normalize_ranks(cards("2s 2h 2c")), cards("2c 2d 2h"));
        assert_eq!(
            normalize_ranks(cards("7s 7h 7d 7c Ah 2d")),
            cards("7c 7d 7h 7s Ac 2c")
        );
        assert_eq!(normalize_ranks(CardSet::EMPTY), CardSet::EMPTY);
    }

    #[test]
    fn flush_cards_keeps_draws() {
        // Any card can still make a flush in an empty 5 cards hand.
        assert_eq!(flush_cards(cards("Ac"), 5), cards("Ac"));
        assert_eq!(flush_cards(cards("Ac Kd"), 5), CardSet::EMPTY);
        assert_eq!(flush_cards(cards("Ac Kc"), 5), cards("Ac Kc"));

        // With 7 cards two suited cards are a draw after 4 cards.
        let hand = cards("7c 8c Ad Kd");
        assert_eq!(flush_cards(hand, 7), hand);
        assert_eq!(flush_cards(cards("7c 8c Ad Kh 2s"), 7), CardSet::EMPTY);
        assert_eq!(flush_cards(cards("7c 8c 9c Kh 2s"), 7), cards("7c 8c 9c"));
    }

    #[test]
    fn flush_cards_keeps_top_five() {
        let a = cards("Ac Qc Jc Tc 9c 2c");
        let b = cards("Ac Qc Jc Tc 9c 3c");
        assert_eq!(flush_cards(a, 7), cards("Ac Qc Jc Tc 9c"));
        assert_eq!(flush_cards(a, 7), flush_cards(b, 7));
    }

    #[test]
    fn state_key_equivalence() {
        // Same ranks and no flush draws.
        assert_eq!(
            StateKey::new(cards("Ac Kd 7h"), 5),
            StateKey::new(cards("Ad Ks 7c"), 5)
        );
        assert_ne!(
            StateKey::new(cards("Ac Kc 7c"), 5),
            StateKey::new(cards("Ad Ks 7c"), 5)
        );
        assert_ne!(
            StateKey::new(cards("Ac Kd"), 5),
            StateKey::new(cards("Ac Kd 7h"), 5)
        );

        // Six cards hands with the same straight.
        assert_eq!(
            StateKey::new(cards("9c 8d 7h 6s 5c 2d"), 7),
            StateKey::new(cards("9d 8c 7s 6h 5d 2c"), 7)
        );
    }
}
