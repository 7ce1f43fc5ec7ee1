// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Bitwise hand evaluator.
//!
//! The evaluator splits a [CardSet] in its four suit lanes and computes the
//! hand rank with a few bitwise operations and lookups in 13-bit tables:
//! flushes and straights are found testing the suit lanes and the lanes union
//! and pairs, trips, and quads are found combining the lanes with `^`, `&`,
//! and `|`, the number of duplicated ranks (cards minus distinct ranks) is used
//! to select which of these combinations to compute.
use lutpoker_cards::{Card, CardSet};

use crate::hand_rank::{
    CARD_WIDTH, HandKind, HandRank, SHIFT_CARD_1, SHIFT_CARD_2, SHIFT_CARD_3,
};
use crate::tables::{BIT_COUNT, STRAIGHT, TOP_CARD, TOP_FIVE_CARDS};

const HIGH_CARD: u32 = HandKind::HighCard.base();
const PAIR: u32 = HandKind::OnePair.base();
const TWO_PAIR: u32 = HandKind::TwoPair.base();
const TRIPS: u32 = HandKind::ThreeOfAKind.base();
const STRAIGHT_HAND: u32 = HandKind::Straight.base();
const FLUSH: u32 = HandKind::Flush.base();
const FULL_HOUSE: u32 = HandKind::FullHouse.base();
const QUADS: u32 = HandKind::FourOfAKind.base();
const STRAIGHT_FLUSH: u32 = HandKind::StraightFlush.base();

const MASK_CARD_1: u32 = 0xF << SHIFT_CARD_1;
const MASK_CARD_2: u32 = 0xF << SHIFT_CARD_2;
const MASK_CARD_5: u32 = 0xF;

/// A hand evaluator that works on the bits of a [CardSet].
///
/// ```
/// # use lutpoker_eval::{BitEvaluator, HandKind};
/// let hand = "Ah Kh Qh Jh Th 2c 2d".parse().unwrap();
/// let rank = BitEvaluator::eval(hand);
/// assert_eq!(rank.kind(), HandKind::StraightFlush);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct BitEvaluator;

impl BitEvaluator {
    /// Evaluates a hand of 5, 6, or 7 distinct cards.
    ///
    /// The number of cards is only checked in debug builds, the result for
    /// other hand sizes is unspecified.
    #[inline]
    pub fn eval(hand: CardSet) -> HandRank {
        debug_assert!(
            (5..=7).contains(&hand.len()),
            "hand size {} must be 5, 6, or 7",
            hand.len()
        );

        HandRank::from_raw(eval_lanes(hand.lanes(), hand.len() as u32))
    }

    /// Evaluates a hand given as a slice of 5, 6, or 7 distinct cards.
    #[inline]
    pub fn eval_cards(cards: &[Card]) -> HandRank {
        Self::eval(cards.iter().collect())
    }
}

/// Computes the hand rank value from the suit lanes.
#[inline]
fn eval_lanes([sc, sd, sh, ss]: [u32; 4], num_cards: u32) -> u32 {
    let ranks = sc | sd | sh | ss;
    let n_ranks = BIT_COUNT[ranks as usize];

    // With 7 cards or less there is no better hand than a straight or flush.
    if n_ranks >= 5 {
        for lane in [ss, sc, sd, sh] {
            if BIT_COUNT[lane as usize] >= 5 {
                let st = STRAIGHT[lane as usize];
                return if st != 0 {
                    STRAIGHT_FLUSH + (st << SHIFT_CARD_1)
                } else {
                    FLUSH + TOP_FIVE_CARDS[lane as usize]
                };
            }
        }

        let st = STRAIGHT[ranks as usize];
        if st != 0 {
            return STRAIGHT_HAND + (st << SHIFT_CARD_1);
        }
    }

    let n_dups = num_cards - n_ranks;
    match n_dups {
        0 => HIGH_CARD + TOP_FIVE_CARDS[ranks as usize],
        1 => {
            let two = ranks ^ (sc ^ sd ^ sh ^ ss);
            let t = ranks ^ two;
            // Drop the fifth card and shift the top three into the kicker fields.
            let kickers = (TOP_FIVE_CARDS[t as usize] >> CARD_WIDTH) & !MASK_CARD_5;
            PAIR + (TOP_CARD[two as usize] << SHIFT_CARD_1) + kickers
        }
        2 => {
            let two = ranks ^ (sc ^ sd ^ sh ^ ss);
            if two != 0 {
                let t = ranks ^ two;
                TWO_PAIR
                    + (TOP_FIVE_CARDS[two as usize] & (MASK_CARD_1 | MASK_CARD_2))
                    + (TOP_CARD[t as usize] << SHIFT_CARD_3)
            } else {
                let three = ((sc & sd) | (sh & ss)) & ((sc & sh) | (sd & ss));
                let mut t = ranks ^ three;
                let second = TOP_CARD[t as usize];
                t ^= 1 << second;
                TRIPS
                    + (TOP_CARD[three as usize] << SHIFT_CARD_1)
                    + (second << SHIFT_CARD_2)
                    + (TOP_CARD[t as usize] << SHIFT_CARD_3)
            }
        }
        _ => {
            let four = sc & sd & sh & ss;
            if four != 0 {
                let tc = TOP_CARD[four as usize];
                let kicker = TOP_CARD[(ranks ^ (1 << tc)) as usize];
                return QUADS + (tc << SHIFT_CARD_1) + (kicker << SHIFT_CARD_2);
            }

            // Without quads this is the set of ranks with two cards.
            let two = ranks ^ (sc ^ sd ^ sh ^ ss);
            if BIT_COUNT[two as usize] != n_dups {
                // Trips and at least a pair.
                let three = ((sc & sd) | (sh & ss)) & ((sc & sh) | (sd & ss));
                let tc = TOP_CARD[three as usize];
                let t = (two | three) ^ (1 << tc);
                return FULL_HOUSE
                    + (tc << SHIFT_CARD_1)
                    + (TOP_CARD[t as usize] << SHIFT_CARD_2);
            }

            // Three pairs.
            let top = TOP_CARD[two as usize];
            let second = TOP_CARD[(two ^ (1 << top)) as usize];
            let kicker = TOP_CARD[(ranks ^ (1 << top) ^ (1 << second)) as usize];
            TWO_PAIR + (top << SHIFT_CARD_1) + (second << SHIFT_CARD_2) + (kicker << SHIFT_CARD_3)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ahash::HashSet;
    use lutpoker_cards::Deck;

    fn eval(hand: &str) -> HandRank {
        BitEvaluator::eval(hand.parse().unwrap())
    }

    #[test]
    fn eval_hand_kinds() {
        let tests = [
            ("2s 3h 6c Ah 9d Kd Js", HandKind::HighCard),
            ("7s 6h 7c Ah 9d Qd Jd", HandKind::OnePair),
            ("7s 6h 7c Ah 9d Qd Ad", HandKind::TwoPair),
            ("7s 6h 7c Ah 6d Qd Ad", HandKind::TwoPair),
            ("2s 6h 7c Ah 2d Qd 2c", HandKind::ThreeOfAKind),
            ("2s 6h 3c 5h 4d 8d 2c", HandKind::Straight),
            ("2s 6s Qs 4h 8s 8d 7s", HandKind::Flush),
            ("2s 6h 7c 6c 2d Qd 2c", HandKind::FullHouse),
            ("2s 6h 6c 6d 2d 2h Qc", HandKind::FullHouse),
            ("2s 6h 7c Ah 2d 2h 2c", HandKind::FourOfAKind),
            ("As 5s 9s 7s 8s 6s Qc", HandKind::StraightFlush),
        ];

        for (hand, kind) in tests {
            assert_eq!(eval(hand).kind(), kind, "{hand}");
        }
    }

    #[test]
    fn eval_hand_values() {
        // Pair of sevens with A Q J kickers.
        assert_eq!(eval("7s 6h 7c Ah 9d Qd Jd").raw(), 0x0105_CA90);
        // Aces and sevens with a queen kicker.
        assert_eq!(eval("7s 6h 7c Ah 9d Qd Ad").raw(), 0x020C_5A00);
        // Three pairs, the best two and the best kicker.
        assert_eq!(eval("7s 6h 7c Ah 6d Qd Ad").raw(), 0x020C_5A00);
        // Deuces full of sixes.
        assert_eq!(eval("2s 6h 7c 6c 2d Qd 2c").raw(), 0x0600_4000);
        // Two trips, sixes full of deuces.
        assert_eq!(eval("2s 6h 6c 6d 2d 2h Qc").raw(), 0x0604_0000);
        // Quad deuces with an ace kicker.
        assert_eq!(eval("2s 6h 7c Ah 2d 2h 2c").raw(), 0x0700_C000);
        // Trip deuces with A Q kickers.
        assert_eq!(eval("2s 6h 7c Ah 2d Qd 2c").raw(), 0x0300_CA00);
    }

    #[test]
    fn eval_wheel() {
        let wheel = eval("Ac 2d 3h 4s 5c");
        let six_high = eval("2d 3h 4s 5c 6d");
        assert_eq!(wheel.kind(), HandKind::Straight);
        assert_eq!(wheel.raw(), STRAIGHT_HAND + (3 << SHIFT_CARD_1));
        assert!(wheel < six_high);

        // The wheel is the lowest straight.
        let mut straights = HashSet::default();
        Deck::default().for_each(5, |h| {
            let rank = BitEvaluator::eval_cards(h);
            if rank.kind() == HandKind::Straight {
                straights.insert(rank);
            }
        });
        assert_eq!(straights.len(), 10);
        assert_eq!(straights.iter().min(), Some(&wheel));

        let steel_wheel = eval("As 2s 3s 4s 5s");
        assert_eq!(steel_wheel.kind(), HandKind::StraightFlush);
        assert!(steel_wheel < eval("2s 3s 4s 5s 6s"));
    }

    #[test]
    fn eval_is_never_zero() {
        assert!(eval("7c 5d 4h 3s 2c").raw() > 0);
        assert!(eval("7c 5d 4h 3s 2c").raw() < eval("7c 6d 4h 3s 2c").raw());
    }

    #[test]
    fn describe_hands() {
        let tests = [
            ("2s 3h 6c Ah 9d Kd Js", "High Card: Ah Kd Js 9d 6c"),
            ("7s 6h 7c Ah 9d Qd Jd", "Pair: 7c 7s Ah Qd Jd"),
            ("7s 6h 7c Ah 9d Qd Ad", "2 Pair: Ad Ah 7c 7s Qd"),
            ("2s 6h 7c Ah 2d Qd 2c", "3 of a Kind: 2c 2d 2s Ah Qd"),
            ("2s 6h 3c 5h 4d 8d 2c", "Straight: 6h 5h 4d 3c 2c"),
            ("2s Ah 3c 5h 4d 8d 2c", "Straight: 5h 4d 3c 2c Ah"),
            ("2s 6s Qs 4h 8s 8d 7s", "Flush: Qs 8s 7s 6s 2s"),
            ("2s 6h 7c 6c 2d Qd 2c", "Full House: 2c 2d 2s 6c 6h"),
            ("2s 6h 7c Ah 2d 2h 2c", "4 of a Kind: 2c 2d 2h 2s Ah"),
            ("As 5s 9s 7s 8s 6s Qc", "Straight Flush: 9s 8s 7s 6s 5s"),
        ];

        for (hand, expected) in tests {
            let hand = hand.parse::<CardSet>().unwrap();
            let rank = BitEvaluator::eval(hand);
            assert_eq!(rank.describe(hand), expected);
        }
    }

    #[test]
    fn eval_5cards_kinds() {
        let mut counts = [0usize; HandKind::COUNT];
        let mut ranks = HashSet::default();
        Deck::default().for_each(5, |h| {
            let rank = BitEvaluator::eval_cards(h);
            counts[rank.kind() as usize] += 1;
            ranks.insert(rank);
        });

        assert_eq!(
            counts,
            [1302540, 1098240, 123552, 54912, 10200, 5108, 3744, 624, 40]
        );
        assert_eq!(ranks.len(), 7462);
    }

    #[test]
    #[ignore]
    fn eval_7cards_kinds() {
        // This takes a while to run in debug mode, run with:
        // cargo test --release -- --ignored
        let mut counts = [0usize; HandKind::COUNT];
        let mut ranks = HashSet::default();
        Deck::default().for_each(7, |h| {
            let rank = BitEvaluator::eval_cards(h);
            counts[rank.kind() as usize] += 1;
            ranks.insert(rank);
        });

        assert_eq!(
            counts,
            [
                23294460, 58627800, 31433400, 6461620, 6180020, 4047644, 3473184, 224848, 41584
            ]
        );
        assert_eq!(ranks.len(), 4824);
    }
}
