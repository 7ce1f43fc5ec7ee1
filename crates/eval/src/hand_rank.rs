// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Hand rank encoding.
use serde::{Deserialize, Serialize};
use std::fmt;

use lutpoker_cards::{Card, CardSet, Rank, Suit};

use crate::tables::BIT_COUNT;

/// Bit position of the hand kind.
pub(crate) const SHIFT_KIND: u32 = 24;
/// Bit position of the first tie-break rank.
pub(crate) const SHIFT_CARD_1: u32 = 16;
/// Bit position of the second tie-break rank.
pub(crate) const SHIFT_CARD_2: u32 = 12;
/// Bit position of the third tie-break rank.
pub(crate) const SHIFT_CARD_3: u32 = 8;
/// Width of a tie-break rank field.
pub(crate) const CARD_WIDTH: u32 = 4;

/// The category of a poker hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HandKind {
    /// High card.
    HighCard = 0,
    /// One pair.
    OnePair,
    /// Two pairs.
    TwoPair,
    /// Three of a kind.
    ThreeOfAKind,
    /// Straight.
    Straight,
    /// Flush.
    Flush,
    /// Full house.
    FullHouse,
    /// Four of a kind.
    FourOfAKind,
    /// Straight flush.
    StraightFlush,
}

impl HandKind {
    /// The number of hand kinds.
    pub const COUNT: usize = 9;

    const KINDS: [HandKind; HandKind::COUNT] = [
        HandKind::HighCard,
        HandKind::OnePair,
        HandKind::TwoPair,
        HandKind::ThreeOfAKind,
        HandKind::Straight,
        HandKind::Flush,
        HandKind::FullHouse,
        HandKind::FourOfAKind,
        HandKind::StraightFlush,
    ];

    /// Returns all hand kinds from the weakest to the strongest.
    pub fn kinds() -> impl DoubleEndedIterator<Item = HandKind> {
        Self::KINDS.into_iter()
    }

    /// The base value of a hand rank of this kind.
    pub(crate) const fn base(self) -> u32 {
        (self as u32) << SHIFT_KIND
    }

    /// The number of tie-break ranks that identify the five cards of this kind.
    fn tie_breaks(self) -> usize {
        match self {
            HandKind::HighCard | HandKind::Flush => 5,
            HandKind::OnePair => 4,
            HandKind::TwoPair | HandKind::ThreeOfAKind => 3,
            HandKind::FullHouse | HandKind::FourOfAKind => 2,
            HandKind::Straight | HandKind::StraightFlush => 1,
        }
    }
}

impl fmt::Display for HandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HandKind::HighCard => "High Card",
            HandKind::OnePair => "Pair",
            HandKind::TwoPair => "2 Pair",
            HandKind::ThreeOfAKind => "3 of a Kind",
            HandKind::Straight => "Straight",
            HandKind::Flush => "Flush",
            HandKind::FullHouse => "Full House",
            HandKind::FourOfAKind => "4 of a Kind",
            HandKind::StraightFlush => "Straight Flush",
        };

        write!(f, "{s}")
    }
}

/// The strength of a poker hand.
///
/// A hand rank is a 32 bits value with the following format:
///
/// ```text
///   +--------+--------+--------+--------+
///   |xxxxxxxx|xxxxkkkk|11112222|33334444|5555
///   +--------+--------+--------+--------+
///   k = hand kind (high card=0,...,straight flush=8)
///   1..5 = tie-break ranks (deuce=0,...,ace=12)
/// ```
///
/// The kind is in bits 24..28 and the tie-break ranks in the 4-bit fields at
/// bits 16, 12, 8, 4 and 0, so that comparing two ranks as integers compares
/// the hands strength and equal ranks are ties. Straights store the high card
/// only, a five high straight (the wheel) has rank five.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HandRank(u32);

impl HandRank {
    /// Creates a hand rank from its raw value.
    #[inline]
    pub const fn from_raw(value: u32) -> HandRank {
        HandRank(value)
    }

    /// The raw rank value.
    #[inline]
    pub const fn raw(&self) -> u32 {
        self.0
    }

    /// Returns the kind of this hand.
    pub fn kind(&self) -> HandKind {
        let kind = (self.0 >> SHIFT_KIND) as usize;
        HandKind::KINDS[kind.min(HandKind::COUNT - 1)]
    }

    /// Returns the tie-break rank at the given position (0..5).
    pub fn tie_break(&self, pos: usize) -> Rank {
        assert!(pos < 5, "tie-break position {pos} out of range");
        let shift = SHIFT_CARD_1 - CARD_WIDTH * pos as u32;
        Rank::from_index(((self.0 >> shift) & 0xF).min(12) as u8)
    }

    /// Describes the best five cards of the hand that produced this rank.
    ///
    /// For example a flush with `2s 6s Qs 4h 8s 8d 7s` is described as
    /// `Flush: Qs 8s 7s 6s 2s`. Cards with the same rank are listed in suit
    /// order, a five high straight lists the ace last.
    pub fn describe(&self, hand: CardSet) -> String {
        let kind = self.kind();
        let cards = match kind {
            HandKind::Straight => self.straight_cards(hand),
            HandKind::Flush | HandKind::StraightFlush => {
                let suited = hand
                    .lanes()
                    .into_iter()
                    .enumerate()
                    .find(|(_, lane)| BIT_COUNT[*lane as usize] >= 5)
                    .map(|(suit, lane)| {
                        let mut lanes = [0; 4];
                        lanes[suit] = lane;
                        CardSet::from_lanes(lanes)
                    })
                    .unwrap_or(hand);

                if kind == HandKind::Flush {
                    self.rank_cards(suited, kind.tie_breaks())
                } else {
                    self.straight_cards(suited)
                }
            }
            _ => self.rank_cards(hand, kind.tie_breaks()),
        };

        let names = cards.iter().map(Card::to_string).collect::<Vec<_>>();
        format!("{kind}: {}", names.join(" "))
    }

    /// Collects up to five cards for the first `count` tie-break ranks.
    fn rank_cards(&self, hand: CardSet, count: usize) -> Vec<Card> {
        let mut cards = Vec::with_capacity(5);
        for pos in 0..count {
            let rank = self.tie_break(pos);
            for suit in Suit::suits() {
                let card = Card::new(rank, suit);
                if hand.contains(card) && cards.len() < 5 {
                    cards.push(card);
                }
            }
        }

        cards
    }

    /// Collects one card per rank walking down from the straight high card.
    fn straight_cards(&self, hand: CardSet) -> Vec<Card> {
        let high = self.tie_break(0) as i32;
        (0..5)
            .filter_map(|offset| {
                // Wrap to the ace for the five high straight.
                let rank = high - offset;
                let rank = Rank::from_index(if rank < 0 { 12 } else { rank as u8 });
                Suit::suits()
                    .map(|suit| Card::new(rank, suit))
                    .find(|&card| hand.contains(card))
            })
            .collect()
    }
}

impl fmt::Display for HandRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = self.kind();
        write!(f, "{kind}")?;
        for pos in 0..kind.tie_breaks() {
            write!(f, " {}", self.tie_break(pos))?;
        }

        Ok(())
    }
}

impl From<HandRank> for u32 {
    fn from(rank: HandRank) -> u32 {
        rank.0
    }
}
