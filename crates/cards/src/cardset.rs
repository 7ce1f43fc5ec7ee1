// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! A set of cards packed in a 64-bit mask.
use serde::{Deserialize, Serialize};
use std::{fmt, ops, str::FromStr};

use crate::{Card, ParseCardError, Suit};

/// A set of cards.
///
/// The set is a 64-bit mask with four 16-bit suit lanes, each lane uses the low
/// 13 bits for the ranks, deuce in bit 0 and ace in bit 12:
///
/// ```text
///   +----------------+----------------+----------------+----------------+
///   |xxxAKQJT98765432|xxxAKQJT98765432|xxxAKQJT98765432|xxxAKQJT98765432|
///   +----------------+----------------+----------------+----------------+
///         spades           hearts          diamonds          clubs
/// ```
///
/// Union and intersection are bitwise operations and the number of cards is
/// a population count, a card can only be in the set once.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u64", into = "u64")]
pub struct CardSet(u64);

impl CardSet {
    /// The empty set.
    pub const EMPTY: CardSet = CardSet(0);

    /// The mask of the bits used by cards.
    pub const VALID_BITS: u64 = 0x1FFF_1FFF_1FFF_1FFF;

    /// Creates a set from a mask, bits that do not map to a card are dropped.
    pub const fn from_bits(bits: u64) -> CardSet {
        CardSet(bits & Self::VALID_BITS)
    }

    /// The set mask.
    #[inline]
    pub const fn bits(&self) -> u64 {
        self.0
    }

    /// Returns a new set with the given card added.
    #[inline]
    pub const fn with(self, card: Card) -> CardSet {
        CardSet(self.0 | card.mask())
    }

    /// Adds a card to this set.
    pub fn insert(&mut self, card: Card) {
        self.0 |= card.mask();
    }

    /// Checks if the card is in this set.
    #[inline]
    pub const fn contains(&self, card: Card) -> bool {
        self.0 & card.mask() != 0
    }

    /// Checks if this set has cards in common with another set.
    #[inline]
    pub const fn intersects(&self, other: CardSet) -> bool {
        self.0 & other.0 != 0
    }

    /// The number of cards in this set.
    #[inline]
    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Checks if this set is empty.
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Returns the 13-bit ranks mask for the given suit.
    #[inline]
    pub const fn suit_lane(&self, suit: Suit) -> u32 {
        ((self.0 >> (16 * suit as u64)) & 0x1FFF) as u32
    }

    /// Returns the four suit lanes, clubs first.
    #[inline]
    pub const fn lanes(&self) -> [u32; 4] {
        [
            (self.0 & 0x1FFF) as u32,
            ((self.0 >> 16) & 0x1FFF) as u32,
            ((self.0 >> 32) & 0x1FFF) as u32,
            ((self.0 >> 48) & 0x1FFF) as u32,
        ]
    }

    /// Creates a set from four suit lanes, clubs first.
    pub const fn from_lanes(lanes: [u32; 4]) -> CardSet {
        let bits = lanes[0] as u64
            | (lanes[1] as u64) << 16
            | (lanes[2] as u64) << 32
            | (lanes[3] as u64) << 48;
        CardSet::from_bits(bits)
    }

    /// Iterates the cards in this set in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = Card> + use<> {
        let mut bits = self.0;
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }

            let bit = bits.trailing_zeros() as usize;
            bits &= bits - 1;
            Some(Card::from_index((bit / 16) * 13 + bit % 16))
        })
    }
}

impl From<Card> for CardSet {
    fn from(card: Card) -> Self {
        CardSet(card.mask())
    }
}

impl From<u64> for CardSet {
    fn from(bits: u64) -> Self {
        CardSet::from_bits(bits)
    }
}

impl From<CardSet> for u64 {
    fn from(cards: CardSet) -> u64 {
        cards.0
    }
}

impl FromIterator<Card> for CardSet {
    fn from_iter<T: IntoIterator<Item = Card>>(iter: T) -> Self {
        iter.into_iter().fold(CardSet::EMPTY, CardSet::with)
    }
}

impl<'a> FromIterator<&'a Card> for CardSet {
    fn from_iter<T: IntoIterator<Item = &'a Card>>(iter: T) -> Self {
        iter.into_iter().copied().collect()
    }
}

impl ops::BitOr for CardSet {
    type Output = CardSet;

    fn bitor(self, rhs: Self) -> Self::Output {
        CardSet(self.0 | rhs.0)
    }
}

impl ops::BitOrAssign for CardSet {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl ops::BitAnd for CardSet {
    type Output = CardSet;

    fn bitand(self, rhs: Self) -> Self::Output {
        CardSet(self.0 & rhs.0)
    }
}

impl FromStr for CardSet {
    type Err = ParseCardError;

    /// Parses a whitespace separated list of cards like `"As Kd 2c"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cards = CardSet::EMPTY;
        for name in s.split_whitespace() {
            let card = name.parse::<Card>()?;
            if cards.contains(card) {
                return Err(ParseCardError::Duplicate(name.to_string()));
            }

            cards.insert(card);
        }

        Ok(cards)
    }
}

impl fmt::Display for CardSet {
    /// Prints the cards in descending index order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cards = self.iter().collect::<Vec<_>>();
        for (idx, card) in cards.iter().rev().enumerate() {
            if idx > 0 {
                write!(f, " ")?;
            }

            write!(f, "{card}")?;
        }

        Ok(())
    }
}

impl fmt::Debug for CardSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CardSet({self})")
    }
}
