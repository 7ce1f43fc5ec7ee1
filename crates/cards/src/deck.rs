// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Poker cards definitions.
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

#[cfg(feature = "parallel")]
mod parallel;

/// Rank characters indexed by rank.
const RANK_CHARS: [char; 13] = [
    '2', '3', '4', '5', '6', '7', '8', '9', 'T', 'J', 'Q', 'K', 'A',
];

/// Suit characters indexed by suit.
const SUIT_CHARS: [char; 4] = ['c', 'd', 'h', 's'];

/// Error returned when parsing cards from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCardError {
    /// The card name is not two characters long.
    #[error("invalid card name length {0:?}")]
    Length(String),
    /// Unknown rank character.
    #[error("invalid rank {0:?}")]
    Rank(char),
    /// Unknown suit character.
    #[error("invalid suit {0:?}")]
    Suit(char),
    /// A card index out of the deck range.
    #[error("invalid card index {0}")]
    Index(u8),
    /// A card set containing the same card twice.
    #[error("duplicate card {0}")]
    Duplicate(String),
}

/// A Poker card.
///
/// A card is an index in the standard 52 cards deck:
///
/// ```text
///   index = suit * 13 + rank
///   rank  = deuce=0,trey=1,four=2,five=3,...,ace=12
///   suit  = clubs=0,diamonds=1,hearts=2,spades=3
/// ```
///
/// so that `2c` is card 0 and `As` is card 51. A card can only hold a valid
/// index, the compiled evaluator relies on it.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Card(u8);

impl Card {
    /// Create a card given a suit and rank.
    pub const fn new(rank: Rank, suit: Suit) -> Card {
        Card(suit as u8 * 13 + rank as u8)
    }

    /// Creates a card from its deck index.
    ///
    /// Panics if the index is not in the 0..52 range.
    pub fn from_index(index: usize) -> Card {
        assert!(index < Deck::SIZE, "card index {index} out of range");
        Card(index as u8)
    }

    /// This card deck index.
    #[inline]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Returns the card rank.
    pub fn rank(&self) -> Rank {
        Rank::from_index(self.0 % 13)
    }

    /// Returns the card suit.
    pub fn suit(&self) -> Suit {
        Suit::from_index(self.0 / 13)
    }

    /// The bit for this card in a [CardSet](crate::CardSet) mask.
    #[inline]
    pub const fn mask(&self) -> u64 {
        let (suit, rank) = (self.0 / 13, self.0 % 13);
        1 << (16 * suit as u64 + rank as u64)
    }
}

impl TryFrom<u8> for Card {
    type Error = ParseCardError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        if (index as usize) < Deck::SIZE {
            Ok(Card(index))
        } else {
            Err(ParseCardError::Index(index))
        }
    }
}

impl From<Card> for u8 {
    fn from(card: Card) -> u8 {
        card.0
    }
}

impl FromStr for Card {
    type Err = ParseCardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(r), Some(c), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(ParseCardError::Length(s.to_string()));
        };

        let rank = RANK_CHARS
            .iter()
            .position(|&rc| rc == r.to_ascii_uppercase())
            .ok_or(ParseCardError::Rank(r))?;
        let suit = SUIT_CHARS
            .iter()
            .position(|&sc| sc == c.to_ascii_lowercase())
            .ok_or(ParseCardError::Suit(c))?;

        Ok(Card((suit * 13 + rank) as u8))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank(), self.suit())
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Card({}{})", self.rank(), self.suit())
    }
}

/// Card rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    /// Deuce
    Deuce = 0,
    /// Trey
    Trey,
    /// Four
    Four,
    /// Five
    Five,
    /// Six
    Six,
    /// Seven
    Seven,
    /// Eight
    Eight,
    /// Nine
    Nine,
    /// Ten
    Ten,
    /// Jack
    Jack,
    /// Queen
    Queen,
    /// King
    King,
    /// Ace
    Ace,
}

impl Rank {
    const RANKS: [Rank; 13] = {
        use Rank::*;
        [
            Deuce, Trey, Four, Five, Six, Seven, Eight, Nine, Ten, Jack, Queen, King, Ace,
        ]
    };

    /// Returns all ranks.
    pub fn ranks() -> impl DoubleEndedIterator<Item = Rank> {
        Self::RANKS.into_iter()
    }

    /// Returns the rank with the given index, deuce is 0 and ace is 12.
    ///
    /// Panics if the index is greater than 12.
    pub fn from_index(index: u8) -> Rank {
        Self::RANKS[index as usize]
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", RANK_CHARS[*self as usize])
    }
}

/// Card suit.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Suit {
    /// Clubs suit.
    Clubs = 0,
    /// Diamonds suit.
    Diamonds = 1,
    /// Hearts suit.
    Hearts = 2,
    /// Spades suit.
    Spades = 3,
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", SUIT_CHARS[*self as usize])
    }
}

impl Suit {
    const SUITS: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    /// Returns all suits.
    pub fn suits() -> impl DoubleEndedIterator<Item = Suit> {
        Self::SUITS.into_iter()
    }

    /// Returns the suit with the given index.
    ///
    /// Panics if the index is greater than 3.
    pub fn from_index(index: u8) -> Suit {
        Self::SUITS[index as usize]
    }
}

/// A cards Deck
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// The number of cards in the deck.
    pub const SIZE: usize = 52;

    /// Calls the `f` closure for each k-cards hand.
    ///
    /// The cards in each hand are in descending card index order and hands are
    /// generated in reverse lexicographic order: the first 5 cards hand is `As Ks Qs Js Ts`
    /// and the last one `6c 5c 4c 3c 2c`.
    ///
    /// Panics if k > 7.
    pub fn for_each<F>(&self, k: usize, mut f: F)
    where
        F: FnMut(&[Card]),
    {
        assert!(k <= 7, "k={k} must be 0 <= k <= 7");

        let mut hand = [Card(0); 7];
        descend(&self.cards, &mut hand, 0, k, self.cards.len(), &mut f);
    }

    /// Calls the `f` closure for `count` random k-cards hands.
    ///
    /// Panics if k > 7.
    pub fn sample<R, F>(&self, rng: &mut R, count: usize, k: usize, mut f: F)
    where
        R: Rng,
        F: FnMut(&[Card]),
    {
        assert!(k <= 7, "k={k} must be 0 <= k <= 7");

        if k > self.cards.len() {
            return;
        }

        let mut hand = [Card(0); 7];
        for _ in 0..count {
            for (pos, c) in self.cards.choose_multiple(rng, k).enumerate() {
                hand[pos] = *c;
            }

            f(&hand[..k]);
        }
    }
}

/// Picks the card at `depth` among the deck positions below `end`.
fn descend<F>(cards: &[Card], hand: &mut [Card; 7], depth: usize, k: usize, end: usize, f: &mut F)
where
    F: FnMut(&[Card]),
{
    if depth == k {
        f(&hand[..k]);
        return;
    }

    // Leave enough positions for the cards that still need to be picked.
    let remaining = k - depth;
    for pos in (remaining - 1..end).rev() {
        hand[depth] = cards[pos];
        descend(cards, hand, depth + 1, k, pos, f);
    }
}

impl Default for Deck {
    fn default() -> Self {
        let cards = (0..Self::SIZE as u8).map(Card).collect::<Vec<_>>();
        Self { cards }
    }
}

impl IntoIterator for Deck {
    type Item = Card;
    type IntoIter = std::vec::IntoIter<Card>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.into_iter()
    }
}
