// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Lutpoker cards types.
//!
//! This crate define types to create cards, each card is an index in the
//! standard 52 cards deck:
//!
//! ```
//! # use lutpoker_cards::{Card, Rank, Suit};
//! let ah = Card::new(Rank::Ace, Suit::Hearts);
//! assert_eq!(ah.index(), 38);
//! assert_eq!("Ah".parse::<Card>().unwrap(), ah);
//! ```
//!
//! a [CardSet] type that packs cards in a 64-bit mask with one 16-bit lane per
//! suit, and a [Deck] type for sampling and iterating hands.
//!
//! Hands are iterated in descending card index order, the convention used by
//! the lookup table evaluators:
//!
//! ```no_run
//! # use lutpoker_cards::Deck;
//! // Iterate through all 7 cards hands (133M hands).
//! let mut counter = 0;
//! Deck::default().for_each(7, |hand| {
//!     assert!(hand[0] > hand[6]);
//!     counter += 1;
//! });
//! assert_eq!(counter, 133_784_560);
//! ```
//!
//! The [colex_rank] function maps a combination of card indexes to a dense
//! index, useful to store per combination data in flat arrays.
//!
//! The **`parallel`** feature enables parallel sampling and iteration with
//! a given number of tasks, the closure `task_id` can be used to store per
//! task data to reduce contention:
//!
//! ```
//! # #[cfg(feature = "parallel")]
//! # fn par_for_each() {
//! # use std::sync::atomic;
//! # use lutpoker_cards::Deck;
//! // Iterate through all 5 cards hands.
//! let counter = atomic::AtomicU64::new(0);
//! Deck::default().par_for_each(4, 5, |task_id, hand| {
//!     assert_eq!(hand.len(), 5);
//!     counter.fetch_add(1, atomic::Ordering::Relaxed);
//! });
//! assert_eq!(counter.load(atomic::Ordering::Relaxed), 2_598_960);
//! # }
//! ```
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
mod cardset;
mod combin;
mod deck;

pub use cardset::CardSet;
pub use combin::{binomial, colex_rank};
pub use deck::{Card, Deck, ParseCardError, Rank, Suit};
