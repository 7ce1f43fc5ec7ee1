// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Lutpoker hand evaluators.
//!
//! Poker hand evaluators for 5, 6 and 7 cards hands. The [BitEvaluator] ranks
//! a hand with bitwise operations on the cards suit lanes, the [LutEvaluator]
//! walks a precomputed state table with one lookup per card and gives the
//! same ranks:
//!
//! ```
//! # use lutpoker_eval::*;
//! let hand = "As Ad Ac Kd Kh".parse::<CardSet>().unwrap();
//! let rank = BitEvaluator::eval(hand);
//! assert_eq!(rank.kind(), HandKind::FullHouse);
//! assert_eq!(rank.to_string(), "Full House A K");
//!
//! let lut = LutEvaluator::build(5).unwrap();
//! let mut cards = hand.iter().collect::<Vec<_>>();
//! cards.sort_by(|a, b| b.cmp(a));
//! assert_eq!(lut.eval(&cards), rank);
//! ```
//!
//! Building a 7 cards table takes a while, use the `lutpoker-tablegen` tool to
//! build it once and [LutEvaluator::load] to load it. Tables and [OrdinalTable]s
//! are saved with a versioned and checksummed header, loading a file written
//! by a different version or corrupted fails.
//!
//! The [verify] module cross checks the two evaluators, with the **`parallel`**
//! feature all the hands can be checked with multiple tasks.
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
mod artifact;
mod bit_eval;
mod error;
mod hand_rank;
mod lut;
mod ordinal;
mod tables;
pub mod verify;

pub use artifact::Version;
pub use bit_eval::BitEvaluator;
pub use error::{Error, Result};
pub use hand_rank::{HandKind, HandRank};
pub use lut::{LUT_VERSION, LutBuilder, LutEvaluator};
pub use ordinal::{ORDINAL_VERSION, OrdinalTable};

// Reexport cards types.
pub use lutpoker_cards::{Card, CardSet, Deck, Rank, Suit};
