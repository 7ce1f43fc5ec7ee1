// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Lookup table builder.
//!
//! The builder creates a state for each class of equivalent partial hands and
//! links each state to the state reached adding one more card, the states for
//! the hands one card short of a full hand link directly to the hand ranks.
//!
//! It runs in two passes over all the hands with 0 to `hand_size - 1` cards,
//! both passes enumerate hands in the same descending order:
//!
//! 1. Each hand is mapped to the state for its [StateKey] or to a new state if
//!    the key has not been seen yet. With 7 cards hands the key does not always
//!    identify a 6 cards state, so a 6 cards hand shares a state only if the
//!    ranks of the completed hands match the ones of the state.
//! 2. Each hand fills the state links that are still unset with the state of
//!    the hand with the added card, or its hand rank.
//!
//! State ids are assigned in enumeration order so the build is deterministic.
use ahash::AHashMap;
use log::{debug, info};
use std::time::Instant;

use lutpoker_cards::{Card, CardSet, Deck, binomial, colex_rank};

use super::{
    LutEvaluator,
    arena::{EMPTY_ROW, ROW_SIZE, RowArena},
    key::StateKey,
};
use crate::{BitEvaluator, Error, Result};

/// The hand size from which keys need the continuation rows check.
const CHECKED_KEY_SIZE: usize = 6;

/// Builds a [LutEvaluator] for 5, 6, or 7 cards hands.
///
/// ```no_run
/// # use lutpoker_eval::LutBuilder;
/// let lut = LutBuilder::new(7).unwrap().build();
/// lut.save("lut7.dat").unwrap();
/// ```
#[derive(Debug)]
pub struct LutBuilder {
    hand_size: usize,
    arena: RowArena,
    /// The state id for each hand of each size indexed by its colex rank.
    states: Vec<Vec<u32>>,
    keys: AHashMap<StateKey, u32>,
    checked_keys: AHashMap<StateKey, Vec<u32>>,
}

impl LutBuilder {
    /// Creates a builder for tables that evaluate hands with `hand_size` cards.
    pub fn new(hand_size: usize) -> Result<Self> {
        if !(5..=7).contains(&hand_size) {
            return Err(Error::UnsupportedHandSize(hand_size));
        }

        Ok(Self {
            hand_size,
            arena: RowArena::default(),
            states: Vec::with_capacity(hand_size),
            keys: AHashMap::default(),
            checked_keys: AHashMap::default(),
        })
    }

    /// Builds the table.
    pub fn build(mut self) -> LutEvaluator {
        let now = Instant::now();
        info!("Building {} cards lookup table", self.hand_size);

        for size in 0..self.hand_size {
            self.create_states(size);
        }

        info!("{} states created", self.arena.len());

        if self.hand_size == 7 {
            let non_unique = self.checked_keys.values().filter(|ids| ids.len() > 1).count();
            let max_states = self.checked_keys.values().map(Vec::len).max().unwrap_or(0);
            info!("Non-unique 6 cards keys: {non_unique}");
            info!("Max 6 cards states with the same key: {max_states}");
        }

        for size in 0..self.hand_size {
            self.link_states(size);
        }

        info!("Table built in {:.3}s", now.elapsed().as_secs_f64());

        let hand_size = self.hand_size;
        let table = self.arena.into_table(hand_size - 1);
        LutEvaluator::from_built(table.into_boxed_slice(), hand_size)
    }

    /// First pass, maps all the hands with `size` cards to a state.
    fn create_states(&mut self, size: usize) {
        let now = Instant::now();
        let num_hands = binomial(Deck::SIZE, size);
        let mut states = vec![0; num_hands];
        let mut count = 0;

        Deck::default().for_each(size, |hand| {
            let cards = hand.iter().collect::<CardSet>();
            let key = StateKey::new(cards, self.hand_size);
            let id = if size < CHECKED_KEY_SIZE {
                self.find_or_add(key, size)
            } else {
                self.find_or_add_checked(key, cards)
            };

            states[colex_rank(index_bits(hand))] = id;
            count += 1;
        });

        assert_eq!(count, num_hands, "bad {size} cards hands count");
        self.states.push(states);

        info!(
            "{size} cards hands mapped, {} states in {:.3}s",
            self.arena.len(),
            now.elapsed().as_secs_f64()
        );
    }

    /// Second pass, links the states of all the hands with `size` cards.
    fn link_states(&mut self, size: usize) {
        let now = Instant::now();
        let mut count = 0;

        let arena = &mut self.arena;
        let states = &self.states[size];
        // The hands one card short of a full hand link to hand ranks.
        let next_states = self.states.get(size + 1);

        Deck::default().for_each(size, |hand| {
            let bits = index_bits(hand);
            let cards = hand.iter().collect::<CardSet>();
            let id = states[colex_rank(bits)];
            let row = arena.row_mut(id);

            for (idx, link) in row.iter_mut().enumerate() {
                let card = Card::from_index(idx);
                if *link != 0 || cards.contains(card) {
                    continue;
                }

                *link = match next_states {
                    Some(next_states) => next_states[colex_rank(bits | 1 << idx)],
                    None => BitEvaluator::eval(cards.with(card)).raw(),
                };
            }

            count += 1;
        });

        assert_eq!(count, states.len(), "bad {size} cards hands count");

        // Only the next size states are needed from now on.
        self.states[size] = Vec::new();

        info!(
            "{size} cards hands linked in {:.3}s",
            now.elapsed().as_secs_f64()
        );
    }

    /// Returns the state for a key, adding a new state if needed.
    fn find_or_add(&mut self, key: StateKey, depth: usize) -> u32 {
        if let Some(&id) = self.keys.get(&key) {
            return id;
        }

        let id = self.add_state(depth, &EMPTY_ROW);
        self.keys.insert(key, id);
        id
    }

    /// Returns a state with the same key and equivalent links for the given
    /// hand, adding a new state if none is found.
    fn find_or_add_checked(&mut self, key: StateKey, cards: CardSet) -> u32 {
        let row = final_ranks(cards);

        let candidates = self
            .checked_keys
            .get(&key)
            .map(Vec::as_slice)
            .unwrap_or_default();

        if let Some(&id) = candidates
            .iter()
            .find(|&&id| rows_equivalent(self.arena.row(id), &row))
        {
            return id;
        }

        let id = self.add_state(cards.len(), &row);
        self.checked_keys.entry(key).or_default().push(id);
        id
    }

    fn add_state(&mut self, depth: usize, row: &[u32; ROW_SIZE]) -> u32 {
        let id = self.arena.push(depth, row);
        if (id + 1) % 100_000 == 0 {
            debug!("{} states created", id + 1);
        }

        id
    }
}

/// Returns the hand ranks for all the cards that can be added to a hand.
fn final_ranks(cards: CardSet) -> [u32; ROW_SIZE] {
    let mut row = EMPTY_ROW;
    for (idx, link) in row.iter_mut().enumerate() {
        let card = Card::from_index(idx);
        if !cards.contains(card) {
            *link = BitEvaluator::eval(cards.with(card)).raw();
        }
    }

    row
}

/// Returns a mask with bit `i` set for each card with index `i`.
fn index_bits(hand: &[Card]) -> u64 {
    hand.iter().fold(0, |bits, c| bits | 1 << c.index())
}

/// Checks if two rows agree on all the entries set in both rows.
///
/// An entry with value 0 is unset and matches any value.
pub(crate) fn rows_equivalent(a: &[u32], b: &[u32]) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(&x, &y)| x == y || x == 0 || y == 0)
}
