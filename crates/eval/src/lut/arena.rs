// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Fixed stride rows storage.
use lutpoker_cards::Deck;

/// The number of entries in a row, one per card.
pub(crate) const ROW_SIZE: usize = Deck::SIZE;

/// A row with all entries unset.
pub(crate) const EMPTY_ROW: [u32; ROW_SIZE] = [0; ROW_SIZE];

/// Storage for the builder states, each state is a row of [ROW_SIZE] entries
/// addressed by the state id.
#[derive(Debug, Default)]
pub(crate) struct RowArena {
    entries: Vec<u32>,
    depths: Vec<u8>,
}

impl RowArena {
    /// Adds a row for a state at the given depth and returns its id.
    ///
    /// Panics if the number of rows overflows the table address space.
    pub fn push(&mut self, depth: usize, row: &[u32; ROW_SIZE]) -> u32 {
        let id = self.depths.len();
        assert!(
            (id + 1) * ROW_SIZE <= u32::MAX as usize,
            "too many states {}",
            id + 1
        );

        self.entries.extend_from_slice(row);
        self.depths.push(depth as u8);
        id as u32
    }

    /// The number of rows.
    pub fn len(&self) -> usize {
        self.depths.len()
    }

    /// Returns a row entries.
    pub fn row(&self, id: u32) -> &[u32] {
        let start = id as usize * ROW_SIZE;
        &self.entries[start..start + ROW_SIZE]
    }

    /// Returns a row mutable entries.
    pub fn row_mut(&mut self, id: u32) -> &mut [u32] {
        let start = id as usize * ROW_SIZE;
        &mut self.entries[start..start + ROW_SIZE]
    }

    /// Converts the rows to a table where links to rows that are not at the
    /// terminal depth are scaled to the row offset.
    pub fn into_table(self, terminal_depth: usize) -> Vec<u32> {
        let Self {
            mut entries,
            depths,
        } = self;

        for (row, depth) in entries.chunks_exact_mut(ROW_SIZE).zip(depths) {
            if (depth as usize) < terminal_depth {
                row.iter_mut().for_each(|e| *e *= ROW_SIZE as u32);
            }
        }

        entries
    }
}
