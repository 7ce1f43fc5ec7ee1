// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Lookup table evaluator.
//!
//! The table is a state machine with one row of 52 entries per state, to
//! evaluate a hand the evaluator starts at row 0 and for each card reads the
//! entry for the card index in the current row:
//!
//! ```text
//!   value = table[c0]
//!   value = table[value + c1]
//!   ...
//!   rank  = table[value + c6]
//! ```
//!
//! the entries of all rows but the last ones are the offset of the next row,
//! the entries of the last rows are the hand ranks. Entries for cards that are
//! already in the hand are 0.
use byteorder::{LE, ReadBytesExt, WriteBytesExt};
use log::info;
use std::{
    fmt,
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use lutpoker_cards::Card;

use crate::{
    HandKind, HandRank,
    artifact::{ArtifactReader, Version, read_u32_vec, write_artifact, write_u32_slice},
    error::{Error, Result},
};

mod arena;
mod builder;
mod key;

pub use builder::LutBuilder;

use arena::ROW_SIZE;

/// The lookup table file magic.
const LUT_MAGIC: [u8; 4] = *b"LPLT";

/// The lookup table file version.
pub const LUT_VERSION: Version = Version::new(1, 0, 0);

/// A hand evaluator that walks a precomputed state table.
///
/// The evaluator gives the same rank as [BitEvaluator](crate::BitEvaluator)
/// with one table lookup per card:
///
/// ```no_run
/// # use lutpoker_eval::{BitEvaluator, LutEvaluator};
/// # use lutpoker_cards::Deck;
/// let lut = LutEvaluator::load("lut7.dat").unwrap();
/// Deck::default().for_each(7, |hand| {
///     assert_eq!(lut.eval(hand), BitEvaluator::eval_cards(hand));
/// });
/// ```
pub struct LutEvaluator {
    table: Box<[u32]>,
    hand_size: usize,
}

impl LutEvaluator {
    /// Builds a table for hands with `hand_size` cards.
    pub fn build(hand_size: usize) -> Result<Self> {
        Ok(LutBuilder::new(hand_size)?.build())
    }

    /// Creates an evaluator from table entries, the table must be a valid state
    /// table for hands with `hand_size` cards.
    pub fn from_table(table: Vec<u32>, hand_size: usize) -> Result<Self> {
        validate(&table, hand_size)?;
        Ok(Self {
            table: table.into_boxed_slice(),
            hand_size,
        })
    }

    pub(crate) fn from_built(table: Box<[u32]>, hand_size: usize) -> Self {
        debug_assert!(validate(&table, hand_size).is_ok());
        Self { table, hand_size }
    }

    /// The number of cards of the hands evaluated by this table.
    pub fn hand_size(&self) -> usize {
        self.hand_size
    }

    /// The number of states rows.
    pub fn row_count(&self) -> usize {
        self.table.len() / ROW_SIZE
    }

    /// The table entries.
    pub fn table(&self) -> &[u32] {
        &self.table
    }

    /// Evaluates a hand of [hand_size](Self::hand_size) distinct cards sorted by
    /// descending card index.
    ///
    /// Panics if the number of cards is not the table hand size, the rank for a
    /// hand with duplicated cards is unspecified.
    #[inline]
    pub fn eval(&self, cards: &[Card]) -> HandRank {
        assert_eq!(cards.len(), self.hand_size, "bad number of cards");

        let mut value = 0u32;
        for card in cards {
            // SAFETY: the table is validated on construction, a value used as
            // an index is 0 or the offset of a row and a card index is < 52.
            value = unsafe { *self.table.get_unchecked(value as usize + card.index()) };
        }

        HandRank::from_raw(value)
    }

    /// Evaluates a hand given as card indexes, like [eval](Self::eval).
    ///
    /// Panics if the number of cards is not the table hand size or if an index
    /// is not a valid card index.
    pub fn eval_indexes(&self, cards: &[u8]) -> HandRank {
        assert_eq!(cards.len(), self.hand_size, "bad number of cards");

        let value = cards.iter().fold(0, |value, &idx| {
            assert!((idx as usize) < ROW_SIZE, "bad card index {idx}");
            self.step(value, idx as usize)
        });

        HandRank::from_raw(value)
    }

    /// Reads the entry for a card from the row at the given offset.
    #[inline]
    pub(crate) fn step(&self, offset: u32, card_idx: usize) -> u32 {
        self.table[offset as usize + card_idx]
    }

    /// Writes the table to a writer.
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<()> {
        write_artifact(w, LUT_MAGIC, LUT_VERSION, |w| {
            w.write_u32::<LE>(self.hand_size as u32)?;
            w.write_u32::<LE>(self.row_count() as u32)?;
            write_u32_slice(w, &self.table)
        })
    }

    /// Reads a table from a reader.
    pub fn read_from<R: Read>(r: R) -> Result<Self> {
        let mut r = ArtifactReader::open(r, LUT_MAGIC, LUT_VERSION)?;

        let hand_size = r.read_u32::<LE>()? as usize;
        if !(5..=7).contains(&hand_size) {
            return Err(Error::UnsupportedHandSize(hand_size));
        }

        let row_count = r.read_u32::<LE>()? as usize;
        let table = read_u32_vec(&mut r, row_count * ROW_SIZE)?;
        r.finish()?;

        Self::from_table(table, hand_size)
    }

    /// Saves the table to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut w = BufWriter::new(File::create(path)?);
        self.write_to(&mut w)?;

        info!(
            "Saved {} cards table with {} rows to {}",
            self.hand_size,
            self.row_count(),
            path.display()
        );

        Ok(())
    }

    /// Loads a table from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let lut = Self::read_from(BufReader::new(File::open(path)?))?;

        info!(
            "Loaded {} cards table with {} rows from {}",
            lut.hand_size,
            lut.row_count(),
            path.display()
        );

        Ok(lut)
    }
}

impl fmt::Debug for LutEvaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LutEvaluator")
            .field("hand_size", &self.hand_size)
            .field("rows", &self.row_count())
            .finish()
    }
}

/// Checks the table structure.
///
/// Row 0 is the start state at depth 0, the entries of a row at depth `d` are
/// 0 or the offset of a following row at depth `d + 1`, the entries of the rows
/// at depth `hand_size - 1` are 0 or hand ranks. Rows that cannot be reached
/// from row 0 are not checked.
fn validate(table: &[u32], hand_size: usize) -> Result<()> {
    if !(5..=7).contains(&hand_size) {
        return Err(Error::UnsupportedHandSize(hand_size));
    }

    if table.is_empty() || table.len() % ROW_SIZE != 0 {
        return Err(Error::InvalidTable(format!(
            "table size {} is not a multiple of {ROW_SIZE}",
            table.len()
        )));
    }

    let row_count = table.len() / ROW_SIZE;
    if row_count > u32::MAX as usize / ROW_SIZE {
        return Err(Error::InvalidTable(format!("too many rows {row_count}")));
    }

    let max_kind = HandKind::StraightFlush as u32;
    let terminal_depth = hand_size as u8 - 1;
    let mut depths = vec![None; row_count];
    depths[0] = Some(0u8);

    for (row_id, row) in table.chunks_exact(ROW_SIZE).enumerate() {
        let Some(depth) = depths[row_id] else {
            continue;
        };

        for &entry in row.iter().filter(|&&e| e != 0) {
            if depth == terminal_depth {
                if entry >> 24 > max_kind {
                    return Err(Error::InvalidTable(format!(
                        "bad hand rank 0x{entry:08x} in row {row_id}"
                    )));
                }

                continue;
            }

            let next = entry as usize / ROW_SIZE;
            if entry as usize % ROW_SIZE != 0 || next <= row_id || next >= row_count {
                return Err(Error::InvalidTable(format!(
                    "bad link {entry} in row {row_id}"
                )));
            }

            match depths[next] {
                None => depths[next] = Some(depth + 1),
                Some(d) if d == depth + 1 => {}
                Some(d) => {
                    return Err(Error::InvalidTable(format!(
                        "row {next} at depth {d} and {}",
                        depth + 1
                    )));
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::BitEvaluator;
    use lutpoker_cards::Deck;
    use rand::{SeedableRng, rngs::SmallRng};
    use std::sync::OnceLock;

    /// A 5 cards table shared by tests.
    pub(crate) fn lut5() -> &'static LutEvaluator {
        static LUT5: OnceLock<LutEvaluator> = OnceLock::new();
        LUT5.get_or_init(|| LutBuilder::new(5).unwrap().build())
    }

    fn to_bytes(lut: &LutEvaluator) -> Vec<u8> {
        let mut buf = Vec::new();
        lut.write_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn lut_eval_indexes() {
        let lut = lut5();
        let mut rng = SmallRng::seed_from_u64(11);
        Deck::default().sample(&mut rng, 1000, 5, |h| {
            let mut h = h.to_vec();
            h.sort_by(|a, b| b.cmp(a));
            let indexes = h.iter().map(|c| c.index() as u8).collect::<Vec<_>>();
            assert_eq!(lut.eval_indexes(&indexes), lut.eval(&h));
            assert_eq!(lut.eval(&h), BitEvaluator::eval_cards(&h));
        });
    }

    #[test]
    #[should_panic]
    fn lut_eval_wrong_size() {
        let cards = "As Ks Qs Js".parse::<lutpoker_cards::CardSet>().unwrap();
        let cards = cards.iter().collect::<Vec<_>>();
        lut5().eval(&cards);
    }

    #[test]
    fn lut_save_load() {
        let lut = lut5();
        let buf = to_bytes(lut);
        let loaded = LutEvaluator::read_from(buf.as_slice()).unwrap();
        assert_eq!(loaded.hand_size(), 5);
        assert_eq!(loaded.table(), lut.table());

        Deck::default().for_each(5, |h| {
            assert_eq!(loaded.eval(h), lut.eval(h));
        });

        let path = std::env::temp_dir().join(format!("lutpoker-{}.dat", std::process::id()));
        lut.save(&path).unwrap();
        let loaded = LutEvaluator::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded.table(), lut.table());
    }

    #[test]
    fn lut_load_rejects_bad_files() {
        let buf = to_bytes(lut5());

        let mut bad = buf.clone();
        bad[..4].copy_from_slice(b"LPOR");
        assert!(matches!(
            LutEvaluator::read_from(bad.as_slice()),
            Err(Error::BadMagic { .. })
        ));

        let mut bad = buf.clone();
        bad[4] = 2;
        assert!(matches!(
            LutEvaluator::read_from(bad.as_slice()),
            Err(Error::VersionMismatch { expected, .. }) if expected == LUT_VERSION
        ));

        let mut bad = buf.clone();
        let mid = bad.len() / 2;
        bad[mid] ^= 0x01;
        assert!(matches!(
            LutEvaluator::read_from(bad.as_slice()),
            Err(Error::Corrupted)
        ));

        // Hand size after the 20 bytes header.
        let mut bad = buf.clone();
        bad[20] = 4;
        assert!(matches!(
            LutEvaluator::read_from(bad.as_slice()),
            Err(Error::UnsupportedHandSize(4))
        ));

        assert!(matches!(
            LutEvaluator::read_from(&buf[..buf.len() - 1]),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn lut_validate_links() {
        let table = lut5().table().to_vec();
        assert!(LutEvaluator::from_table(table.clone(), 5).is_ok());
        assert!(matches!(
            LutEvaluator::from_table(table.clone(), 8),
            Err(Error::UnsupportedHandSize(8))
        ));

        // Not a whole number of rows.
        let mut bad = table.clone();
        bad.pop();
        assert!(matches!(
            LutEvaluator::from_table(bad, 5),
            Err(Error::InvalidTable(_))
        ));

        // Link out of the table.
        let mut bad = table.clone();
        bad[0] = (table.len() + ROW_SIZE) as u32;
        assert!(matches!(
            LutEvaluator::from_table(bad, 5),
            Err(Error::InvalidTable(_))
        ));

        // Link not at a row boundary.
        let mut bad = table.clone();
        bad[0] += 1;
        assert!(matches!(
            LutEvaluator::from_table(bad, 5),
            Err(Error::InvalidTable(_))
        ));

        // A row that links to itself.
        let mut bad = table.clone();
        let next = table[0] as usize;
        bad[next + 4] = table[0];
        assert!(matches!(
            LutEvaluator::from_table(bad, 5),
            Err(Error::InvalidTable(_))
        ));

        // A 5 cards table is not a valid 6 cards table.
        assert!(LutEvaluator::from_table(table, 6).is_err());
    }

    #[test]
    fn lut_is_send_sync() {
        fn is_send_sync<T: Send + Sync>() {}
        is_send_sync::<LutEvaluator>();
    }
}
