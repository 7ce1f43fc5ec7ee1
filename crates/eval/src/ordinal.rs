// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Dense hand rank ordinals.
//!
//! Hand ranks are sparse 32 bits values, there are only 7462 distinct ranks
//! for 5 cards hands and 4824 for 7 cards hands. The [OrdinalTable] maps each
//! rank to its position among the sorted distinct ranks, useful to index
//! arrays by hand strength.
use ahash::AHashSet;
use byteorder::{LE, ReadBytesExt, WriteBytesExt};
use log::info;
use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
    time::Instant,
};

use lutpoker_cards::Deck;

use crate::{
    HandRank, LutEvaluator,
    artifact::{ArtifactReader, Version, read_u32_vec, write_artifact, write_u32_slice},
    error::{Error, Result},
};

/// The ordinal table file magic.
const ORDINAL_MAGIC: [u8; 4] = *b"LPOR";

/// The ordinal table file version.
pub const ORDINAL_VERSION: Version = Version::new(1, 0, 0);

/// Maps hand ranks to dense ordinals.
///
/// ```
/// # use lutpoker_eval::{HandRank, OrdinalTable};
/// let ranks = [0x0005_3210, 0x0006_3210, 0x0800_C000];
/// let table = OrdinalTable::from_ranks(ranks.to_vec()).unwrap();
/// assert_eq!(table.ordinal(HandRank::from_raw(0x0006_3210)).unwrap(), 1);
/// assert!(table.ordinal(HandRank::from_raw(0x0007_3210)).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrdinalTable {
    ranks: Box<[u32]>,
}

impl OrdinalTable {
    /// Creates the table with all the ranks reachable in a lookup table.
    pub fn from_lut(lut: &LutEvaluator) -> Self {
        let now = Instant::now();

        let mut ranks = AHashSet::default();
        let mut visited = AHashSet::default();
        collect_ranks(lut, 0, Deck::SIZE, lut.hand_size(), &mut visited, &mut ranks);

        let mut ranks = ranks.into_iter().collect::<Vec<_>>();
        ranks.sort_unstable();

        info!(
            "Found {} distinct {} cards ranks in {:.3}s",
            ranks.len(),
            lut.hand_size(),
            now.elapsed().as_secs_f64()
        );

        Self {
            ranks: ranks.into_boxed_slice(),
        }
    }

    /// Creates the table from strictly ascending ranks.
    pub fn from_ranks(ranks: Vec<u32>) -> Result<Self> {
        if let Some(pos) = ranks.windows(2).position(|w| w[0] >= w[1]) {
            return Err(Error::InvalidTable(format!(
                "rank at {} is not greater than the previous",
                pos + 1
            )));
        }

        Ok(Self {
            ranks: ranks.into_boxed_slice(),
        })
    }

    /// Returns the ordinal for a hand rank.
    pub fn ordinal(&self, rank: HandRank) -> Result<usize> {
        self.ranks
            .binary_search(&rank.raw())
            .map_err(|_| Error::RankNotFound(rank.raw()))
    }

    /// Returns the hand rank for an ordinal.
    pub fn rank(&self, ordinal: usize) -> Option<HandRank> {
        self.ranks.get(ordinal).copied().map(HandRank::from_raw)
    }

    /// The number of distinct ranks.
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    /// Checks if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    /// Writes the table to a writer.
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<()> {
        write_artifact(w, ORDINAL_MAGIC, ORDINAL_VERSION, |w| {
            w.write_u32::<LE>(self.ranks.len() as u32)?;
            write_u32_slice(w, &self.ranks)
        })
    }

    /// Reads a table from a reader.
    pub fn read_from<R: Read>(r: R) -> Result<Self> {
        let mut r = ArtifactReader::open(r, ORDINAL_MAGIC, ORDINAL_VERSION)?;
        let count = r.read_u32::<LE>()? as usize;
        let ranks = read_u32_vec(&mut r, count)?;
        r.finish()?;

        Self::from_ranks(ranks)
    }

    /// Saves the table to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut w = BufWriter::new(File::create(path)?);
        self.write_to(&mut w)?;
        info!("Saved {} ordinals to {}", self.len(), path.display());
        Ok(())
    }

    /// Loads a table from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::read_from(BufReader::new(File::open(path)?))
    }
}

/// Collects the ranks of all the hands that complete the hand at the given
/// row offset with `remaining` cards with index less than `end`.
///
/// Many hands share a state so a state is walked only once for each `end`.
fn collect_ranks(
    lut: &LutEvaluator,
    offset: u32,
    end: usize,
    remaining: usize,
    visited: &mut AHashSet<(u32, u8)>,
    ranks: &mut AHashSet<u32>,
) {
    if !visited.insert((offset, end as u8)) {
        return;
    }

    for idx in (remaining - 1..end).rev() {
        let value = lut.step(offset, idx);
        if remaining == 1 {
            ranks.insert(value);
        } else {
            collect_ranks(lut, value, idx, remaining - 1, visited, ranks);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BitEvaluator, lut::tests::lut5, verify};

    #[test]
    fn ordinal_5cards() {
        let table = OrdinalTable::from_lut(lut5());
        assert_eq!(table.len(), 7462);

        let ranks = verify::distinct_ranks(5);
        let expected = ranks.iter().map(|r| r.raw()).collect::<Vec<_>>();
        assert_eq!(&*table.ranks, expected.as_slice());

        // Ordinals are dense and follow the rank order.
        for (ordinal, rank) in ranks.iter().enumerate() {
            assert_eq!(table.ordinal(*rank).unwrap(), ordinal);
            assert_eq!(table.rank(ordinal), Some(*rank));
        }

        let worst = BitEvaluator::eval("7c 5d 4h 3s 2c".parse().unwrap());
        let best = BitEvaluator::eval("As Ks Qs Js Ts".parse().unwrap());
        assert_eq!(table.ordinal(worst).unwrap(), 0);
        assert_eq!(table.ordinal(best).unwrap(), 7461);
        assert_eq!(table.rank(7462), None);
    }

    #[test]
    fn ordinal_not_found() {
        let table = OrdinalTable::from_lut(lut5());
        assert!(matches!(
            table.ordinal(HandRank::from_raw(1)),
            Err(Error::RankNotFound(1))
        ));
    }

    #[test]
    fn ordinal_from_ranks() {
        assert!(OrdinalTable::from_ranks(vec![]).unwrap().is_empty());
        assert!(OrdinalTable::from_ranks(vec![1, 2, 3]).is_ok());
        assert!(matches!(
            OrdinalTable::from_ranks(vec![1, 3, 3]),
            Err(Error::InvalidTable(_))
        ));
        assert!(matches!(
            OrdinalTable::from_ranks(vec![3, 2]),
            Err(Error::InvalidTable(_))
        ));
    }

    #[test]
    fn ordinal_save_load() {
        let table = OrdinalTable::from_lut(lut5());
        let mut buf = Vec::new();
        table.write_to(&mut buf).unwrap();
        assert_eq!(OrdinalTable::read_from(buf.as_slice()).unwrap(), table);

        // A lookup table file is not an ordinal table.
        let mut lut_buf = Vec::new();
        lut5().write_to(&mut lut_buf).unwrap();
        assert!(matches!(
            OrdinalTable::read_from(lut_buf.as_slice()),
            Err(Error::BadMagic { .. })
        ));

        let last = buf.len() - 1;
        buf[last] ^= 0x80;
        assert!(matches!(
            OrdinalTable::read_from(buf.as_slice()),
            Err(Error::Corrupted)
        ));
    }

    #[test]
    #[ignore]
    fn ordinal_7cards() {
        // This takes a while to run in debug mode, run with:
        // cargo test --release -- --ignored
        let lut = LutEvaluator::build(7).unwrap();
        let table = OrdinalTable::from_lut(&lut);
        assert_eq!(table.len(), 4824);
        assert_eq!(table.len(), verify::distinct_ranks(7).len());
    }
}
