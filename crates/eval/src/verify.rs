// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Evaluators cross checks.
//!
//! The [BitEvaluator] and the [LutEvaluator] are independent implementations,
//! these functions compare their ranks and count hand kinds against the known
//! number of hands of each kind.
use ahash::AHashSet;
use log::info;
use rand::Rng;
use std::{fmt, ops, time::Instant};
use thiserror::Error;

use lutpoker_cards::{Card, CardSet, Deck};

use crate::{BitEvaluator, HandKind, HandRank, LutEvaluator};

/// The number of hands for each hand kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindCounts(pub [u64; HandKind::COUNT]);

impl KindCounts {
    /// The number of hands of each kind for all the 5, 6, or 7 cards hands.
    pub fn expected(hand_size: usize) -> Option<Self> {
        let counts = match hand_size {
            5 => [1302540, 1098240, 123552, 54912, 10200, 5108, 3744, 624, 40],
            6 => [
                6612900, 9730740, 2532816, 732160, 361620, 205792, 165984, 14664, 1844,
            ],
            7 => [
                23294460, 58627800, 31433400, 6461620, 6180020, 4047644, 3473184, 224848, 41584,
            ],
            _ => return None,
        };

        Some(Self(counts))
    }

    /// Counts a hand rank.
    #[inline]
    pub fn add(&mut self, rank: HandRank) {
        self.0[rank.kind() as usize] += 1;
    }

    /// The number of hands of the given kind.
    pub fn get(&self, kind: HandKind) -> u64 {
        self.0[kind as usize]
    }

    /// The total number of hands.
    pub fn total(&self) -> u64 {
        self.0.iter().sum()
    }
}

impl ops::Add for KindCounts {
    type Output = KindCounts;

    fn add(mut self, rhs: Self) -> Self::Output {
        self.0.iter_mut().zip(rhs.0).for_each(|(a, b)| *a += b);
        self
    }
}

impl fmt::Display for KindCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for kind in HandKind::kinds() {
            writeln!(f, "{:<16} {}", format!("{kind}:"), self.get(kind))?;
        }

        write!(f, "{:<16} {}", "Total:", self.total())
    }
}

/// A hand for which the two evaluators disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("hand {hand} lookup rank {found} bitwise rank {expected}")]
pub struct Mismatch {
    /// The hand cards.
    pub hand: CardSet,
    /// The rank from the bitwise evaluator.
    pub expected: HandRank,
    /// The rank from the lookup table.
    pub found: HandRank,
}

/// Counts the hand kinds of all the hands with `hand_size` cards using the
/// bitwise evaluator.
pub fn count_kinds(hand_size: usize) -> KindCounts {
    let mut counts = KindCounts::default();
    Deck::default().for_each(hand_size, |hand| {
        counts.add(BitEvaluator::eval_cards(hand));
    });

    counts
}

/// Returns the sorted distinct ranks of all the hands with `hand_size` cards.
pub fn distinct_ranks(hand_size: usize) -> Vec<HandRank> {
    let mut ranks = AHashSet::default();
    Deck::default().for_each(hand_size, |hand| {
        ranks.insert(BitEvaluator::eval_cards(hand));
    });

    let mut ranks = ranks.into_iter().collect::<Vec<_>>();
    ranks.sort_unstable();
    ranks
}

/// Compares the lookup table and the bitwise evaluator ranks for all the
/// hands and returns the lookup table kind counts or the first mismatch.
pub fn cross_check(lut: &LutEvaluator) -> Result<KindCounts, Mismatch> {
    let now = Instant::now();
    let mut counts = KindCounts::default();
    let mut mismatch = None;

    Deck::default().for_each(lut.hand_size(), |hand| {
        if mismatch.is_none() {
            match check_hand(lut, hand) {
                Ok(rank) => counts.add(rank),
                Err(m) => mismatch = Some(m),
            }
        }
    });

    if let Some(m) = mismatch {
        return Err(m);
    }

    info!(
        "Checked {} hands in {:.3}s",
        counts.total(),
        now.elapsed().as_secs_f64()
    );

    Ok(counts)
}

/// Compares the lookup table and the bitwise evaluator ranks for `samples`
/// random hands.
pub fn cross_check_sampled<R: Rng>(
    lut: &LutEvaluator,
    rng: &mut R,
    samples: usize,
) -> Result<KindCounts, Mismatch> {
    let mut counts = KindCounts::default();
    let mut mismatch = None;
    let mut sorted = [Card::from_index(0); 7];

    Deck::default().sample(rng, samples, lut.hand_size(), |hand| {
        if mismatch.is_none() {
            let sorted = &mut sorted[..hand.len()];
            sorted.copy_from_slice(hand);
            sorted.sort_unstable_by(|a, b| b.cmp(a));

            match check_hand(lut, sorted) {
                Ok(rank) => counts.add(rank),
                Err(m) => mismatch = Some(m),
            }
        }
    });

    mismatch.map_or(Ok(counts), Err)
}

/// Parallel [cross_check] with `num_tasks` tasks.
#[cfg(feature = "parallel")]
pub fn par_cross_check(lut: &LutEvaluator, num_tasks: usize) -> Result<KindCounts, Mismatch> {
    let now = Instant::now();
    let checker = parallel::TaskChecker::new(lut, num_tasks);

    Deck::default().par_for_each(num_tasks, lut.hand_size(), |task_id, hand| {
        checker.check(task_id, hand);
    });

    let counts = checker.finish()?;
    info!(
        "Checked {} hands with {num_tasks} tasks in {:.3}s",
        counts.total(),
        now.elapsed().as_secs_f64()
    );

    Ok(counts)
}

/// Parallel [cross_check_sampled] with `num_tasks` tasks, each task checks
/// `samples_per_task` random hands.
#[cfg(feature = "parallel")]
pub fn par_cross_check_sampled(
    lut: &LutEvaluator,
    num_tasks: usize,
    samples_per_task: usize,
) -> Result<KindCounts, Mismatch> {
    let checker = parallel::TaskChecker::new(lut, num_tasks);

    Deck::default().par_sample(num_tasks, samples_per_task, lut.hand_size(), |task_id, hand| {
        let mut sorted = [Card::from_index(0); 7];
        let sorted = &mut sorted[..hand.len()];
        sorted.copy_from_slice(hand);
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        checker.check(task_id, sorted);
    });

    checker.finish()
}

#[cfg(feature = "parallel")]
mod parallel {
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

    use super::{KindCounts, Mismatch, check_hand};
    use crate::{HandKind, LutEvaluator};
    use lutpoker_cards::Card;

    /// Per task kind counters and the first mismatch found by any task.
    pub(super) struct TaskChecker<'a> {
        lut: &'a LutEvaluator,
        // Per task counters to avoid contention.
        task_counters: Vec<Vec<AtomicU64>>,
        failed: AtomicBool,
        mismatch: Mutex<Option<Mismatch>>,
    }

    impl<'a> TaskChecker<'a> {
        pub fn new(lut: &'a LutEvaluator, num_tasks: usize) -> Self {
            let task_counters = (0..num_tasks)
                .map(|_| {
                    (0..HandKind::COUNT)
                        .map(|_| AtomicU64::new(0))
                        .collect::<Vec<_>>()
                })
                .collect::<Vec<_>>();

            Self {
                lut,
                task_counters,
                failed: AtomicBool::new(false),
                mismatch: Mutex::new(None),
            }
        }

        pub fn check(&self, task_id: usize, hand: &[Card]) {
            if self.failed.load(Ordering::Relaxed) {
                return;
            }

            match check_hand(self.lut, hand) {
                Ok(rank) => {
                    self.task_counters[task_id][rank.kind() as usize]
                        .fetch_add(1, Ordering::Relaxed);
                }
                Err(m) => {
                    self.failed.store(true, Ordering::Relaxed);
                    let mut first = self.mismatch.lock();
                    if first.is_none() {
                        *first = Some(m);
                    }
                }
            }
        }

        pub fn finish(self) -> Result<KindCounts, Mismatch> {
            if let Some(m) = self.mismatch.into_inner() {
                return Err(m);
            }

            let mut counts = KindCounts::default();
            for (kind, count) in counts.0.iter_mut().enumerate() {
                *count = self
                    .task_counters
                    .iter()
                    .map(|c| c[kind].load(Ordering::Relaxed))
                    .sum();
            }

            Ok(counts)
        }
    }
}

fn check_hand(lut: &LutEvaluator, hand: &[Card]) -> Result<HandRank, Mismatch> {
    let found = lut.eval(hand);
    let expected = BitEvaluator::eval_cards(hand);
    if found == expected {
        Ok(found)
    } else {
        Err(Mismatch {
            hand: hand.iter().collect(),
            expected,
            found,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lut::tests::lut5;
    use rand::{SeedableRng, rngs::SmallRng};

    #[test]
    fn count_5cards_kinds() {
        let counts = count_kinds(5);
        assert_eq!(Some(counts), KindCounts::expected(5));
        assert_eq!(counts.total(), 2_598_960);
        assert_eq!(counts.get(HandKind::StraightFlush), 40);
    }

    #[test]
    fn expected_counts() {
        assert_eq!(KindCounts::expected(6).unwrap().total(), 20_358_520);
        assert_eq!(KindCounts::expected(7).unwrap().total(), 133_784_560);
        assert_eq!(KindCounts::expected(4), None);
    }

    #[test]
    fn cross_check_5cards() {
        let counts = cross_check(lut5()).unwrap();
        assert_eq!(Some(counts), KindCounts::expected(5));
    }

    #[test]
    fn cross_check_5cards_sampled() {
        let mut rng = SmallRng::seed_from_u64(42);
        let counts = cross_check_sampled(lut5(), &mut rng, 100_000).unwrap();
        assert_eq!(counts.total(), 100_000);
    }

    #[test]
    fn cross_check_finds_mismatch() {
        let mut table = lut5().table().to_vec();

        // Break the rank of the first 5 cards hand, As Ks Qs Js Ts.
        let hand = ["As", "Ks", "Qs", "Js", "Ts"].map(|c| c.parse::<Card>().unwrap());
        let mut offset = 0;
        for card in &hand[..4] {
            offset = table[offset + card.index()] as usize;
        }
        let royal = table[offset + hand[4].index()];
        table[offset + hand[4].index()] = royal - 1;

        let lut = LutEvaluator::from_table(table, 5).unwrap();
        let m = cross_check(&lut).unwrap_err();
        assert_eq!(m.hand, hand.iter().collect::<CardSet>());
        assert_eq!(m.expected.raw(), royal);
        assert_eq!(m.found.raw(), royal - 1);
        assert_eq!(
            m.to_string(),
            format!(
                "hand As Ks Qs Js Ts lookup rank {} bitwise rank {}",
                m.found, m.expected
            )
        );
    }

    #[test]
    fn kind_counts_display() {
        let counts = KindCounts::expected(5).unwrap();
        let s = counts.to_string();
        assert!(s.starts_with("High Card:       1302540\n"));
        assert!(s.ends_with("Total:           2598960"));
        assert_eq!((counts + counts).total(), 2 * 2_598_960);
    }

    #[test]
    #[ignore]
    fn distinct_7cards_ranks() {
        // This takes a while to run in debug mode, run with:
        // cargo test --release -- --ignored
        assert_eq!(distinct_ranks(7).len(), 4824);
        assert_eq!(Some(count_kinds(7)), KindCounts::expected(7));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn par_cross_check_5cards() {
        let counts = par_cross_check(lut5(), 4).unwrap();
        assert_eq!(Some(counts), KindCounts::expected(5));

        let counts = par_cross_check_sampled(lut5(), 4, 10_000).unwrap();
        assert_eq!(counts.total(), 40_000);
    }
}
