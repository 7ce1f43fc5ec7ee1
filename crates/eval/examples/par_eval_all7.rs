// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0
//
// Evaluates all the 7 cards hands with a lookup table and 4 parallel tasks.
//
// ```bash
// $ cargo r --release --features=parallel --example par_eval_all7 -- -t lut7.dat
// ```

use clap::Parser;
use std::{
    path::PathBuf,
    sync::atomic::{AtomicU64, Ordering},
    time::Instant,
};

use lutpoker_eval::{Deck, HandKind, LutEvaluator, verify::KindCounts};

#[derive(Debug, Parser)]
struct Cli {
    /// The 7 cards table file.
    #[clap(long, short)]
    table: Option<PathBuf>,
    /// Number of parallel tasks.
    #[clap(long, default_value_t = 4, value_parser = clap::value_parser!(u16).range(1..=256))]
    tasks: u16,
}

fn main() -> lutpoker_eval::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();
    let num_tasks = cli.tasks as usize;

    let lut = match cli.table {
        Some(path) => LutEvaluator::load(path)?,
        None => LutEvaluator::build(7)?,
    };

    // Create per task counters to avoid contention and boost performance.
    let task_counters = (0..num_tasks)
        .map(|_| {
            (0..HandKind::COUNT)
                .map(|_| AtomicU64::new(0))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    let now = Instant::now();

    Deck::default().par_for_each(num_tasks, 7, |task_id, hand| {
        let kind = lut.eval(hand).kind();
        let counters = &task_counters[task_id];
        counters[kind as usize].fetch_add(1, Ordering::Relaxed);
    });

    let elapsed = now.elapsed().as_secs_f64();

    // Aggregate counters.
    let mut counts = KindCounts::default();
    for (kind, count) in counts.0.iter_mut().enumerate() {
        *count = task_counters
            .iter()
            .map(|counters| counters[kind].load(Ordering::Relaxed))
            .sum();
    }

    let total = counts.total();
    println!("Total hands      {total}");
    println!("Elapsed:         {:.3}s", elapsed);
    println!("Hands/sec:       {:.0}\n", total as f64 / elapsed);
    println!("{counts}");

    assert_eq!(Some(counts), KindCounts::expected(7));
    Ok(())
}
