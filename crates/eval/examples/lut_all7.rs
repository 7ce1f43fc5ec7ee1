// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0
//
// Evaluates all the 7 cards hands with a lookup table, the table is built if
// the table file is not given.
//
// ```bash
// $ cargo r --release -p lutpoker-tablegen -- -o lut7.dat
// $ cargo r --release --example lut_all7 -- --table lut7.dat
// ...
// Total hands      133784560
// Elapsed:         0.388s
// Hands/sec:       344805567
//
// High Card:       23294460
// ...
// Straight Flush:  41584
// Total:           133784560
// ```

use clap::Parser;
use std::{path::PathBuf, time::Instant};

use lutpoker_eval::{Deck, LutEvaluator, verify::KindCounts};

#[derive(Debug, Parser)]
struct Cli {
    /// The 7 cards table file.
    #[clap(long, short)]
    table: Option<PathBuf>,
}

fn main() -> lutpoker_eval::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    let lut = match cli.table {
        Some(path) => LutEvaluator::load(path)?,
        None => LutEvaluator::build(7)?,
    };

    // Evaluate all 133M hands, one lookup per card.
    let now = Instant::now();
    let mut counts = KindCounts::default();

    Deck::default().for_each(7, |hand| {
        counts.add(lut.eval(hand));
    });

    let elapsed = now.elapsed().as_secs_f64();
    let total = counts.total();
    println!("Total hands      {total}");
    println!("Elapsed:         {:.3}s", elapsed);
    println!("Hands/sec:       {:.0}\n", total as f64 / elapsed);
    println!("{counts}");

    assert_eq!(Some(counts), KindCounts::expected(7));
    Ok(())
}
