// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0
//
// Run with:
//
// ```bash
// $ cargo r --release --example eval_all7
// ...
// Total hands      133784560
// Elapsed:         2.914s
// Hands/sec:       45911654
//
// High Card:       23294460
// Pair:            58627800
// 2 Pair:          31433400
// 3 of a Kind:     6461620
// Straight:        6180020
// Flush:           4047644
// Full House:      3473184
// 4 of a Kind:     224848
// Straight Flush:  41584
// Total:           133784560
// ```

use std::time::Instant;

use lutpoker_eval::{BitEvaluator, Deck, verify::KindCounts};

fn main() {
    // Evaluate all 133M hands with the bitwise evaluator.
    let now = Instant::now();
    let mut counts = KindCounts::default();

    Deck::default().for_each(7, |hand| {
        counts.add(BitEvaluator::eval_cards(hand));
    });

    let elapsed = now.elapsed().as_secs_f64();
    let total = counts.total();
    println!("Total hands      {total}");
    println!("Elapsed:         {:.3}s", elapsed);
    println!("Hands/sec:       {:.0}\n", total as f64 / elapsed);
    println!("{counts}");

    assert_eq!(Some(counts), KindCounts::expected(7));
}
