// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Builds the lookup table artifacts.
use anyhow::{Context, Result, bail};
use clap::Parser;
use log::{error, info, warn};
use std::path::{Path, PathBuf};

use lutpoker_eval::{LutEvaluator, OrdinalTable, verify};

#[derive(Debug, Parser)]
struct Cli {
    /// The number of cards of the evaluated hands.
    #[clap(long, default_value_t = 7, value_parser = clap::value_parser!(u8).range(5..=7))]
    hand_size: u8,
    /// The lookup table output file [default: lut<HAND_SIZE>.dat].
    #[clap(long, short)]
    output: Option<PathBuf>,
    /// The ordinal table output file.
    #[clap(long)]
    ordinal: Option<PathBuf>,
    /// Cross check all the hands with the bitwise evaluator before writing.
    #[clap(long)]
    verify: bool,
}

impl Cli {
    fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("lut{}.dat", self.hand_size)))
    }
}

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        error!("{e:#}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let hand_size = cli.hand_size as usize;
    let lut = LutEvaluator::build(hand_size)?;
    info!("Table has {} rows", lut.row_count());

    if cli.verify {
        match verify::cross_check(&lut) {
            Ok(counts) if Some(counts) == verify::KindCounts::expected(hand_size) => {
                info!("Verified {} hands\n{counts}", counts.total());
            }
            Ok(counts) => bail!("unexpected hand kinds counts\n{counts}"),
            Err(mismatch) => bail!("verification failed: {mismatch}"),
        }
    }

    let output = cli.output_path();
    check_overwrite(&output);
    lut.save(&output)
        .with_context(|| format!("cannot write table to {}", output.display()))?;

    if let Some(path) = &cli.ordinal {
        let ordinals = OrdinalTable::from_lut(&lut);
        check_overwrite(path);
        ordinals
            .save(path)
            .with_context(|| format!("cannot write ordinals to {}", path.display()))?;
    }

    Ok(())
}

fn check_overwrite(path: &Path) {
    if path.exists() {
        warn!("Overwriting {}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults() {
        let cli = Cli::try_parse_from(["lutpoker-tablegen"]).unwrap();
        assert_eq!(cli.hand_size, 7);
        assert_eq!(cli.output_path(), PathBuf::from("lut7.dat"));
        assert!(cli.ordinal.is_none());
        assert!(!cli.verify);

        let cli = Cli::try_parse_from(["lutpoker-tablegen", "--hand-size", "5"]).unwrap();
        assert_eq!(cli.output_path(), PathBuf::from("lut5.dat"));
    }

    #[test]
    fn cli_options() {
        let cli = Cli::try_parse_from([
            "lutpoker-tablegen",
            "--hand-size",
            "6",
            "-o",
            "t6.dat",
            "--ordinal",
            "o6.dat",
            "--verify",
        ])
        .unwrap();
        assert_eq!(cli.output_path(), PathBuf::from("t6.dat"));
        assert_eq!(cli.ordinal, Some(PathBuf::from("o6.dat")));
        assert!(cli.verify);

        assert!(Cli::try_parse_from(["lutpoker-tablegen", "--hand-size", "8"]).is_err());
        assert!(Cli::try_parse_from(["lutpoker-tablegen", "--hand-size", "4"]).is_err());
    }

    #[test]
    fn run_writes_artifacts() {
        let dir = std::env::temp_dir();
        let id = std::process::id();
        let output = dir.join(format!("lutpoker-tablegen-{id}.dat"));
        let ordinal = dir.join(format!("lutpoker-tablegen-ord-{id}.dat"));

        let cli = Cli {
            hand_size: 5,
            output: Some(output.clone()),
            ordinal: Some(ordinal.clone()),
            verify: true,
        };
        run(&cli).unwrap();

        let lut = LutEvaluator::load(&output).unwrap();
        let ordinals = OrdinalTable::load(&ordinal).unwrap();
        std::fs::remove_file(&output).unwrap();
        std::fs::remove_file(&ordinal).unwrap();

        assert_eq!(lut.hand_size(), 5);
        assert_eq!(ordinals.len(), 7462);
    }
}
