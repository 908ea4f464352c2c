//! Run command - play one tournament and report the results.

use std::{fs::File, io::BufWriter, path::PathBuf};

use anyhow::Result;
use clap::Parser;
use rand::Rng;

use crate::{
    cli::output::{print_kv, print_section},
    config::GameConfig,
    tournament::{Tournament, TournamentReport},
};

#[derive(Parser, Debug)]
#[command(about = "Run a single tournament")]
pub struct RunArgs {
    /// Path to a JSON configuration (defaults to the stock roster)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Random seed for reproducibility (a fresh one is drawn when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write the full report as JSON
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Only print the final standings
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

pub fn execute(args: RunArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default_roster(),
    };
    let seed = args.seed.unwrap_or_else(|| rand::rng().random());

    let mut tournament = Tournament::new(config, seed)?;
    let report = tournament.run();

    if !args.quiet {
        print_set_results(&report);
    }
    print_final_standings(&report);

    if let Some(path) = &args.output {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), &report)?;
        println!("\nReport written to: {}", path.display());
    }

    println!("\nSeed: {seed} (rerun with --seed {seed})");
    Ok(())
}

fn print_set_results(report: &TournamentReport) {
    for set in &report.sets {
        print_section(&format!(
            "Set {} [{}] risk x{:.2}, bonus x{:.2}",
            set.set, set.environment, set.risk_multiplier, set.bonus_multiplier
        ));
        for line in &set.standings {
            let status = if line.alive {
                format!("HP {}", line.hp)
            } else {
                "out".to_string()
            };
            println!(
                "  {:2}. {:12} {:5}pts (total {:5}, +{} bonus) [{}]",
                line.rank, line.name, line.set_score, line.total_score, line.bonus, status
            );
        }
    }
}

fn print_final_standings(report: &TournamentReport) {
    print_section("Final standings");
    for summary in &report.standings {
        let status = if summary.alive {
            format!("HP {}", summary.hp)
        } else {
            summary
                .elimination
                .as_ref()
                .map(|e| format!("out in set {} round {}", e.set, e.round))
                .unwrap_or_else(|| "out".to_string())
        };
        println!(
            "  {:2}. {:12} {:6}pts [{}] jumps: {}",
            summary.rank, summary.name, summary.total_score, status, summary.jump_count
        );
    }
    print_kv("Champion", &report.champion);
}
