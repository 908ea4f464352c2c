//! Compare command - run many seeded tournaments and aggregate per-agent
//! results.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Parser;
use statrs::statistics::Statistics;

use crate::{
    cli::output::{create_run_progress, print_section},
    config::GameConfig,
    tournament::Tournament,
};

#[derive(Parser, Debug)]
#[command(about = "Compare agents across many tournaments")]
pub struct CompareArgs {
    /// Path to a JSON configuration (defaults to the stock roster)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Number of tournaments to run
    #[arg(long, short = 'r', default_value_t = 100)]
    pub runs: u64,

    /// Base seed; run `i` plays with seed `base + i`
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Export aggregated results to CSV
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Default)]
struct AgentAggregate {
    wins: u64,
    survivals: u64,
    scores: Vec<f64>,
    jumps: Vec<f64>,
}

pub fn execute(args: CompareArgs) -> Result<()> {
    if args.runs == 0 {
        return Err(anyhow!("Need at least 1 run"));
    }
    let config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default_roster(),
    };

    println!("Comparing {} agents over {} tournaments:", config.agents.len(), args.runs);
    for profile in &config.agents {
        println!("  - {}", profile.name);
    }

    // BTreeMap keeps the output ordering stable across runs.
    let mut aggregates: BTreeMap<String, AgentAggregate> = BTreeMap::new();
    let progress = create_run_progress(args.runs);

    for run in 0..args.runs {
        let seed = args.seed.wrapping_add(run);
        let mut tournament = Tournament::new(config.clone(), seed)?;
        let report = tournament.run();

        for summary in &report.standings {
            let entry = aggregates.entry(summary.name.clone()).or_default();
            if summary.name == report.champion {
                entry.wins += 1;
            }
            if summary.alive {
                entry.survivals += 1;
            }
            entry.scores.push(summary.total_score as f64);
            entry.jumps.push(f64::from(summary.jump_count));
        }
        progress.inc(1);
    }
    progress.finish_with_message("done");

    print_section("Aggregated results");
    println!(
        "  {:12} {:>8} {:>10} {:>12} {:>10} {:>8}",
        "agent", "wins", "survival", "mean score", "std", "jumps"
    );
    let runs = args.runs as f64;
    for (name, agg) in &aggregates {
        println!(
            "  {:12} {:7.1}% {:9.1}% {:12.1} {:10.1} {:8.2}",
            name,
            agg.wins as f64 / runs * 100.0,
            agg.survivals as f64 / runs * 100.0,
            Statistics::mean(&agg.scores),
            Statistics::std_dev(&agg.scores),
            Statistics::mean(&agg.jumps),
        );
    }

    if let Some(path) = &args.output {
        export_csv(&aggregates, runs, path)?;
        println!("\nResults exported to: {}", path.display());
    }

    Ok(())
}

fn export_csv(
    aggregates: &BTreeMap<String, AgentAggregate>,
    runs: f64,
    path: &PathBuf,
) -> Result<()> {
    use std::{fs::File, io::Write};

    let mut file = File::create(path)?;
    writeln!(file, "Agent,Wins,WinRate,SurvivalRate,MeanScore,StdScore,MeanJumps")?;
    for (name, agg) in aggregates {
        writeln!(
            file,
            "{},{},{:.2},{:.2},{:.2},{:.2},{:.2}",
            name,
            agg.wins,
            agg.wins as f64 / runs * 100.0,
            agg.survivals as f64 / runs * 100.0,
            Statistics::mean(&agg.scores),
            Statistics::std_dev(&agg.scores),
            Statistics::mean(&agg.jumps),
        )?;
    }
    Ok(())
}
