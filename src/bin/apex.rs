//! APEX CLI - tournament runner for the pressure-driven elimination game
//!
//! Subcommands:
//! - `run` plays one seeded tournament and prints (or exports) the report
//! - `compare` aggregates agent performance across many seeded tournaments
//! - `init` writes the stock configuration for editing

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "apex")]
#[command(version, about = "Pressure-driven elimination game tournaments", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single tournament
    Run(apex::cli::commands::run::RunArgs),

    /// Compare agents across many tournaments
    Compare(apex::cli::commands::compare::CompareArgs),

    /// Write a default configuration file
    Init(apex::cli::commands::init::InitArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => apex::cli::commands::run::execute(args),
        Commands::Compare(args) => apex::cli::commands::compare::execute(args),
        Commands::Init(args) => apex::cli::commands::init::execute(args),
    }
}
