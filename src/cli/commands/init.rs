//! Init command - write the stock configuration for editing.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::config::GameConfig;

#[derive(Parser, Debug)]
#[command(about = "Write a default configuration file")]
pub struct InitArgs {
    /// Where to write the configuration
    #[arg(default_value = "apex.json")]
    pub path: PathBuf,
}

pub fn execute(args: InitArgs) -> Result<()> {
    let config = GameConfig::default_roster();
    config.save(&args.path)?;
    println!("Configuration written to: {}", args.path.display());
    Ok(())
}
